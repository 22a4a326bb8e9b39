use super::config::AlignmentConfig;
use super::mapping::Mapping;
use crate::core::models::residue::ObservedResidue;
use bio::alignment::AlignmentOperation;
use bio::alignment::pairwise::Aligner;
use bio::scores::blosum62;
use tracing::debug;

/// Residue letters the substitution matrix scores; anything else is scored as `X`.
const SCORED_RESIDUES: &[u8] = b"ARNDCQEGHILKMFPSTWYVBZX";
const UNSCORED_RESIDUE: u8 = b'X';

/// One column of a global alignment between sequences `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignedPair {
    /// An element of `a` aligned to an element of `b`.
    Both,
    /// An element of `a` aligned to a gap.
    OnlyA,
    /// An element of `b` aligned to a gap.
    OnlyB,
}

/// A global pairwise sequence aligner.
///
/// The returned columns, read in order, consume all of `a` and all of `b`.
pub trait GlobalAligner {
    fn align(&self, a: &[char], b: &[char]) -> Vec<AlignedPair>;
}

/// Needleman-Wunsch alignment scored with BLOSUM62 and affine gap penalties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blosum62Aligner {
    gap_open: i32,
    gap_extend: i32,
}

impl Blosum62Aligner {
    pub fn new(gap_open: i32, gap_extend: i32) -> Self {
        Self {
            gap_open,
            gap_extend,
        }
    }

    pub fn from_config(config: &AlignmentConfig) -> Self {
        Self::new(config.gap_open, config.gap_extend)
    }
}

impl Default for Blosum62Aligner {
    fn default() -> Self {
        Self::from_config(&AlignmentConfig::default())
    }
}

fn encode(sequence: &[char]) -> Vec<u8> {
    sequence
        .iter()
        .map(|&c| match u8::try_from(c) {
            Ok(byte) if SCORED_RESIDUES.contains(&byte) => byte,
            _ => UNSCORED_RESIDUE,
        })
        .collect()
}

impl GlobalAligner for Blosum62Aligner {
    fn align(&self, a: &[char], b: &[char]) -> Vec<AlignedPair> {
        if a.is_empty() || b.is_empty() {
            return std::iter::repeat_n(AlignedPair::OnlyA, a.len())
                .chain(std::iter::repeat_n(AlignedPair::OnlyB, b.len()))
                .collect();
        }

        let x = encode(a);
        let y = encode(b);
        let mut aligner =
            Aligner::with_capacity(x.len(), y.len(), self.gap_open, self.gap_extend, &blosum62);
        let alignment = aligner.global(&x, &y);

        let mut columns = Vec::with_capacity(x.len() + y.len());
        for operation in &alignment.operations {
            match *operation {
                AlignmentOperation::Match | AlignmentOperation::Subst => {
                    columns.push(AlignedPair::Both)
                }
                AlignmentOperation::Ins => columns.push(AlignedPair::OnlyA),
                AlignmentOperation::Del => columns.push(AlignedPair::OnlyB),
                AlignmentOperation::Xclip(len) => {
                    columns.extend(std::iter::repeat_n(AlignedPair::OnlyA, len))
                }
                AlignmentOperation::Yclip(len) => {
                    columns.extend(std::iter::repeat_n(AlignedPair::OnlyB, len))
                }
            }
        }
        columns
    }
}

/// Maps canonical positions by globally aligning residue identities.
///
/// Numbering is ignored. Each canonical position aligned to an observed
/// residue receives the next unconsumed observed residue in file order.
/// Observed residues aligned against a canonical gap are consumed without a
/// position.
pub fn align_residues(
    canonical: &[char],
    observed: &[ObservedResidue],
    aligner: &impl GlobalAligner,
) -> Mapping {
    let identities: Vec<char> = observed.iter().map(|r| r.identity).collect();
    let columns = aligner.align(canonical, &identities);

    let mut mapping = Mapping::absent(canonical.len());
    let mut position = 0;
    let mut next_observed = 0;
    for column in columns {
        match column {
            AlignedPair::Both => {
                if position < mapping.len() && next_observed < observed.len() {
                    mapping.set(position, Some(next_observed));
                }
                position += 1;
                next_observed += 1;
            }
            AlignedPair::OnlyA => position += 1,
            AlignedPair::OnlyB => {
                if let Some(residue) = observed.get(next_observed) {
                    debug!(
                        "Observed residue '{}' ({}{}) has no canonical position.",
                        residue.identity,
                        residue.sequence_number,
                        residue.insertion_code.map(String::from).unwrap_or_default()
                    );
                }
                next_observed += 1;
            }
        }
    }
    mapping
}
