use super::chunk::chunk;
use super::dispatch::FallbackReason;
use super::mapping::Mapping;
use crate::core::models::residue::{MissingResidue, ObservedResidue, ResidueKey, SequencedResidue};
use std::collections::HashSet;
use std::ops::Range;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provenance {
    Missing,
    Observed,
}

const MISSING_FIRST: &[Provenance] = &[Provenance::Missing, Provenance::Observed];
const OBSERVED_FIRST: &[Provenance] = &[Provenance::Observed, Provenance::Missing];
const ONLY_MISSING: &[Provenance] = &[Provenance::Missing];
const ONLY_OBSERVED: &[Provenance] = &[Provenance::Observed];

/// One node of the depth-first search.
///
/// `end` is the first unfilled canonical position; it always equals the total
/// length of the chunks placed on the path to this node.
#[derive(Debug, Clone, Copy)]
struct Frame {
    next_missing: usize,
    next_observed: usize,
    end: usize,
    last: Option<Provenance>,
    /// Number of candidate provenances already tried from this node.
    tried: usize,
}

impl Frame {
    fn root() -> Self {
        Self {
            next_missing: 0,
            next_observed: 0,
            end: 0,
            last: None,
            tried: 0,
        }
    }
}

/// Depth-first placement of missing and observed chunks onto the canonical sequence.
struct InterleaveSearch<'a> {
    canonical: &'a [char],
    missing: Vec<&'a MissingResidue>,
    observed: &'a [ObservedResidue],
    missing_chunks: Vec<Range<usize>>,
    observed_chunks: Vec<Range<usize>>,
    mapping: Mapping,
    /// `(next missing chunk, next observed chunk)` states known to have no completion.
    dead_ends: HashSet<(usize, usize)>,
}

impl<'a> InterleaveSearch<'a> {
    fn new(
        canonical: &'a [char],
        missing: &'a [MissingResidue],
        observed: &'a [ObservedResidue],
    ) -> Self {
        let mut missing: Vec<&MissingResidue> = missing.iter().collect();
        missing.sort_by_key(|residue| residue.key());

        let missing_keys: Vec<ResidueKey> = missing.iter().map(|r| r.key()).collect();
        let observed_keys: Vec<ResidueKey> = observed.iter().map(|r| r.key()).collect();

        Self {
            canonical,
            missing_chunks: chunk(&missing_keys, &observed_keys),
            observed_chunks: chunk(&observed_keys, &missing_keys),
            missing,
            observed,
            mapping: Mapping::absent(canonical.len()),
            dead_ends: HashSet::new(),
        }
    }

    /// Provenances to try from a node, in order; empty once both lists are exhausted.
    ///
    /// Before anything is placed, missing chunks go first; afterwards the
    /// provenance opposite to the previous chunk is preferred.
    fn candidates(&self, frame: &Frame) -> &'static [Provenance] {
        let missing_left = frame.next_missing < self.missing_chunks.len();
        let observed_left = frame.next_observed < self.observed_chunks.len();
        match (missing_left, observed_left) {
            (false, false) => &[],
            (true, false) => ONLY_MISSING,
            (false, true) => ONLY_OBSERVED,
            (true, true) => match frame.last {
                None | Some(Provenance::Observed) => MISSING_FIRST,
                Some(Provenance::Missing) => OBSERVED_FIRST,
            },
        }
    }

    /// Runs the search to completion. On success, `mapping` holds the result.
    fn run(&mut self) -> bool {
        let mut stack = vec![Frame::root()];

        while let Some(frame) = stack.last().copied() {
            let candidates = self.candidates(&frame);
            if candidates.is_empty() {
                return true;
            }
            let state = (frame.next_missing, frame.next_observed);
            if frame.tried == 0 && self.dead_ends.contains(&state) {
                stack.pop();
                continue;
            }

            if let Some(&provenance) = candidates.get(frame.tried) {
                if let Some(top) = stack.last_mut() {
                    top.tried += 1;
                }
                if let Some(child) = self.place(provenance, &frame) {
                    stack.push(child);
                }
                continue;
            }

            trace!(
                next_missing = frame.next_missing,
                next_observed = frame.next_observed,
                end = frame.end,
                "Search state has no completion."
            );
            self.dead_ends.insert(state);
            stack.pop();
        }
        false
    }

    /// Places the next chunk of `provenance` at `frame.end` if its identities
    /// fit, returning the node that follows the placement.
    fn place(&mut self, provenance: Provenance, frame: &Frame) -> Option<Frame> {
        let end = frame.end;
        let mut child = Frame {
            last: Some(provenance),
            tried: 0,
            ..*frame
        };
        match provenance {
            Provenance::Missing => {
                let range = self.missing_chunks[frame.next_missing].clone();
                let len = range.len();
                if !self.matches_at(end, self.missing[range].iter().map(|r| r.identity)) {
                    return None;
                }
                for offset in 0..len {
                    self.mapping.set(end + offset, None);
                }
                child.next_missing += 1;
                child.end += len;
            }
            Provenance::Observed => {
                let range = self.observed_chunks[frame.next_observed].clone();
                let len = range.len();
                if !self.matches_at(
                    end,
                    self.observed[range.clone()].iter().map(|r| r.identity),
                ) {
                    return None;
                }
                for (offset, handle) in range.enumerate() {
                    self.mapping.set(end + offset, Some(handle));
                }
                child.next_observed += 1;
                child.end += len;
            }
        }
        Some(child)
    }

    /// Checks that `identities` equal the canonical residues starting at `end`.
    fn matches_at(&self, end: usize, mut identities: impl ExactSizeIterator<Item = char>) -> bool {
        let Some(span) = self.canonical.get(end..end + identities.len()) else {
            return false;
        };
        span.iter().all(|&canonical| identities.next() == Some(canonical))
    }
}

/// Maps canonical positions by interleaving contiguous chunks of missing and
/// observed residues.
///
/// Missing residues are ordered by author numbering, observed residues keep
/// file order. On success, positions holding an observed residue without any
/// atoms are reported as absent.
///
/// # Errors
///
/// Returns [`FallbackReason::StructuralInconsistency`] if the missing and
/// observed counts do not add up to the canonical length, and
/// [`FallbackReason::AmbiguousCorrespondence`] if no interleaving reproduces
/// the canonical sequence.
pub fn chunk_merge(
    canonical: &[char],
    missing: &[MissingResidue],
    observed: &[ObservedResidue],
) -> Result<Mapping, FallbackReason> {
    if missing.len() + observed.len() != canonical.len() {
        return Err(FallbackReason::StructuralInconsistency {
            expected: canonical.len(),
            missing: missing.len(),
            observed: observed.len(),
        });
    }

    let mut search = InterleaveSearch::new(canonical, missing, observed);
    debug!(
        "Interleaving {} missing and {} observed chunk(s).",
        search.missing_chunks.len(),
        search.observed_chunks.len()
    );
    if !search.run() {
        return Err(FallbackReason::AmbiguousCorrespondence);
    }

    let mut mapping = search.mapping;
    for position in 0..mapping.len() {
        if let Some(handle) = mapping.get(position) {
            if !observed[handle].has_atoms() {
                mapping.set(position, None);
            }
        }
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn canonical(sequence: &str) -> Vec<char> {
        sequence.chars().collect()
    }

    fn observed(residues: &[(char, isize)]) -> Vec<ObservedResidue> {
        residues
            .iter()
            .map(|&(identity, seq)| {
                ObservedResidue::new(identity, "", seq, None)
                    .with_atoms(vec![Atom::new("CA", Point3::new(seq as f64, 0.0, 0.0))])
            })
            .collect()
    }

    fn missing(residues: &[(char, isize)]) -> Vec<MissingResidue> {
        residues
            .iter()
            .map(|&(identity, seq)| MissingResidue::new(identity, "", seq, None))
            .collect()
    }

    #[test]
    fn single_missing_residue_is_placed_between_observed_chunks() {
        let observed = observed(&[('A', 1), ('B', 2), ('D', 4), ('E', 5)]);
        let mapping =
            chunk_merge(&canonical("ABCDE"), &missing(&[('C', 3)]), &observed).unwrap();
        assert_eq!(mapping.slots(), &[Some(0), Some(1), None, Some(2), Some(3)]);
    }

    #[test]
    fn alternating_chunks_fill_the_whole_sequence() {
        let observed = observed(&[('A', 1), ('C', 3), ('E', 5)]);
        let mapping = chunk_merge(
            &canonical("ABCDE"),
            &missing(&[('B', 2), ('D', 4)]),
            &observed,
        )
        .unwrap();
        assert_eq!(mapping.slots(), &[Some(0), None, Some(1), None, Some(2)]);
    }

    #[test]
    fn missing_list_is_ordered_by_numbering_before_chunking() {
        let observed = observed(&[('C', 3), ('D', 4)]);
        let mapping = chunk_merge(
            &canonical("ABCDEF"),
            &missing(&[('F', 6), ('E', 5), ('B', 2), ('A', 1)]),
            &observed,
        )
        .unwrap();
        assert_eq!(
            mapping.slots(),
            &[None, None, Some(0), Some(1), None, None]
        );
    }

    #[test]
    fn count_mismatch_is_a_structural_inconsistency() {
        let observed = observed(&[('A', 1), ('B', 2), ('D', 4)]);
        let err = chunk_merge(&canonical("ABCDE"), &missing(&[('C', 3)]), &observed).unwrap_err();
        assert_eq!(
            err,
            FallbackReason::StructuralInconsistency {
                expected: 5,
                missing: 1,
                observed: 3
            }
        );
    }

    #[test]
    fn identity_conflict_is_an_ambiguous_correspondence() {
        let observed = observed(&[('A', 1), ('B', 2), ('D', 4), ('E', 5)]);
        let err = chunk_merge(&canonical("ABCDE"), &missing(&[('W', 3)]), &observed).unwrap_err();
        assert_eq!(err, FallbackReason::AmbiguousCorrespondence);
    }

    #[test]
    fn backtracks_when_preferred_alternation_dead_ends() {
        // Author numbering restarts, so chunks cannot simply alternate.
        let observed = observed(&[('A', 1), ('B', 2), ('C', 10), ('D', 11)]);
        let mapping = chunk_merge(
            &canonical("ABCDEF"),
            &missing(&[('E', 20), ('F', 21)]),
            &observed,
        )
        .unwrap();
        assert_eq!(
            mapping.slots(),
            &[Some(0), Some(1), Some(2), Some(3), None, None]
        );
    }

    #[test]
    fn missing_chunk_is_tried_first_at_the_start() {
        let observed = observed(&[('A', 5)]);
        let mapping = chunk_merge(&canonical("AA"), &missing(&[('A', 1)]), &observed).unwrap();
        assert_eq!(mapping.slots(), &[None, Some(0)]);
    }

    #[test]
    fn observed_chunk_is_preferred_after_a_missing_chunk() {
        let observed = observed(&[('A', 5)]);
        let mapping = chunk_merge(
            &canonical("CAA"),
            &missing(&[('C', 1), ('A', 10)]),
            &observed,
        )
        .unwrap();
        assert_eq!(mapping.slots(), &[None, Some(0), None]);
    }

    #[test]
    fn missing_chunk_is_preferred_after_an_observed_chunk() {
        let observed = observed(&[('C', 1), ('A', 10)]);
        let mapping =
            chunk_merge(&canonical("CAA"), &missing(&[('A', 5)]), &observed).unwrap();
        assert_eq!(mapping.slots(), &[Some(0), None, Some(1)]);
    }

    #[test]
    fn long_alternating_chain_is_merged() {
        const ALPHABET: &[char] = &[
            'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T',
            'V', 'W', 'Y',
        ];
        let len = 4000;
        let canonical: Vec<char> = (0..len).map(|i| ALPHABET[i % ALPHABET.len()]).collect();
        let (unresolved, resolved): (Vec<(char, isize)>, Vec<(char, isize)>) = canonical
            .iter()
            .enumerate()
            .map(|(i, &identity)| (identity, i as isize + 1))
            .partition(|&(_, seq)| seq % 2 == 0);
        let missing = missing(&unresolved);
        let observed = observed(&resolved);

        let mapping = chunk_merge(&canonical, &missing, &observed).unwrap();

        assert_eq!(mapping.len(), len);
        assert_eq!(mapping.coverage(), len / 2);
        for (position, slot) in mapping.slots().iter().enumerate() {
            let expected = (position % 2 == 0).then_some(position / 2);
            assert_eq!(*slot, expected);
        }
    }

    #[test]
    fn largest_sequence_number_does_not_break_merging() {
        let observed = observed(&[('A', isize::MAX), ('B', 5)]);
        let mapping = chunk_merge(&canonical("ABC"), &missing(&[('C', 6)]), &observed).unwrap();
        assert_eq!(mapping.slots(), &[Some(0), Some(1), None]);
    }

    #[test]
    fn insertion_code_interleaving_is_resolved() {
        let mut observed = observed(&[('G', 36), ('K', 37)]);
        observed.insert(0, ObservedResidue::new('M', "", 35, None).with_atoms(vec![
            Atom::new("CA", Point3::origin()),
        ]));
        let missing = vec![MissingResidue::new('S', "", 36, Some('A'))];
        let mapping = chunk_merge(&canonical("MGSK"), &missing, &observed).unwrap();
        assert_eq!(mapping.slots(), &[Some(0), Some(1), None, Some(2)]);
    }

    #[test]
    fn atomless_observed_residues_are_reported_absent() {
        let mut observed = observed(&[('A', 1), ('B', 2), ('D', 4)]);
        observed[1] = ObservedResidue::new('B', "", 2, None);
        let mapping =
            chunk_merge(&canonical("ABCD"), &missing(&[('C', 3)]), &observed).unwrap();
        assert_eq!(mapping.slots(), &[Some(0), None, None, Some(2)]);
    }

    #[test]
    fn every_residue_is_consumed_exactly_once() {
        let canonical = canonical("MKVLAGHTRE");
        let observed = observed(&[('K', 2), ('V', 3), ('G', 6), ('H', 7), ('R', 9)]);
        let missing = missing(&[('M', 1), ('L', 4), ('A', 5), ('T', 8), ('E', 10)]);
        let mapping = chunk_merge(&canonical, &missing, &observed).unwrap();

        let mut handles: Vec<usize> = mapping.slots().iter().flatten().copied().collect();
        handles.sort_unstable();
        assert_eq!(handles, vec![0, 1, 2, 3, 4]);
        for (position, slot) in mapping.slots().iter().enumerate() {
            if let Some(handle) = slot {
                assert_eq!(observed[*handle].identity, canonical[position]);
            }
        }
        assert_eq!(mapping.to_gapped_string(&observed), "-KV--GH-R-");
    }
}
