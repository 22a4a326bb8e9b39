use super::align::{GlobalAligner, align_residues};
use super::guess::guess;
use super::mapping::Mapping;
use super::merge::chunk_merge;
use crate::core::models::residue::{MissingResidue, ObservedResidue};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Shape of the missing-residue information available for a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidueData<'a> {
    NoMissingData,
    ExplicitMissingData(&'a [MissingResidue]),
}

impl<'a> ResidueData<'a> {
    pub fn from_missing(missing: &'a [MissingResidue]) -> Self {
        if missing.is_empty() {
            ResidueData::NoMissingData
        } else {
            ResidueData::ExplicitMissingData(missing)
        }
    }
}

/// The strategy whose output became the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Guess,
    ChunkMerge,
    Alignment,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Strategy::Guess => "guess",
                Strategy::ChunkMerge => "chunk-merge",
                Strategy::Alignment => "alignment",
            }
        )
    }
}

/// Why chunk-merging gave way to alignment. Neither case is fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    #[error(
        "{missing} missing and {observed} observed residue(s) do not add up to {expected} canonical residue(s)"
    )]
    StructuralInconsistency {
        expected: usize,
        missing: usize,
        observed: usize,
    },

    #[error("No interleaving of missing and observed chunks reproduces the canonical sequence")]
    AmbiguousCorrespondence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correspondence {
    pub mapping: Mapping,
    pub strategy: Strategy,
    pub fallback: Option<FallbackReason>,
}

/// Computes the correspondence between a canonical sequence and one model's
/// observed residues.
///
/// Without missing data the guess strategy is used. With missing data,
/// chunk-merging is attempted first and alignment is used when it cannot
/// produce a consistent mapping. The resulting mapping always has one slot per
/// canonical residue.
pub fn correspond(
    canonical: &[char],
    missing: &[MissingResidue],
    observed: &[ObservedResidue],
    aligner: &impl GlobalAligner,
) -> Correspondence {
    match ResidueData::from_missing(missing) {
        ResidueData::NoMissingData => Correspondence {
            mapping: guess(canonical, observed),
            strategy: Strategy::Guess,
            fallback: None,
        },
        ResidueData::ExplicitMissingData(missing) => {
            match chunk_merge(canonical, missing, observed) {
                Ok(mapping) => Correspondence {
                    mapping,
                    strategy: Strategy::ChunkMerge,
                    fallback: None,
                },
                Err(reason) => {
                    debug!("Falling back to alignment: {}", reason);
                    Correspondence {
                        mapping: align_residues(canonical, observed, aligner),
                        strategy: Strategy::Alignment,
                        fallback: Some(reason),
                    }
                }
            }
        }
    }
}
