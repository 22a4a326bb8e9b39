//! # Engine Module
//!
//! The correspondence engine: given a chain's canonical sequence, its
//! missing-residue list and one model's observed residues, it produces a
//! [`Mapping`](mapping::Mapping) with one slot per canonical residue.
//!
//! ## Strategies
//!
//! - **Guess** ([`guess`]) - Positional or number-based pairing when no missing list exists
//! - **Chunk-Merge** ([`merge`]) - Depth-first interleaving of contiguous missing and
//!   observed runs ([`chunk`]) onto the canonical sequence
//! - **Alignment Fallback** ([`align`]) - Global BLOSUM62 alignment of residue identities
//!   when chunk-merging is impossible or inconsistent
//!
//! [`dispatch`] chooses among them by the shape of the missing-residue data.
//!
//! ## Supporting Modules
//!
//! - **Configuration** ([`config`]) - Gap penalties and the positional proxy atom
//! - **Error Handling** ([`error`]) - Coordinate-view and lookup failures
//! - **Caching** ([`cache`]) - Per-model memoization of correspondences
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events

pub mod align;
pub mod cache;
pub(crate) mod chunk;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod guess;
pub mod mapping;
pub mod merge;
pub mod progress;
