//! # resmap Core Library
//!
//! Establishes, for every chain of a structure entry, which canonical sequence
//! position each observed residue occupies, and derives alpha-carbon coordinate
//! views from that correspondence.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Immutable data models (`Entry`, `Chain`, `Model`,
//!   residues and atoms), the entry builder, residue abbreviation tables and the
//!   residue-store reader.
//!
//! - **[`engine`]: The Logic Core.** The correspondence strategies (guess,
//!   chunk-merge, alignment fallback), their dispatch, the resulting `Mapping`
//!   and its coordinate views, plus configuration, caching and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Runs the engine over every model of every
//!   chain of an entry and collects the results.

pub mod core;
pub mod engine;
pub mod workflows;
