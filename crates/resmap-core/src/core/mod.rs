//! # Core Module
//!
//! Data structures and input handling shared by the correspondence engine.
//!
//! - **Entry Representation** ([`models`]) - Entries, chains, models, residues and atoms,
//!   plus the builder that assembles them from record-level facts
//! - **File I/O** ([`io`]) - Reading entries from residue-store documents
//! - **Residue Vocabulary** ([`utils`]) - Residue name to one-letter code tables

pub mod io;
pub mod models;
pub mod utils;
