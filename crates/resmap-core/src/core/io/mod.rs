//! Reading structure entries from residue-store documents.
//!
//! A residue store is a TOML document carrying the record-level facts of an
//! entry (canonical sequences, modification declarations, missing residues and
//! coordinate records), optionally gzip-compressed.

pub mod store;
pub mod traits;
