//! # Core Models Module
//!
//! Data structures describing a structure entry as the correspondence engine
//! sees it.
//!
//! ## Key Components
//!
//! - [`entry`] - The entry arena owning chains and models
//! - [`chain`] - Canonical sequence, missing residues and model handles of a chain
//! - [`model`] - Observed residues of one chain in one model
//! - [`residue`] - Observed and missing residues and their author numbering
//! - [`atom`] - Coordinate records attached to observed residues
//! - [`ids`] - Slot-map handles for chains and models
//! - [`builder`] - Assembly of an immutable entry from record-level facts
//!
//! ## Usage
//!
//! ```ignore
//! use resmap::core::models::builder::{AtomRecord, EntryBuilder};
//!
//! let mut builder = EntryBuilder::new("1ABC");
//! builder
//!     .add_sequence('A', &["MET", "ALA"])
//!     .add_missing('A', "MET", 1, None)
//!     .add_atom(record);
//! let entry = builder.build()?;
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod entry;
pub mod ids;
pub mod model;
pub mod residue;
