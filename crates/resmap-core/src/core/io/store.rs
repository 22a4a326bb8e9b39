use super::traits::EntryFile;
use crate::core::models::builder::{AtomRecord, EntryBuilder, StoreError};
use crate::core::models::entry::Entry;
use nalgebra::Point3;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed residue store: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid residue store contents: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct StoreDocument {
    #[serde(default)]
    id_code: String,
    #[serde(default)]
    modified: HashMap<String, String>,
    #[serde(default)]
    het: Vec<String>,
    #[serde(default)]
    chains: Vec<ChainSection>,
    #[serde(default)]
    models: Vec<ModelSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ChainSection {
    ident: char,
    #[serde(default)]
    sequence: Vec<String>,
    #[serde(default)]
    missing: Vec<MissingSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct MissingSection {
    name: String,
    seq: isize,
    icode: Option<char>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ModelSection {
    #[serde(default = "default_model_number")]
    number: i32,
    #[serde(default)]
    atoms: Vec<AtomSection>,
}

fn default_model_number() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct AtomSection {
    chain: char,
    residue: String,
    seq: isize,
    icode: Option<char>,
    name: String,
    #[serde(default)]
    het: bool,
    xyz: [f64; 3],
    /// Chain termination follows this record.
    #[serde(default)]
    ter: bool,
}

/// Reader for TOML residue-store documents.
///
/// Facts are fed to an [`EntryBuilder`] in document order: declarations and
/// chains first, then every model's coordinate records.
pub struct ResidueStoreFile;

impl ResidueStoreFile {
    fn into_builder(document: StoreDocument, source: Option<&Path>) -> EntryBuilder {
        let mut builder = EntryBuilder::new(&document.id_code);
        if let Some(path) = source {
            builder.path(path.to_path_buf());
        }

        for name in &document.het {
            builder.add_het(name);
        }
        for (name, standard) in &document.modified {
            builder.add_modified(name, standard);
        }

        for chain in &document.chains {
            builder.add_sequence(chain.ident, &chain.sequence);
            for missing in &chain.missing {
                builder.add_missing(chain.ident, &missing.name, missing.seq, missing.icode);
            }
        }

        for model in document.models {
            builder.start_model(model.number);
            for atom in model.atoms {
                let terminates = atom.ter;
                builder.add_atom(AtomRecord {
                    chain: atom.chain,
                    residue_name: atom.residue,
                    sequence_number: atom.seq,
                    insertion_code: atom.icode,
                    atom_name: atom.name,
                    is_hetero: atom.het,
                    position: Point3::from(atom.xyz),
                });
                if terminates {
                    builder.terminate();
                }
            }
        }
        builder
    }
}

impl EntryFile for ResidueStoreFile {
    type Error = StoreFileError;

    fn read_from(reader: &mut impl BufRead, source: Option<&Path>) -> Result<Entry, Self::Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let document: StoreDocument = toml::from_str(&content)?;
        Ok(Self::into_builder(document, source).build()?)
    }
}
