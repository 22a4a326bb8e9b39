use super::atom::Atom;
use super::chain::SequenceType;
use super::entry::Entry;
use super::model::Model;
use super::residue::{MissingResidue, ObservedResidue, ResidueKey};
use crate::core::utils::abbrev::{UNKNOWN_RESIDUE, UNKNOWN_RESIDUE_NAME, one_letter_code};
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

const WATER_RESIDUE_NAME: &str = "HOH";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid residue abbreviation '{name}' in chain '{chain}' ({context})")]
    InvalidAbbreviation {
        name: String,
        chain: char,
        context: &'static str,
    },
    #[error("Entry '{0}' does not contain any chains")]
    NoChains(String),
}

/// One coordinate record as delivered by a record parser.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub chain: char,
    pub residue_name: String,
    pub sequence_number: isize,
    pub insertion_code: Option<char>,
    pub atom_name: String,
    pub is_hetero: bool,
    pub position: Point3<f64>,
}

#[derive(Debug, Default)]
struct RawChain {
    sequence: Vec<String>,
    missing: Vec<(String, ResidueKey)>,
    models: Vec<RawModel>,
}

#[derive(Debug)]
struct RawModel {
    number: i32,
    residues: Vec<RawResidue>,
    residue_index: HashMap<ResidueKey, usize>,
}

#[derive(Debug)]
struct RawResidue {
    name: String,
    key: ResidueKey,
    flexible: bool,
    atoms: Vec<Atom>,
}

/// Assembles an immutable [`Entry`] from record-level facts.
///
/// Facts may arrive in any order a structure file presents them. Residue names
/// are translated to one-letter codes only in [`EntryBuilder::build`], once all
/// modification and hetero-group declarations are known.
pub struct EntryBuilder {
    id_code: String,
    path: Option<PathBuf>,
    modified: HashMap<String, String>,
    chain_order: Vec<char>,
    chains: HashMap<char, RawChain>,
    current_model: i32,
    terminated: HashSet<(char, i32)>,
    last_seen: Option<(char, i32)>,
}

impl Default for EntryBuilder {
    fn default() -> Self {
        Self::new("")
    }
}

impl EntryBuilder {
    pub fn new(id_code: &str) -> Self {
        Self {
            id_code: id_code.to_string(),
            path: None,
            modified: HashMap::new(),
            chain_order: Vec::new(),
            chains: HashMap::new(),
            current_model: 1,
            terminated: HashSet::new(),
            last_seen: None,
        }
    }

    pub fn path(&mut self, path: PathBuf) -> &mut Self {
        self.path = Some(path);
        self
    }

    pub fn id_code(&mut self, id_code: &str) -> &mut Self {
        self.id_code = id_code.to_string();
        self
    }

    fn chain_entry(&mut self, ident: char) -> &mut RawChain {
        if !self.chains.contains_key(&ident) {
            self.chain_order.push(ident);
        }
        self.chains.entry(ident).or_default()
    }

    /// Declares that `name` is a modified form of the standard residue `standard`.
    pub fn add_modified(&mut self, name: &str, standard: &str) -> &mut Self {
        let standard = if standard.is_empty() {
            UNKNOWN_RESIDUE_NAME
        } else {
            standard
        };
        self.modified.insert(name.to_string(), standard.to_string());
        self
    }

    /// Declares a hetero group; it reads as unknown unless a modification maps it.
    pub fn add_het(&mut self, name: &str) -> &mut Self {
        self.modified
            .entry(name.to_string())
            .or_insert_with(|| UNKNOWN_RESIDUE_NAME.to_string());
        self
    }

    /// Appends residue names to a chain's canonical sequence.
    pub fn add_sequence<S: AsRef<str>>(&mut self, chain: char, names: &[S]) -> &mut Self {
        let raw = self.chain_entry(chain);
        raw.sequence
            .extend(names.iter().map(|name| name.as_ref().to_string()));
        self
    }

    /// Records a residue reported as lacking coordinates.
    pub fn add_missing(
        &mut self,
        chain: char,
        name: &str,
        sequence_number: isize,
        insertion_code: Option<char>,
    ) -> &mut Self {
        let raw = self.chain_entry(chain);
        raw.missing.push((
            name.to_string(),
            ResidueKey::new(sequence_number, insertion_code),
        ));
        self
    }

    /// Makes subsequent coordinate records belong to model `number`.
    pub fn start_model(&mut self, number: i32) -> &mut Self {
        self.current_model = number;
        self
    }

    /// Closes the chain/model that received the most recent coordinate record.
    ///
    /// Later records for the same chain in the same model are ignored.
    pub fn terminate(&mut self) -> &mut Self {
        if let Some(seen) = self.last_seen {
            self.terminated.insert(seen);
        }
        self
    }

    /// Adds a coordinate record, creating its residue on first sight.
    ///
    /// Water records and records for a terminated chain/model are skipped.
    pub fn add_atom(&mut self, record: AtomRecord) -> &mut Self {
        let model_number = self.current_model;
        if self.terminated.contains(&(record.chain, model_number)) {
            return self;
        }
        if record.residue_name == WATER_RESIDUE_NAME {
            return self;
        }

        let raw_chain = self.chain_entry(record.chain);
        let model_idx = match raw_chain
            .models
            .iter()
            .position(|model| model.number == model_number)
        {
            Some(idx) => idx,
            None => {
                raw_chain.models.push(RawModel {
                    number: model_number,
                    residues: Vec::new(),
                    residue_index: HashMap::new(),
                });
                raw_chain.models.len() - 1
            }
        };
        let model = &mut raw_chain.models[model_idx];

        let key = ResidueKey::new(record.sequence_number, record.insertion_code);
        let residue_idx = *model.residue_index.entry(key).or_insert_with(|| {
            model.residues.push(RawResidue {
                name: record.residue_name.clone(),
                key,
                flexible: record.is_hetero,
                atoms: Vec::new(),
            });
            model.residues.len() - 1
        });

        model.residues[residue_idx].atoms.push(Atom {
            name: record.atom_name,
            is_hetero: record.is_hetero,
            position: record.position,
        });
        self.last_seen = Some((record.chain, model_number));
        self
    }

    fn translate(
        &self,
        name: &str,
        chain: char,
        flexible: bool,
        context: &'static str,
    ) -> Result<char, StoreError> {
        let standard = self.modified.get(name).map_or(name, String::as_str);
        if let Some(code) = one_letter_code(standard) {
            return Ok(code);
        }

        let reported_missing = self
            .chains
            .values()
            .any(|raw| raw.missing.iter().any(|(missing, _)| missing == name));
        if reported_missing || flexible {
            debug!(
                "Reading unrecognized residue '{}' in chain '{}' as unknown.",
                name, chain
            );
            return Ok(UNKNOWN_RESIDUE);
        }

        Err(StoreError::InvalidAbbreviation {
            name: name.to_string(),
            chain,
            context,
        })
    }

    /// Translates all collected facts and produces the immutable entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidAbbreviation`] for an unrecognized residue
    /// name that is neither reported missing nor confined to hetero records, and
    /// [`StoreError::NoChains`] when no chain was declared at all.
    pub fn build(self) -> Result<Entry, StoreError> {
        let id_code = if self.id_code.is_empty() {
            self.path
                .as_deref()
                .and_then(Entry::id_code_from_path)
                .unwrap_or_default()
        } else {
            self.id_code.clone()
        };
        if self.chain_order.is_empty() {
            return Err(StoreError::NoChains(id_code));
        }

        let mut entry = Entry::new(&id_code, self.path.clone());
        for &ident in &self.chain_order {
            let Some(raw) = self.chains.get(&ident) else {
                continue;
            };
            let chain_id = entry.add_chain(ident);

            let sequence = raw
                .sequence
                .iter()
                .map(|name| self.translate(name, ident, false, "canonical sequence"))
                .collect::<Result<Vec<_>, _>>()?;
            let missing = raw
                .missing
                .iter()
                .map(|(name, key)| {
                    self.translate(name, ident, false, "missing residues")
                        .map(|code| {
                            MissingResidue::new(code, name, key.sequence_number, key.insertion_code)
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if let Some(chain) = entry.chain_mut(chain_id) {
                chain.seq_type = raw
                    .sequence
                    .first()
                    .and_then(|name| SequenceType::from_name_width(name));
                chain.sequence = sequence;
                chain.missing = missing;
            }

            for raw_model in &raw.models {
                let mut model = Model::new(raw_model.number, chain_id);
                for raw_residue in &raw_model.residues {
                    let code = self.translate(
                        &raw_residue.name,
                        ident,
                        raw_residue.flexible,
                        "coordinate records",
                    )?;
                    model.residues.push(
                        ObservedResidue::new(
                            code,
                            &raw_residue.name,
                            raw_residue.key.sequence_number,
                            raw_residue.key.insertion_code,
                        )
                        .with_atoms(raw_residue.atoms.clone()),
                    );
                }
                entry.add_model(chain_id, model);
            }
        }

        debug!(
            "Built entry '{}' with {} chain(s) and {} model(s).",
            entry.id_code,
            entry.chain_count(),
            entry.model_count()
        );
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(chain: char, residue: &str, seq: isize, name: &str) -> AtomRecord {
        AtomRecord {
            chain,
            residue_name: residue.to_string(),
            sequence_number: seq,
            insertion_code: None,
            atom_name: name.to_string(),
            is_hetero: false,
            position: Point3::new(seq as f64, 0.0, 0.0),
        }
    }

    fn hetatm(chain: char, residue: &str, seq: isize, name: &str) -> AtomRecord {
        AtomRecord {
            is_hetero: true,
            ..atom(chain, residue, seq, name)
        }
    }

    #[test]
    fn build_translates_sequence_missing_and_observed_residues() {
        let mut builder = EntryBuilder::new("1ABC");
        builder
            .add_sequence('A', &["MET", "ALA", "GLY"])
            .add_missing('A', "GLY", 3, None)
            .add_atom(atom('A', "MET", 1, "N"))
            .add_atom(atom('A', "MET", 1, "CA"))
            .add_atom(atom('A', "ALA", 2, "CA"));
        let entry = builder.build().unwrap();

        let chain_id = entry.find_chain('A').unwrap();
        let chain = entry.chain(chain_id).unwrap();
        assert_eq!(chain.sequence(), &['M', 'A', 'G']);
        assert_eq!(chain.seq_type, Some(SequenceType::Protein));
        assert_eq!(chain.missing(), &[MissingResidue::new('G', "GLY", 3, None)]);

        let (_, model) = entry.models_of(chain_id).next().unwrap();
        assert_eq!(model.number, 1);
        assert_eq!(model.residues().len(), 2);
        assert_eq!(model.residues()[0].atoms().len(), 2);
        assert_eq!(model.residues()[1].identity, 'A');
    }

    #[test]
    fn atoms_accumulate_per_number_and_insertion_code() {
        let mut builder = EntryBuilder::new("1ABC");
        let mut coded = atom('A', "SER", 36, "CA");
        coded.insertion_code = Some('A');
        builder
            .add_sequence('A', &["GLY", "SER"])
            .add_atom(atom('A', "GLY", 36, "N"))
            .add_atom(coded)
            .add_atom(atom('A', "GLY", 36, "CA"));
        let entry = builder.build().unwrap();

        let chain_id = entry.find_chain('A').unwrap();
        let (_, model) = entry.models_of(chain_id).next().unwrap();
        let names: Vec<_> = model.residues().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["GLY", "SER"]);
        assert_eq!(model.residues()[0].atoms().len(), 2);
        assert_eq!(model.residues()[1].insertion_code, Some('A'));
    }

    #[test]
    fn models_are_separated_by_model_number() {
        let mut builder = EntryBuilder::new("1ABC");
        builder
            .add_sequence('A', &["ALA"])
            .start_model(1)
            .add_atom(atom('A', "ALA", 1, "CA"))
            .start_model(2)
            .add_atom(atom('A', "ALA", 1, "CA"))
            .add_atom(atom('A', "ALA", 1, "CB"));
        let entry = builder.build().unwrap();

        let chain_id = entry.find_chain('A').unwrap();
        let models: Vec<_> = entry
            .models_of(chain_id)
            .map(|(_, m)| (m.number, m.residues()[0].atoms().len()))
            .collect();
        assert_eq!(models, vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn modified_residues_translate_through_their_standard_name() {
        let mut builder = EntryBuilder::new("1ABC");
        builder
            .add_sequence('A', &["MSE", "ALA"])
            .add_modified("MSE", "MET")
            .add_atom(hetatm('A', "MSE", 1, "CA"));
        let entry = builder.build().unwrap();
        let chain = entry.chain(entry.find_chain('A').unwrap()).unwrap();
        assert_eq!(chain.sequence(), &['M', 'A']);
    }

    #[test]
    fn het_groups_without_modification_read_as_unknown() {
        let mut builder = EntryBuilder::new("1ABC");
        builder
            .add_het("HEM")
            .add_het("MSE")
            .add_modified("MSE", "MET")
            .add_sequence('A', &["HEM", "MSE"]);
        let entry = builder.build().unwrap();
        let chain = entry.chain(entry.find_chain('A').unwrap()).unwrap();
        assert_eq!(chain.sequence(), &['X', 'M']);
    }

    #[test]
    fn unknown_canonical_residue_is_an_invalid_abbreviation() {
        let mut builder = EntryBuilder::new("1ABC");
        builder.add_sequence('A', &["ALA", "QQQ"]);
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidAbbreviation {
                name: "QQQ".to_string(),
                chain: 'A',
                context: "canonical sequence",
            }
        );
    }

    #[test]
    fn unknown_residue_reported_missing_is_absorbed_as_unknown() {
        let mut builder = EntryBuilder::new("1ABC");
        builder
            .add_sequence('A', &["ALA", "QQQ"])
            .add_missing('A', "QQQ", 2, None);
        let entry = builder.build().unwrap();
        let chain = entry.chain(entry.find_chain('A').unwrap()).unwrap();
        assert_eq!(chain.sequence(), &['A', 'X']);
        assert_eq!(chain.missing()[0].identity, 'X');
    }

    #[test]
    fn unknown_hetero_residue_is_absorbed_but_standard_record_is_not() {
        let mut builder = EntryBuilder::new("1ABC");
        builder
            .add_sequence('A', &["ALA"])
            .add_atom(hetatm('A', "LIG", 900, "C1"));
        let entry = builder.build().unwrap();
        let chain_id = entry.find_chain('A').unwrap();
        let (_, model) = entry.models_of(chain_id).next().unwrap();
        assert_eq!(model.residues()[0].identity, 'X');

        let mut strict = EntryBuilder::new("1ABC");
        strict
            .add_sequence('A', &["ALA"])
            .add_atom(atom('A', "LIG", 900, "C1"));
        assert!(matches!(
            strict.build(),
            Err(StoreError::InvalidAbbreviation { context: "coordinate records", .. })
        ));
    }

    #[test]
    fn water_records_are_ignored() {
        let mut builder = EntryBuilder::new("1ABC");
        builder
            .add_sequence('A', &["ALA"])
            .add_atom(atom('A', "ALA", 1, "CA"))
            .add_atom(hetatm('A', "HOH", 301, "O"));
        let entry = builder.build().unwrap();
        let chain_id = entry.find_chain('A').unwrap();
        let (_, model) = entry.models_of(chain_id).next().unwrap();
        assert_eq!(model.residues().len(), 1);
    }

    #[test]
    fn records_after_termination_are_ignored_for_that_model_only() {
        let mut builder = EntryBuilder::new("1ABC");
        builder
            .add_sequence('A', &["ALA", "GLY"])
            .start_model(1)
            .add_atom(atom('A', "ALA", 1, "CA"))
            .terminate()
            .add_atom(hetatm('A', "GLY", 2, "CA"))
            .start_model(2)
            .add_atom(atom('A', "ALA", 1, "CA"))
            .add_atom(atom('A', "GLY", 2, "CA"));
        let entry = builder.build().unwrap();

        let chain_id = entry.find_chain('A').unwrap();
        let counts: Vec<usize> = entry
            .models_of(chain_id)
            .map(|(_, m)| m.residues().len())
            .collect();
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn nucleotide_chains_infer_their_sequence_type() {
        let mut builder = EntryBuilder::new("1ABC");
        builder
            .add_sequence('B', &["DA", "DT", "DG"])
            .add_sequence('C', &["A", "U"]);
        let entry = builder.build().unwrap();
        let b = entry.chain(entry.find_chain('B').unwrap()).unwrap();
        let c = entry.chain(entry.find_chain('C').unwrap()).unwrap();
        assert_eq!(b.seq_type, Some(SequenceType::Deoxy));
        assert_eq!(b.sequence(), &['A', 'T', 'G']);
        assert_eq!(c.seq_type, Some(SequenceType::Ribo));
    }

    #[test]
    fn empty_builder_fails_and_id_code_falls_back_to_path() {
        assert!(matches!(
            EntryBuilder::new("").build(),
            Err(StoreError::NoChains(_))
        ));

        let mut builder = EntryBuilder::default();
        builder
            .path(PathBuf::from("pdb9xyz.ent"))
            .add_sequence('A', &["ALA"]);
        let entry = builder.build().unwrap();
        assert_eq!(entry.id_code, "9xyz");
    }
}
