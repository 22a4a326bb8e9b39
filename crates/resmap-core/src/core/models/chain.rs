use super::ids::ModelId;
use super::residue::MissingResidue;

/// Polymer type of a chain, inferred from the width of its canonical residue names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceType {
    Protein,
    Deoxy,
    Ribo,
}

impl SequenceType {
    /// Infers the sequence type from a residue name: three characters for amino
    /// acids, two for deoxyribonucleotides, one for ribonucleotides.
    pub fn from_name_width(name: &str) -> Option<Self> {
        match name.len() {
            3 => Some(SequenceType::Protein),
            2 => Some(SequenceType::Deoxy),
            1 => Some(SequenceType::Ribo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub ident: char,                           // Chain identifier (e.g., 'A', 'B')
    pub seq_type: Option<SequenceType>,        // Polymer type, if a canonical sequence was given
    pub(crate) sequence: Vec<char>,            // Canonical one-letter sequence
    pub(crate) missing: Vec<MissingResidue>,   // Residues reported without coordinates
    pub(crate) models: Vec<ModelId>,           // Models in the order they were encountered
}

impl Chain {
    pub(crate) fn new(ident: char) -> Self {
        Self {
            ident,
            seq_type: None,
            sequence: Vec::new(),
            missing: Vec::new(),
            models: Vec::new(),
        }
    }

    pub fn sequence(&self) -> &[char] {
        &self.sequence
    }

    pub fn sequence_string(&self) -> String {
        self.sequence.iter().collect()
    }

    pub fn missing(&self) -> &[MissingResidue] {
        &self.missing
    }

    pub fn models(&self) -> &[ModelId] {
        &self.models
    }

    /// Returns `true` if the chain is an amino-acid chain with at least one model.
    pub fn is_protein(&self) -> bool {
        self.seq_type == Some(SequenceType::Protein) && !self.models.is_empty()
    }

    /// Identifier combining the entry id code with the chain identifier (e.g. `1ABCA`).
    pub fn key(&self, id_code: &str) -> String {
        format!("{}{}", id_code, self.ident)
    }
}
