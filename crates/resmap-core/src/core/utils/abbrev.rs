use crate::core::models::chain::SequenceType;
use phf::{Map, phf_map};

/// One-letter code used for residues whose identity is unknown or non-standard.
pub const UNKNOWN_RESIDUE: char = 'X';

/// Name that hetero groups without a modification record translate through.
pub const UNKNOWN_RESIDUE_NAME: &str = "UNK";

static AMINO_ACIDS: Map<&'static str, char> = phf_map! {
    "UNK" => 'X',
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLU" => 'E', "GLN" => 'Q', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    // Ambiguous or non-standard names seen in canonical sequences without a
    // modification record.
    "ASX" => 'X', "GLX" => 'X', "DLE" => 'X',
    "DOP" => 'X', "8OG" => 'X',
    "NH2" => 'X',
};

static DEOXYRIBONUCLEOTIDES: Map<&'static str, char> = phf_map! {
    "DA" => 'A', "DC" => 'C', "DG" => 'G', "DT" => 'T', "DI" => 'I', "DU" => 'U',
};

static RIBONUCLEOTIDES: Map<&'static str, char> = phf_map! {
    "A" => 'A', "C" => 'C', "G" => 'G', "U" => 'U', "I" => 'I', "T" => 'T',
    "N" => 'X',
};

/// Translates a residue name to its one-letter code.
///
/// The table is chosen by the width of the name (see
/// [`SequenceType::from_name_width`]). Returns `None` for names that are not
/// in the table for their width, or whose width matches no polymer type.
pub fn one_letter_code(name: &str) -> Option<char> {
    let table = match SequenceType::from_name_width(name)? {
        SequenceType::Protein => &AMINO_ACIDS,
        SequenceType::Deoxy => &DEOXYRIBONUCLEOTIDES,
        SequenceType::Ribo => &RIBONUCLEOTIDES,
    };
    table.get(name).copied()
}
