use super::atom::{ALPHA_CARBON_ATOM_NAME, Atom};
use nalgebra::Point3;
use std::fmt;

/// Author-assigned numbering of a residue: sequence number plus optional insertion code.
///
/// Keys order by sequence number first and insertion code second, with a
/// residue lacking an insertion code sorting before any coded residue that
/// shares its number (`36 < 36A < 36B < 37`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    pub sequence_number: isize,
    pub insertion_code: Option<char>,
}

impl ResidueKey {
    pub fn new(sequence_number: isize, insertion_code: Option<char>) -> Self {
        Self {
            sequence_number,
            insertion_code,
        }
    }

    /// Returns `true` if `next` directly follows this key in author numbering.
    ///
    /// That is the case when `next` carries the following sequence number, or
    /// the same number with a different insertion code.
    pub fn is_followed_by(&self, next: &ResidueKey) -> bool {
        self.sequence_number.checked_add(1) == Some(next.sequence_number)
            || (next.sequence_number == self.sequence_number
                && next.insertion_code != self.insertion_code)
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.insertion_code {
            Some(code) => write!(f, "{}{}", self.sequence_number, code),
            None => write!(f, "{}", self.sequence_number),
        }
    }
}

/// Common view over residues that carry an identity and author numbering.
pub trait SequencedResidue {
    /// The single-character residue identity.
    fn identity(&self) -> char;
    /// The author numbering of the residue.
    fn key(&self) -> ResidueKey;
}

/// A residue for which coordinate records were parsed.
///
/// The atom list may be empty when every coordinate record of the residue was
/// unusable; such residues still occupy a position in the observed list.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedResidue {
    pub identity: char,                // One-letter residue identity
    pub name: String,                  // Residue name as recorded (e.g. "ALA")
    pub sequence_number: isize,        // Author sequence number
    pub insertion_code: Option<char>,  // Author insertion code, if any
    pub(crate) atoms: Vec<Atom>,       // Coordinate records in file order
}

impl ObservedResidue {
    pub fn new(
        identity: char,
        name: &str,
        sequence_number: isize,
        insertion_code: Option<char>,
    ) -> Self {
        Self {
            identity,
            name: name.to_string(),
            sequence_number,
            insertion_code,
            atoms: Vec::new(),
        }
    }

    pub fn with_atoms(mut self, atoms: Vec<Atom>) -> Self {
        self.atoms = atoms;
        self
    }

    pub(crate) fn add_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn has_atoms(&self) -> bool {
        !self.atoms.is_empty()
    }

    /// Position of the first atom with exactly the given name.
    pub fn atom_position(&self, name: &str) -> Option<Point3<f64>> {
        self.atoms
            .iter()
            .find(|atom| atom.name == name)
            .map(|atom| atom.position)
    }

    pub fn ca_position(&self) -> Option<Point3<f64>> {
        self.atom_position(ALPHA_CARBON_ATOM_NAME)
    }
}

impl SequencedResidue for ObservedResidue {
    fn identity(&self) -> char {
        self.identity
    }

    fn key(&self) -> ResidueKey {
        ResidueKey::new(self.sequence_number, self.insertion_code)
    }
}

/// A residue the depositor explicitly reports as lacking coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingResidue {
    pub identity: char,
    pub name: String,
    pub sequence_number: isize,
    pub insertion_code: Option<char>,
}

impl MissingResidue {
    pub fn new(
        identity: char,
        name: &str,
        sequence_number: isize,
        insertion_code: Option<char>,
    ) -> Self {
        Self {
            identity,
            name: name.to_string(),
            sequence_number,
            insertion_code,
        }
    }
}

impl SequencedResidue for MissingResidue {
    fn identity(&self) -> char {
        self.identity
    }

    fn key(&self) -> ResidueKey {
        ResidueKey::new(self.sequence_number, self.insertion_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_order_by_number_then_insertion_code() {
        let plain = ResidueKey::new(36, None);
        let coded_a = ResidueKey::new(36, Some('A'));
        let coded_b = ResidueKey::new(36, Some('B'));
        let next = ResidueKey::new(37, None);

        assert!(plain < coded_a);
        assert!(coded_a < coded_b);
        assert!(coded_b < next);
        assert!(ResidueKey::new(-1, None) < ResidueKey::new(0, None));
    }

    #[test]
    fn is_followed_by_accepts_increment_and_insertion_variants() {
        let key = ResidueKey::new(10, None);
        assert!(key.is_followed_by(&ResidueKey::new(11, None)));
        assert!(key.is_followed_by(&ResidueKey::new(10, Some('A'))));
        assert!(ResidueKey::new(10, Some('A')).is_followed_by(&ResidueKey::new(10, Some('B'))));
    }

    #[test]
    fn is_followed_by_rejects_gaps_duplicates_and_reversals() {
        let key = ResidueKey::new(10, None);
        assert!(!key.is_followed_by(&ResidueKey::new(12, None)));
        assert!(!key.is_followed_by(&ResidueKey::new(10, None)));
        assert!(!key.is_followed_by(&ResidueKey::new(9, None)));
    }

    #[test]
    fn is_followed_by_handles_extreme_sequence_numbers() {
        let last = ResidueKey::new(isize::MAX, None);
        assert!(!last.is_followed_by(&ResidueKey::new(isize::MIN, None)));
        assert!(!last.is_followed_by(&ResidueKey::new(5, None)));
        assert!(last.is_followed_by(&ResidueKey::new(isize::MAX, Some('A'))));
        assert!(ResidueKey::new(isize::MAX - 1, None).is_followed_by(&last));
    }

    #[test]
    fn key_display_appends_insertion_code() {
        assert_eq!(ResidueKey::new(36, None).to_string(), "36");
        assert_eq!(ResidueKey::new(36, Some('A')).to_string(), "36A");
        assert_eq!(ResidueKey::new(-3, None).to_string(), "-3");
    }

    #[test]
    fn observed_residue_reports_atom_positions_by_name() {
        let residue = ObservedResidue::new('A', "ALA", 5, None).with_atoms(vec![
            Atom::new("N", Point3::new(0.0, 0.0, 0.0)),
            Atom::new("CA", Point3::new(1.5, 0.0, 0.0)),
        ]);

        assert!(residue.has_atoms());
        assert_eq!(residue.ca_position(), Some(Point3::new(1.5, 0.0, 0.0)));
        assert_eq!(residue.atom_position("N"), Some(Point3::origin()));
        assert_eq!(residue.atom_position("CB"), None);
    }

    #[test]
    fn ca_position_uses_first_matching_atom() {
        let mut residue = ObservedResidue::new('G', "GLY", 1, None);
        residue.add_atom(Atom::new("CA", Point3::new(1.0, 1.0, 1.0)));
        residue.add_atom(Atom::new("CA", Point3::new(2.0, 2.0, 2.0)));
        assert_eq!(residue.ca_position(), Some(Point3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn atomless_residue_has_no_alpha_carbon() {
        let residue = ObservedResidue::new('S', "SER", 3, Some('A'));
        assert!(!residue.has_atoms());
        assert_eq!(residue.ca_position(), None);
        assert_eq!(residue.key(), ResidueKey::new(3, Some('A')));
    }

    #[test]
    fn missing_residue_exposes_identity_and_key() {
        let residue = MissingResidue::new('K', "LYS", 42, None);
        assert_eq!(residue.identity(), 'K');
        assert_eq!(residue.key(), ResidueKey::new(42, None));
    }
}
