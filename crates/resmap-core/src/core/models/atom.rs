use nalgebra::Point3;

/// Name of the backbone atom used as a residue's positional proxy.
pub const ALPHA_CARBON_ATOM_NAME: &str = "CA";

/// A single coordinate record attached to an observed residue.
///
/// Atoms carry only what the correspondence engine and its geometry consumers
/// need: the atom name used for lookups (e.g. `"CA"`), whether the record came
/// from a hetero-atom line, and its Cartesian position in Angstroms.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// Whether the coordinate record was a hetero-atom record.
    pub is_hetero: bool,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new standard (non-hetero) atom.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            is_hetero: false,
            position,
        }
    }

    /// Creates a new atom originating from a hetero-atom record.
    pub fn hetero(name: &str, position: Point3<f64>) -> Self {
        Self {
            is_hetero: true,
            ..Self::new(name, position)
        }
    }

    /// Returns `true` if this is the alpha-carbon of a standard residue.
    pub fn is_alpha_carbon(&self) -> bool {
        self.name == ALPHA_CARBON_ATOM_NAME && !self.is_hetero
    }
}
