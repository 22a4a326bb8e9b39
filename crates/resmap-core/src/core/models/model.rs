use super::ids::ChainId;
use super::residue::{ObservedResidue, ResidueKey, SequencedResidue};
use nalgebra::Point3;

/// One model's coordinate-bearing residues for a single chain.
///
/// Residues are kept in the order their first coordinate record was
/// encountered. The owning chain is referenced through a [`ChainId`] handle
/// into the parent [`Entry`](super::entry::Entry) arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub number: i32,                            // Model serial number from the source
    pub chain_id: ChainId,                      // Handle of the owning chain
    pub(crate) residues: Vec<ObservedResidue>,  // Observed residues in file order
}

impl Model {
    pub(crate) fn new(number: i32, chain_id: ChainId) -> Self {
        Self {
            number,
            chain_id,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ObservedResidue] {
        &self.residues
    }

    pub fn find_residue(&self, key: ResidueKey) -> Option<&ObservedResidue> {
        self.residues.iter().find(|residue| residue.key() == key)
    }

    /// All standard alpha-carbon atoms of the model in file order.
    ///
    /// Residues with several alternate alpha-carbons contribute each of them.
    pub fn ca_atoms(&self) -> Vec<Point3<f64>> {
        self.residues
            .iter()
            .flat_map(|residue| residue.atoms())
            .filter(|atom| atom.is_alpha_carbon())
            .map(|atom| atom.position)
            .collect()
    }
}
