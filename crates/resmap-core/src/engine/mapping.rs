use super::error::MappingError;
use crate::core::models::atom::ALPHA_CARBON_ATOM_NAME;
use crate::core::models::residue::ObservedResidue;
use nalgebra::Point3;

const GAP: char = '-';

/// Correspondence from canonical sequence positions to observed residues.
///
/// Slot `i` describes canonical position `i`: `Some(h)` is a handle (index)
/// into the observed residue list of the model the mapping was computed for,
/// `None` means the position has no coordinates. The slot count always equals
/// the canonical sequence length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Mapping {
    slots: Vec<Option<usize>>,
}

impl Mapping {
    pub fn from_slots(slots: Vec<Option<usize>>) -> Self {
        Self { slots }
    }

    pub(crate) fn absent(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub(crate) fn set(&mut self, position: usize, handle: Option<usize>) {
        self.slots[position] = handle;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<usize> {
        self.slots.get(position).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<usize>] {
        &self.slots
    }

    /// Number of canonical positions with a corresponding observed residue.
    pub fn coverage(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Resolves every slot against the observed residues it was computed from.
    pub fn resolve<'a>(&self, residues: &'a [ObservedResidue]) -> Vec<Option<&'a ObservedResidue>> {
        self.slots
            .iter()
            .map(|slot| slot.and_then(|handle| residues.get(handle)))
            .collect()
    }

    /// Per-position coordinates of the first atom named `atom_name`.
    ///
    /// A position is absent when its slot is absent or its residue carries no
    /// atom with that exact name.
    pub fn atom_coords(
        &self,
        residues: &[ObservedResidue],
        atom_name: &str,
    ) -> Vec<Option<Point3<f64>>> {
        self.resolve(residues)
            .into_iter()
            .map(|residue| residue.and_then(|r| r.atom_position(atom_name)))
            .collect()
    }

    pub fn ca_coords(&self, residues: &[ObservedResidue]) -> Vec<Option<Point3<f64>>> {
        self.atom_coords(residues, ALPHA_CARBON_ATOM_NAME)
    }

    /// Coordinates of `atom_name` for every position in `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::InvalidRange`] if `start > end` or `end`
    /// exceeds the mapping length, and [`MappingError::RequestedRangeHasGaps`]
    /// naming the first position in the range without coordinates.
    pub fn atom_slice(
        &self,
        residues: &[ObservedResidue],
        atom_name: &str,
        start: usize,
        end: usize,
    ) -> Result<Vec<Point3<f64>>, MappingError> {
        if start > end || end > self.len() {
            return Err(MappingError::InvalidRange {
                start,
                end,
                len: self.len(),
            });
        }

        self.atom_coords(residues, atom_name)[start..end]
            .iter()
            .enumerate()
            .map(|(offset, coords)| {
                coords.ok_or(MappingError::RequestedRangeHasGaps {
                    start,
                    end,
                    position: start + offset,
                })
            })
            .collect()
    }

    pub fn ca_slice(
        &self,
        residues: &[ObservedResidue],
        start: usize,
        end: usize,
    ) -> Result<Vec<Point3<f64>>, MappingError> {
        self.atom_slice(residues, ALPHA_CARBON_ATOM_NAME, start, end)
    }

    /// Renders the mapping as identities of mapped residues with `-` for absent positions.
    pub fn to_gapped_string(&self, residues: &[ObservedResidue]) -> String {
        self.resolve(residues)
            .into_iter()
            .map(|residue| residue.map_or(GAP, |r| r.identity))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;

    fn residue(identity: char, seq: isize, x: f64) -> ObservedResidue {
        ObservedResidue::new(identity, "", seq, None).with_atoms(vec![
            Atom::new("N", Point3::new(x, 1.0, 0.0)),
            Atom::new("CA", Point3::new(x, 0.0, 0.0)),
        ])
    }

    fn abde() -> Vec<ObservedResidue> {
        vec![
            residue('A', 1, 1.0),
            residue('B', 2, 2.0),
            residue('D', 4, 4.0),
            residue('E', 5, 5.0),
        ]
    }

    fn mapping_with_gap() -> Mapping {
        Mapping::from_slots(vec![Some(0), Some(1), None, Some(2), Some(3)])
    }

    #[test]
    fn get_and_coverage_reflect_slots() {
        let mapping = mapping_with_gap();
        assert_eq!(mapping.len(), 5);
        assert_eq!(mapping.coverage(), 4);
        assert_eq!(mapping.get(3), Some(2));
        assert_eq!(mapping.get(2), None);
        assert_eq!(mapping.get(99), None);
        assert!(Mapping::default().is_empty());
    }

    #[test]
    fn ca_coords_resolves_present_slots() {
        let residues = abde();
        let coords = mapping_with_gap().ca_coords(&residues);
        assert_eq!(coords.len(), 5);
        assert_eq!(coords[0], Some(Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(coords[2], None);
        assert_eq!(coords[4], Some(Point3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn ca_coords_is_absent_for_residue_without_alpha_carbon() {
        let residues = vec![
            ObservedResidue::new('A', "ALA", 1, None)
                .with_atoms(vec![Atom::new("N", Point3::origin())]),
        ];
        let mapping = Mapping::from_slots(vec![Some(0)]);
        assert_eq!(mapping.ca_coords(&residues), vec![None]);
        assert_eq!(
            mapping.atom_coords(&residues, "N"),
            vec![Some(Point3::origin())]
        );
    }

    #[test]
    fn ca_slice_over_gap_fails_with_first_gap_position() {
        let residues = abde();
        let err = mapping_with_gap().ca_slice(&residues, 0, 5).unwrap_err();
        assert_eq!(
            err,
            MappingError::RequestedRangeHasGaps {
                start: 0,
                end: 5,
                position: 2
            }
        );
    }

    #[test]
    fn ca_slice_over_present_positions_returns_coordinates() {
        let residues = abde();
        let mapping = mapping_with_gap();
        assert_eq!(
            mapping.ca_slice(&residues, 0, 2).unwrap(),
            vec![Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)]
        );
        assert_eq!(mapping.ca_slice(&residues, 3, 5).unwrap().len(), 2);
        assert!(mapping.ca_slice(&residues, 2, 2).unwrap().is_empty());
    }

    #[test]
    fn ca_slice_rejects_out_of_bounds_and_reversed_ranges() {
        let residues = abde();
        let mapping = mapping_with_gap();
        assert_eq!(
            mapping.ca_slice(&residues, 0, 6),
            Err(MappingError::InvalidRange {
                start: 0,
                end: 6,
                len: 5
            })
        );
        assert!(matches!(
            mapping.ca_slice(&residues, 3, 1),
            Err(MappingError::InvalidRange { .. })
        ));
    }

    #[test]
    fn gapped_string_marks_absent_positions() {
        let residues = abde();
        assert_eq!(mapping_with_gap().to_gapped_string(&residues), "AB-DE");
        assert_eq!(Mapping::absent(3).to_gapped_string(&residues), "---");
    }
}
