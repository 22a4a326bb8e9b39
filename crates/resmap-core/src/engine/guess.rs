use super::mapping::Mapping;
use crate::core::models::residue::ObservedResidue;

/// Best-effort mapping for chains without a missing-residue list.
///
/// When the observed and canonical lengths agree, residues are paired by
/// position and a pair is kept only if the identities match. Otherwise each
/// observed residue's sequence number is read as a 1-based canonical index;
/// residues whose index is out of range or whose identity differs are dropped.
pub fn guess(canonical: &[char], observed: &[ObservedResidue]) -> Mapping {
    let mut mapping = Mapping::absent(canonical.len());

    if observed.len() == canonical.len() {
        for (position, (residue, &expected)) in observed.iter().zip(canonical).enumerate() {
            if residue.identity == expected {
                mapping.set(position, Some(position));
            }
        }
        return mapping;
    }

    for (handle, residue) in observed.iter().enumerate() {
        let Some(position) = residue
            .sequence_number
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
        else {
            continue;
        };
        if canonical.get(position) == Some(&residue.identity) {
            mapping.set(position, Some(handle));
        }
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed(residues: &[(char, isize)]) -> Vec<ObservedResidue> {
        residues
            .iter()
            .map(|&(identity, seq)| ObservedResidue::new(identity, "", seq, None))
            .collect()
    }

    fn canonical(sequence: &str) -> Vec<char> {
        sequence.chars().collect()
    }

    #[test]
    fn equal_lengths_with_matching_identities_map_every_position() {
        let residues = observed(&[('A', 1), ('B', 2), ('C', 3), ('D', 4), ('E', 5)]);
        let mapping = guess(&canonical("ABCDE"), &residues);
        assert_eq!(mapping.coverage(), 5);
        for position in 0..5 {
            assert_eq!(mapping.get(position), Some(position));
        }
    }

    #[test]
    fn equal_lengths_ignore_numbering() {
        let residues = observed(&[('A', 101), ('B', 102), ('C', 150)]);
        let mapping = guess(&canonical("ABC"), &residues);
        assert_eq!(mapping.slots(), &[Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn positional_mismatch_nulls_only_that_slot() {
        let residues = observed(&[('A', 1), ('X', 2), ('C', 3)]);
        let mapping = guess(&canonical("ABC"), &residues);
        assert_eq!(mapping.slots(), &[Some(0), None, Some(2)]);
    }

    #[test]
    fn unequal_lengths_use_sequence_numbers_as_indices() {
        let residues = observed(&[('A', 1), ('C', 3), ('E', 5)]);
        let mapping = guess(&canonical("ABCDE"), &residues);
        assert_eq!(mapping.slots(), &[Some(0), None, Some(1), None, Some(2)]);
    }

    #[test]
    fn out_of_range_or_mismatched_residues_are_dropped() {
        let residues = observed(&[('A', 0), ('A', -4), ('B', 2), ('Q', 3), ('E', 9)]);
        let mapping = guess(&canonical("ABCD"), &residues);
        assert_eq!(mapping.len(), 4);
        assert_eq!(mapping.slots(), &[None, Some(2), None, None]);
    }

    #[test]
    fn empty_canonical_sequence_yields_empty_mapping() {
        let residues = observed(&[('A', 1)]);
        assert!(guess(&[], &residues).is_empty());
        assert!(guess(&[], &[]).is_empty());
    }
}
