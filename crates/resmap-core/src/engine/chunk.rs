use crate::core::models::residue::ResidueKey;
use std::ops::Range;

/// Returns `true` if `b` may extend a run ending in `a`.
///
/// The pair must follow each other in author numbering, and no key of the
/// opposite provenance (`others`, sorted ascending) may lie strictly between
/// them.
pub(crate) fn is_contiguous(a: &ResidueKey, b: &ResidueKey, others: &[ResidueKey]) -> bool {
    if !a.is_followed_by(b) {
        return false;
    }
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let first_above = others.partition_point(|key| key <= low);
    others.get(first_above).is_none_or(|key| key >= high)
}

/// Partitions `keys` into maximal runs of contiguous residues.
///
/// Runs are returned as index ranges into `keys`, in order. `others` holds the
/// keys of the opposite provenance and may be in any order.
pub(crate) fn chunk(keys: &[ResidueKey], others: &[ResidueKey]) -> Vec<Range<usize>> {
    if keys.is_empty() {
        return Vec::new();
    }

    let mut sorted_others = others.to_vec();
    sorted_others.sort_unstable();

    let mut chunks = Vec::new();
    let mut start = 0;
    for i in 1..keys.len() {
        if !is_contiguous(&keys[i - 1], &keys[i], &sorted_others) {
            chunks.push(start..i);
            start = i;
        }
    }
    chunks.push(start..keys.len());
    chunks
}
