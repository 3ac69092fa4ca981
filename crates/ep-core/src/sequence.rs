//! Strictly ascending coordinate sequences.
//!
//! A tabulation axis is a strictly increasing sequence of finite grid points.
//! The checks and the k-way ordered merge used by axis validation and table
//! concatenation live here, on plain slices, so they stay independent of the
//! table types built on top.

use crate::numeric::Real;

/// Index of the first element that breaks strict ascent, if any.
pub fn first_non_ascending(points: &[Real]) -> Option<usize> {
    points.windows(2).position(|w| w[0] >= w[1]).map(|i| i + 1)
}

/// Index of the first NaN or infinite element, if any.
pub fn first_non_finite(points: &[Real]) -> Option<usize> {
    points.iter().position(|v| !v.is_finite())
}

/// Provenance of one merged grid point: (sequence index, index within that sequence).
pub type MergeSource = (usize, usize);

/// A grid point found in more than one input sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeCollision {
    pub value: Real,
    pub first: MergeSource,
    pub second: MergeSource,
}

/// Merge several strictly ascending sequences into one strictly ascending
/// sequence, keeping track of where each merged element came from.
///
/// Input sequences may interleave arbitrarily; the output is re-sorted
/// ascending. A value present in two sequences is a collision, not a merge.
pub fn merge_ascending(
    seqs: &[&[Real]],
) -> Result<Vec<(Real, MergeSource)>, MergeCollision> {
    let total: usize = seqs.iter().map(|s| s.len()).sum();
    let mut merged: Vec<(Real, MergeSource)> = Vec::with_capacity(total);
    for (si, seq) in seqs.iter().enumerate() {
        merged.extend(seq.iter().enumerate().map(|(li, &v)| (v, (si, li))));
    }
    merged.sort_by(|a, b| a.0.total_cmp(&b.0));
    for w in merged.windows(2) {
        if w[0].0 == w[1].0 {
            return Err(MergeCollision {
                value: w[0].0,
                first: w[0].1,
                second: w[1].1,
            });
        }
    }
    Ok(merged)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn merged_output_is_strictly_ascending(
            a in prop::collection::btree_set(0i64..1000, 1..20),
            offset in 1i64..500,
        ) {
            // disjoint by construction: second sequence shifted off the integer grid
            let s1: Vec<Real> = a.iter().map(|&v| v as Real).collect();
            let s2: Vec<Real> = a.iter().map(|&v| (v + offset) as Real + 0.5).collect();
            let merged = merge_ascending(&[&s1, &s2]).unwrap();
            prop_assert_eq!(merged.len(), s1.len() + s2.len());
            prop_assert!(first_non_ascending(
                &merged.iter().map(|&(v, _)| v).collect::<Vec<_>>()
            ).is_none());
        }
    }
}
