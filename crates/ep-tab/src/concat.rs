//! K-way concatenation along one axis.
//!
//! Merging many per-case sub-tables into one table is the throughput-sensitive
//! path of the library. The merged grid is computed first, the output array is
//! allocated exactly once, and each operand hyperslab is copied into place, so
//! a k-way merge never reallocates.

use ep_core::{Real, merge_ascending};
use ndarray::{ArrayD, Axis as NdAxis, IxDyn};
use tracing::debug;

use crate::axis::Axis;
use crate::error::{TabError, TabResult};
use crate::table::Tabulation;

/// Merge tables that agree on every axis except `axis_name`.
///
/// The merge-axis coordinate sequences may interleave arbitrarily across the
/// operands; the merged axis is re-sorted ascending. A coordinate present in
/// two operands is an error: values are never deduplicated or overwritten, so
/// the result is independent of operand order.
pub fn concat(tables: &[&Tabulation], axis_name: &str) -> TabResult<Tabulation> {
    let (first, rest) = tables.split_first().ok_or_else(|| TabError::InvalidOperation {
        what: "concat needs at least one table".to_string(),
    })?;
    let pos = first.axis_position(axis_name)?;

    for (t_idx, other) in rest.iter().enumerate() {
        if other.ndim() != first.ndim() {
            return Err(TabError::AxisMismatch {
                reason: format!(
                    "table {} has {} axes, expected {}",
                    t_idx + 1,
                    other.ndim(),
                    first.ndim()
                ),
            });
        }
        for (a_idx, (a, b)) in first.axes().iter().zip(other.axes()).enumerate() {
            if a.name() != b.name() {
                return Err(TabError::AxisMismatch {
                    reason: format!(
                        "axis {} is '{}' in table {} but '{}' in table 0",
                        a_idx,
                        b.name(),
                        t_idx + 1,
                        a.name()
                    ),
                });
            }
            if a_idx != pos && a != b {
                return Err(TabError::AxisMismatch {
                    reason: format!("axis '{}' differs in table {}", a.name(), t_idx + 1),
                });
            }
        }
    }

    let seqs: Vec<&[Real]> = tables.iter().map(|t| t.axes()[pos].points()).collect();
    let merged = merge_ascending(&seqs).map_err(|c| TabError::OverlappingCoordinates {
        axis: axis_name.to_string(),
        value: c.value,
    })?;

    let mut shape: Vec<usize> = first.shape().to_vec();
    shape[pos] = merged.len();
    debug!(
        tables = tables.len(),
        axis = axis_name,
        points = merged.len(),
        samples = shape.iter().product::<usize>(),
        "concatenating tabulations"
    );

    // single final allocation; hyperslabs copied into place
    let mut out = ArrayD::<Real>::zeros(IxDyn(&shape));
    for (dst, &(_, (t_idx, local))) in merged.iter().enumerate() {
        out.index_axis_mut(NdAxis(pos), dst)
            .assign(&tables[t_idx].data().index_axis(NdAxis(pos), local));
    }

    let points: Vec<Real> = merged.iter().map(|&(v, _)| v).collect();
    let mut axes = first.axes().to_vec();
    axes[pos] = Axis::new(axis_name, points)?;
    Tabulation::new(axes, out)
}
