//! Multilinear interpolation over the grid.
//!
//! Queries give one coordinate per axis, in axis order. Inside the grid the
//! result is the multilinear blend of the 2^m surrounding samples, where m is
//! the number of non-degenerate axes. Behavior outside an axis span is
//! controlled by [`OutOfBounds`].

use ep_core::{Real, Tolerances, nearly_equal};
use ndarray::IxDyn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{TabError, TabResult};
use crate::table::Tabulation;

/// Policy for queries that fall outside an axis span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutOfBounds {
    /// Reject the query with an error.
    #[default]
    Fatal,
    /// Return NaN for the whole query.
    Nan,
    /// Extrapolate linearly from the edge cell.
    Extrapolate,
}

impl Tabulation {
    /// Interpolate at `query` using the table's stored out-of-bounds policy.
    pub fn interpolate(&self, query: &[Real]) -> TabResult<Real> {
        self.interpolate_with(query, self.out_of_bounds())
    }

    /// Interpolate at `query` with an explicit out-of-bounds policy.
    ///
    /// Single-point axes cannot be interpolated along; the corresponding query
    /// entry is ignored (with a warning when it disagrees with the grid point).
    pub fn interpolate_with(&self, query: &[Real], policy: OutOfBounds) -> TabResult<Real> {
        if query.len() != self.ndim() {
            return Err(TabError::ShapeMismatch {
                expected: vec![self.ndim()],
                found: vec![query.len()],
            });
        }
        let tol = Tolerances::default();

        // per-axis cell index and interpolation parameter; degenerate axes pinned
        let mut cells = Vec::with_capacity(self.ndim());
        let mut params = Vec::with_capacity(self.ndim());
        let mut active = Vec::with_capacity(self.ndim());
        for (axis, &x) in self.axes().iter().zip(query) {
            if axis.num_points() == 1 {
                if !nearly_equal(x, axis.points()[0], tol) {
                    warn!(
                        axis = axis.name(),
                        value = x,
                        grid = axis.points()[0],
                        "single-point axis cannot be interpolated along; query entry ignored"
                    );
                }
                cells.push(0);
                params.push(0.0);
                active.push(false);
                continue;
            }
            if !axis.contains(x) {
                match policy {
                    OutOfBounds::Fatal => {
                        return Err(TabError::OutOfRange {
                            axis: axis.name().to_string(),
                            value: x,
                            min: axis.min(),
                            max: axis.max(),
                        });
                    }
                    OutOfBounds::Nan => return Ok(Real::NAN),
                    OutOfBounds::Extrapolate => {}
                }
            }
            let cell = axis.cell_of(x);
            let p0 = axis.points()[cell];
            let p1 = axis.points()[cell + 1];
            cells.push(cell);
            params.push((x - p0) / (p1 - p0));
            active.push(true);
        }

        // blend the 2^m corners of the active cell
        let active_positions: Vec<usize> = active
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a)
            .map(|(i, _)| i)
            .collect();
        let mut value = 0.0;
        let mut index = cells.clone();
        for corner in 0u64..(1u64 << active_positions.len()) {
            let mut weight = 1.0;
            for (bit, &p) in active_positions.iter().enumerate() {
                let hi = (corner >> bit) & 1 == 1;
                index[p] = cells[p] + usize::from(hi);
                weight *= if hi { params[p] } else { 1.0 - params[p] };
            }
            if weight != 0.0 {
                value += weight * self.data()[IxDyn(&index)];
            }
        }
        Ok(value)
    }

    /// Interpolate a batch of queries, in parallel.
    pub fn interpolate_many(
        &self,
        queries: &[Vec<Real>],
        policy: OutOfBounds,
    ) -> TabResult<Vec<Real>> {
        debug!(queries = queries.len(), "batch interpolation");
        queries
            .par_iter()
            .map(|q| self.interpolate_with(q, policy))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Axis;

    fn bilinear_table() -> Tabulation {
        // f(x, y) = 10x + y on x in [0, 1], y in [0, 2]
        let axes = vec![
            Axis::new("x", vec![0.0, 1.0]).unwrap(),
            Axis::new("y", vec![0.0, 1.0, 2.0]).unwrap(),
        ];
        Tabulation::from_flat(axes, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]).unwrap()
    }

    #[test]
    fn exact_grid_points() {
        let tab = bilinear_table();
        assert_eq!(tab.interpolate(&[0.0, 0.0]).unwrap(), 0.0);
        assert_eq!(tab.interpolate(&[1.0, 2.0]).unwrap(), 12.0);
        assert_eq!(tab.interpolate(&[1.0, 1.0]).unwrap(), 11.0);
    }

    #[test]
    fn midpoint_blend() {
        let tab = bilinear_table();
        let v = tab.interpolate(&[0.5, 0.5]).unwrap();
        assert!((v - 5.5).abs() < 1e-12);
        let v = tab.interpolate(&[0.25, 1.5]).unwrap();
        assert!((v - 4.0).abs() < 1e-12);
    }

    #[test]
    fn fatal_out_of_bounds() {
        let tab = bilinear_table();
        let err = tab.interpolate(&[2.0, 0.0]).unwrap_err();
        assert!(matches!(err, TabError::OutOfRange { .. }));
    }

    #[test]
    fn nan_out_of_bounds() {
        let tab = bilinear_table();
        let v = tab.interpolate_with(&[2.0, 0.0], OutOfBounds::Nan).unwrap();
        assert!(v.is_nan());
    }

    #[test]
    fn linear_extrapolation() {
        let tab = bilinear_table();
        // f is globally linear, so extrapolation is exact
        let v = tab
            .interpolate_with(&[2.0, 0.0], OutOfBounds::Extrapolate)
            .unwrap();
        assert!((v - 20.0).abs() < 1e-12);
        let v = tab
            .interpolate_with(&[-1.0, 3.0], OutOfBounds::Extrapolate)
            .unwrap();
        assert!((v - (-7.0)).abs() < 1e-12);
    }

    #[test]
    fn degenerate_axis_is_ignored() {
        let axes = vec![
            Axis::new("phi", vec![1.0]).unwrap(),
            Axis::new("x", vec![0.0, 1.0]).unwrap(),
        ];
        let tab = Tabulation::from_flat(axes, vec![0.0, 10.0]).unwrap();
        let v = tab.interpolate(&[1.0, 0.5]).unwrap();
        assert!((v - 5.0).abs() < 1e-12);
        // mismatched entry on the degenerate axis still evaluates
        let v = tab.interpolate(&[99.0, 0.5]).unwrap();
        assert!((v - 5.0).abs() < 1e-12);
    }

    #[test]
    fn query_arity_is_checked() {
        let tab = bilinear_table();
        assert!(tab.interpolate(&[0.0]).is_err());
        assert!(tab.interpolate(&[0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn batch_matches_single() {
        let tab = bilinear_table();
        let queries: Vec<Vec<Real>> = (0..50)
            .map(|i| vec![i as Real / 50.0, (i % 3) as Real / 2.0])
            .collect();
        let batch = tab.interpolate_many(&queries, OutOfBounds::Fatal).unwrap();
        for (q, &v) in queries.iter().zip(&batch) {
            assert_eq!(tab.interpolate(q).unwrap(), v);
        }
    }

    #[test]
    fn batch_propagates_errors() {
        let tab = bilinear_table();
        let queries = vec![vec![0.0, 0.0], vec![5.0, 0.0]];
        assert!(tab.interpolate_many(&queries, OutOfBounds::Fatal).is_err());
    }
}
