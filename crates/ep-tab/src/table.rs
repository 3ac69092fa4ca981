//! Dense N-dimensional tabulations over named axes.
//!
//! A [`Tabulation`] owns an ordered set of [`Axis`] definitions and a dense
//! array of samples whose extent along dimension `i` equals the length of axis
//! `i`. It is a pure value type: every transform returns a new owned table and
//! leaves its input untouched on failure.

use ep_core::Real;
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::{TabError, TabResult};
use crate::interp::OutOfBounds;

/// Dense N-dimensional lookup table indexed by named axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tabulation {
    axes: Vec<Axis>,
    data: ArrayD<Real>,
    #[serde(default)]
    out_of_bounds: OutOfBounds,
}

/// Equality is structural: same axes (names, order, points) and same samples.
/// The out-of-bounds policy is an access option, not part of the table's value.
impl PartialEq for Tabulation {
    fn eq(&self, other: &Self) -> bool {
        self.axes == other.axes && self.data == other.data
    }
}

pub(crate) fn check_unique_names(axes: &[Axis]) -> TabResult<()> {
    for (i, a) in axes.iter().enumerate() {
        if axes[..i].iter().any(|b| b.name() == a.name()) {
            return Err(TabError::DuplicateAxis {
                axis: a.name().to_string(),
            });
        }
    }
    Ok(())
}

impl Tabulation {
    /// Build a table from axes and a matching dense array.
    pub fn new(axes: Vec<Axis>, data: ArrayD<Real>) -> TabResult<Self> {
        if axes.is_empty() {
            return Err(TabError::InvalidOperation {
                what: "a tabulation needs at least one axis".to_string(),
            });
        }
        check_unique_names(&axes)?;
        let expected: Vec<usize> = axes.iter().map(Axis::num_points).collect();
        if data.shape() != expected.as_slice() {
            return Err(TabError::ShapeMismatch {
                expected,
                found: data.shape().to_vec(),
            });
        }
        Ok(Self {
            axes,
            data,
            out_of_bounds: OutOfBounds::Fatal,
        })
    }

    /// Build a table from flat row-major samples (last axis varies fastest).
    pub fn from_flat(axes: Vec<Axis>, values: Vec<Real>) -> TabResult<Self> {
        let expected: Vec<usize> = axes.iter().map(Axis::num_points).collect();
        let total: usize = expected.iter().product();
        if values.len() != total {
            return Err(TabError::ShapeMismatch {
                expected,
                found: vec![values.len()],
            });
        }
        let shape = expected.clone();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|_| {
            TabError::ShapeMismatch {
                expected,
                found: vec![total],
            }
        })?;
        Self::new(axes, data)
    }

    /// Build a table from flat records: one `(coordinates, value)` row per grid
    /// point, in any order. Axis points are recovered as the sorted unique
    /// coordinates per column; the rows must then cover the full grid exactly
    /// once.
    pub fn from_records(names: &[&str], rows: &[(Vec<Real>, Real)]) -> TabResult<Self> {
        if names.is_empty() {
            return Err(TabError::InvalidOperation {
                what: "a tabulation needs at least one axis".to_string(),
            });
        }
        if rows.is_empty() {
            return Err(TabError::InconsistentRecords {
                reason: "no rows given".to_string(),
            });
        }
        for (coords, _) in rows {
            if coords.len() != names.len() {
                return Err(TabError::InconsistentRecords {
                    reason: format!(
                        "row has {} coordinates, expected {}",
                        coords.len(),
                        names.len()
                    ),
                });
            }
        }

        let mut axes = Vec::with_capacity(names.len());
        for (j, name) in names.iter().enumerate() {
            let mut pts: Vec<Real> = rows.iter().map(|(c, _)| c[j]).collect();
            pts.sort_by(Real::total_cmp);
            pts.dedup();
            axes.push(Axis::new(*name, pts)?);
        }

        let shape: Vec<usize> = axes.iter().map(Axis::num_points).collect();
        let total: usize = shape.iter().product();
        if rows.len() != total {
            return Err(TabError::InconsistentRecords {
                reason: format!(
                    "{} rows for a grid of {total} sampling points (shape {shape:?})",
                    rows.len()
                ),
            });
        }

        let mut slots: Vec<Option<Real>> = vec![None; total];
        for (coords, value) in rows {
            let mut flat = 0usize;
            for (j, axis) in axes.iter().enumerate() {
                // exact match exists: the axis points were collected from these rows
                let k = axis.points().partition_point(|&p| p < coords[j]);
                flat = flat * axis.num_points() + k;
            }
            if slots[flat].is_some() {
                return Err(TabError::InconsistentRecords {
                    reason: format!("duplicate sampling point {coords:?}"),
                });
            }
            slots[flat] = Some(*value);
        }
        // row count matches and no slot was written twice, so none is missing
        let values: Vec<Real> = slots.into_iter().flatten().collect();
        Self::from_flat(axes, values)
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// Samples per axis, in axis order.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Total number of samples in the table.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn axis_names(&self) -> Vec<&str> {
        self.axes.iter().map(Axis::name).collect()
    }

    pub fn axis(&self, name: &str) -> TabResult<&Axis> {
        self.axes
            .iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| TabError::AxisNotFound {
                axis: name.to_string(),
            })
    }

    pub fn axis_position(&self, name: &str) -> TabResult<usize> {
        self.axes
            .iter()
            .position(|a| a.name() == name)
            .ok_or_else(|| TabError::AxisNotFound {
                axis: name.to_string(),
            })
    }

    pub fn data(&self) -> &ArrayD<Real> {
        &self.data
    }

    /// Sample at one grid index (one index per axis, in axis order).
    pub fn value_at(&self, index: &[usize]) -> TabResult<Real> {
        self.check_grid_index(index)?;
        Ok(self.data[IxDyn(index)])
    }

    /// Sample at a flat index, row-major (last axis fastest).
    pub fn value_flat(&self, flat: usize) -> TabResult<Real> {
        if flat >= self.size() {
            return Err(TabError::IndexOob {
                index: flat,
                len: self.size(),
            });
        }
        let idx = self.unravel(flat);
        Ok(self.data[IxDyn(&idx)])
    }

    /// Coordinate tuple of one flat sample index, as (axis name, grid value) pairs.
    pub fn input_at(&self, flat: usize) -> TabResult<Vec<(String, Real)>> {
        if flat >= self.size() {
            return Err(TabError::IndexOob {
                index: flat,
                len: self.size(),
            });
        }
        let idx = self.unravel(flat);
        Ok(self
            .axes
            .iter()
            .zip(idx)
            .map(|(a, i)| (a.name().to_string(), a.points()[i]))
            .collect())
    }

    /// Overwrite one sample in place.
    pub fn set_value_at(&mut self, index: &[usize], value: Real) -> TabResult<()> {
        self.check_grid_index(index)?;
        self.data[IxDyn(index)] = value;
        Ok(())
    }

    /// All samples in flat row-major order (last axis fastest).
    pub fn values(&self) -> impl Iterator<Item = Real> + '_ {
        self.data.iter().copied()
    }

    /// Out-of-bounds policy used by [`Tabulation::interpolate`].
    pub fn out_of_bounds(&self) -> OutOfBounds {
        self.out_of_bounds
    }

    pub fn set_out_of_bounds(&mut self, policy: OutOfBounds) {
        self.out_of_bounds = policy;
    }

    fn check_grid_index(&self, index: &[usize]) -> TabResult<()> {
        if index.len() != self.ndim()
            || index.iter().zip(self.data.shape()).any(|(&i, &n)| i >= n)
        {
            return Err(TabError::GridIndexOob {
                index: index.to_vec(),
                shape: self.shape().to_vec(),
            });
        }
        Ok(())
    }

    pub(crate) fn unravel(&self, flat: usize) -> Vec<usize> {
        let mut rem = flat;
        let mut idx = vec![0usize; self.ndim()];
        for (j, &n) in self.data.shape().iter().enumerate().rev() {
            idx[j] = rem % n;
            rem /= n;
        }
        idx
    }
}
