//! Named coordinate axes.
//!
//! An axis is one independent-variable dimension of a tabulation: a name plus a
//! strictly increasing sequence of finite grid points. Validation happens at
//! construction, so every `Axis` in circulation satisfies the invariant.

use ep_core::{Real, Tolerances, first_non_ascending, first_non_finite, nearly_equal};
use serde::{Deserialize, Serialize};

use crate::error::{TabError, TabResult};

/// One named, strictly increasing coordinate dimension of a lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    name: String,
    points: Vec<Real>,
}

impl Axis {
    /// Build an axis, rejecting empty, non-finite, or non-ascending point sets.
    pub fn new(name: impl Into<String>, points: Vec<Real>) -> TabResult<Self> {
        let name = name.into();
        if points.is_empty() {
            return Err(TabError::InvalidAxis {
                axis: name,
                reason: "axis has no points".to_string(),
            });
        }
        if let Some(i) = first_non_finite(&points) {
            return Err(TabError::InvalidAxis {
                axis: name,
                reason: format!("non-finite point at index {i}"),
            });
        }
        if let Some(i) = first_non_ascending(&points) {
            return Err(TabError::InvalidAxis {
                axis: name,
                reason: format!(
                    "points not strictly increasing at index {i} (value {})",
                    points[i]
                ),
            });
        }
        Ok(Self { name, points })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Real] {
        &self.points
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn min(&self) -> Real {
        self.points[0]
    }

    pub fn max(&self) -> Real {
        self.points[self.points.len() - 1]
    }

    /// True when `value` lies inside the closed span of the axis.
    pub fn contains(&self, value: Real) -> bool {
        value >= self.min() && value <= self.max()
    }

    /// Index of the grid point matching `value` within `tol`, if any.
    pub fn position_of(&self, value: Real, tol: Tolerances) -> Option<usize> {
        self.points.iter().position(|&p| nearly_equal(p, value, tol))
    }

    /// Indices of all grid points inside the closed interval `[min, max]`.
    pub fn select_closed(&self, min: Real, max: Real) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p >= min && p <= max)
            .map(|(i, _)| i)
            .collect()
    }

    /// Interpolation cell for `value`: the index `i` with
    /// `points[i] <= value <= points[i + 1]`, clamped to the edge cells when
    /// the value lies outside the span. Meaningless for single-point axes.
    pub(crate) fn cell_of(&self, value: Real) -> usize {
        let n = self.points.len();
        let upper = self.points.partition_point(|&p| p <= value);
        upper.saturating_sub(1).min(n.saturating_sub(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_axis() {
        let ax = Axis::new("CA", vec![-180.0, 0.0, 180.0]).unwrap();
        assert_eq!(ax.name(), "CA");
        assert_eq!(ax.num_points(), 3);
        assert_eq!(ax.min(), -180.0);
        assert_eq!(ax.max(), 180.0);
    }

    #[test]
    fn reject_empty() {
        assert!(Axis::new("p", vec![]).is_err());
    }

    #[test]
    fn reject_duplicates_and_descent() {
        assert!(Axis::new("p", vec![1.0, 1.0, 2.0]).is_err());
        assert!(Axis::new("p", vec![2.0, 1.0]).is_err());
    }

    #[test]
    fn reject_non_finite() {
        assert!(Axis::new("p", vec![0.0, Real::NAN]).is_err());
        assert!(Axis::new("p", vec![0.0, Real::INFINITY]).is_err());
    }

    #[test]
    fn position_lookup_with_tolerance() {
        let ax = Axis::new("p", vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ax.position_of(2.0, Tolerances::default()), Some(1));
        assert_eq!(ax.position_of(2.0 + 1e-13, Tolerances::default()), Some(1));
        assert_eq!(ax.position_of(2.5, Tolerances::default()), None);
    }

    #[test]
    fn closed_selection() {
        let ax = Axis::new("CA", vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ax.select_closed(1.0, 2.0), vec![1, 2]);
        assert_eq!(ax.select_closed(0.5, 2.5), vec![1, 2]);
        assert!(ax.select_closed(5.0, 6.0).is_empty());
    }

    #[test]
    fn cell_lookup_clamps_to_edges() {
        let ax = Axis::new("T", vec![300.0, 400.0, 500.0]).unwrap();
        assert_eq!(ax.cell_of(250.0), 0);
        assert_eq!(ax.cell_of(300.0), 0);
        assert_eq!(ax.cell_of(350.0), 0);
        assert_eq!(ax.cell_of(400.0), 1);
        assert_eq!(ax.cell_of(500.0), 1);
        assert_eq!(ax.cell_of(600.0), 1);
    }
}
