//! Structural transforms: slice, squeeze, dimension insertion, axis reorder.
//!
//! These are free functions over the common data model so that single-field
//! tables and table sets share one implementation. Each transform returns a
//! new owned table; no operation mutates its input, even on failure.

use ep_core::{Real, Tolerances};
use ndarray::{Axis as NdAxis, IxDyn};
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::{TabError, TabResult};
use crate::table::Tabulation;

/// Coordinate selection on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RangeSpec {
    /// Degenerate range: exactly one existing grid point.
    Point(Real),
    /// Closed interval `[min, max]`, endpoints included.
    Closed(Real, Real),
}

/// Restrict the table to coordinate ranges on the named axes.
///
/// Axes not named in `ranges` pass through untouched. A [`RangeSpec::Point`]
/// must match an existing grid point (within default tolerances); a
/// [`RangeSpec::Closed`] keeps every grid point inside the interval and must
/// keep at least one. An axis reduced to a single point stays present with
/// length 1; squeezing is a separate, explicit operation.
pub fn slice(table: &Tabulation, ranges: &[(&str, RangeSpec)]) -> TabResult<Tabulation> {
    let tol = Tolerances::default();
    let mut keep: Vec<Option<Vec<usize>>> = vec![None; table.ndim()];
    for (name, spec) in ranges {
        let pos = table.axis_position(name)?;
        let axis = &table.axes()[pos];
        let indices = match *spec {
            RangeSpec::Point(v) => {
                let i = axis.position_of(v, tol).ok_or_else(|| {
                    TabError::CoordinateNotFound {
                        axis: axis.name().to_string(),
                        value: v,
                    }
                })?;
                vec![i]
            }
            RangeSpec::Closed(min, max) => {
                let sel = axis.select_closed(min, max);
                if sel.is_empty() {
                    return Err(TabError::EmptySelection {
                        axis: axis.name().to_string(),
                        min,
                        max,
                    });
                }
                sel
            }
        };
        keep[pos] = Some(indices);
    }

    let mut axes_out = Vec::with_capacity(table.ndim());
    for (pos, axis) in table.axes().iter().enumerate() {
        match &keep[pos] {
            Some(idxs) => {
                let pts = idxs.iter().map(|&i| axis.points()[i]).collect();
                axes_out.push(Axis::new(axis.name(), pts)?);
            }
            None => axes_out.push(axis.clone()),
        }
    }

    let mut data = table.data().clone();
    for (pos, sel) in keep.iter().enumerate() {
        if let Some(idxs) = sel {
            data = data.select(NdAxis(pos), idxs);
        }
    }
    Tabulation::new(axes_out, data)
}

/// Remove length-1 axes.
///
/// With `which = None`, every degenerate axis is removed; if all axes are
/// degenerate the first one is kept so the table stays at least 1-D. With an
/// explicit list, each named axis must have length 1.
pub fn squeeze(table: &Tabulation, which: Option<&[&str]>) -> TabResult<Tabulation> {
    let mut remove: Vec<usize> = match which {
        Some(names) => {
            let mut positions = Vec::with_capacity(names.len());
            for name in names {
                let pos = table.axis_position(name)?;
                let len = table.axes()[pos].num_points();
                if len != 1 {
                    return Err(TabError::InvalidOperation {
                        what: format!("cannot squeeze axis '{name}' of length {len}"),
                    });
                }
                positions.push(pos);
            }
            positions.sort_unstable();
            positions.dedup();
            positions
        }
        None => table
            .axes()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.num_points() == 1)
            .map(|(i, _)| i)
            .collect(),
    };

    if remove.len() == table.ndim() {
        if which.is_some() {
            return Err(TabError::InvalidOperation {
                what: "cannot squeeze every axis of a table".to_string(),
            });
        }
        // keep one axis so the table stays at least 1-D
        remove.remove(0);
    }

    let axes_out: Vec<Axis> = table
        .axes()
        .iter()
        .enumerate()
        .filter(|(i, _)| !remove.contains(i))
        .map(|(_, a)| a.clone())
        .collect();
    let mut data = table.data().clone();
    for &pos in remove.iter().rev() {
        data = data.index_axis_move(NdAxis(pos), 0);
    }
    Tabulation::new(axes_out, data)
}

/// Insert a new axis at `position`, replicating the existing samples at every
/// point of the new axis.
pub fn insert_dimension(
    table: &Tabulation,
    name: &str,
    points: &[Real],
    position: usize,
) -> TabResult<Tabulation> {
    if table.axes().iter().any(|a| a.name() == name) {
        return Err(TabError::DuplicateAxis {
            axis: name.to_string(),
        });
    }
    if position > table.ndim() {
        return Err(TabError::InvalidOperation {
            what: format!(
                "insert position {position} out of range 0..={}",
                table.ndim()
            ),
        });
    }
    let new_axis = Axis::new(name, points.to_vec())?;

    let inserted = table.data().clone().insert_axis(NdAxis(position));
    let mut target_shape: Vec<usize> = inserted.shape().to_vec();
    target_shape[position] = new_axis.num_points();
    let data = inserted
        .broadcast(IxDyn(&target_shape))
        .ok_or_else(|| TabError::ShapeMismatch {
            expected: target_shape.clone(),
            found: inserted.shape().to_vec(),
        })?
        .to_owned();

    let mut axes = table.axes().to_vec();
    axes.insert(position, new_axis);
    Tabulation::new(axes, data)
}

/// Permute the axes to the given name order, transposing the samples to match.
pub fn reorder(table: &Tabulation, names: &[&str]) -> TabResult<Tabulation> {
    if names.len() != table.ndim() {
        return Err(TabError::AxisMismatch {
            reason: format!(
                "{} axis names given for a table of {} axes",
                names.len(),
                table.ndim()
            ),
        });
    }
    let mut perm = Vec::with_capacity(names.len());
    for name in names {
        let pos = table.axis_position(name)?;
        if perm.contains(&pos) {
            return Err(TabError::AxisMismatch {
                reason: format!("axis '{name}' listed twice"),
            });
        }
        perm.push(pos);
    }
    let axes: Vec<Axis> = perm.iter().map(|&p| table.axes()[p].clone()).collect();
    let data = table
        .data()
        .clone()
        .permuted_axes(IxDyn(&perm))
        .as_standard_layout()
        .to_owned();
    Tabulation::new(axes, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Tabulation;

    fn ca_p_table() -> Tabulation {
        // the worked example: CA = [0, 1, 2], p = [1.0, 2.0]
        let axes = vec![
            Axis::new("CA", vec![0.0, 1.0, 2.0]).unwrap(),
            Axis::new("p", vec![1.0, 2.0]).unwrap(),
        ];
        Tabulation::from_flat(axes, vec![10.0, 11.0, 20.0, 21.0, 30.0, 31.0]).unwrap()
    }

    #[test]
    fn slice_closed_range() {
        let tab = ca_p_table();
        let sub = slice(&tab, &[("CA", RangeSpec::Closed(0.0, 1.0))]).unwrap();
        assert_eq!(sub.axis("CA").unwrap().points(), &[0.0, 1.0]);
        assert_eq!(sub.axis("p").unwrap().points(), &[1.0, 2.0]);
        assert_eq!(sub.values().collect::<Vec<_>>(), vec![10.0, 11.0, 20.0, 21.0]);
    }

    #[test]
    fn slice_point_then_squeeze() {
        let tab = ca_p_table();
        let sub = slice(&tab, &[("CA", RangeSpec::Point(1.0))]).unwrap();
        assert_eq!(sub.shape(), &[1, 2]);
        let line = squeeze(&sub, Some(&["CA"])).unwrap();
        assert_eq!(line.shape(), &[2]);
        assert_eq!(line.axis_names(), vec!["p"]);
        assert_eq!(line.values().collect::<Vec<_>>(), vec![20.0, 21.0]);
    }

    #[test]
    fn slice_full_range_round_trips() {
        let tab = ca_p_table();
        let sub = slice(
            &tab,
            &[
                ("CA", RangeSpec::Closed(0.0, 2.0)),
                ("p", RangeSpec::Closed(1.0, 2.0)),
            ],
        )
        .unwrap();
        assert_eq!(sub, tab);
    }

    #[test]
    fn slice_errors() {
        let tab = ca_p_table();
        assert!(matches!(
            slice(&tab, &[("CA", RangeSpec::Point(0.5))]).unwrap_err(),
            TabError::CoordinateNotFound { .. }
        ));
        assert!(matches!(
            slice(&tab, &[("CA", RangeSpec::Closed(5.0, 6.0))]).unwrap_err(),
            TabError::EmptySelection { .. }
        ));
        assert!(matches!(
            slice(&tab, &[("phi", RangeSpec::Point(0.5))]).unwrap_err(),
            TabError::AxisNotFound { .. }
        ));
    }

    #[test]
    fn squeeze_is_idempotent() {
        let tab = ca_p_table();
        let sub = slice(&tab, &[("p", RangeSpec::Point(1.0))]).unwrap();
        let once = squeeze(&sub, None).unwrap();
        let twice = squeeze(&once, None).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.axis_names(), vec!["CA"]);
    }

    #[test]
    fn squeeze_rejects_fat_axis() {
        let tab = ca_p_table();
        assert!(matches!(
            squeeze(&tab, Some(&["CA"])).unwrap_err(),
            TabError::InvalidOperation { .. }
        ));
    }

    #[test]
    fn squeeze_keeps_one_axis_of_fully_degenerate_table() {
        let axes = vec![
            Axis::new("a", vec![1.0]).unwrap(),
            Axis::new("b", vec![2.0]).unwrap(),
        ];
        let tab = Tabulation::from_flat(axes, vec![7.0]).unwrap();
        let squeezed = squeeze(&tab, None).unwrap();
        assert_eq!(squeezed.ndim(), 1);
        assert_eq!(squeezed.axis_names(), vec!["a"]);
        assert!(squeeze(&tab, Some(&["a", "b"])).is_err());
    }

    #[test]
    fn insert_dimension_broadcasts() {
        let tab = ca_p_table();
        let ext = insert_dimension(&tab, "phi", &[0.5, 1.0], 0).unwrap();
        assert_eq!(ext.shape(), &[2, 3, 2]);
        // both phi slices are identical copies of the original table
        for phi in [0.5, 1.0] {
            let copy = slice(&ext, &[("phi", RangeSpec::Point(phi))]).unwrap();
            let copy = squeeze(&copy, Some(&["phi"])).unwrap();
            assert_eq!(copy, tab);
        }
    }

    #[test]
    fn insert_dimension_mid_position() {
        let tab = ca_p_table();
        let ext = insert_dimension(&tab, "phi", &[0.5], 1).unwrap();
        assert_eq!(ext.axis_names(), vec!["CA", "phi", "p"]);
        assert_eq!(ext.shape(), &[3, 1, 2]);
    }

    #[test]
    fn insert_dimension_errors() {
        let tab = ca_p_table();
        assert!(matches!(
            insert_dimension(&tab, "CA", &[0.0], 0).unwrap_err(),
            TabError::DuplicateAxis { .. }
        ));
        assert!(matches!(
            insert_dimension(&tab, "phi", &[0.0], 3).unwrap_err(),
            TabError::InvalidOperation { .. }
        ));
    }

    #[test]
    fn reorder_transposes_samples() {
        let tab = ca_p_table();
        let swapped = reorder(&tab, &["p", "CA"]).unwrap();
        assert_eq!(swapped.axis_names(), vec!["p", "CA"]);
        assert_eq!(swapped.shape(), &[2, 3]);
        assert_eq!(
            swapped.values().collect::<Vec<_>>(),
            vec![10.0, 20.0, 30.0, 11.0, 21.0, 31.0]
        );
        // round-trip
        assert_eq!(reorder(&swapped, &["CA", "p"]).unwrap(), tab);
    }

    #[test]
    fn reorder_rejects_bad_name_sets() {
        let tab = ca_p_table();
        assert!(reorder(&tab, &["CA"]).is_err());
        assert!(reorder(&tab, &["CA", "CA"]).is_err());
        assert!(reorder(&tab, &["CA", "phi"]).is_err());
    }
}
