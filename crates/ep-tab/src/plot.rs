//! Thin plot wrapper: tables to 2-D curves.
//!
//! Selects one axis for the abscissa and plots the table values against it,
//! one trace per coordinate of an optional second axis, with every remaining
//! axis pinned to an iso coordinate. All the work is axis selection; rendering
//! is plotly's.

use ep_core::Real;
use plotly::common::Mode;
use plotly::layout::{Axis as PlotAxis, Layout};
use plotly::{Plot, Scatter};

use crate::error::{TabError, TabResult};
use crate::ops::{RangeSpec, slice, squeeze};
use crate::table::Tabulation;

impl Tabulation {
    /// Plot values against axis `x`, one line per coordinate of `color_by`.
    ///
    /// Every axis other than `x` and `color_by` must be pinned by an entry in
    /// `iso`; a table with exactly the plotted axes needs no `iso` at all. Iso
    /// coordinates must exist on their axis.
    pub fn plot(
        &self,
        x: &str,
        color_by: Option<&str>,
        iso: &[(&str, Real)],
    ) -> TabResult<Plot> {
        self.axis(x)?;
        if let Some(c) = color_by {
            self.axis(c)?;
            if c == x {
                return Err(TabError::InvalidOperation {
                    what: format!("axis '{x}' selected as both abscissa and line color"),
                });
            }
        }
        for (name, _) in iso {
            if *name == x || Some(*name) == color_by {
                return Err(TabError::InvalidOperation {
                    what: format!("iso coordinate given for plotted axis '{name}'"),
                });
            }
        }

        // pin the iso axes, then drop them
        let mut reduced = self.clone();
        if !iso.is_empty() {
            let ranges: Vec<(&str, RangeSpec)> = iso
                .iter()
                .map(|&(name, value)| (name, RangeSpec::Point(value)))
                .collect();
            let iso_names: Vec<&str> = iso.iter().map(|&(name, _)| name).collect();
            reduced = squeeze(&slice(&reduced, &ranges)?, Some(&iso_names))?;
        }

        let mut expected: Vec<&str> = vec![x];
        expected.extend(color_by);
        let mut unfixed: Vec<&str> = reduced
            .axis_names()
            .into_iter()
            .filter(|n| !expected.contains(n))
            .collect();
        if !unfixed.is_empty() {
            unfixed.sort_unstable();
            return Err(TabError::InvalidOperation {
                what: format!("axes {unfixed:?} are neither plotted nor pinned by an iso value"),
            });
        }

        let xs: Vec<Real> = reduced.axis(x)?.points().to_vec();
        let mut plot = Plot::new();
        match color_by {
            None => {
                let ys: Vec<Real> = reduced.values().collect();
                plot.add_trace(Scatter::new(xs, ys).mode(Mode::Lines));
            }
            Some(c) => {
                let coords: Vec<Real> = reduced.axis(c)?.points().to_vec();
                for coord in coords {
                    let line = slice(&reduced, &[(c, RangeSpec::Point(coord))])?;
                    let line = squeeze(&line, Some(&[c]))?;
                    let ys: Vec<Real> = line.values().collect();
                    plot.add_trace(
                        Scatter::new(xs.clone(), ys)
                            .name(&format!("{c} = {coord}"))
                            .mode(Mode::Lines),
                    );
                }
            }
        }
        plot.set_layout(
            Layout::new()
                .x_axis(PlotAxis::new().title(x))
                .y_axis(PlotAxis::new().title("output")),
        );
        Ok(plot)
    }
}
