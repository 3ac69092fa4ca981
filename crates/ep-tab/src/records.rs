//! Flat record projection of a table.
//!
//! One row per grid point, one column per axis plus one column per output.
//! Row order is row-major (last axis varies fastest). The projection is a
//! derived snapshot: it holds copies and has no write access back into the
//! table it came from.

use std::io;

use ep_core::Real;
use ndarray::IxDyn;
use serde::Serialize;

use crate::error::{TabError, TabResult};
use crate::table::Tabulation;
use crate::tableset::TableSet;

/// Read-only row-based projection of one or more tables over a shared grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Records {
    columns: Vec<String>,
    rows: Vec<Vec<Real>>,
}

impl Records {
    /// Column names: axis names first, then output names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows (grid points).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One row, in column order.
    pub fn row(&self, i: usize) -> TabResult<&[Real]> {
        self.rows
            .get(i)
            .map(Vec::as_slice)
            .ok_or(TabError::IndexOob {
                index: i,
                len: self.rows.len(),
            })
    }

    /// All rows, in row-major grid order.
    pub fn rows(&self) -> impl Iterator<Item = &[Real]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Write the records as CSV: a header row of column names, then one line
    /// per grid point.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> TabResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|v| v.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl Tabulation {
    /// Project the table to flat records: one column per axis plus `"output"`.
    pub fn to_records(&self) -> Records {
        let mut columns: Vec<String> =
            self.axes().iter().map(|a| a.name().to_string()).collect();
        columns.push("output".to_string());

        let mut rows = Vec::with_capacity(self.size());
        for (flat, value) in self.values().enumerate() {
            let idx = self.unravel(flat);
            let mut row: Vec<Real> = self
                .axes()
                .iter()
                .zip(&idx)
                .map(|(a, &i)| a.points()[i])
                .collect();
            row.push(value);
            rows.push(row);
        }
        Records { columns, rows }
    }
}

impl TableSet {
    /// Project every field to flat records over the shared grid: one column
    /// per axis, then one value column per field, same row order as
    /// [`Tabulation::to_records`].
    pub fn to_records(&self) -> Records {
        let mut columns: Vec<String> =
            self.axes().iter().map(|a| a.name().to_string()).collect();
        columns.extend(self.field_names().iter().map(|n| n.to_string()));

        let shape: Vec<usize> = self.axes().iter().map(|a| a.num_points()).collect();
        let total: usize = shape.iter().product();
        let mut rows = Vec::with_capacity(total);
        for flat in 0..total {
            let mut rem = flat;
            let mut idx = vec![0usize; shape.len()];
            for (j, &n) in shape.iter().enumerate().rev() {
                idx[j] = rem % n;
                rem /= n;
            }
            let mut row: Vec<Real> = self
                .axes()
                .iter()
                .zip(&idx)
                .map(|(a, &i)| a.points()[i])
                .collect();
            for (_, tab) in self.fields() {
                // fields share the set's axes, so the index is always in range
                row.push(tab.data()[IxDyn(&idx)]);
            }
            rows.push(row);
        }
        Records { columns, rows }
    }
}
