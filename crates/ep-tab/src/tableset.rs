//! Multi-field tables over one shared grid.
//!
//! A [`TableSet`] holds several named output fields sampled on the same axes,
//! the shape a simulation sweep produces (one table per reported quantity per
//! case). Structural transforms apply uniformly to every field, so access
//! behavior stays identical between a single table and a set.

use ep_core::Real;
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::concat;
use crate::error::{TabError, TabResult};
use crate::ops::{self, RangeSpec};
use crate::table::{Tabulation, check_unique_names};

/// Shared capability surface of single-field tables and table sets.
///
/// Transforms return a new owned value of the same kind; inputs are never
/// mutated, even on failure.
pub trait TableOps: Sized {
    fn axes(&self) -> &[Axis];

    fn slice(&self, ranges: &[(&str, RangeSpec)]) -> TabResult<Self>;
    fn squeeze(&self, which: Option<&[&str]>) -> TabResult<Self>;
    fn insert_dimension(
        &self,
        name: &str,
        points: &[Real],
        position: usize,
    ) -> TabResult<Self>;

    fn ndim(&self) -> usize {
        self.axes().len()
    }

    fn axis_names(&self) -> Vec<&str> {
        self.axes().iter().map(Axis::name).collect()
    }

    fn axis(&self, name: &str) -> TabResult<&Axis> {
        self.axes()
            .iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| TabError::AxisNotFound {
                axis: name.to_string(),
            })
    }
}

impl TableOps for Tabulation {
    fn axes(&self) -> &[Axis] {
        Tabulation::axes(self)
    }

    fn slice(&self, ranges: &[(&str, RangeSpec)]) -> TabResult<Self> {
        ops::slice(self, ranges)
    }

    fn squeeze(&self, which: Option<&[&str]>) -> TabResult<Self> {
        ops::squeeze(self, which)
    }

    fn insert_dimension(
        &self,
        name: &str,
        points: &[Real],
        position: usize,
    ) -> TabResult<Self> {
        ops::insert_dimension(self, name, points, position)
    }
}

/// Ordered named output fields over one shared axis grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSet {
    axes: Vec<Axis>,
    fields: Vec<(String, Tabulation)>,
}

impl TableSet {
    /// Build an empty set over the given grid.
    pub fn new(axes: Vec<Axis>) -> TabResult<Self> {
        if axes.is_empty() {
            return Err(TabError::InvalidOperation {
                what: "a table set needs at least one axis".to_string(),
            });
        }
        check_unique_names(&axes)?;
        Ok(Self {
            axes,
            fields: Vec::new(),
        })
    }

    /// Add an output field sampled on the set's grid.
    pub fn insert_field(&mut self, name: impl Into<String>, data: ArrayD<Real>) -> TabResult<()> {
        let name = name.into();
        if self.fields.iter().any(|(n, _)| *n == name) {
            return Err(TabError::DuplicateField { field: name });
        }
        let table = Tabulation::new(self.axes.clone(), data)?;
        self.fields.push((name, table));
        Ok(())
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn field(&self, name: &str) -> TabResult<&Tabulation> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
            .ok_or_else(|| TabError::FieldNotFound {
                field: name.to_string(),
            })
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Tabulation)> {
        self.fields.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Apply one single-table transform to every field, keeping the shared
    /// grid consistent. An empty set transforms its axes through a zero-filled
    /// probe table.
    fn apply(&self, op: impl Fn(&Tabulation) -> TabResult<Tabulation>) -> TabResult<Self> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for (name, table) in &self.fields {
            fields.push((name.clone(), op(table)?));
        }
        let axes = match fields.first() {
            Some((_, table)) => table.axes().to_vec(),
            None => op(&self.probe()?)?.axes().to_vec(),
        };
        Ok(Self { axes, fields })
    }

    fn probe(&self) -> TabResult<Tabulation> {
        let shape: Vec<usize> = self.axes.iter().map(Axis::num_points).collect();
        Tabulation::new(self.axes.clone(), ArrayD::zeros(IxDyn(&shape)))
    }
}

impl TableOps for TableSet {
    fn axes(&self) -> &[Axis] {
        TableSet::axes(self)
    }

    fn slice(&self, ranges: &[(&str, RangeSpec)]) -> TabResult<Self> {
        self.apply(|t| ops::slice(t, ranges))
    }

    fn squeeze(&self, which: Option<&[&str]>) -> TabResult<Self> {
        self.apply(|t| ops::squeeze(t, which))
    }

    fn insert_dimension(
        &self,
        name: &str,
        points: &[Real],
        position: usize,
    ) -> TabResult<Self> {
        self.apply(|t| ops::insert_dimension(t, name, points, position))
    }
}

/// Merge table sets that agree on every axis except `axis_name`, field by
/// field. Operands must carry the same field names in the same order.
pub fn concat_sets(sets: &[&TableSet], axis_name: &str) -> TabResult<TableSet> {
    let (first, rest) = sets.split_first().ok_or_else(|| TabError::InvalidOperation {
        what: "concat needs at least one table set".to_string(),
    })?;
    for (s_idx, other) in rest.iter().enumerate() {
        if other.field_names() != first.field_names() {
            return Err(TabError::FieldMismatch {
                reason: format!(
                    "set {} has fields {:?}, expected {:?}",
                    s_idx + 1,
                    other.field_names(),
                    first.field_names()
                ),
            });
        }
    }

    let mut fields = Vec::with_capacity(first.num_fields());
    for (f_idx, (name, _)) in first.fields.iter().enumerate() {
        let operands: Vec<&Tabulation> = sets.iter().map(|s| &s.fields[f_idx].1).collect();
        fields.push((name.clone(), concat::concat(&operands, axis_name)?));
    }
    let axes = match fields.first() {
        Some((_, table)) => table.axes().to_vec(),
        None => {
            let probes: Vec<Tabulation> =
                sets.iter().map(|s| s.probe()).collect::<TabResult<_>>()?;
            let refs: Vec<&Tabulation> = probes.iter().collect();
            concat::concat(&refs, axis_name)?.axes().to_vec()
        }
    };
    Ok(TableSet { axes, fields })
}
