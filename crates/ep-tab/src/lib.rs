//! ep-tab: dense N-dimensional lookup tables for engine post-processing.
//!
//! Provides:
//! - Named, strictly increasing coordinate axes
//! - Dense tabulations over those axes, built from arrays or flat records
//! - Structural transforms: slice, squeeze, dimension insertion, reorder
//! - K-way concatenation of per-case sub-tables along one axis
//! - Multilinear interpolation with configurable out-of-bounds handling
//! - Flat record projection with CSV export, and a thin plot wrapper
//! - Multi-field table sets over a shared grid
//!
//! # Architecture
//!
//! A [`Tabulation`] is a pure value type: axes plus a dense sample array,
//! validated at construction so every table in circulation is consistent.
//! Transforms are free functions over that data model with a method veneer
//! (the [`TableOps`] trait), so single-field tables and multi-field
//! [`TableSet`]s share one implementation and behave identically under
//! slicing and access.
//!
//! # Example
//!
//! ```
//! use ep_tab::{Axis, RangeSpec, TableOps, Tabulation};
//!
//! let axes = vec![
//!     Axis::new("CA", vec![0.0, 1.0, 2.0]).unwrap(),
//!     Axis::new("p", vec![1.0, 2.0]).unwrap(),
//! ];
//! let table = Tabulation::from_flat(axes, vec![10.0, 11.0, 20.0, 21.0, 30.0, 31.0]).unwrap();
//!
//! let line = table
//!     .slice(&[("CA", RangeSpec::Point(1.0))])
//!     .and_then(|t| t.squeeze(Some(&["CA"])))
//!     .unwrap();
//! assert_eq!(line.values().collect::<Vec<_>>(), vec![20.0, 21.0]);
//! ```

pub mod axis;
pub mod concat;
pub mod error;
pub mod interp;
pub mod ops;
pub mod plot;
pub mod records;
pub mod table;
pub mod tableset;

// Re-exports for ergonomics
pub use axis::Axis;
pub use concat::concat;
pub use error::{TabError, TabResult};
pub use interp::OutOfBounds;
pub use ops::{RangeSpec, insert_dimension, reorder, slice, squeeze};
pub use records::Records;
pub use table::Tabulation;
pub use tableset::{TableOps, TableSet, concat_sets};
