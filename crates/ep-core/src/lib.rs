//! ep-core: stable foundation for enginepost.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - sequence (strictly ascending grids: validation and ordered merges)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod sequence;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use sequence::*;
