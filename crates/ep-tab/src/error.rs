use ep_core::CoreError;
use thiserror::Error;

pub type TabResult<T> = Result<T, TabError>;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("data shape {found:?} does not match axes {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("invalid axis '{axis}': {reason}")]
    InvalidAxis { axis: String, reason: String },

    #[error("no axis named '{axis}' in table")]
    AxisNotFound { axis: String },

    #[error("coordinate {value} not found on axis '{axis}'")]
    CoordinateNotFound { axis: String, value: f64 },

    #[error("range [{min}, {max}] selects no coordinates on axis '{axis}'")]
    EmptySelection { axis: String, min: f64, max: f64 },

    #[error("invalid operation: {what}")]
    InvalidOperation { what: String },

    #[error("axis '{axis}' already present in table")]
    DuplicateAxis { axis: String },

    #[error("axis mismatch between tables: {reason}")]
    AxisMismatch { reason: String },

    #[error("coordinate {value} on axis '{axis}' appears in more than one table")]
    OverlappingCoordinates { axis: String, value: f64 },

    #[error("value {value} outside axis '{axis}' span [{min}, {max}]")]
    OutOfRange {
        axis: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("inconsistent records: {reason}")]
    InconsistentRecords { reason: String },

    #[error("flat index {index} out of bounds for table of {len} samples")]
    IndexOob { index: usize, len: usize },

    #[error("grid index {index:?} out of bounds for table of shape {shape:?}")]
    GridIndexOob {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("field '{field}' already present in table set")]
    DuplicateField { field: String },

    #[error("no field named '{field}' in table set")]
    FieldNotFound { field: String },

    #[error("field mismatch between table sets: {reason}")]
    FieldMismatch { reason: String },

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bridge into the foundation error for callers working at the ep-core level.
impl From<TabError> for CoreError {
    fn from(err: TabError) -> Self {
        match err {
            TabError::IndexOob { index, len } => CoreError::IndexOob { index, len },
            other => CoreError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_axis() {
        let err = TabError::CoordinateNotFound {
            axis: "CA".to_string(),
            value: 0.25,
        };
        assert!(err.to_string().contains("CA"));
        assert!(err.to_string().contains("0.25"));
    }

    #[test]
    fn error_to_core_error() {
        let err = TabError::DuplicateAxis {
            axis: "p".to_string(),
        };
        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::InvalidArg { .. }));

        let err = TabError::IndexOob { index: 9, len: 4 };
        assert!(matches!(
            CoreError::from(err),
            CoreError::IndexOob { index: 9, len: 4 }
        ));
    }
}
