use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("non-finite value in {context}: {value}")]
    NonFinite { context: &'static str, value: f64 },

    #[error("invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("index {index} out of bounds for length {len}")]
    IndexOob { index: usize, len: usize },
}
