use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClusteringError>;

/// Errors raised by the clustering core.
///
/// All of these are precondition violations surfaced synchronously at the
/// point of the offending call; nothing is retried or recovered internally.
#[derive(Debug, Error, PartialEq)]
pub enum ClusteringError {
    /// An operation that requires at least one element, vector, or record
    /// received none.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Two vectors of different dimensions were compared or averaged.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// `assign` was called before any cluster exists.
    #[error("this model is not trained")]
    NotTrained,

    /// An invalid parameter was supplied at model creation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}
