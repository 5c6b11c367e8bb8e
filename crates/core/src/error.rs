//! Error types for medvis

use thiserror::Error;

/// Main error type for medvis operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Wrong shape, empty array, or non-finite values where they are not permitted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Zero range, variance or IQR breaks the precondition of an operation
    #[error("Degenerate range in {operation}: {reason}")]
    DegenerateRange {
        operation: &'static str,
        reason: String,
    },

    #[error("Unsupported {kind} method: '{name}'")]
    UnsupportedMethod { kind: &'static str, name: String },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("No local maxima above {threshold} with separation > {min_distance} voxels")]
    NoSeedsFound { threshold: f64, min_distance: usize },

    #[error("Signal has {available} samples, at least {required} are required")]
    InsufficientSamples { required: usize, available: usize },

    #[error("Index out of bounds: {index:?} in volume of shape {shape:?}")]
    IndexOutOfBounds {
        index: (usize, usize, usize),
        shape: (usize, usize, usize),
    },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`]
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::DegenerateRange`]
    pub fn degenerate(operation: &'static str, reason: impl Into<String>) -> Self {
        Error::DegenerateRange {
            operation,
            reason: reason.into(),
        }
    }
}

impl From<ndarray::ShapeError> for Error {
    fn from(e: ndarray::ShapeError) -> Self {
        Error::Other(e.to_string())
    }
}

/// Result type alias for medvis operations
pub type Result<T> = std::result::Result<T, Error>;
