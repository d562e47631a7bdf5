//! Error types for flowrouting

use thiserror::Error;

/// Main error type for flowrouting operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in grid of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown flow-direction algorithm: {0} (expected D8, DInf, MFD8, MFDmd or MFDInf)")]
    UnknownAlgorithm(String),

    #[error(
        "Unknown routing method: {0} (expected climate, surface_account, subsurface_account or full_account)"
    )]
    UnknownMethod(String),

    #[error("Queue overflow: capacity of {capacity} elements exhausted")]
    QueueOverflow { capacity: usize },

    #[error("Queue underflow: queue is empty")]
    QueueUnderflow,

    #[error("{routine} did not converge after {steps} refinement steps")]
    NoConvergence { routine: &'static str, steps: usize },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`].
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
}

/// Result type alias for flowrouting operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_offender() {
        let err = Error::UnknownAlgorithm("D16".into());
        assert!(err.to_string().contains("D16"));

        let err = Error::invalid_parameter("convergence", 12.5, "must lie in [1, 10]");
        let msg = err.to_string();
        assert!(msg.contains("convergence"));
        assert!(msg.contains("12.5"));
    }

    #[test]
    fn test_queue_overflow_reports_capacity() {
        let err = Error::QueueOverflow { capacity: 3 };
        assert!(err.to_string().contains('3'));
    }
}
