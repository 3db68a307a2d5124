//! Error types for network construction, evaluation and training.

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, NetworkError>;

#[derive(Error, Debug)]
pub enum NetworkError {
    /// A vector's length disagrees with the layer it is fed to or compared against.
    #[error("Dimension mismatch for {what}: expected length {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Parallel input and target lists differ in length.
    #[error("Length mismatch: {inputs} inputs but {targets} targets")]
    LengthMismatch { inputs: usize, targets: usize },

    /// A batch with no examples has no mean gradient.
    #[error("Batch contains no examples")]
    EmptyBatch,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetworkError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        NetworkError::InvalidConfiguration(message.into())
    }
}

/// Fails with a dimension mismatch unless `actual == expected`.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(NetworkError::DimensionMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Fails with a length mismatch unless both lists have the same length.
pub(crate) fn check_parallel(inputs: usize, targets: usize) -> Result<()> {
    if inputs != targets {
        return Err(NetworkError::LengthMismatch { inputs, targets });
    }
    Ok(())
}
