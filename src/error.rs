use thiserror::Error;

/// Result type for birdshot operations
pub type Result<T> = std::result::Result<T, BirdshotError>;

/// Main error type for the birdshot trainer
#[derive(Debug, Error)]
pub enum BirdshotError {
    /// Invalid parameter value, reported before training starts
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A coordinate line that is not exactly two numbers
    #[error("Malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// More targets than a fixed-size representation can hold
    #[error("Too many targets: {count} exceeds the maximum of {max}")]
    TooManyTargets { count: usize, max: usize },

    /// Empty buffer or container
    #[error("Empty buffer: {0}")]
    EmptyBuffer(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper functions for common error patterns
impl BirdshotError {
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        BirdshotError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        BirdshotError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
