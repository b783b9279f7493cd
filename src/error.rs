//! Error types for Afinar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Afinar operations.
///
/// Covers the failure modes of a hyperparameter search: malformed grids,
/// fold counts incompatible with the sample count, scoring failures inside
/// a (combination, fold) unit, and misaligned inputs.
///
/// # Examples
///
/// ```
/// use afinar::error::AfinarError;
///
/// let err = AfinarError::InsufficientData { k: 10, n_samples: 5 };
/// assert!(err.to_string().contains("10"));
/// ```
#[derive(Debug)]
pub enum AfinarError {
    /// Hyperparameter grid is malformed (empty, or a parameter with zero
    /// candidates). Surfaced before any fitting starts.
    InvalidGrid {
        /// What is wrong with the grid
        reason: String,
    },

    /// Fold count is incompatible with the number of training samples.
    InsufficientData {
        /// Requested fold count
        k: usize,
        /// Available training samples
        n_samples: usize,
    },

    /// A fitting or scoring failure inside one (combination, fold) unit.
    ///
    /// A single failing unit aborts the whole search; partial grids would
    /// produce misleading "best" selections.
    Scoring {
        /// The hyperparameter combination being evaluated
        params: String,
        /// Zero-based fold index where the failure occurred
        fold: usize,
        /// Underlying failure description
        message: String,
    },

    /// Feature/label shapes don't line up for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for AfinarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AfinarError::InvalidGrid { reason } => {
                write!(f, "Invalid hyperparameter grid: {reason}")
            }
            AfinarError::InsufficientData { k, n_samples } => {
                write!(
                    f,
                    "Insufficient data for {k}-fold cross-validation: {n_samples} samples"
                )
            }
            AfinarError::Scoring {
                params,
                fold,
                message,
            } => {
                write!(f, "Scoring failed for [{params}] on fold {fold}: {message}")
            }
            AfinarError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            AfinarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AfinarError {}

impl From<&str> for AfinarError {
    fn from(msg: &str) -> Self {
        AfinarError::Other(msg.to_string())
    }
}

impl From<String> for AfinarError {
    fn from(msg: String) -> Self {
        AfinarError::Other(msg)
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, AfinarError>;
