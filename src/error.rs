//! Error types for cotejar operations.
//!
//! Load-time structural problems (missing required column, unreadable
//! source) are hard errors: the affected dataset becomes entirely absent to
//! the rest of the system. Expected-absence states during comparison
//! (unmatched keys, zero baselines, unnormalizable rows) are NOT errors;
//! they surface as `None` ratios and skip tallies instead.

use std::fmt;

/// Main error type for cotejar operations.
///
/// # Examples
///
/// ```
/// use cotejar::error::CotejarError;
///
/// let err = CotejarError::MissingColumn {
///     dataset: "cpp".to_string(),
///     column: "time".to_string(),
/// };
/// assert!(err.to_string().contains("time"));
/// ```
#[derive(Debug)]
pub enum CotejarError {
    /// A dataset lacks a column a requested operation needs.
    ///
    /// At load time this is raised for required columns and fails the whole
    /// dataset. At chart time it is raised once per call for the optional
    /// column the chart depends on.
    MissingColumn {
        /// Dataset name
        dataset: String,
        /// Column name
        column: String,
    },

    /// A source parsed to a header but no data rows.
    EmptyDataset {
        /// Dataset name
        dataset: String,
    },

    /// Malformed delimited data, or a required field that failed to parse.
    Csv(String),

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for CotejarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CotejarError::MissingColumn { dataset, column } => {
                write!(f, "Dataset '{dataset}' is missing column '{column}'")
            }
            CotejarError::EmptyDataset { dataset } => {
                write!(f, "Dataset '{dataset}' has no data rows")
            }
            CotejarError::Csv(msg) => write!(f, "CSV error: {msg}"),
            CotejarError::Io(e) => write!(f, "I/O error: {e}"),
            CotejarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CotejarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CotejarError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CotejarError {
    fn from(err: std::io::Error) -> Self {
        CotejarError::Io(err)
    }
}

impl From<csv::Error> for CotejarError {
    fn from(err: csv::Error) -> Self {
        CotejarError::Csv(err.to_string())
    }
}

impl From<&str> for CotejarError {
    fn from(msg: &str) -> Self {
        CotejarError::Other(msg.to_string())
    }
}

impl From<String> for CotejarError {
    fn from(msg: String) -> Self {
        CotejarError::Other(msg)
    }
}

impl CotejarError {
    /// Create a missing-column error with dataset context.
    #[must_use]
    pub fn missing_column(dataset: &str, column: &str) -> Self {
        Self::MissingColumn {
            dataset: dataset.to_string(),
            column: column.to_string(),
        }
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for CotejarError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, CotejarError>;
