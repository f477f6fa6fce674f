//! Error types for the bid index.

use thiserror::Error;

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that can occur while building or querying the index
///
/// A missing id is never an error: lookups return `None` and removals of
/// absent ids are no-ops.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Record failed validation before insertion
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Record id already present and the duplicate policy rejects it
    #[error("Duplicate bid id '{0}'")]
    DuplicateKey(String),

    /// Amount column could not be turned into a non-negative number
    #[error("Invalid amount: {value:?}")]
    InvalidAmount { value: String },

    /// CSV row is shorter than the configured layout requires
    #[error("Line {line}: missing column {column}")]
    MissingColumn { line: u64, column: usize },

    /// CSV framing or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error from the underlying file system
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexError {
    /// Create an invalid record error with a message
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Create an invalid amount error for the raw column text
    pub fn invalid_amount(value: impl Into<String>) -> Self {
        Self::InvalidAmount {
            value: value.into(),
        }
    }

    /// Whether this error only concerns a single row of input
    ///
    /// Row-level errors make the loader skip the row, anything else aborts.
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRecord(_)
                | Self::DuplicateKey(_)
                | Self::InvalidAmount { .. }
                | Self::MissingColumn { .. }
        )
    }
}
