use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unterminated repeat group in role spec starting at position {position}")]
    UnterminatedGroup { position: usize },

    #[error("Invalid repeat count '{count}' in role spec at position {position}")]
    InvalidRepeatCount { count: String, position: usize },

    #[error("Unrecognized role tag '{tag}' at position {position}")]
    UnrecognizedRole { tag: char, position: usize },

    #[error("Role '{role}' assigned twice (columns {first} and {second})")]
    DuplicateRole { role: &'static str, first: usize, second: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Attribute count mismatch: expected {expected}, got {actual}")]
    AttributeCountMismatch { expected: usize, actual: usize },

    #[error("Usage error in {operation}: {reason}")]
    Usage { operation: &'static str, reason: String },

    #[error("Missing value in row {row}, column {column}")]
    MissingValue { row: usize, column: usize },

    #[error("Column {column} out of range for row {row} of width {width}")]
    ColumnOutOfRange { row: usize, column: usize, width: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Malformed role specs and invalid tokenizer/codebook settings.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnterminatedGroup { .. }
                | Error::InvalidRepeatCount { .. }
                | Error::UnrecognizedRole { .. }
                | Error::DuplicateRole { .. }
                | Error::InvalidConfig(_)
        )
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage { .. })
    }

    /// Problems with the row data itself rather than its description.
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            Error::MissingValue { .. } | Error::ColumnOutOfRange { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
