//! Error types for the shelf_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for shelf_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An equal publication is already in the catalog
    #[error("Publication already exists: {0}")]
    DuplicateRecord(String),

    /// A user with the same first and last name is already registered
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    /// The backing store could not be read at all
    #[error("Data import failed: {0}")]
    DataImport(String),

    /// The backing store was read but holds a malformed record
    #[error("Invalid data at line {line}: {reason}")]
    InvalidData { line: usize, reason: String },

    /// The catalog could not be written to the backing store
    #[error("Data export failed: {0}")]
    DataExport(String),

    /// A text field holds `;` or a line break and cannot be written as a row
    #[error("Field cannot be stored: {0:?}")]
    UnstorableField(String),

    /// Console input was not in the expected shape
    #[error("Input format error: {0}")]
    InputFormat(String),

    /// Menu option id with no matching command
    #[error("No command with id {0}")]
    UnknownCommand(i64),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the input source has been closed (EOF on stdin)
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }

    /// True for the two import failures that callers recover from
    /// by starting with an empty catalog
    pub fn is_recoverable_import(&self) -> bool {
        matches!(self, Error::DataImport(_) | Error::InvalidData { .. })
    }
}
