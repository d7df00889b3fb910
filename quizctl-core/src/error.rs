/// Structured error types for quizctl-core.
///
/// Uses `thiserror` for better API surface and error composition.
/// The binary crate (quizctl-cli) can still use `anyhow` for convenience,
/// but library consumers get structured, composable errors.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for quizctl-core operations
#[derive(Error, Debug)]
pub enum QuizError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing failed
    #[error("JSON error in {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Input is not the expected shape (top-level JSON array of objects)
    #[error("Invalid format in file {path:?}: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Empty input file (nothing to import)
    #[error("Empty input file: {path:?}")]
    EmptyFile { path: PathBuf },

    /// A record element is not a JSON object
    #[error("Record {index}: {reason}")]
    Record { index: usize, reason: String },

    /// A record field has the wrong type
    #[error("Record {index}: field '{field}' {reason}")]
    RecordField {
        index: usize,
        field: &'static str,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for quizctl-core operations
pub type Result<T> = std::result::Result<T, QuizError>;

impl QuizError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid format error
    pub fn invalid_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an empty file error
    pub fn empty_file(path: impl Into<PathBuf>) -> Self {
        Self::EmptyFile { path: path.into() }
    }

    /// Create a record-level error
    pub fn record(index: usize, reason: impl Into<String>) -> Self {
        Self::Record {
            index,
            reason: reason.into(),
        }
    }

    /// Create a record field error
    pub fn record_field(index: usize, field: &'static str, reason: impl Into<String>) -> Self {
        Self::RecordField {
            index,
            field,
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
