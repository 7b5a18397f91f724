//! Error types for report-sheets

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for cursor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the cursor layer
#[derive(Debug, Error)]
pub enum Error {
    /// Source document does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File extension not handled by the codecs
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Malformed range or address, too many dropdown items, empty password
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation needs a sheet, row, cell or style cache that is not set
    #[error("No {0} selected or configured")]
    MissingRequiredCollaborator(&'static str),

    /// Value cannot be read as the requested type
    #[error("Cannot coerce '{value}' to {target}")]
    CoercionFailure { value: String, target: &'static str },

    /// Native document model error
    #[error(transparent)]
    Document(#[from] report_sheets_core::Error),

    /// Codec error
    #[error(transparent)]
    Codec(#[from] report_sheets_io::CodecError),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn coercion(value: impl ToString, target: &'static str) -> Self {
        Error::CoercionFailure {
            value: value.to_string(),
            target,
        }
    }
}
