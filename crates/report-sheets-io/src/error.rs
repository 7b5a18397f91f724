//! Codec error types

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while reading or writing workbook files
#[derive(Debug, Error)]
pub enum CodecError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading failed (includes encrypted workbooks)
    #[error("Read error: {0}")]
    Read(#[from] calamine::Error),

    /// Zip container error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Writing failed
    #[error("Write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// File extension is neither `.xls` nor `.xlsx`
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] report_sheets_core::Error),
}
