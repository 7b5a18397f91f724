//! Error types for report-sheets-core

use thiserror::Error;

/// Result type alias for report-sheets-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the native workbook model
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid region format
    #[error("Invalid cell region: {0}")]
    InvalidRegion(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u16),

    /// Sheet index out of bounds
    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Sheet name breaks the naming rules
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Sheet name is already taken (case-insensitive)
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Defined name breaks the naming rules
    #[error("Invalid defined name: {0}")]
    InvalidName(String),

    /// Style handle does not belong to the style table
    #[error("Invalid style index: {0}")]
    InvalidStyleIndex(u32),

    /// Merged region overlaps one that is already registered
    #[error("Merged region {0} overlaps an existing merged region")]
    MergedRegionConflict(String),

    /// Row lies in the part of a windowed sheet already flushed
    #[error("Row {row} is already flushed (last flushed row: {last_flushed})")]
    RowFlushed { row: u32, last_flushed: u32 },

    /// Operation is not available for the sheet's storage mode
    #[error("Operation not supported in {0} storage mode")]
    UnsupportedInMode(&'static str),

    /// Spill file of flushed rows could not be written or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error with a message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
