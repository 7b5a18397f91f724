//! Engines: a document plus the capabilities that fit its storage
//!
//! | engine | storage | row copy |
//! |---|---|---|
//! | [`SheetWriter`] | full | native |
//! | [`StreamingWriter`] | windowed | cell by cell |
//! | [`Rewriter`] | full, opened from a file | native |
//! | [`SheetReader`] | full, opened from a file | none |

mod reader;
mod rewriter;
mod sheet_writer;
mod streaming;

pub use reader::SheetReader;
pub use rewriter::Rewriter;
pub use sheet_writer::SheetWriter;
pub use streaming::StreamingWriter;

use std::path::Path;

use report_sheets_core::Workbook;
use report_sheets_io::{FileFormat, ReadOptions, WorkbookReader};

use crate::error::{Error, Result};

macro_rules! document_handle {
    ($($engine:ty),+ $(,)?) => {
        $(
            impl $crate::cursor::DocumentHandle for $engine {
                fn document(&self) -> &$crate::cursor::Document {
                    &self.document
                }

                fn document_mut(&mut self) -> &mut $crate::cursor::Document {
                    &mut self.document
                }
            }
        )+
    };
}

document_handle!(SheetWriter, StreamingWriter, Rewriter, SheetReader);

/// Open an `.xls` or `.xlsx` file
fn open_workbook(path: &Path, password: Option<&str>) -> Result<Workbook> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    if FileFormat::from_path(path).is_err() {
        return Err(Error::UnsupportedFormat(path.display().to_string()));
    }
    let mut options = ReadOptions::default();
    if let Some(password) = password {
        options = options.with_password(password);
    }
    let workbook = WorkbookReader::read_file(path, &options)?;
    tracing::info!(
        path = %path.display(),
        sheets = workbook.sheet_count(),
        "workbook opened"
    );
    Ok(workbook)
}
