//! Read-only access to a workbook

use std::path::Path;

use report_sheets_core::Workbook;

use crate::context::Options;
use crate::cursor::Document;
use crate::error::Result;
use crate::navigate::{Navigable, SheetIterate};
use crate::read::Readable;

/// Iterates the rows of an opened workbook
///
/// ```rust
/// use report_sheets::prelude::*;
/// use report_sheets_core::{CellValue, Workbook};
///
/// # fn main() -> report_sheets::Result<()> {
/// let mut workbook = Workbook::new();
/// let sheet = workbook.worksheet_mut(0).unwrap();
/// sheet.set_value(0, 0, CellValue::text("Name"))?;
/// sheet.set_value(1, 0, CellValue::text("Ann"))?;
/// sheet.set_value(2, 0, CellValue::text("Bob"))?;
///
/// let mut reader = SheetReader::from_workbook(workbook);
/// reader.sheet(0)?.row(0)?;
/// let headers = reader.headers()?;
///
/// let mut names = Vec::new();
/// while let Some(row) = reader.next()? {
///     names.push(row.row_object(&headers)?);
/// }
/// assert_eq!(names.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SheetReader {
    pub(super) document: Document,
}

impl SheetReader {
    /// Open an `.xls` or `.xlsx` file; no sheet is selected
    pub fn open(path: impl AsRef<Path>, password: Option<&str>) -> Result<Self> {
        let workbook = super::open_workbook(path.as_ref(), password)?;
        Ok(Self::from_workbook(workbook))
    }

    pub fn from_workbook(workbook: Workbook) -> Self {
        Self::with_options(workbook, Options::default())
    }

    pub fn with_options(workbook: Workbook, options: Options) -> Self {
        Self {
            document: Document::new(workbook, options),
        }
    }
}

impl Readable for SheetReader {}

impl Navigable for SheetReader {}

impl SheetIterate for SheetReader {}
