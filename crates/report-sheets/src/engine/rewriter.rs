//! Editing an existing workbook in place

use std::path::Path;

use report_sheets_core::Workbook;

use crate::context::Options;
use crate::copy::{native_copy, Copyable};
use crate::cursor::Document;
use crate::error::Result;
use crate::navigate::{Navigable, SheetIterate};
use crate::read::Readable;
use crate::sheet::SheetWritable;
use crate::write::Writable;

/// Reads and rewrites an opened workbook
///
/// Navigation only selects what exists: use [`SheetWritable::row_of_new`]
/// and [`SheetWritable::cell_of_new`] to create rows and cells. Writing to
/// an absent cell of an existing row creates it.
#[derive(Debug)]
pub struct Rewriter {
    pub(super) document: Document,
}

impl Rewriter {
    /// Open an `.xls` or `.xlsx` file; no sheet is selected
    pub fn open(path: impl AsRef<Path>, options: Options, password: Option<&str>) -> Result<Self> {
        let workbook = super::open_workbook(path.as_ref(), password)?;
        Ok(Self::from_workbook(workbook, options))
    }

    pub fn from_workbook(workbook: Workbook, options: Options) -> Self {
        Self {
            document: Document::new(workbook, options),
        }
    }

    pub fn into_workbook(self) -> Workbook {
        self.document.into_workbook()
    }
}

impl Readable for Rewriter {}

impl Navigable for Rewriter {}

impl SheetIterate for Rewriter {}

impl Writable for Rewriter {}

impl SheetWritable for Rewriter {}

impl Copyable for Rewriter {
    fn copy_block(&mut self, from_start: u32, from_end: u32, to: u32, repeat: u32) -> Result<&mut Self> {
        native_copy(&mut self.document, from_start, from_end, to, repeat)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use report_sheets_core::CellValue;

    fn workbook() -> Workbook {
        let mut workbook = Workbook::new();
        let sheet = workbook.worksheet_mut(0).unwrap();
        sheet.set_value(0, 0, CellValue::text("Name")).unwrap();
        sheet.set_value(1, 0, CellValue::text("Ann")).unwrap();
        workbook
    }

    #[test]
    fn test_open_missing_file() {
        let err = Rewriter::open("no/such/file.xlsx", Options::default(), None).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_open_rejects_other_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b").unwrap();
        let err = Rewriter::open(&path, Options::default(), None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_select_only_navigation() {
        let mut rewriter = Rewriter::from_workbook(workbook(), Options::default());
        assert!(!rewriter.has_sheet());
        rewriter.sheet(0).unwrap().row(5).unwrap().cell(0).unwrap();
        assert!(rewriter.is_null());
        assert!(rewriter.document.worksheet().unwrap().row(5).is_none());

        rewriter.row(1).unwrap().cell(0).unwrap();
        assert_eq!(rewriter.string_value().as_deref(), Some("Ann"));
        rewriter.write_text(Some("Bob")).unwrap();
        assert_eq!(rewriter.string_value().as_deref(), Some("Bob"));
    }
}
