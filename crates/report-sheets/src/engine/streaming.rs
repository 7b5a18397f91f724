//! Writer that keeps only a window of recent rows in memory

use report_sheets_core::{StorageMode, Workbook};

use crate::context::Options;
use crate::copy::{manual_copy, Copyable};
use crate::cursor::Document;
use crate::error::Result;
use crate::navigate::Navigable;
use crate::read::Readable;
use crate::sheet::SheetWritable;
use crate::write::Writable;

/// Windowed writer for large reports
///
/// Only the last [`Options::window_size`] rows stay addressable; older rows
/// are flushed and can no longer be read, copied or rewritten. Rows are
/// copied cell by cell, and formulas only move references to the source row.
#[derive(Debug)]
pub struct StreamingWriter {
    pub(super) document: Document,
}

impl StreamingWriter {
    /// New windowed workbook with a single sheet, selected
    pub fn new(sheet_name: &str, options: Options) -> Result<Self> {
        let mut workbook = Workbook::with_mode(StorageMode::windowed(options.window_size));
        workbook.add_worksheet_with_name(sheet_name)?;
        let mut document = Document::new(workbook, options);
        document.cursor_mut().select_sheet(0);
        Ok(Self { document })
    }

    pub fn into_workbook(self) -> Workbook {
        self.document.into_workbook()
    }
}

impl Readable for StreamingWriter {}

impl Navigable for StreamingWriter {
    fn row(&mut self, index: u32) -> Result<&mut Self> {
        self.row_of_new(index)
    }

    fn cell(&mut self, col: u16) -> Result<&mut Self> {
        self.cell_of_new(col)
    }
}

impl Writable for StreamingWriter {}

impl SheetWritable for StreamingWriter {}

impl Copyable for StreamingWriter {
    fn copy_block(&mut self, from_start: u32, from_end: u32, to: u32, repeat: u32) -> Result<&mut Self> {
        manual_copy(&mut self.document, from_start, from_end, to, repeat)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use report_sheets_core::CellValue;

    #[test]
    fn test_rows_outside_window_are_flushed() {
        let options = Options::default().with_window_size(2);
        let mut writer = StreamingWriter::new("Data", options).unwrap();
        for i in 0..5 {
            writer.row(i).unwrap().cell(0).unwrap().write_number(Some(f64::from(i))).unwrap();
        }
        let rows = writer.document.worksheet().unwrap().rows();
        assert!(rows.is_flushed(0));
        assert!(!rows.is_flushed(4));
    }

    #[test]
    fn test_flushed_rows_leave_memory_and_are_saved() {
        let options = Options::default().with_window_size(10);
        let mut writer = StreamingWriter::new("Data", options).unwrap();
        for i in 0..500 {
            writer.row(i).unwrap().cell(0).unwrap().write_number(Some(f64::from(i))).unwrap();
            writer.cell(1).unwrap().write_text(Some("item")).unwrap();
            let rows = writer.document.worksheet().unwrap().rows();
            assert!(rows.live_count() <= 10);
        }
        let rows = writer.document.worksheet().unwrap().rows();
        assert_eq!(rows.flushed_count(), 490);

        let dir = tempfile::tempdir().unwrap();
        let path = writer.save_workbook(dir.path().join("large.xlsx")).unwrap();
        let mut reader = crate::engine::SheetReader::open(&path, None).unwrap();
        reader.sheet(0).unwrap().row(0).unwrap().cell(0).unwrap();
        assert_eq!(reader.number_or_zero(), rust_decimal::Decimal::ZERO);
        assert!(reader.number_value().unwrap().is_some());
        reader.row(499).unwrap().cell(1).unwrap();
        assert_eq!(reader.string_value().as_deref(), Some("item"));
    }

    #[test]
    fn test_copy_of_flushed_row_fails() {
        let options = Options::default().with_window_size(2);
        let mut writer = StreamingWriter::new("Data", options).unwrap();
        for i in 0..5 {
            writer.row(i).unwrap().cell(0).unwrap().write_text(Some("x")).unwrap();
        }
        let err = writer.copy(0, 10).unwrap_err();
        assert!(matches!(
            err,
            Error::Document(report_sheets_core::Error::RowFlushed { row: 0, .. })
        ));
    }

    #[test]
    fn test_manual_copy_shifts_own_row() {
        let mut writer = StreamingWriter::new("Data", Options::default()).unwrap();
        writer
            .row(0)
            .unwrap()
            .cell(0)
            .unwrap()
            .write_formula(Some("B1+C1"))
            .unwrap();
        writer.copy(0, 4).unwrap();
        let sheet = writer.document.worksheet().unwrap();
        assert_eq!(sheet.cell(4, 0).unwrap().value, CellValue::formula("B5+C5"));
    }
}
