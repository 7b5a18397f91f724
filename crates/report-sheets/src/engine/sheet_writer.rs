//! Writer over a fully addressable workbook

use report_sheets_core::{StorageMode, Workbook};

use crate::context::Options;
use crate::copy::{native_copy, Copyable};
use crate::cursor::Document;
use crate::error::Result;
use crate::navigate::Navigable;
use crate::read::Readable;
use crate::sheet::SheetWritable;
use crate::write::Writable;

/// Random-access writer
///
/// Selecting a row or cell creates it. Rows are copied natively, shifting
/// every relative reference of copied formulas.
///
/// ```rust
/// use report_sheets::prelude::*;
///
/// # fn main() -> report_sheets::Result<()> {
/// let mut writer = SheetWriter::new("Report", Options::default())?;
/// writer
///     .row(0)?
///     .cell_at(Column::A)?
///     .write_number(Some(100.0))?
///     .cell_at(Column::B)?
///     .write_formula(Some("A1*2"))?
///     .copy_to_next()?;
///
/// assert_eq!(writer.row(1)?.cell(1)?.formula().as_deref(), Some("A2*2"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SheetWriter {
    pub(super) document: Document,
}

impl SheetWriter {
    /// New workbook with a single sheet, selected
    pub fn new(sheet_name: &str, options: Options) -> Result<Self> {
        let mut workbook = Workbook::with_mode(StorageMode::Full);
        workbook.add_worksheet_with_name(sheet_name)?;
        Ok(Self::from_workbook(workbook, options))
    }

    /// Write into an existing workbook; its first sheet is selected
    pub fn from_workbook(workbook: Workbook, options: Options) -> Self {
        let has_sheet = workbook.sheet_count() > 0;
        let mut document = Document::new(workbook, options);
        if has_sheet {
            document.cursor_mut().select_sheet(0);
        }
        Self { document }
    }

    pub fn into_workbook(self) -> Workbook {
        self.document.into_workbook()
    }
}

impl Readable for SheetWriter {}

impl Navigable for SheetWriter {
    fn row(&mut self, index: u32) -> Result<&mut Self> {
        self.row_of_new(index)
    }

    fn cell(&mut self, col: u16) -> Result<&mut Self> {
        self.cell_of_new(col)
    }
}

impl Writable for SheetWriter {}

impl SheetWritable for SheetWriter {}

impl Copyable for SheetWriter {
    fn copy_block(&mut self, from_start: u32, from_end: u32, to: u32, repeat: u32) -> Result<&mut Self> {
        native_copy(&mut self.document, from_start, from_end, to, repeat)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Column;
    use pretty_assertions::assert_eq;
    use report_sheets_core::CellValue;

    #[test]
    fn test_new_selects_sheet() {
        let writer = SheetWriter::new("Report", Options::default()).unwrap();
        assert!(writer.has_sheet());
        assert_eq!(writer.sheet_name().unwrap(), "Report");
        assert_eq!(writer.sheet_count(), 1);
    }

    #[test]
    fn test_row_and_cell_are_created() {
        let mut writer = SheetWriter::new("Report", Options::default()).unwrap();
        writer.row(3).unwrap().cell_at(Column::C).unwrap().write_text(Some("x")).unwrap();
        let sheet = writer.document.worksheet().unwrap();
        assert_eq!(sheet.cell(3, 2).unwrap().value, CellValue::text("x"));
        assert_eq!(writer.row_index(), 3);
        assert_eq!(writer.rownum(), 4);
    }

    #[test]
    fn test_copy_keeps_cursor() {
        let mut writer = SheetWriter::new("Report", Options::default()).unwrap();
        writer.row(0).unwrap().cell(0).unwrap().write_number(Some(1.0)).unwrap();
        writer.copy_repeat(0, 2, 2).unwrap();
        assert_eq!(writer.row_index(), 0);
        let sheet = writer.document.worksheet().unwrap();
        assert_eq!(sheet.cell(2, 0).unwrap().value, CellValue::Number(1.0));
        assert_eq!(sheet.cell(3, 0).unwrap().value, CellValue::Number(1.0));
        assert!(sheet.row(1).is_none());
    }
}
