//! Cursor state and the document an engine works on

use report_sheets_core::{
    CellData, CellRegion, StyleId, StyleTable, Workbook, Worksheet,
};

use crate::context::Options;
use crate::error::{Error, Result};
use crate::read::CellReader;
use crate::style_cache::StyleCache;

/// What the cursor currently points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    NoSheet,
    SheetSelected,
    RowSelected,
    CellSelected,
}

/// Sheet, row and cell selection of one engine
///
/// `row_index` is where the cursor stands even when no row exists there;
/// `row` is only set when the row exists (or was created). Selecting a
/// sheet clears the row and cell and resets `row_index` to 0; selecting a
/// row clears the cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    sheet: Option<usize>,
    row_index: u32,
    row: Option<u32>,
    cell: Option<u16>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_sheet(&mut self, index: usize) {
        self.sheet = Some(index);
        self.row_index = 0;
        self.row = None;
        self.cell = None;
    }

    /// Stand on `index`; the row counts as selected only when it `exists`
    pub fn select_row(&mut self, index: u32, exists: bool) {
        self.row_index = index;
        self.row = exists.then_some(index);
        self.cell = None;
    }

    /// Select a column of the current row; without a row nothing is selected
    pub fn select_cell(&mut self, col: u16) {
        self.cell = self.row.map(|_| col);
    }

    pub fn clear_row(&mut self) {
        self.row = None;
        self.cell = None;
    }

    pub fn set_row_index(&mut self, index: u32) {
        self.row_index = index;
    }

    pub fn sheet(&self) -> Option<usize> {
        self.sheet
    }

    pub fn row_index(&self) -> u32 {
        self.row_index
    }

    pub fn row(&self) -> Option<u32> {
        self.row
    }

    pub fn cell(&self) -> Option<u16> {
        self.cell
    }

    pub fn state(&self) -> CursorState {
        match (self.sheet, self.row, self.cell) {
            (None, _, _) => CursorState::NoSheet,
            (Some(_), None, _) => CursorState::SheetSelected,
            (Some(_), Some(_), None) => CursorState::RowSelected,
            (Some(_), Some(_), Some(_)) => CursorState::CellSelected,
        }
    }
}

/// A workbook plus the cursor, style cache and options of its engine
#[derive(Debug)]
pub struct Document {
    workbook: Workbook,
    cursor: Cursor,
    style_cache: Option<StyleCache>,
    options: Options,
}

impl Document {
    pub fn new(workbook: Workbook, options: Options) -> Self {
        Self {
            workbook,
            cursor: Cursor::new(),
            style_cache: None,
            options,
        }
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }

    pub fn into_workbook(self) -> Workbook {
        self.workbook
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn style_cache(&self) -> Option<&StyleCache> {
        self.style_cache.as_ref()
    }

    pub fn set_style_cache(&mut self, cache: StyleCache) {
        self.style_cache = Some(cache);
    }

    // === Selection ===

    pub fn sheet_index(&self) -> Result<usize> {
        self.cursor
            .sheet()
            .ok_or(Error::MissingRequiredCollaborator("sheet"))
    }

    pub fn worksheet(&self) -> Result<&Worksheet> {
        let index = self.sheet_index()?;
        self.workbook
            .worksheet(index)
            .ok_or_else(|| sheet_gone(index, self.workbook.sheet_count()))
    }

    pub fn worksheet_mut(&mut self) -> Result<&mut Worksheet> {
        let index = self.sheet_index()?;
        let count = self.workbook.sheet_count();
        self.workbook
            .worksheet_mut(index)
            .ok_or_else(|| sheet_gone(index, count))
    }

    /// The selected sheet and the workbook's style table
    pub fn sheet_and_styles_mut(&mut self) -> Result<(&mut Worksheet, &mut StyleTable)> {
        let index = self.sheet_index()?;
        let count = self.workbook.sheet_count();
        self.workbook
            .sheet_and_styles_mut(index)
            .ok_or_else(|| sheet_gone(index, count))
    }

    /// Index of the selected, existing row
    pub fn row_index(&self) -> Result<u32> {
        self.cursor
            .row()
            .ok_or(Error::MissingRequiredCollaborator("row"))
    }

    /// Row and column of the selected cell
    pub fn address(&self) -> Result<(u32, u16)> {
        let row = self.row_index()?;
        let col = self
            .cursor
            .cell()
            .ok_or(Error::MissingRequiredCollaborator("cell"))?;
        Ok((row, col))
    }

    /// The selected cell, if it exists
    pub fn current_cell(&self) -> Option<&CellData> {
        let (row, col) = self.address().ok()?;
        self.worksheet().ok()?.cell(row, col)
    }

    /// The selected cell, created when missing
    pub fn current_cell_mut(&mut self) -> Result<&mut CellData> {
        let (row, col) = self.address()?;
        Ok(self.worksheet_mut()?.cell_or_create(row, col)?)
    }

    /// The selected cell (created when missing) with the style table
    pub fn current_cell_and_styles_mut(&mut self) -> Result<(&mut CellData, &mut StyleTable)> {
        let (row, col) = self.address()?;
        let (sheet, styles) = self.sheet_and_styles_mut()?;
        Ok((sheet.cell_or_create(row, col)?, styles))
    }

    /// Single-cell region of the selected cell
    pub fn current_region(&self) -> Result<CellRegion> {
        let (row, col) = self.address()?;
        Ok(CellRegion::single(row, col))
    }

    // === Reading ===

    /// Reader over the selected cell
    pub fn reader(&self) -> CellReader<'_> {
        match self.address() {
            Ok((row, col)) => self.reader_at(row, col),
            Err(_) => CellReader::empty(self.workbook.styles()),
        }
    }

    /// Reader over any cell of the selected sheet
    pub fn reader_at(&self, row: u32, col: u16) -> CellReader<'_> {
        match self.worksheet() {
            Ok(sheet) => CellReader::new(
                sheet.cell(row, col),
                sheet.comment(row, col),
                self.workbook.styles(),
                row,
            )
            .with_date_pattern(&self.options.date_pattern),
            Err(_) => CellReader::empty(self.workbook.styles()),
        }
    }

    // === Styles ===

    /// Destination handle of a source style, through the style cache
    pub fn cloned_style(&mut self, index: u32) -> Result<Option<StyleId>> {
        let cache = self
            .style_cache
            .as_mut()
            .ok_or(Error::MissingRequiredCollaborator("style cache"))?;
        Ok(cache.clone_style(self.workbook.styles_mut(), index))
    }
}

fn sheet_gone(index: usize, count: usize) -> Error {
    Error::Document(report_sheets_core::Error::SheetOutOfBounds(index, count))
}

/// Access to the engine's document; every capability trait builds on it
pub trait DocumentHandle {
    fn document(&self) -> &Document;

    fn document_mut(&mut self) -> &mut Document;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_transitions() {
        let mut cursor = Cursor::new();
        assert_eq!(cursor.state(), CursorState::NoSheet);

        cursor.select_sheet(0);
        assert_eq!(cursor.state(), CursorState::SheetSelected);

        cursor.select_cell(2);
        assert_eq!(cursor.cell(), None);

        cursor.select_row(4, true);
        cursor.select_cell(2);
        assert_eq!(cursor.state(), CursorState::CellSelected);

        cursor.select_row(5, false);
        assert_eq!(cursor.state(), CursorState::SheetSelected);
        assert_eq!(cursor.row_index(), 5);

        cursor.select_sheet(1);
        assert_eq!(cursor.row_index(), 0);
        assert_eq!(cursor.row(), None);
    }

    #[test]
    fn test_missing_selection_errors() {
        let document = Document::new(Workbook::new(), Options::default());
        assert!(matches!(
            document.worksheet(),
            Err(Error::MissingRequiredCollaborator("sheet"))
        ));
        assert!(document.current_cell().is_none());
        assert!(document.reader().is_null());
    }

    #[test]
    fn test_cloned_style_needs_cache() {
        let mut document = Document::new(Workbook::new(), Options::default());
        assert!(matches!(
            document.cloned_style(1),
            Err(Error::MissingRequiredCollaborator("style cache"))
        ));
        document.set_style_cache(StyleCache::new(None));
        assert_eq!(document.cloned_style(1).unwrap(), None);
    }
}
