//! Sheet, row and cell navigation plus row iteration

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use report_sheets_core::{column_to_letters, CellKind};

use crate::coordinate::{Column, Position};
use crate::cursor::DocumentHandle;
use crate::entity::{Cell, DataType, Row};
use crate::error::{Error, Result};
use crate::read::Readable;
use crate::rownum::Rownum;

/// Moving the cursor between sheets, rows and cells
///
/// Selecting a row that does not exist leaves the cursor standing on its
/// index with no row selected; reads then answer null. Writer engines
/// override [`Navigable::row`] and [`Navigable::cell`] to create what they
/// select.
pub trait Navigable: DocumentHandle {
    /// Select a sheet by position
    fn sheet(&mut self, index: usize) -> Result<&mut Self> {
        let document = self.document_mut();
        let count = document.workbook().sheet_count();
        if index >= count {
            return Err(report_sheets_core::Error::SheetOutOfBounds(index, count).into());
        }
        document.cursor_mut().select_sheet(index);
        Ok(self)
    }

    /// Select a sheet by name
    fn sheet_by_name(&mut self, name: &str) -> Result<&mut Self> {
        let index = self
            .document()
            .workbook()
            .sheet_index(name)
            .ok_or_else(|| report_sheets_core::Error::SheetNotFound(name.to_string()))?;
        self.sheet(index)
    }

    /// Stand on a row, selecting it when it exists
    fn row(&mut self, index: u32) -> Result<&mut Self> {
        let document = self.document_mut();
        let exists = document.worksheet()?.row(index).is_some();
        document.cursor_mut().select_row(index, exists);
        Ok(self)
    }

    fn row_at(&mut self, rownum: &Rownum) -> Result<&mut Self> {
        self.row(rownum.index())
    }

    /// Select a column of the current row
    fn cell(&mut self, col: u16) -> Result<&mut Self> {
        self.document_mut().cursor_mut().select_cell(col);
        Ok(self)
    }

    fn cell_at(&mut self, column: Column) -> Result<&mut Self> {
        self.cell(column.ordinal())
    }

    fn cell_at_position(&mut self, position: &Position) -> Result<&mut Self> {
        let col = position.column_u16()?;
        self.row(position.row_index())?.cell(col)
    }

    /// Run a block against the engine, then carry on chaining
    fn execute<F>(&mut self, action: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        action(self)?;
        Ok(self)
    }

    // === Position ===

    fn has_sheet(&self) -> bool {
        self.document().cursor().sheet().is_some()
    }

    /// Error unless a sheet is selected
    fn require_sheet(&self) -> Result<&Self> {
        if self.has_sheet() {
            Ok(self)
        } else {
            Err(Error::MissingRequiredCollaborator("sheet"))
        }
    }

    fn row_index(&self) -> u32 {
        self.document().cursor().row_index()
    }

    fn next_row_index(&self) -> u32 {
        self.row_index() + 1
    }

    fn rownum(&self) -> u32 {
        self.row_index() + 1
    }

    fn next_rownum(&self) -> u32 {
        self.row_index() + 2
    }

    /// Move the row index without selecting the row
    fn set_row_index(&mut self, index: u32) -> &mut Self {
        self.document_mut().cursor_mut().set_row_index(index);
        self
    }

    /// Move the row index forward by `count`
    fn skip(&mut self, count: u32) -> &mut Self {
        let index = self.row_index().saturating_add(count);
        self.set_row_index(index)
    }

    // === Sheet contents ===

    /// Native kind of every cell in the selected row
    fn cell_types(&self) -> Result<BTreeMap<u16, CellKind>> {
        let document = self.document();
        let index = document.row_index()?;
        let row = document
            .worksheet()?
            .row(index)
            .ok_or(Error::MissingRequiredCollaborator("row"))?;
        Ok(row.cells().map(|(col, cell)| (col, cell.value.kind())).collect())
    }

    /// Every comment of the selected sheet, keyed by address
    fn comments(&self) -> Result<IndexMap<String, String>> {
        let sheet = self.document().worksheet()?;
        Ok(sheet
            .comments()
            .map(|((row, col), comment)| {
                let address = format!("{}{}", column_to_letters(u32::from(col)), row + 1);
                (address, comment.text.clone())
            })
            .collect())
    }

    /// Save the workbook with the configured permission bits
    fn save_workbook(&self, path: impl AsRef<Path>) -> Result<PathBuf>
    where
        Self: Sized,
    {
        let document = self.document();
        let saved = report_sheets_io::save_with_mode(
            document.workbook(),
            path.as_ref(),
            document.options().file_mode,
        )?;
        tracing::info!(path = %saved.display(), "workbook saved");
        Ok(saved)
    }

    // === Sheets ===

    fn is_hidden_sheet(&self, index: usize) -> Result<bool> {
        let workbook = self.document().workbook();
        workbook
            .worksheet(index)
            .map(|sheet| !sheet.is_visible())
            .ok_or_else(|| {
                report_sheets_core::Error::SheetOutOfBounds(index, workbook.sheet_count()).into()
            })
    }

    fn sheet_count(&self) -> usize {
        self.document().workbook().sheet_count()
    }

    fn sheet_index(&self) -> Result<usize> {
        self.document().sheet_index()
    }

    fn sheet_name(&self) -> Result<&str> {
        Ok(self.document().worksheet()?.name())
    }

    /// Make the selected sheet the active tab
    fn select_active_sheet(&mut self) -> Result<&mut Self> {
        let index = self.document().sheet_index()?;
        self.select_active_sheet_at(index)
    }

    fn select_active_sheet_at(&mut self, index: usize) -> Result<&mut Self> {
        self.document_mut().workbook_mut().set_active_sheet(index)?;
        Ok(self)
    }

    fn select_active_sheet_by_name(&mut self, name: &str) -> Result<&mut Self> {
        let index = self
            .document()
            .workbook()
            .sheet_index(name)
            .ok_or_else(|| report_sheets_core::Error::SheetNotFound(name.to_string()))?;
        self.select_active_sheet_at(index)
    }

    /// Release the engine and its workbook
    fn close(self)
    where
        Self: Sized,
    {
        log::debug!("closing workbook");
    }
}

/// Walking the rows of a sheet
///
/// [`SheetIterate::next`] moves one row down, skipping rows that were never
/// written, and answers `None` once past the last row. The row readers read
/// columns of the selected row without moving the cursor.
pub trait SheetIterate: Navigable + Readable {
    /// Index of the last row of the sheet, `None` for an empty sheet
    fn last_row_index(&self) -> Result<Option<u32>> {
        Ok(self.document().worksheet()?.last_row_index())
    }

    /// True once the row index is past the last row
    fn has_end(&self) -> Result<bool> {
        Ok(match self.last_row_index()? {
            Some(last) => self.row_index() > last,
            None => true,
        })
    }

    /// Advance to the next existing row
    fn next(&mut self) -> Result<Option<&mut Self>> {
        loop {
            let index = self.row_index() + 1;
            self.set_row_index(index);
            if self.has_end()? {
                return Ok(None);
            }
            self.row(index)?;
            if self.document().cursor().row().is_some() {
                return Ok(Some(self));
            }
        }
    }

    fn has_next(&mut self) -> Result<bool> {
        Ok(self.next()?.is_some())
    }

    /// Like [`SheetIterate::has_next`]; `ending` receives the last row index
    /// once the rows run out
    fn has_next_or<F>(&mut self, ending: F) -> Result<bool>
    where
        F: FnOnce(u32),
    {
        if self.next()?.is_some() {
            return Ok(true);
        }
        ending(self.row_index().saturating_sub(1));
        Ok(false)
    }

    /// Trimmed, non-blank labels of the selected row
    fn headers(&self) -> Result<Vec<Cell>> {
        let document = self.document();
        let index = document.row_index()?;
        let width = last_cell_num(self)?;
        let mut headers = Vec::new();
        for col in 0..width {
            let reader = document.reader_at(index, col);
            let Some(label) = reader.string_value() else {
                continue;
            };
            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            let mut header = Cell::new()
                .with_index(u32::from(col))
                .with_label(label)
                .with_type(DataType::Text);
            header.sindex = reader.style_index();
            headers.push(header);
        }
        Ok(headers)
    }

    /// Label to column index; a repeated label keeps its last column
    fn map_headers(&self) -> Result<IndexMap<String, u16>> {
        let document = self.document();
        let index = document.row_index()?;
        let mut map = IndexMap::new();
        for col in 0..last_cell_num(self)? {
            let label = document.reader_at(index, col).string_of_empty();
            map.insert(label.trim().to_string(), col);
        }
        map.shift_remove("");
        Ok(map)
    }

    /// Text of each header column, keyed by the header's index
    fn row_object(&self, headers: &[Cell]) -> Result<Row> {
        let document = self.document();
        let index = document.row_index()?;
        let mut row = Row::new();
        for header in headers {
            let col = header_column(header)?;
            let mut cell = Cell::new();
            cell.text = document.reader_at(index, col).string_value();
            row.add_cell_at(u32::from(col), Some(cell));
        }
        Ok(row)
    }

    /// Text of each mapped column, keyed by label
    fn row_object_by_map(&self, headers: &IndexMap<String, u16>) -> Result<IndexMap<String, Option<String>>> {
        let document = self.document();
        let index = document.row_index()?;
        Ok(headers
            .iter()
            .map(|(label, col)| (label.clone(), document.reader_at(index, *col).string_value()))
            .collect())
    }

    /// Text of every column of the selected row, keyed by column index
    fn row_object_indexed(&self) -> Result<IndexMap<u16, Option<String>>> {
        let document = self.document();
        let index = document.row_index()?;
        Ok((0..last_cell_num(self)?)
            .map(|col| (col, document.reader_at(index, col).string_value()))
            .collect())
    }

    /// JSON object of the header columns, keyed by alias or label
    ///
    /// Columns with no value are left out.
    fn row_json_object(&self, headers: &[Cell]) -> Result<Value> {
        let document = self.document();
        let index = document.row_index()?;
        let mut object = serde_json::Map::new();
        for header in headers {
            let col = header_column(header)?;
            let Some(key) = header.key() else {
                continue;
            };
            if let Some(value) = document.reader_at(index, col).value(false) {
                object.insert(key.to_string(), value);
            }
        }
        Ok(Value::Object(object))
    }
}

/// One past the last column of the selected row
fn last_cell_num<T: Navigable + ?Sized>(nav: &T) -> Result<u16> {
    let document = nav.document();
    let index = document.row_index()?;
    Ok(document
        .worksheet()?
        .row(index)
        .and_then(|row| row.last_col())
        .map_or(0, |col| col + 1))
}

fn header_column(header: &Cell) -> Result<u16> {
    header
        .index()
        .and_then(|index| u16::try_from(index).ok())
        .ok_or_else(|| Error::invalid("header without a column index"))
}
