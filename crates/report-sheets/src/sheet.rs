//! Sheet-level writer operations: rows, merges, freezing, dropdowns,
//! comments, grouping, visibility and protection

use std::path::Path;

use lazy_regex::regex;
use report_sheets_core::{
    CellComment, CellValue, DataValidation, SheetProtection, StyleTable,
};
use report_sheets_io::{FileFormat, ReadOptions, WorkbookReader};

use crate::cell_styles::CellStyles;
use crate::coordinate::{Column, Position, Range};
use crate::error::{Error, Result};
use crate::formula::rebuild;
use crate::navigate::Navigable;
use crate::style_cache::StyleCache;
use crate::write::Writable;

/// Operations of the writer engines on top of cell writing
pub trait SheetWritable: Writable + Navigable {
    // === Style source ===

    /// Clone styles from this table when cells are written with a style index
    fn set_clone_styles(&mut self, source: StyleTable) -> &mut Self {
        self.document_mut().set_style_cache(StyleCache::new(Some(source)));
        self
    }

    /// Use the style table of an `.xlsx` file; other files are skipped
    fn set_clone_styles_from(&mut self, path: impl AsRef<Path>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        if !matches!(FileFormat::from_path(path), Ok(FileFormat::Xlsx)) {
            log::warn!("Skipped style source {}: not an .xlsx file", path.display());
            return Ok(self);
        }
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let source = WorkbookReader::read_file(path, &ReadOptions::default())?;
        Ok(self.set_clone_styles(source.styles().clone()))
    }

    // === Rows ===

    /// Remove the selected row without moving the rows below
    fn clear_row(&mut self) -> Result<&mut Self> {
        let document = self.document_mut();
        let index = document.row_index()?;
        document.worksheet_mut()?.remove_row(index);
        document.cursor_mut().clear_row();
        Ok(self)
    }

    /// Delete the row at the row index and move the rows below up
    fn delete_row(&mut self) -> Result<&mut Self> {
        let document = self.document_mut();
        let index = document.cursor().row_index();
        let sheet = document.worksheet_mut()?;
        sheet.delete_row(index)?;
        let exists = sheet.row(index).is_some();
        document.cursor_mut().select_row(index, exists);
        Ok(self)
    }

    /// Select a row, creating it when missing
    fn row_of_new(&mut self, index: u32) -> Result<&mut Self> {
        let document = self.document_mut();
        document.worksheet_mut()?.row_or_create(index)?;
        document.cursor_mut().select_row(index, true);
        Ok(self)
    }

    /// Select a fresh row, replacing any row at `index`
    fn row_new(&mut self, index: u32) -> Result<&mut Self> {
        let document = self.document_mut();
        document.worksheet_mut()?.create_row(index)?;
        document.cursor_mut().select_row(index, true);
        Ok(self)
    }

    fn next_row_of_new(&mut self) -> Result<&mut Self> {
        let index = self.next_row_index();
        self.row_of_new(index)
    }

    fn next_row_new(&mut self) -> Result<&mut Self> {
        let index = self.next_row_index();
        self.row_new(index)
    }

    /// Clear every value of the selected row, keeping styles
    fn set_row_blank(&mut self) -> Result<&mut Self> {
        self.blank_row(|_| true)
    }

    /// Clear every value of the selected row except formulas
    fn set_row_blank_ignore_formula(&mut self) -> Result<&mut Self> {
        self.blank_row(|value| !value.is_formula())
    }

    #[doc(hidden)]
    fn blank_row<F>(&mut self, clear: F) -> Result<&mut Self>
    where
        F: Fn(&CellValue) -> bool,
    {
        let document = self.document_mut();
        let index = document.row_index()?;
        if let Some(row) = document.worksheet_mut()?.row_mut(index) {
            for (_, cell) in row.cells_mut() {
                if clear(&cell.value) {
                    cell.value = CellValue::Blank;
                }
            }
        }
        Ok(self)
    }

    // === Cells ===

    /// Select a cell of the selected row, creating it when missing
    fn cell_of_new(&mut self, col: u16) -> Result<&mut Self> {
        let document = self.document_mut();
        let index = document.row_index()?;
        document.worksheet_mut()?.cell_or_create(index, col)?;
        document.cursor_mut().select_cell(col);
        Ok(self)
    }

    /// Select a fresh blank cell, replacing any cell at `col`
    fn cell_new(&mut self, col: u16) -> Result<&mut Self> {
        let document = self.document_mut();
        let index = document.row_index()?;
        let row = document.worksheet_mut()?.row_or_create(index)?;
        row.create_cell(col);
        document.cursor_mut().select_cell(col);
        Ok(self)
    }

    /// Apply the builder to every cell of the selected row up to its last column
    fn append_style_of_row(&mut self, styles: &mut CellStyles) -> Result<&mut Self> {
        let document = self.document();
        let index = document.row_index()?;
        let width = document
            .worksheet()?
            .row(index)
            .and_then(|row| row.last_col())
            .map_or(0, |col| col + 1);
        for col in 0..width {
            self.cell_of_new(col)?.append_style(styles)?;
        }
        Ok(self)
    }

    fn merge(&mut self, range: &Range) -> Result<&mut Self> {
        let region = range.region()?;
        self.document_mut().worksheet_mut()?.add_merged_region(region)?;
        Ok(self)
    }

    // === Freezing ===

    /// Freeze the first `col` columns and the first `row` rows
    fn freeze(&mut self, col: u16, row: u32) -> Result<&mut Self> {
        self.document_mut().worksheet_mut()?.set_freeze_panes(row, col);
        Ok(self)
    }

    /// Freeze through `column` and the first `row` rows
    fn freeze_column(&mut self, column: Column, row: u32) -> Result<&mut Self> {
        self.freeze(column.ordinal() + 1, row)
    }

    /// Freeze through the column and row of an address: `B2` freezes
    /// columns A..B and rows 1..2. A part left out freezes nothing.
    fn freeze_address(&mut self, address: &str) -> Result<&mut Self> {
        let col = match regex!("[A-Z]+").find(address) {
            Some(letters) => {
                let index = Position::column_index_of(letters.as_str())?;
                u16::try_from(index + 1).map_err(|_| Error::invalid(format!("column in '{address}'")))?
            }
            None => 0,
        };
        let row = match regex!(r"\d+").find(address) {
            Some(digits) => digits
                .as_str()
                .parse::<u32>()
                .map_err(|_| Error::invalid(format!("row in '{address}'")))?,
            None => 0,
        };
        self.freeze(col, row)
    }

    // === Formulas, dropdowns, comments ===

    /// Write a formula template for the selected row; see [`rebuild`]
    fn write_formula_of_rebuild(&mut self, formula: &str) -> Result<&mut Self> {
        let rownum = self.document().row_index()? + 1;
        self.write_formula(Some(&rebuild(formula, rownum)))
    }

    /// Restrict a range to a list of values
    fn write_dropdown_range<S: AsRef<str>>(&mut self, items: &[S], range: &Range) -> Result<&mut Self> {
        if items.len() > DataValidation::MAX_ITEMS {
            return Err(Error::invalid(format!(
                "dropdown lists take at most {} items, got {}",
                DataValidation::MAX_ITEMS,
                items.len()
            )));
        }
        let validation = DataValidation::list(items.iter().map(AsRef::as_ref)).on(range.region()?);
        self.document_mut().worksheet_mut()?.add_validation(validation);
        Ok(self)
    }

    /// Restrict a range to the values of a cell reference
    ///
    /// `reference` such as `{sheetName}!A1:C1` is registered as a defined
    /// name (its alphanumeric characters) pointing at the absolute range.
    fn write_dropdown_ref(&mut self, reference: &str, range: &Range) -> Result<&mut Self> {
        let name: String = reference.chars().filter(char::is_ascii_alphanumeric).collect();
        let region = range.region()?;
        let document = self.document_mut();
        let sheet_name = document.worksheet()?.name().to_string();
        let refers_to = regex!(r"([A-Z]+)(\d+):([A-Z]+)(\d+)")
            .replace_all(&reference.replace("{sheetName}", &sheet_name), "$$${1}$$${2}:$$${3}$$${4}")
            .into_owned();
        document.workbook_mut().define_name(&name, &refers_to)?;
        document
            .worksheet_mut()?
            .add_validation(DataValidation::formula_list(&name).on(region));
        Ok(self)
    }

    /// Comment every cell of a range; `None` removes the comments in it
    fn write_comments(&mut self, content: Option<&str>, range: &Range) -> Result<&mut Self> {
        let region = range.region()?;
        let document = self.document_mut();
        let author = document.options().comment_author.clone();
        let sheet = document.worksheet_mut()?;
        match content {
            None => {
                let inside: Vec<(u32, u16)> = sheet
                    .comments()
                    .map(|(address, _)| address)
                    .filter(|(row, col)| region.contains(*row, *col))
                    .collect();
                for (row, col) in inside {
                    sheet.remove_comment(row, col);
                }
            }
            Some(text) => {
                for (row, col) in region.cells() {
                    sheet.cell_or_create(row, col)?;
                    match sheet.comment_mut(row, col) {
                        Some(comment) => comment.text = text.to_string(),
                        None => sheet.set_comment(
                            row,
                            col,
                            CellComment::new(author.as_str(), text).anchored_at(row, col),
                        ),
                    }
                }
            }
        }
        Ok(self)
    }

    // === Outline, visibility ===

    fn group_row(&mut self, from: u32, to: u32, collapse: bool) -> Result<&mut Self> {
        self.document_mut().worksheet_mut()?.group_rows(from, to, collapse)?;
        Ok(self)
    }

    fn group_column(&mut self, from: u16, to: u16) -> Result<&mut Self> {
        self.document_mut().worksheet_mut()?.group_columns(from, to, false)?;
        Ok(self)
    }

    fn show_sheet(&mut self, index: usize) -> Result<&mut Self> {
        self.document_mut().workbook_mut().set_sheet_hidden(index, false)?;
        Ok(self)
    }

    fn show_sheet_by_name(&mut self, name: &str) -> Result<&mut Self> {
        let index = sheet_named(self, name)?;
        self.show_sheet(index)
    }

    fn hide_sheet(&mut self, index: usize) -> Result<&mut Self> {
        self.document_mut().workbook_mut().set_sheet_hidden(index, true)?;
        Ok(self)
    }

    fn hide_sheet_by_name(&mut self, name: &str) -> Result<&mut Self> {
        let index = sheet_named(self, name)?;
        self.hide_sheet(index)
    }

    fn hide_row(&mut self, index: u32) -> Result<&mut Self> {
        self.document_mut().worksheet_mut()?.set_row_hidden(index, true)?;
        Ok(self)
    }

    fn hide_column(&mut self, col: u16) -> Result<&mut Self> {
        self.document_mut().worksheet_mut()?.set_column_hidden(col, true)?;
        Ok(self)
    }

    fn show_column(&mut self, col: u16) -> Result<&mut Self> {
        self.document_mut().worksheet_mut()?.set_column_hidden(col, false)?;
        Ok(self)
    }

    /// Fit column widths to their contents when the sheet is saved
    fn auto_column_width(&mut self) -> Result<&mut Self> {
        self.document_mut().worksheet_mut()?.set_auto_fit(true);
        Ok(self)
    }

    /// Have formulas recalculated when the workbook is opened
    fn evaluate_all_formula_cells(&mut self) -> &mut Self {
        self.document_mut().workbook_mut().settings_mut().recalc_on_open = true;
        self
    }

    // === Protection ===

    /// Lock every cell of a range
    fn lock_range(&mut self, range: &Range, styles: CellStyles) -> Result<&mut Self> {
        self.style_range(range, styles.locked(true))
    }

    /// Unlock every cell of a range
    fn unlock_range(&mut self, range: &Range, styles: CellStyles) -> Result<&mut Self> {
        self.style_range(range, styles.locked(false))
    }

    #[doc(hidden)]
    fn style_range(&mut self, range: &Range, mut styles: CellStyles) -> Result<&mut Self> {
        let mut cells = Vec::new();
        range.for_each(|row, col| cells.push((row, col)))?;
        for (row, col) in cells {
            let col = u16::try_from(col).map_err(|_| Error::invalid(format!("range {range}")))?;
            self.row_of_new(row)?.cell_of_new(col)?.append_style(&mut styles)?;
        }
        Ok(self)
    }

    /// Protect the sheet
    ///
    /// Users may still select unlocked cells, format, insert and delete
    /// rows and columns, and sort.
    fn password(&mut self, password: &str) -> Result<&mut Self> {
        if password.is_empty() {
            return Err(Error::invalid("password must not be empty"));
        }
        let protection = SheetProtection {
            select_locked_cells: false,
            select_unlocked_cells: true,
            format_cells: true,
            format_columns: true,
            format_rows: true,
            insert_columns: true,
            insert_rows: true,
            insert_hyperlinks: false,
            delete_columns: true,
            delete_rows: true,
            sort: true,
            use_autofilter: false,
            use_pivot_tables: false,
            edit_objects: false,
            edit_scenarios: false,
            ..SheetProtection::new(password)
        };
        self.document_mut().worksheet_mut()?.protect(protection);
        Ok(self)
    }
}

fn sheet_named<T: Navigable + ?Sized>(nav: &T, name: &str) -> Result<usize> {
    nav.document()
        .workbook()
        .sheet_index(name)
        .ok_or_else(|| report_sheets_core::Error::SheetNotFound(name.to_string()).into())
}
