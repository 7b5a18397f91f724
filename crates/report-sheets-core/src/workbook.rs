//! Workbook type

use crate::cell::StorageMode;
use crate::error::{Error, Result};
use crate::named_range::DefinedNames;
use crate::style::StyleTable;
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Workbook-level flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkbookSettings {
    /// Dates use the 1904 system
    pub date_1904: bool,
    /// Ask the spreadsheet application to recalculate formulas on open
    pub recalc_on_open: bool,
}

/// A workbook: ordered worksheets sharing one style table and name list
#[derive(Debug)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
    styles: StyleTable,
    names: DefinedNames,
    settings: WorkbookSettings,
    mode: StorageMode,
    active_sheet: usize,
}

impl Workbook {
    /// Create a workbook with one empty sheet in full storage mode
    pub fn new() -> Self {
        let mut workbook = Self::empty();
        workbook
            .worksheets
            .push(Worksheet::new("Sheet1", StorageMode::Full));
        workbook
    }

    /// Create a workbook without sheets; new sheets use `mode`
    pub fn with_mode(mode: StorageMode) -> Self {
        Self {
            worksheets: Vec::new(),
            styles: StyleTable::new(),
            names: DefinedNames::new(),
            settings: WorkbookSettings::default(),
            mode,
            active_sheet: 0,
        }
    }

    /// Create a workbook without sheets in full storage mode
    pub fn empty() -> Self {
        Self::with_mode(StorageMode::Full)
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    // === Sheets ===

    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).and_then(|i| self.worksheets.get(i))
    }

    /// Index of a sheet by name (case-insensitive)
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        let lower = name.to_lowercase();
        self.worksheets
            .iter()
            .position(|ws| ws.name().to_lowercase() == lower)
    }

    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// A sheet together with the style table, borrowed mutably at once
    pub fn sheet_and_styles_mut(&mut self, index: usize) -> Option<(&mut Worksheet, &mut StyleTable)> {
        let sheet = self.worksheets.get_mut(index)?;
        Some((sheet, &mut self.styles))
    }

    /// Add a sheet with a generated name (`SheetN`)
    pub fn add_worksheet(&mut self) -> Result<usize> {
        let name = self.generate_sheet_name();
        self.add_worksheet_with_name(&name)
    }

    /// Add a sheet at the end
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.validate_sheet_name(name, None)?;
        self.worksheets.push(Worksheet::new(name, self.mode));
        Ok(self.worksheets.len() - 1)
    }

    /// Insert a sheet at `index`
    pub fn insert_worksheet(&mut self, index: usize, name: &str) -> Result<()> {
        if index > self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_name(name, None)?;
        self.worksheets.insert(index, Worksheet::new(name, self.mode));
        if index <= self.active_sheet && self.worksheets.len() > 1 {
            self.active_sheet += 1;
        }
        Ok(())
    }

    /// Append a prepared sheet (used by readers)
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name(), None)?;
        self.worksheets.push(worksheet);
        Ok(self.worksheets.len() - 1)
    }

    pub fn remove_worksheet(&mut self, index: usize) -> Result<Worksheet> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        let removed = self.worksheets.remove(index);
        if self.active_sheet >= self.worksheets.len() {
            self.active_sheet = self.worksheets.len().saturating_sub(1);
        }
        Ok(removed)
    }

    pub fn rename_worksheet(&mut self, index: usize, name: &str) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_name(name, Some(index))?;
        self.worksheets[index].set_name(name);
        Ok(())
    }

    /// Hide or show a sheet; at least one sheet stays visible
    pub fn set_sheet_hidden(&mut self, index: usize, hidden: bool) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        if hidden {
            let others_visible = self
                .worksheets
                .iter()
                .enumerate()
                .any(|(i, ws)| i != index && ws.is_visible());
            if !others_visible {
                return Err(Error::other("A workbook needs at least one visible sheet"));
            }
        }
        self.worksheets[index].set_visible(!hidden);

        if hidden && self.active_sheet == index {
            if let Some(first_visible) = self.worksheets.iter().position(|ws| ws.is_visible()) {
                self.active_sheet = first_visible;
            }
        }
        Ok(())
    }

    pub fn active_sheet(&self) -> usize {
        self.active_sheet
    }

    pub fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.active_sheet = index;
        Ok(())
    }

    // === Styles, Names, Settings ===

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleTable {
        &mut self.styles
    }

    pub fn names(&self) -> &DefinedNames {
        &self.names
    }

    /// Define (or redefine) a workbook-scoped name
    pub fn define_name(&mut self, name: &str, refers_to: &str) -> Result<()> {
        self.names.define(name, refers_to)
    }

    pub fn settings(&self) -> &WorkbookSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut WorkbookSettings {
        &mut self.settings
    }

    fn validate_sheet_name(&self, name: &str, exclude: Option<usize>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {MAX_SHEET_NAME_LEN} characters): {name}"
            )));
        }
        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{c}': {name}"
            )));
        }

        let lower = name.to_lowercase();
        let duplicate = self
            .worksheets
            .iter()
            .enumerate()
            .any(|(i, ws)| Some(i) != exclude && ws.name().to_lowercase() == lower);
        if duplicate {
            return Err(Error::DuplicateSheetName(name.into()));
        }
        Ok(())
    }

    fn generate_sheet_name(&self) -> String {
        let mut n = self.worksheets.len() + 1;
        loop {
            let name = format!("Sheet{n}");
            if self.sheet_index(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.worksheet(0).unwrap().name(), "Sheet1");
        assert_eq!(wb.mode(), StorageMode::Full);
    }

    #[test]
    fn test_sheet_names() {
        let mut wb = Workbook::new();
        assert_eq!(wb.add_worksheet().unwrap(), 1);
        assert_eq!(wb.worksheet(1).unwrap().name(), "Sheet2");
        assert!(matches!(
            wb.add_worksheet_with_name("sheet1"),
            Err(Error::DuplicateSheetName(_))
        ));
        assert!(wb.add_worksheet_with_name("a/b").is_err());
        assert!(wb.add_worksheet_with_name(&"x".repeat(32)).is_err());
        assert!(wb.add_worksheet_with_name("成绩单").is_ok());
        assert_eq!(wb.sheet_index("SHEET2"), Some(1));

        wb.rename_worksheet(1, "Data").unwrap();
        assert_eq!(wb.sheet_index("data"), Some(1));
        wb.rename_worksheet(1, "DATA").unwrap();
    }

    #[test]
    fn test_windowed_sheets() {
        let mut wb = Workbook::with_mode(StorageMode::windowed(100));
        let index = wb.add_worksheet_with_name("Report").unwrap();
        assert!(wb.worksheet(index).unwrap().storage_mode().is_windowed());
    }

    #[test]
    fn test_hidden_sheets() {
        let mut wb = Workbook::new();
        assert!(wb.set_sheet_hidden(0, true).is_err());
        wb.add_worksheet().unwrap();
        wb.set_sheet_hidden(0, true).unwrap();
        assert!(!wb.worksheet(0).unwrap().is_visible());
        assert_eq!(wb.active_sheet(), 1);
        wb.set_sheet_hidden(0, false).unwrap();
        assert!(wb.worksheet(0).unwrap().is_visible());
    }

    #[test]
    fn test_split_borrow() {
        let mut wb = Workbook::new();
        let (sheet, styles) = wb.sheet_and_styles_mut(0).unwrap();
        let id = styles.clone_style(&crate::Style::new().bold(true));
        sheet.set_value(0, 0, CellValue::from("x")).unwrap();
        sheet.set_style(0, 0, id).unwrap();
        assert_eq!(wb.worksheet(0).unwrap().cell(0, 0).unwrap().style, id);
    }
}
