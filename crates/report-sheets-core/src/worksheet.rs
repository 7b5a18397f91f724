//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellData, CellRegion, CellValue, RowData, RowStore, StorageMode};
use crate::comment::CellComment;
use crate::error::{Error, Result};
use crate::formula::{map_row_references, shift_relative_rows};
use crate::style::StyleId;
use crate::validation::DataValidation;
use crate::{MAX_COLS, MAX_ROWS};

/// What a native row copy carries over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct CopyPolicy {
    pub copy_value: bool,
    pub copy_style: bool,
    /// Copy formulas with shifted references (otherwise their cached result)
    pub copy_formula: bool,
    pub copy_row_height: bool,
    pub copy_merged_regions: bool,
}

impl Default for CopyPolicy {
    fn default() -> Self {
        Self {
            copy_value: true,
            copy_style: true,
            copy_formula: true,
            copy_row_height: true,
            copy_merged_regions: true,
        }
    }
}

/// Per-column settings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnSettings {
    /// Width in character units, `None` for the sheet default
    pub width: Option<f64>,
    pub hidden: bool,
}

/// An outline group over rows or columns (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineGroup {
    pub first: u32,
    pub last: u32,
    pub collapsed: bool,
}

/// Frozen rows above and columns left of the split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreezePanes {
    pub rows: u32,
    pub cols: u16,
}

/// Sheet protection: password plus what users may still do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetProtection {
    pub password: String,
    pub select_locked_cells: bool,
    pub select_unlocked_cells: bool,
    pub format_cells: bool,
    pub format_columns: bool,
    pub format_rows: bool,
    pub insert_columns: bool,
    pub insert_rows: bool,
    pub insert_hyperlinks: bool,
    pub delete_columns: bool,
    pub delete_rows: bool,
    pub sort: bool,
    pub use_autofilter: bool,
    pub use_pivot_tables: bool,
    pub edit_objects: bool,
    pub edit_scenarios: bool,
}

impl SheetProtection {
    /// Protection with the spreadsheet application's default permissions
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            select_locked_cells: true,
            select_unlocked_cells: true,
            format_cells: false,
            format_columns: false,
            format_rows: false,
            insert_columns: false,
            insert_rows: false,
            insert_hyperlinks: false,
            delete_columns: false,
            delete_rows: false,
            sort: false,
            use_autofilter: false,
            use_pivot_tables: false,
            edit_objects: false,
            edit_scenarios: false,
        }
    }
}

/// A worksheet (single sheet in a workbook)
#[derive(Debug)]
pub struct Worksheet {
    name: String,
    rows: RowStore,
    visible: bool,
    merged_regions: Vec<CellRegion>,
    comments: BTreeMap<(u32, u16), CellComment>,
    validations: Vec<DataValidation>,
    freeze_panes: Option<FreezePanes>,
    protection: Option<SheetProtection>,
    columns: BTreeMap<u16, ColumnSettings>,
    row_groups: Vec<OutlineGroup>,
    column_groups: Vec<OutlineGroup>,
    auto_fit: bool,
}

impl Worksheet {
    /// Create an empty worksheet
    pub fn new(name: impl Into<String>, mode: StorageMode) -> Self {
        Self {
            name: name.into(),
            rows: RowStore::new(mode),
            visible: true,
            merged_regions: Vec::new(),
            comments: BTreeMap::new(),
            validations: Vec::new(),
            freeze_panes: None,
            protection: None,
            columns: BTreeMap::new(),
            row_groups: Vec::new(),
            column_groups: Vec::new(),
            auto_fit: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn storage_mode(&self) -> StorageMode {
        self.rows.mode()
    }

    // === Rows ===

    /// Row storage, flushed rows included
    pub fn rows(&self) -> &RowStore {
        &self.rows
    }

    pub fn row(&self, index: u32) -> Option<&RowData> {
        self.rows.row(index)
    }

    pub fn row_mut(&mut self, index: u32) -> Option<&mut RowData> {
        self.rows.row_mut(index)
    }

    /// Create (or replace) a row
    pub fn create_row(&mut self, index: u32) -> Result<&mut RowData> {
        self.rows.create_row(index)
    }

    pub fn row_or_create(&mut self, index: u32) -> Result<&mut RowData> {
        self.rows.row_or_create(index)
    }

    pub fn remove_row(&mut self, index: u32) -> Option<RowData> {
        self.rows.remove_row(index)
    }

    pub fn first_row_index(&self) -> Option<u32> {
        self.rows.first_row_index()
    }

    pub fn last_row_index(&self) -> Option<u32> {
        self.rows.last_row_index()
    }

    /// Hide or show a row, creating it when missing
    pub fn set_row_hidden(&mut self, index: u32, hidden: bool) -> Result<()> {
        self.rows.row_or_create(index)?.hidden = hidden;
        Ok(())
    }

    // === Cells ===

    pub fn cell(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.row(row).and_then(|r| r.cell(col))
    }

    pub fn cell_mut(&mut self, row: u32, col: u16) -> Option<&mut CellData> {
        self.rows.row_mut(row).and_then(|r| r.cell_mut(col))
    }

    /// Get a cell, creating its row and the cell when missing
    pub fn cell_or_create(&mut self, row: u32, col: u16) -> Result<&mut CellData> {
        check_col(col)?;
        Ok(self.rows.row_or_create(row)?.cell_or_insert(col))
    }

    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) -> Result<()> {
        self.cell_or_create(row, col)?.value = value;
        Ok(())
    }

    pub fn set_style(&mut self, row: u32, col: u16, style: StyleId) -> Result<()> {
        self.cell_or_create(row, col)?.style = style;
        Ok(())
    }

    // === Merged Regions ===

    pub fn merged_regions(&self) -> &[CellRegion] {
        &self.merged_regions
    }

    /// Register a merged region; it must span two or more cells and overlap no other
    pub fn add_merged_region(&mut self, region: CellRegion) -> Result<()> {
        if region.is_single_cell() {
            return Err(Error::InvalidRegion(region.to_string()));
        }
        if region.last_col >= MAX_COLS || region.last_row >= MAX_ROWS {
            return Err(Error::InvalidRegion(region.to_string()));
        }
        if self.merged_regions.iter().any(|r| r.overlaps(&region)) {
            return Err(Error::MergedRegionConflict(region.to_string()));
        }
        self.merged_regions.push(region);
        Ok(())
    }

    pub fn contains_merged_region(&self, region: &CellRegion) -> bool {
        self.merged_regions.contains(region)
    }

    /// Merged region covering a cell
    pub fn merged_region_at(&self, row: u32, col: u16) -> Option<&CellRegion> {
        self.merged_regions.iter().find(|r| r.contains(row, col))
    }

    pub fn remove_merged_region(&mut self, region: &CellRegion) -> bool {
        let before = self.merged_regions.len();
        self.merged_regions.retain(|r| r != region);
        before != self.merged_regions.len()
    }

    // === Comments ===

    pub fn comment(&self, row: u32, col: u16) -> Option<&CellComment> {
        self.comments.get(&(row, col))
    }

    pub fn comment_mut(&mut self, row: u32, col: u16) -> Option<&mut CellComment> {
        self.comments.get_mut(&(row, col))
    }

    pub fn set_comment(&mut self, row: u32, col: u16, comment: CellComment) {
        self.comments.insert((row, col), comment);
    }

    pub fn remove_comment(&mut self, row: u32, col: u16) -> Option<CellComment> {
        self.comments.remove(&(row, col))
    }

    /// Comments in row-major order
    pub fn comments(&self) -> impl Iterator<Item = ((u32, u16), &CellComment)> + '_ {
        self.comments.iter().map(|(key, comment)| (*key, comment))
    }

    // === Validations ===

    pub fn add_validation(&mut self, validation: DataValidation) {
        self.validations.push(validation);
    }

    pub fn validations(&self) -> &[DataValidation] {
        &self.validations
    }

    // === Layout ===

    pub fn freeze_panes(&self) -> Option<FreezePanes> {
        self.freeze_panes
    }

    /// Freeze `rows` rows and `cols` columns; zero for both removes the split
    pub fn set_freeze_panes(&mut self, rows: u32, cols: u16) {
        self.freeze_panes = (rows > 0 || cols > 0).then_some(FreezePanes { rows, cols });
    }

    pub fn column(&self, col: u16) -> Option<&ColumnSettings> {
        self.columns.get(&col)
    }

    pub fn columns(&self) -> impl Iterator<Item = (u16, &ColumnSettings)> + '_ {
        self.columns.iter().map(|(col, settings)| (*col, settings))
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) -> Result<()> {
        check_col(col)?;
        self.columns.entry(col).or_default().width = Some(width);
        Ok(())
    }

    pub fn set_column_hidden(&mut self, col: u16, hidden: bool) -> Result<()> {
        check_col(col)?;
        self.columns.entry(col).or_default().hidden = hidden;
        Ok(())
    }

    /// Outline rows `first..=last`
    pub fn group_rows(&mut self, first: u32, last: u32, collapsed: bool) -> Result<()> {
        if first.max(last) >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(first.max(last), MAX_ROWS - 1));
        }
        self.row_groups.push(OutlineGroup {
            first: first.min(last),
            last: first.max(last),
            collapsed,
        });
        Ok(())
    }

    /// Outline columns `first..=last`
    pub fn group_columns(&mut self, first: u16, last: u16, collapsed: bool) -> Result<()> {
        check_col(first.max(last))?;
        self.column_groups.push(OutlineGroup {
            first: u32::from(first.min(last)),
            last: u32::from(first.max(last)),
            collapsed,
        });
        Ok(())
    }

    pub fn row_groups(&self) -> &[OutlineGroup] {
        &self.row_groups
    }

    pub fn column_groups(&self) -> &[OutlineGroup] {
        &self.column_groups
    }

    pub fn auto_fit(&self) -> bool {
        self.auto_fit
    }

    /// Size columns to their content when the sheet is written
    pub fn set_auto_fit(&mut self, auto_fit: bool) {
        self.auto_fit = auto_fit;
    }

    // === Protection ===

    pub fn protection(&self) -> Option<&SheetProtection> {
        self.protection.as_ref()
    }

    pub fn protect(&mut self, protection: SheetProtection) {
        self.protection = Some(protection);
    }

    pub fn unprotect(&mut self) {
        self.protection = None;
    }

    // === Row Operations ===

    /// Copy rows `first..=last` so that `first` lands on `dest`
    ///
    /// Relative row references in copied formulas move by `dest - first`;
    /// `$`-anchored rows stay. A missing source row clears its destination.
    /// Merged regions lying entirely inside the source block are copied too.
    /// Only available in full storage mode.
    pub fn copy_rows(&mut self, first: u32, last: u32, dest: u32, policy: &CopyPolicy) -> Result<()> {
        if self.rows.mode().is_windowed() {
            return Err(Error::UnsupportedInMode(self.rows.mode().name()));
        }
        if first > last {
            return Err(Error::InvalidRegion(format!("rows {first}..={last}")));
        }
        let span = last - first;
        if u64::from(dest) + u64::from(span) >= u64::from(MAX_ROWS) {
            return Err(Error::RowOutOfBounds(dest.saturating_add(span), MAX_ROWS - 1));
        }

        let delta = i64::from(dest) - i64::from(first);
        let source: Vec<(u32, Option<RowData>)> =
            (first..=last).map(|r| (r, self.rows.row(r).cloned())).collect();

        for (index, row) in source {
            let target = (i64::from(index) + delta) as u32;
            match row {
                Some(row) => {
                    let mut copied = self.rows.row(target).cloned().unwrap_or_default();
                    copy_row_into(&row, &mut copied, delta, policy);
                    self.rows.insert_row(target, copied)?;
                }
                None => {
                    self.rows.remove_row(target);
                }
            }
        }

        if policy.copy_merged_regions {
            let inside: Vec<CellRegion> = self
                .merged_regions
                .iter()
                .filter(|r| r.first_row >= first && r.last_row <= last)
                .filter_map(|r| r.shift_rows(delta))
                .collect();
            for region in inside {
                if self.contains_merged_region(&region) {
                    continue;
                }
                if let Err(err) = self.add_merged_region(region) {
                    log::warn!("Skipped merged region {region} on '{}': {err}", self.name);
                }
            }
        }

        log::debug!(
            "Copied rows {}..={} of '{}' to row {}",
            first + 1,
            last + 1,
            self.name,
            dest + 1
        );
        Ok(())
    }

    /// Delete a row and move every row below it up by one
    ///
    /// Formula references to later rows follow the move; references to the
    /// deleted row become `#REF!`. Merged regions and comments move as well.
    /// Only available in full storage mode.
    pub fn delete_row(&mut self, index: u32) -> Result<()> {
        if self.rows.mode().is_windowed() {
            return Err(Error::UnsupportedInMode(self.rows.mode().name()));
        }
        self.rows.remove_row(index);
        self.shift_rows_up(index)
    }

    /// Move every row after `after` up by one, fixing references to them
    pub fn shift_rows_up(&mut self, after: u32) -> Result<()> {
        self.rows.shift_rows(after + 1, -1)?;

        let deleted = after + 1;
        for (_, row) in self.rows.rows_mut() {
            for (_, cell) in row.cells_mut() {
                if let CellValue::Formula { text, .. } = &mut cell.value {
                    *text = map_row_references(text, |r, _| match r {
                        r if r == deleted => None,
                        r if r > deleted => Some(r - 1),
                        r => Some(r),
                    });
                }
            }
        }

        self.merged_regions = self
            .merged_regions
            .iter()
            .filter_map(|r| {
                if r.first_row > after {
                    r.shift_rows(-1)
                } else if r.last_row >= after && !(r.first_row == after && r.last_row == after) {
                    let mut shrunk = *r;
                    shrunk.last_row = r.last_row.saturating_sub(1).max(r.first_row);
                    (!shrunk.is_single_cell()).then_some(shrunk)
                } else if r.last_row < after {
                    Some(*r)
                } else {
                    None
                }
            })
            .collect();

        self.comments = std::mem::take(&mut self.comments)
            .into_iter()
            .filter(|((row, _), _)| *row != after)
            .map(|((row, col), mut comment)| {
                if row > after {
                    comment.anchor.first_row = comment.anchor.first_row.saturating_sub(1);
                    comment.anchor.last_row = comment.anchor.last_row.saturating_sub(1);
                    ((row - 1, col), comment)
                } else {
                    ((row, col), comment)
                }
            })
            .collect();

        Ok(())
    }
}

fn check_col(col: u16) -> Result<()> {
    if col >= MAX_COLS {
        return Err(Error::ColumnOutOfBounds(u32::from(col), MAX_COLS - 1));
    }
    Ok(())
}

fn copy_row_into(source: &RowData, dest: &mut RowData, delta: i64, policy: &CopyPolicy) {
    for (col, cell) in source.cells() {
        let value = match &cell.value {
            CellValue::Formula { text, cached } if policy.copy_formula => CellValue::Formula {
                text: shift_relative_rows(text, delta),
                cached: cached.clone(),
            },
            value if policy.copy_value => value.effective().clone(),
            _ => CellValue::Blank,
        };
        let style = if policy.copy_style {
            cell.style
        } else {
            StyleId::DEFAULT
        };
        dest.insert_cell(col, CellData::with_style(value, style));
    }
    if policy.copy_row_height {
        dest.height = source.height;
        dest.hidden = source.hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sheet() -> Worksheet {
        Worksheet::new("Sheet1", StorageMode::Full)
    }

    #[test]
    fn test_merge_conflicts() {
        let mut ws = sheet();
        ws.add_merged_region(CellRegion::parse("A1:B2").unwrap()).unwrap();
        assert!(matches!(
            ws.add_merged_region(CellRegion::parse("B2:C3").unwrap()),
            Err(Error::MergedRegionConflict(_))
        ));
        assert!(ws.add_merged_region(CellRegion::parse("D1").unwrap()).is_err());
        assert_eq!(ws.merged_region_at(1, 1), Some(&CellRegion::parse("A1:B2").unwrap()));
    }

    #[test]
    fn test_copy_rows_shifts_formulas() {
        let mut ws = sheet();
        ws.set_value(0, 0, CellValue::Number(1.0)).unwrap();
        ws.set_value(0, 1, CellValue::formula("A1*2+$C$1")).unwrap();
        ws.row_mut(0).unwrap().height = Some(30.0);

        ws.copy_rows(0, 0, 4, &CopyPolicy::default()).unwrap();

        assert_eq!(ws.cell(4, 0).unwrap().value, CellValue::Number(1.0));
        assert_eq!(ws.cell(4, 1).unwrap().value.formula_text(), Some("A5*2+$C$1"));
        assert_eq!(ws.row(4).unwrap().height, Some(30.0));
    }

    #[test]
    fn test_copy_rows_copies_merged_regions() {
        let mut ws = sheet();
        ws.set_value(1, 7, CellValue::from("merged")).unwrap();
        ws.add_merged_region(CellRegion::parse("H2:I2").unwrap()).unwrap();

        ws.copy_rows(1, 1, 2, &CopyPolicy::default()).unwrap();
        ws.copy_rows(1, 1, 2, &CopyPolicy::default()).unwrap();

        assert_eq!(
            ws.merged_regions(),
            &[
                CellRegion::parse("H2:I2").unwrap(),
                CellRegion::parse("H3:I3").unwrap()
            ]
        );
    }

    #[test]
    fn test_copy_missing_source_clears_destination() {
        let mut ws = sheet();
        ws.set_value(0, 0, CellValue::from("a")).unwrap();
        ws.set_value(3, 0, CellValue::from("old")).unwrap();
        ws.copy_rows(0, 1, 2, &CopyPolicy::default()).unwrap();
        assert_eq!(ws.cell(2, 0).unwrap().value, CellValue::from("a"));
        assert!(ws.row(3).is_none());
    }

    #[test]
    fn test_copy_rows_windowed_unsupported() {
        let mut ws = Worksheet::new("S", StorageMode::windowed(10));
        ws.set_value(0, 0, CellValue::Number(1.0)).unwrap();
        assert!(matches!(
            ws.copy_rows(0, 0, 1, &CopyPolicy::default()),
            Err(Error::UnsupportedInMode("windowed"))
        ));
    }

    #[test]
    fn test_copy_without_formula_keeps_result() {
        let mut ws = sheet();
        ws.set_value(0, 0, CellValue::formula_with_result("1+1", CellValue::Number(2.0)))
            .unwrap();
        let policy = CopyPolicy {
            copy_formula: false,
            ..CopyPolicy::default()
        };
        ws.copy_rows(0, 0, 1, &policy).unwrap();
        assert_eq!(ws.cell(1, 0).unwrap().value, CellValue::Number(2.0));
    }

    #[test]
    fn test_delete_row() {
        let mut ws = sheet();
        for r in 0..4 {
            ws.set_value(r, 0, CellValue::Number(f64::from(r))).unwrap();
        }
        ws.set_value(4, 0, CellValue::formula("A1+A2+A4")).unwrap();
        ws.add_merged_region(CellRegion::parse("B4:C4").unwrap()).unwrap();
        ws.set_comment(3, 0, CellComment::new("me", "note").anchored_at(3, 0));

        ws.delete_row(1).unwrap();

        assert_eq!(ws.cell(1, 0).unwrap().value, CellValue::Number(2.0));
        assert_eq!(ws.cell(3, 0).unwrap().value.formula_text(), Some("A1+#REF!+A3"));
        assert_eq!(ws.merged_regions(), &[CellRegion::parse("B3:C3").unwrap()]);
        assert_eq!(ws.comment(2, 0).unwrap().anchor.first_row, 2);
        assert_eq!(ws.last_row_index(), Some(3));
    }

    #[test]
    fn test_freeze_and_groups() {
        let mut ws = sheet();
        ws.set_freeze_panes(1, 2);
        assert_eq!(ws.freeze_panes(), Some(FreezePanes { rows: 1, cols: 2 }));
        ws.set_freeze_panes(0, 0);
        assert_eq!(ws.freeze_panes(), None);

        ws.group_rows(5, 2, true).unwrap();
        assert_eq!(
            ws.row_groups(),
            &[OutlineGroup {
                first: 2,
                last: 5,
                collapsed: true
            }]
        );
        assert!(ws.group_columns(0, MAX_COLS, false).is_err());
    }
}
