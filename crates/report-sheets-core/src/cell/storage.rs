//! Row storage
//!
//! Rows live in a `BTreeMap` keyed by 0-based row index. In windowed mode only
//! the most recent `window` rows stay in memory; older rows are spilled to a
//! temp file that is read back when saving and can no longer be read or written.

use std::collections::BTreeMap;

use super::spill::{FlushedRows, SpillFile};
use super::CellValue;
use crate::error::{Error, Result};
use crate::style::StyleId;
use crate::MAX_ROWS;

/// How a sheet keeps its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// Every row stays addressable (random access)
    #[default]
    Full,
    /// Append-only: at most `window` rows stay addressable
    Windowed { window: usize },
}

impl StorageMode {
    /// Windowed mode with the given row window (at least one row)
    pub fn windowed(window: usize) -> Self {
        StorageMode::Windowed {
            window: window.max(1),
        }
    }

    pub fn is_windowed(&self) -> bool {
        matches!(self, StorageMode::Windowed { .. })
    }

    /// Short name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            StorageMode::Full => "full",
            StorageMode::Windowed { .. } => "windowed",
        }
    }
}

/// A cell: value plus style handle
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellData {
    pub value: CellValue,
    pub style: StyleId,
}

impl CellData {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style: StyleId::DEFAULT,
        }
    }

    pub fn with_style(value: CellValue, style: StyleId) -> Self {
        Self { value, style }
    }
}

/// A row: sparse cells plus row-level settings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowData {
    cells: BTreeMap<u16, CellData>,
    /// Height in points, `None` for the sheet default
    pub height: Option<f64>,
    pub hidden: bool,
}

impl RowData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, col: u16) -> Option<&CellData> {
        self.cells.get(&col)
    }

    pub fn cell_mut(&mut self, col: u16) -> Option<&mut CellData> {
        self.cells.get_mut(&col)
    }

    /// Get a cell, creating a blank one with the default style
    pub fn cell_or_insert(&mut self, col: u16) -> &mut CellData {
        self.cells.entry(col).or_default()
    }

    /// Replace a cell with a fresh blank one
    pub fn create_cell(&mut self, col: u16) -> &mut CellData {
        self.cells.insert(col, CellData::default());
        self.cells.entry(col).or_default()
    }

    pub fn insert_cell(&mut self, col: u16, cell: CellData) {
        self.cells.insert(col, cell);
    }

    pub fn remove_cell(&mut self, col: u16) -> Option<CellData> {
        self.cells.remove(&col)
    }

    /// Iterate over existing cells in column order
    pub fn cells(&self) -> impl Iterator<Item = (u16, &CellData)> + '_ {
        self.cells.iter().map(|(col, cell)| (*col, cell))
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = (u16, &mut CellData)> + '_ {
        self.cells.iter_mut().map(|(col, cell)| (*col, cell))
    }

    /// Column index of the first existing cell
    pub fn first_col(&self) -> Option<u16> {
        self.cells.keys().next().copied()
    }

    /// Column index of the last existing cell
    pub fn last_col(&self) -> Option<u16> {
        self.cells.keys().next_back().copied()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Drop every cell, keeping row settings
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

/// Row storage for one sheet
#[derive(Debug, Default)]
pub struct RowStore {
    mode: StorageMode,
    rows: BTreeMap<u32, RowData>,
    flushed: SpillFile,
}

impl RowStore {
    pub fn new(mode: StorageMode) -> Self {
        Self {
            mode,
            rows: BTreeMap::new(),
            flushed: SpillFile::default(),
        }
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    // === Row Access ===

    /// Addressable row (flushed rows answer `None`)
    pub fn row(&self, index: u32) -> Option<&RowData> {
        self.rows.get(&index)
    }

    pub fn row_mut(&mut self, index: u32) -> Option<&mut RowData> {
        self.rows.get_mut(&index)
    }

    /// Highest flushed row index
    pub fn last_flushed(&self) -> Option<u32> {
        self.flushed.last()
    }

    /// Number of flushed rows
    pub fn flushed_count(&self) -> usize {
        self.flushed.len()
    }

    /// Bytes the flushed rows take in the spill file
    pub fn flushed_bytes(&self) -> u64 {
        self.flushed.bytes()
    }

    /// True when the row index lies in the flushed part of the sheet
    pub fn is_flushed(&self, index: u32) -> bool {
        self.last_flushed().map_or(false, |last| index <= last)
    }

    /// Create (or replace) a row
    pub fn create_row(&mut self, index: u32) -> Result<&mut RowData> {
        self.check_writable(index)?;
        self.rows.insert(index, RowData::new());
        self.flush_window(index)?;
        self.live_row(index)
    }

    /// Existing row, or a newly created one
    pub fn row_or_create(&mut self, index: u32) -> Result<&mut RowData> {
        self.check_writable(index)?;
        if !self.rows.contains_key(&index) {
            self.rows.insert(index, RowData::new());
            self.flush_window(index)?;
        }
        self.live_row(index)
    }

    /// Put a prepared row at `index`, replacing whatever was there
    pub fn insert_row(&mut self, index: u32, row: RowData) -> Result<()> {
        self.check_writable(index)?;
        self.rows.insert(index, row);
        self.flush_window(index)
    }

    pub fn remove_row(&mut self, index: u32) -> Option<RowData> {
        self.rows.remove(&index)
    }

    // === Extent ===

    /// First row index, flushed rows included
    pub fn first_row_index(&self) -> Option<u32> {
        self.flushed
            .first()
            .or_else(|| self.rows.keys().next().copied())
    }

    /// Last row index, flushed rows included
    pub fn last_row_index(&self) -> Option<u32> {
        self.rows
            .keys()
            .next_back()
            .copied()
            .or_else(|| self.flushed.last())
    }

    /// Number of addressable rows
    pub fn live_count(&self) -> usize {
        self.rows.len()
    }

    /// Addressable rows in order
    pub fn rows(&self) -> impl Iterator<Item = (u32, &RowData)> + '_ {
        self.rows.iter().map(|(index, row)| (*index, row))
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = (u32, &mut RowData)> + '_ {
        self.rows.iter_mut().map(|(index, row)| (*index, row))
    }

    /// Flushed rows read back from the spill file, in order
    ///
    /// Every flushed row lies above every addressable row.
    pub fn flushed_rows(&self) -> Result<FlushedRows> {
        self.flushed.replay()
    }

    /// Move every row at or after `from` by `delta` (full mode only)
    ///
    /// Rows pushed above row 0 are dropped.
    pub fn shift_rows(&mut self, from: u32, delta: i64) -> Result<()> {
        if self.mode.is_windowed() {
            return Err(Error::UnsupportedInMode(self.mode.name()));
        }
        let moved = self.rows.split_off(&from);
        for (index, row) in moved {
            let target = i64::from(index) + delta;
            if target < 0 {
                continue;
            }
            if target >= i64::from(MAX_ROWS) {
                return Err(Error::RowOutOfBounds(target as u32, MAX_ROWS - 1));
            }
            self.rows.insert(target as u32, row);
        }
        Ok(())
    }

    fn check_writable(&self, index: u32) -> Result<()> {
        if index >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(index, MAX_ROWS - 1));
        }
        match self.last_flushed() {
            Some(last_flushed) if index <= last_flushed => Err(Error::RowFlushed {
                row: index,
                last_flushed,
            }),
            _ => Ok(()),
        }
    }

    fn live_row(&mut self, index: u32) -> Result<&mut RowData> {
        let last_flushed = self.last_flushed().unwrap_or_default();
        self.rows.get_mut(&index).ok_or(Error::RowFlushed {
            row: index,
            last_flushed,
        })
    }

    /// Flush the lowest rows while the window is exceeded, never the row just touched
    fn flush_window(&mut self, touched: u32) -> Result<()> {
        let StorageMode::Windowed { window } = self.mode else {
            return Ok(());
        };
        while self.rows.len() > window {
            let Some((&lowest, _)) = self.rows.iter().next() else {
                break;
            };
            if lowest == touched {
                break;
            }
            if let Some(row) = self.rows.remove(&lowest) {
                self.flushed.push(lowest, &row)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mode_keeps_rows() {
        let mut store = RowStore::new(StorageMode::Full);
        for i in 0..1000 {
            store.create_row(i).unwrap();
        }
        assert_eq!(store.live_count(), 1000);
        assert!(store.row(0).is_some());
        assert_eq!(store.last_row_index(), Some(999));
    }

    #[test]
    fn test_windowed_flushes_lowest_rows() {
        let mut store = RowStore::new(StorageMode::windowed(3));
        for i in 0..5 {
            store.create_row(i).unwrap();
        }
        assert_eq!(store.live_count(), 3);
        assert!(store.row(1).is_none());
        assert!(store.row(2).is_some());
        assert_eq!(store.last_flushed(), Some(1));
        assert_eq!(store.first_row_index(), Some(0));
        assert_eq!(store.flushed_rows().unwrap().count(), 2);
        assert_eq!(store.rows().count(), 3);
    }

    #[test]
    fn test_windowed_memory_stays_at_window() {
        let mut store = RowStore::new(StorageMode::windowed(100));
        for i in 0..10_000u32 {
            let row = store.create_row(i).unwrap();
            row.cell_or_insert(0).value = CellValue::Number(f64::from(i));
            row.cell_or_insert(1).value = CellValue::from("line item");
            assert!(store.live_count() <= 100);
        }
        assert_eq!(store.live_count(), 100);
        assert_eq!(store.flushed_count(), 9_900);
        assert!(store.flushed_bytes() > 0);
        assert_eq!(store.last_row_index(), Some(9_999));

        let mut expected = 0;
        for flushed in store.flushed_rows().unwrap() {
            let (index, row) = flushed.unwrap();
            assert_eq!(index, expected);
            assert_eq!(row.cell(0).unwrap().value, CellValue::Number(f64::from(index)));
            expected += 1;
        }
        assert_eq!(expected, 9_900);
    }

    #[test]
    fn test_windowed_rejects_flushed_rows() {
        let mut store = RowStore::new(StorageMode::windowed(2));
        for i in 0..4 {
            store.create_row(i).unwrap();
        }
        assert!(matches!(
            store.create_row(1),
            Err(Error::RowFlushed { row: 1, .. })
        ));
        assert!(store.row_or_create(3).is_ok());
    }

    #[test]
    fn test_shift_rows() {
        let mut store = RowStore::new(StorageMode::Full);
        store.create_row(0).unwrap();
        store.create_row(2).unwrap().cell_or_insert(0).value = CellValue::Number(1.0);
        store.shift_rows(2, -1).unwrap();
        assert!(store.row(2).is_none());
        assert_eq!(store.row(1).unwrap().cell(0).unwrap().value, CellValue::Number(1.0));
    }

    #[test]
    fn test_row_cells() {
        let mut row = RowData::new();
        row.cell_or_insert(3).value = CellValue::from("x");
        row.cell_or_insert(1);
        assert_eq!(row.first_col(), Some(1));
        assert_eq!(row.last_col(), Some(3));
        row.create_cell(3);
        assert!(row.cell(3).unwrap().value.is_blank());
    }
}
