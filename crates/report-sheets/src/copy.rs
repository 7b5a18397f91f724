//! Copying template rows
//!
//! A block of rows `from_start..=from_end` is tiled `repeat` times from
//! `to` on; repetition `i` lands at `to + i + i * (from_end - from_start)`,
//! so consecutive copies of a multi-row block never overlap.

use report_sheets_core::{CellData, CellValue, CopyPolicy, RowData, StyleId, Worksheet};

use crate::cursor::Document;
use crate::error::{Error, Result};
use crate::formula::shift_row_reference;
use crate::navigate::Navigable;

/// Row copying; engines pick the native or the manual strategy
pub trait Copyable: Navigable {
    /// Copy rows `from_start..=from_end` to `to`, `repeat` times
    fn copy_block(&mut self, from_start: u32, from_end: u32, to: u32, repeat: u32) -> Result<&mut Self>;

    fn copy(&mut self, from: u32, to: u32) -> Result<&mut Self> {
        self.copy_block(from, from, to, 1)
    }

    fn copy_repeat(&mut self, from: u32, to: u32, repeat: u32) -> Result<&mut Self> {
        self.copy_block(from, from, to, repeat)
    }

    /// Copy the row at the row index to `to`; the cursor stays
    fn copy_to(&mut self, to: u32) -> Result<&mut Self> {
        let current = self.row_index();
        self.copy_block(current, current, to, 1)
    }

    fn copy_to_next(&mut self) -> Result<&mut Self> {
        let next = self.next_row_index();
        self.copy_to(next)
    }
}

/// First row of repetition `repeat_index`
pub(crate) fn tile_offset(to: u32, repeat_index: u32, span: u32) -> Result<u32> {
    let offset = u64::from(to) + u64::from(repeat_index) * (u64::from(span) + 1);
    u32::try_from(offset).map_err(|_| Error::invalid(format!("copy destination row {offset}")))
}

fn block_span(from_start: u32, from_end: u32) -> Result<u32> {
    from_end
        .checked_sub(from_start)
        .ok_or_else(|| Error::invalid(format!("rows {from_start}..={from_end}")))
}

/// Copy through the document model's row copy
pub(crate) fn native_copy(document: &mut Document, from_start: u32, from_end: u32, to: u32, repeat: u32) -> Result<()> {
    let span = block_span(from_start, from_end)?;
    let policy = document.options().copy_policy;
    let sheet = document.worksheet_mut()?;
    for i in 0..repeat {
        sheet.copy_rows(from_start, from_end, tile_offset(to, i, span)?, &policy)?;
    }
    Ok(())
}

/// Copy cell by cell, for storage that cannot copy rows natively
///
/// Formulas only move references to the source row itself, so a formula
/// reading other rows is partly shifted. Merged regions starting on a
/// source row are registered again at each destination.
pub(crate) fn manual_copy(document: &mut Document, from_start: u32, from_end: u32, to: u32, repeat: u32) -> Result<()> {
    let span = block_span(from_start, from_end)?;
    let policy = document.options().copy_policy;
    let sheet = document.worksheet_mut()?;

    let mut sources = Vec::with_capacity(span as usize + 1);
    for index in from_start..=from_end {
        if sheet.rows().is_flushed(index) {
            let last_flushed = sheet.rows().last_flushed().unwrap_or(index);
            log::warn!("Source row {} of '{}' was flushed", index + 1, sheet.name());
            return Err(report_sheets_core::Error::RowFlushed { row: index, last_flushed }.into());
        }
        sources.push((index, sheet.row(index).cloned()));
    }

    for i in 0..repeat {
        let base = tile_offset(to, i, span)?;
        for (source_index, source) in &sources {
            let dest = base + (source_index - from_start);
            let row = sheet.create_row(dest)?;
            if let Some(source) = source {
                copy_cells(source, row, *source_index, dest, &policy);
            }
            log::debug!("Copied row {} to row {}", source_index + 1, dest + 1);
        }
    }

    if policy.copy_merged_regions {
        copy_merged_regions(sheet, from_start, from_end, to, repeat, span)?;
    }
    Ok(())
}

fn copy_cells(source: &RowData, dest: &mut RowData, source_index: u32, dest_index: u32, policy: &CopyPolicy) {
    for (col, cell) in source.cells() {
        let value = if policy.copy_value {
            copied_value(&cell.value, source_index, dest_index, policy)
        } else {
            CellValue::Blank
        };
        let style = if policy.copy_style { cell.style } else { StyleId::DEFAULT };
        dest.insert_cell(col, CellData::with_style(value, style));
    }
    if policy.copy_row_height {
        dest.height = source.height;
    }
}

fn copied_value(value: &CellValue, source_index: u32, dest_index: u32, policy: &CopyPolicy) -> CellValue {
    match value {
        CellValue::Formula { text, .. } if policy.copy_formula => {
            CellValue::formula(shift_row_reference(text, source_index + 1, dest_index + 1))
        }
        CellValue::Formula { .. } => value.effective().clone(),
        other => other.clone(),
    }
}

fn copy_merged_regions(
    sheet: &mut Worksheet,
    from_start: u32,
    from_end: u32,
    to: u32,
    repeat: u32,
    span: u32,
) -> Result<()> {
    let regions: Vec<_> = sheet
        .merged_regions()
        .iter()
        .filter(|region| (from_start..=from_end).contains(&region.first_row))
        .copied()
        .collect();
    for i in 0..repeat {
        let base = tile_offset(to, i, span)?;
        let delta = i64::from(base) - i64::from(from_start);
        for region in &regions {
            let Some(shifted) = region.shift_rows(delta) else {
                continue;
            };
            if sheet.contains_merged_region(&shifted) {
                continue;
            }
            sheet.add_merged_region(shifted)?;
        }
    }
    Ok(())
}
