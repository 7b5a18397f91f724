//! Workbook writing (rust_xlsxwriter)

use std::fs;
use std::path::{Path, PathBuf};

use report_sheets_core::{CellData, CellValue, ListSource, RowData, StyleId, Workbook, Worksheet};
use rust_xlsxwriter::{Format, Formula, Note, ProtectionOptions};

use crate::error::{CodecError, CodecResult};
use crate::format::FileFormat;
use crate::styles::build_formats;

/// Permission bits given to saved files on Unix
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// XLSX file writer
pub struct WorkbookWriter;

impl WorkbookWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> CodecResult<()> {
        let mut xlsx = Self::build(workbook)?;
        xlsx.save(path.as_ref())?;
        Ok(())
    }

    /// Write a workbook into memory
    pub fn to_buffer(workbook: &Workbook) -> CodecResult<Vec<u8>> {
        let mut xlsx = Self::build(workbook)?;
        Ok(xlsx.save_to_buffer()?)
    }

    fn build(workbook: &Workbook) -> CodecResult<rust_xlsxwriter::Workbook> {
        let mut xlsx = rust_xlsxwriter::Workbook::new();
        let formats = build_formats(workbook.styles());
        let recalc = workbook.settings().recalc_on_open;

        for (index, sheet) in workbook.worksheets().enumerate() {
            let target = xlsx.add_worksheet();
            write_sheet(target, sheet, &formats, recalc)?;
            if index == workbook.active_sheet() {
                target.set_active(true);
            }
            if !sheet.is_visible() {
                target.set_hidden(true);
            }
        }

        for name in workbook.names().iter() {
            xlsx.define_name(name.name.as_str(), &format!("={}", name.refers_to))?;
        }
        Ok(xlsx)
    }
}

/// Save as `.xlsx`, creating parent directories; returns the written path
pub fn save<P: AsRef<Path>>(workbook: &Workbook, path: P) -> CodecResult<PathBuf> {
    save_with_mode(workbook, path, DEFAULT_FILE_MODE)
}

/// Save as `.xlsx` and set the file's permission bits (Unix only)
pub fn save_with_mode<P: AsRef<Path>>(workbook: &Workbook, path: P, mode: u32) -> CodecResult<PathBuf> {
    let path = path.as_ref();
    if FileFormat::from_path(path)? != FileFormat::Xlsx {
        return Err(CodecError::UnsupportedFormat(path.display().to_string()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    WorkbookWriter::write_file(workbook, path)?;
    set_mode(path, mode)?;

    tracing::info!("Saved workbook to {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

fn write_sheet(
    target: &mut rust_xlsxwriter::Worksheet,
    sheet: &Worksheet,
    formats: &[Format],
    recalc: bool,
) -> CodecResult<()> {
    target.set_name(sheet.name())?;
    let plain = Format::new();
    let format_of = |style: StyleId| formats.get(style.index() as usize).unwrap_or(&plain);

    // merge first: merging blanks the region, cell writes then land on top
    for region in sheet.merged_regions() {
        target.merge_range(
            region.first_row,
            region.first_col,
            region.last_row,
            region.last_col,
            "",
            &plain,
        )?;
    }

    // flushed rows come back from the spill file one at a time
    for flushed in sheet.rows().flushed_rows()? {
        let (row_index, row) = flushed?;
        write_row(target, row_index, &row, &format_of, recalc)?;
    }
    for (row_index, row) in sheet.rows().rows() {
        write_row(target, row_index, row, &format_of, recalc)?;
    }

    for ((row, col), comment) in sheet.comments() {
        let mut note = Note::new(comment.text.as_str()).add_author_prefix(false);
        if !comment.author.is_empty() {
            note = note.set_author(comment.author.as_str());
        }
        if comment.visible {
            note = note.set_visible(true);
        }
        target.insert_note(row, col, &note)?;
    }

    for validation in sheet.validations() {
        let rule = match &validation.source {
            ListSource::Items(items) => {
                let items: Vec<&str> = items.iter().map(String::as_str).collect();
                rust_xlsxwriter::DataValidation::new().allow_list_strings(&items)?
            }
            ListSource::Formula(formula) => {
                rust_xlsxwriter::DataValidation::new().allow_list_formula(Formula::new(formula))
            }
        };
        let rule = rule
            .show_dropdown(validation.show_dropdown)
            .show_error_message(validation.show_error_box)
            .ignore_blank(validation.allow_blank);
        for region in &validation.regions {
            target.add_data_validation(
                region.first_row,
                region.first_col,
                region.last_row,
                region.last_col,
                &rule,
            )?;
        }
    }

    if let Some(panes) = sheet.freeze_panes() {
        target.set_freeze_panes(panes.rows, panes.cols)?;
    }

    for (col, settings) in sheet.columns() {
        if let Some(width) = settings.width {
            target.set_column_width(col, width)?;
        }
        if settings.hidden {
            target.set_column_hidden(col)?;
        }
    }
    // outline levels have no writer API; collapsed groups are saved as hidden
    for group in sheet.row_groups() {
        if group.collapsed {
            for row in group.first..=group.last {
                target.set_row_hidden(row)?;
            }
        } else {
            log::debug!("Row group {}..={} saved without outline level", group.first, group.last);
        }
    }
    for group in sheet.column_groups() {
        let (first, last) = (group.first as u16, group.last as u16);
        if group.collapsed {
            for col in first..=last {
                target.set_column_hidden(col)?;
            }
        } else {
            log::debug!("Column group {first}..={last} saved without outline level");
        }
    }

    if let Some(protection) = sheet.protection() {
        let options = ProtectionOptions {
            select_locked_cells: protection.select_locked_cells,
            select_unlocked_cells: protection.select_unlocked_cells,
            format_cells: protection.format_cells,
            format_columns: protection.format_columns,
            format_rows: protection.format_rows,
            insert_columns: protection.insert_columns,
            insert_rows: protection.insert_rows,
            insert_links: protection.insert_hyperlinks,
            delete_columns: protection.delete_columns,
            delete_rows: protection.delete_rows,
            sort: protection.sort,
            use_autofilter: protection.use_autofilter,
            use_pivot_tables: protection.use_pivot_tables,
            edit_objects: protection.edit_objects,
            edit_scenarios: protection.edit_scenarios,
            ..ProtectionOptions::default()
        };
        if protection.password.is_empty() {
            target.protect();
        } else {
            target.protect_with_password(&protection.password);
        }
        target.protect_with_options(&options);
    }

    if sheet.auto_fit() {
        target.autofit();
    }
    Ok(())
}

fn write_row<'f>(
    target: &mut rust_xlsxwriter::Worksheet,
    row_index: u32,
    row: &RowData,
    format_of: &impl Fn(StyleId) -> &'f Format,
    recalc: bool,
) -> CodecResult<()> {
    if let Some(height) = row.height {
        target.set_row_height(row_index, height)?;
    }
    if row.hidden {
        target.set_row_hidden(row_index)?;
    }
    for (col, cell) in row.cells() {
        write_cell(target, row_index, col, cell, format_of(cell.style), recalc)?;
    }
    Ok(())
}

fn write_cell(
    target: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    cell: &CellData,
    format: &Format,
    recalc: bool,
) -> CodecResult<()> {
    match &cell.value {
        CellValue::Blank => {
            if cell.style != StyleId::DEFAULT {
                target.write_blank(row, col, format)?;
            }
        }
        CellValue::Number(n) => {
            target.write_number_with_format(row, col, *n, format)?;
        }
        CellValue::Text(s) => {
            target.write_string_with_format(row, col, s.as_str(), format)?;
        }
        CellValue::Boolean(b) => {
            target.write_boolean_with_format(row, col, *b, format)?;
        }
        // error values have no direct cell form; their text is kept
        CellValue::Error(e) => {
            target.write_string_with_format(row, col, e.as_str(), format)?;
        }
        CellValue::Formula { text, cached } => {
            let mut formula = Formula::new(format!("={text}"));
            if !recalc {
                if let Some(result) = cached.as_deref().and_then(result_text) {
                    formula = formula.set_result(result);
                }
            }
            target.write_formula_with_format(row, col, formula, format)?;
        }
    }
    Ok(())
}

fn result_text(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Number(n) => Some(n.to_string()),
        CellValue::Text(s) => Some(s.clone()),
        CellValue::Boolean(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        CellValue::Error(e) => Some(e.as_str().to_string()),
        CellValue::Blank | CellValue::Formula { .. } => None,
    }
}
