//! Workbook reading (calamine)
//!
//! Values, cached formula results with their formula text, dates, error
//! values, merged regions, sheet visibility and defined names are read.
//! For `.xlsx` the style table is the file's cellXfs list, so a cell's style
//! index is the same as in the file. `.xls` cells carry no styles; their date
//! cells get an interned date style so they keep reading as dates.

mod styles;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook, CellErrorType, Data, Dimensions, Reader, SheetVisible, Xls, Xlsx};
use report_sheets_core::{
    CellData, CellError, CellRegion, CellValue, StorageMode, Style, StyleId, StyleTable, Workbook,
    Worksheet,
};

use self::styles::{read_package_styles, PackageStyles};
use crate::error::CodecResult;
use crate::format::FileFormat;

/// Options for opening a workbook
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Password of a protected workbook; encrypted files cannot be decrypted
    /// and fail with a read error
    pub password: Option<String>,
}

impl ReadOptions {
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Workbook file reader
pub struct WorkbookReader;

impl WorkbookReader {
    /// Read an `.xls` or `.xlsx` file into a full-mode workbook
    pub fn read_file<P: AsRef<Path>>(path: P, options: &ReadOptions) -> CodecResult<Workbook> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        if options.password.is_some() {
            log::warn!(
                "Password given for {}; encrypted workbooks are not decrypted",
                path.display()
            );
        }

        let workbook = match format {
            FileFormat::Xlsx => {
                let mut reader: Xlsx<BufReader<File>> =
                    open_workbook(path).map_err(calamine::Error::Xlsx)?;
                reader
                    .load_merged_regions()
                    .map_err(calamine::Error::Xlsx)?;
                let styles = match read_package_styles(BufReader::new(File::open(path)?)) {
                    Ok(styles) => styles,
                    Err(err) => {
                        log::warn!("Cell styles of {} not read: {err}", path.display());
                        PackageStyles::default()
                    }
                };
                read_workbook(&mut reader, styles, |r, name| {
                    r.merged_regions_by_sheet(name)
                        .into_iter()
                        .map(|(_, _, dims)| region_of(dims))
                        .collect()
                })?
            }
            FileFormat::Xls => {
                let mut reader: Xls<BufReader<File>> =
                    open_workbook(path).map_err(calamine::Error::Xls)?;
                read_workbook(&mut reader, PackageStyles::default(), |r, name| {
                    r.worksheet_merge_cells(name)
                        .unwrap_or_default()
                        .iter()
                        .map(region_of)
                        .collect()
                })?
            }
        };

        tracing::info!(
            "Opened workbook {} ({} sheets)",
            path.display(),
            workbook.sheet_count()
        );
        Ok(workbook)
    }
}

fn read_workbook<R, F>(reader: &mut R, styles: PackageStyles, merges: F) -> CodecResult<Workbook>
where
    R: Reader<BufReader<File>>,
    R::Error: Into<calamine::Error>,
    F: Fn(&R, &str) -> Vec<CellRegion>,
{
    let PackageStyles {
        cell_styles,
        sheets: mut styled_sheets,
    } = styles;
    let mut workbook = Workbook::empty();
    if !cell_styles.is_empty() {
        *workbook.styles_mut() = StyleTable::from_styles(cell_styles);
    }
    let sheets: Vec<(String, bool)> = reader
        .sheets_metadata()
        .iter()
        .map(|s| (s.name.clone(), matches!(s.visible, SheetVisible::Visible)))
        .collect();

    let mut hidden = Vec::new();
    for (name, visible) in sheets {
        let mut sheet = Worksheet::new(name.as_str(), StorageMode::Full);
        let cell_styles = styled_sheets.remove(&name).unwrap_or_default();

        let range = reader.worksheet_range(&name).map_err(Into::into)?;
        if let Some((first_row, first_col)) = range.start() {
            for (r, c, data) in range.used_cells() {
                let (row, col) = (first_row + r as u32, first_col + c as u32);
                let Ok(col) = u16::try_from(col) else {
                    continue;
                };
                let mut cell = convert_data(data);
                if matches!(data, Data::DateTime(_)) && !cell_styles.contains_key(&(row, col)) {
                    cell.style = date_style(workbook.styles_mut(), data);
                }
                sheet.row_or_create(row)?.insert_cell(col, cell);
            }
        }

        // styled blanks are absent from the value range and are created here
        for ((row, col), index) in cell_styles {
            match workbook.styles().id(index) {
                Some(style) => sheet.cell_or_create(row, col)?.style = style,
                None => log::warn!("Cell ({row}, {col}) of '{name}' has unknown style {index}"),
            }
        }

        match reader.worksheet_formula(&name) {
            Ok(formulas) => {
                if let Some((first_row, first_col)) = formulas.start() {
                    for (r, c, text) in formulas.used_cells() {
                        let (row, col) = (first_row + r as u32, first_col + c as u32);
                        let Ok(col) = u16::try_from(col) else {
                            continue;
                        };
                        let cell = sheet.cell_or_create(row, col)?;
                        let cached = std::mem::take(&mut cell.value);
                        cell.value = match cached {
                            CellValue::Blank => CellValue::formula(text),
                            cached => CellValue::formula_with_result(text, cached),
                        };
                    }
                }
            }
            Err(err) => {
                let err: calamine::Error = err.into();
                log::warn!("Skipped formulas of sheet '{name}': {err}");
            }
        }

        for region in merges(reader, &name) {
            if let Err(err) = sheet.add_merged_region(region) {
                log::warn!("Skipped merged region {region} of sheet '{name}': {err}");
            }
        }

        let index = workbook.add_existing_worksheet(sheet)?;
        if !visible {
            hidden.push(index);
        }
    }

    for index in hidden {
        if let Err(err) = workbook.set_sheet_hidden(index, true) {
            log::warn!("Sheet {index} kept visible: {err}");
        }
    }

    let names: Vec<(String, String)> = reader.defined_names().to_vec();
    for (name, refers_to) in names {
        if let Err(err) = workbook.define_name(&name, &refers_to) {
            log::warn!("Skipped defined name '{name}': {err}");
        }
    }

    Ok(workbook)
}

fn region_of(dims: &Dimensions) -> CellRegion {
    CellRegion::new(
        dims.start.0,
        dims.start.1.min(u32::from(u16::MAX)) as u16,
        dims.end.0,
        dims.end.1.min(u32::from(u16::MAX)) as u16,
    )
}

fn convert_data(data: &Data) -> CellData {
    match data {
        Data::Empty => CellData::default(),
        Data::Bool(b) => CellData::new(CellValue::Boolean(*b)),
        Data::Int(i) => CellData::new(CellValue::Number(*i as f64)),
        Data::Float(f) => CellData::new(CellValue::Number(*f)),
        Data::String(s) => CellData::new(CellValue::Text(s.clone())),
        Data::DateTime(dt) => CellData::new(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellData::new(CellValue::Text(s.clone())),
        Data::Error(e) => CellData::new(CellValue::Error(convert_error(e))),
    }
}

/// Interned display style for a date cell read without a file style
fn date_style(styles: &mut StyleTable, data: &Data) -> StyleId {
    let pattern = match data {
        Data::DateTime(dt) if dt.is_duration() => "[h]:mm:ss",
        Data::DateTime(dt) if dt.as_f64().fract() == 0.0 => "yyyy-mm-dd",
        _ => "yyyy-mm-dd hh:mm:ss",
    };
    styles.intern(Style::new().number_format(pattern))
}

fn convert_error(error: &CellErrorType) -> CellError {
    match error {
        CellErrorType::Div0 => CellError::Div0,
        CellErrorType::NA => CellError::Na,
        CellErrorType::Name => CellError::Name,
        CellErrorType::Null => CellError::Null,
        CellErrorType::Num => CellError::Num,
        CellErrorType::Ref => CellError::Ref,
        CellErrorType::Value => CellError::Value,
        CellErrorType::GettingData => CellError::GettingData,
    }
}
