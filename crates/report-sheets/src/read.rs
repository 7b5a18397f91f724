//! Reading the selected cell with semantic coercion

use chrono::NaiveDateTime;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::Value;

use report_sheets_core::{
    serial_to_datetime, CellComment, CellData, CellKind, CellValue, NumberFormat, Style,
    StyleTable,
};

use crate::context::Options;
use crate::convert::{datetime_to_millis, number_string, parse_decimal};
use crate::cursor::DocumentHandle;
use crate::entity::DataType;
use crate::error::{Error, Result};
use crate::formula::to_template;

/// Read access to one cell
///
/// An absent cell reads as null: every `Option` accessor answers `None`
/// and the `*_or_zero` forms answer zero.
#[derive(Debug, Clone, Copy)]
pub struct CellReader<'a> {
    cell: Option<&'a CellData>,
    comment: Option<&'a CellComment>,
    styles: &'a StyleTable,
    row_index: u32,
    date_pattern: &'a str,
}

impl<'a> CellReader<'a> {
    pub fn new(
        cell: Option<&'a CellData>,
        comment: Option<&'a CellComment>,
        styles: &'a StyleTable,
        row_index: u32,
    ) -> Self {
        Self {
            cell,
            comment,
            styles,
            row_index,
            date_pattern: Options::DEFAULT_DATE_PATTERN,
        }
    }

    /// Reader over no cell at all
    pub fn empty(styles: &'a StyleTable) -> Self {
        Self::new(None, None, styles, 0)
    }

    /// Pattern used when a date is read as text
    pub fn with_date_pattern(mut self, pattern: &'a str) -> Self {
        self.date_pattern = pattern;
        self
    }

    pub fn cell(&self) -> Option<&'a CellData> {
        self.cell
    }

    // === Presence ===

    pub fn is_null(&self) -> bool {
        self.cell.is_none()
    }

    pub fn is_not_null(&self) -> bool {
        !self.is_null()
    }

    /// Absent, or present with a blank value
    pub fn is_blank(&self) -> bool {
        self.cell.map_or(true, |cell| cell.value.is_blank())
    }

    pub fn is_not_blank(&self) -> bool {
        !self.is_blank()
    }

    // === Values ===

    /// JSON value of the cell
    ///
    /// Date-formatted numbers read as epoch milliseconds. With `formatted`,
    /// other numbers read as the text their number format displays. Formulas
    /// read as their cached result; blank and error results are `None`.
    pub fn value(&self, formatted: bool) -> Option<Value> {
        let cell = self.cell?;
        match cell.value.effective() {
            CellValue::Text(s) => Some(Value::String(s.clone())),
            CellValue::Number(n) => {
                let format = self.format();
                if format.is_date_format() {
                    serial_to_datetime(*n).map(|dt| Value::from(datetime_to_millis(dt)))
                } else if formatted {
                    Some(Value::String(format.format_number(*n)))
                } else {
                    Some(number_json(*n))
                }
            }
            CellValue::Boolean(b) => Some(Value::Bool(*b)),
            _ => None,
        }
    }

    /// Value that text and numeric reads see
    ///
    /// A formula gives its cached result; an error or missing result is no value.
    fn readable(&self) -> Option<&'a CellValue> {
        match &self.cell?.value {
            CellValue::Formula { cached, .. } => match cached.as_deref() {
                None | Some(CellValue::Blank | CellValue::Error(_)) => None,
                Some(result) => Some(result),
            },
            value => Some(value),
        }
    }

    /// Text of the cell: dates through the date pattern, numbers without
    /// scientific notation, booleans as `true`/`false`
    pub fn string_value(&self) -> Option<String> {
        match self.readable()? {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => match self.date_value() {
                Some(date) => Some(date.format(self.date_pattern).to_string()),
                None => Some(number_string(*n)),
            },
            CellValue::Boolean(b) => Some(b.to_string()),
            CellValue::Error(e) => Some(e.as_str().to_string()),
            _ => None,
        }
    }

    /// Text of the cell, empty when there is none
    pub fn string_of_empty(&self) -> String {
        self.string_value().unwrap_or_default()
    }

    /// Strict numeric read
    ///
    /// Dates read as epoch milliseconds and booleans as 1/0; text must parse
    /// as a number.
    pub fn number_value(&self) -> Result<Option<Decimal>> {
        let Some(value) = self.readable() else {
            return Ok(None);
        };
        match value {
            CellValue::Number(n) => {
                if let Some(date) = self.date_value() {
                    return Ok(Some(Decimal::from(datetime_to_millis(date))));
                }
                Decimal::from_f64(*n)
                    .map(Some)
                    .ok_or_else(|| Error::coercion(n, "number"))
            }
            CellValue::Text(s) if s.trim().is_empty() => Ok(None),
            CellValue::Text(s) => parse_decimal(s).map(Some),
            CellValue::Boolean(b) => Ok(Some(Decimal::from(u8::from(*b)))),
            CellValue::Error(e) => Err(Error::coercion(e.as_str(), "number")),
            _ => Ok(None),
        }
    }

    /// Numeric read that answers zero for anything unreadable
    pub fn number_or_zero(&self) -> Decimal {
        self.number_value().ok().flatten().unwrap_or(Decimal::ZERO)
    }

    pub fn int_value(&self) -> Result<Option<i32>> {
        self.integer("int", |d| d.to_i32())
    }

    pub fn int_or_zero(&self) -> i32 {
        self.int_value().ok().flatten().unwrap_or(0)
    }

    pub fn short_value(&self) -> Result<Option<i16>> {
        self.integer("short", |d| d.to_i16())
    }

    pub fn short_or_zero(&self) -> i16 {
        self.short_value().ok().flatten().unwrap_or(0)
    }

    pub fn long_value(&self) -> Result<Option<i64>> {
        self.integer("long", |d| d.to_i64())
    }

    pub fn long_or_zero(&self) -> i64 {
        self.long_value().ok().flatten().unwrap_or(0)
    }

    pub fn double_value(&self) -> Result<Option<f64>> {
        self.number_value()?
            .map(|d| d.to_f64().ok_or_else(|| Error::coercion(d, "double")))
            .transpose()
    }

    pub fn double_or_zero(&self) -> f64 {
        self.double_value().ok().flatten().unwrap_or(0.0)
    }

    fn integer<T>(&self, target: &'static str, narrow: impl Fn(Decimal) -> Option<T>) -> Result<Option<T>> {
        self.number_value()?
            .map(|d| narrow(d.trunc()).ok_or_else(|| Error::coercion(d, target)))
            .transpose()
    }

    /// Date of a non-blank, date-formatted numeric cell
    pub fn date_value(&self) -> Option<NaiveDateTime> {
        let cell = self.cell?;
        let n = cell.value.effective();
        match n {
            CellValue::Number(n) if self.format().is_date_format() => serial_to_datetime(*n),
            _ => None,
        }
    }

    // === Formulas ===

    pub fn formula(&self) -> Option<String> {
        self.cell?.value.formula_text().map(str::to_string)
    }

    /// Formula with references to `rownum` turned into `{0}` placeholders
    pub fn formula_template(&self, rownum: u32) -> Option<String> {
        self.formula().map(|formula| to_template(&formula, rownum))
    }

    /// Formula with references to the cell's own row turned into placeholders
    pub fn formula_template_of_row(&self) -> Option<String> {
        self.formula_template(self.row_index + 1)
    }

    // === Metadata ===

    pub fn comment(&self) -> Option<&'a str> {
        self.comment.map(|comment| comment.text.as_str())
    }

    pub fn style_index(&self) -> Option<u32> {
        self.cell.map(|cell| cell.style.index())
    }

    pub fn style(&self) -> Option<&'a Style> {
        self.cell.map(|cell| self.styles.resolve(cell.style))
    }

    pub fn data_format(&self) -> Option<&'a NumberFormat> {
        self.style().map(|style| &style.number_format)
    }

    /// Logical type: date, percent, number or text
    pub fn data_type(&self) -> Option<DataType> {
        let cell = self.cell?;
        if self.date_value().is_some() {
            return Some(DataType::Date);
        }
        if self.format().pattern().ends_with('%') {
            return Some(DataType::Percent);
        }
        let numeric = cell.value.kind() == CellKind::Numeric
            || cell.value.cached_kind() == Some(CellKind::Numeric);
        Some(if numeric { DataType::Number } else { DataType::Text })
    }

    /// Native kind of the cell
    pub fn cell_kind(&self) -> Option<CellKind> {
        self.cell.map(|cell| cell.value.kind())
    }

    fn format(&self) -> &'a NumberFormat {
        let id = self.cell.map(|cell| cell.style).unwrap_or_default();
        &self.styles.resolve(id).number_format
    }
}

/// Integral numbers serialize without a fraction
pub(crate) fn number_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Reading the selected cell
pub trait Readable: DocumentHandle {
    /// Reader over the selected cell
    fn reader(&self) -> CellReader<'_> {
        self.document().reader()
    }

    /// Reader over a cell of the selected sheet
    fn reader_at(&self, row_index: u32, col: u16) -> CellReader<'_> {
        self.document().reader_at(row_index, col)
    }

    fn is_null(&self) -> bool {
        self.reader().is_null()
    }

    fn is_blank(&self) -> bool {
        self.reader().is_blank()
    }

    fn value(&self, formatted: bool) -> Option<Value> {
        self.reader().value(formatted)
    }

    fn string_value(&self) -> Option<String> {
        self.reader().string_value()
    }

    fn string_of_empty(&self) -> String {
        self.reader().string_of_empty()
    }

    fn number_value(&self) -> Result<Option<Decimal>> {
        self.reader().number_value()
    }

    fn number_or_zero(&self) -> Decimal {
        self.reader().number_or_zero()
    }

    fn date_value(&self) -> Option<NaiveDateTime> {
        self.reader().date_value()
    }

    fn formula(&self) -> Option<String> {
        self.reader().formula()
    }

    fn comment(&self) -> Option<&str> {
        self.reader().comment()
    }

    fn style_index(&self) -> Option<u32> {
        self.reader().style_index()
    }

    fn data_type(&self) -> Option<DataType> {
        self.reader().data_type()
    }

    fn cell_kind(&self) -> Option<CellKind> {
        self.reader().cell_kind()
    }
}
