//! Writing values, styles, comments and dropdowns at the selected cell
//!
//! Every typed writer treats `None` as "clear the value": the cell goes
//! blank and keeps its style.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};
use lazy_regex::regex_is_match;
use serde_json::Value;

use report_sheets_core::{
    datetime_to_serial, CellComment, CellKind, CellValue, DataValidation, StyleId,
};

use crate::cell_styles::CellStyles;
use crate::convert::{date_of, decimal_of, decimal_to_f64, parse_date, value_string};
use crate::cursor::DocumentHandle;
use crate::entity::{Cell, DataType};
use crate::error::{Error, Result};

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Largest integer magnitude a numeric cell holds exactly (2^53)
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Writing at the selected cell
///
/// A selected cell that does not exist yet is created, as long as a row is
/// selected.
pub trait Writable: DocumentHandle {
    /// Write a logical cell: style first, then the formula or the typed value
    ///
    /// The style is skipped when no style cache is configured. Cells without
    /// a type are text.
    fn write(&mut self, data: &Cell) -> Result<&mut Self> {
        if let Some(index) = data.sindex {
            let document = self.document_mut();
            if document.style_cache().is_some() {
                let style = document.cloned_style(index)?;
                self.write_style(style)?;
            }
        }
        if let Some(formula) = data.formula.as_deref() {
            return self.write_formula(Some(formula));
        }
        let value = data.value.as_ref().filter(|value| !value.is_null());
        match data.data_type.unwrap_or(DataType::Text) {
            DataType::Date => {
                if value.is_some() {
                    self.write_date(data.date()?)?;
                }
            }
            data_type if data_type.is_numeric() => {
                if value.is_some() {
                    let number = data.number()?.map(decimal_to_f64).transpose()?;
                    self.write_number(number)?;
                }
            }
            _ => {
                let text = data.text.clone().or_else(|| value.map(value_string));
                self.write_text(text.as_deref())?;
            }
        }
        Ok(self)
    }

    /// Write with the kind the selected cell already has
    fn write_by_cell_type(&mut self, value: &Value) -> Result<&mut Self> {
        if value.is_null() {
            return self.set_cell_blank();
        }
        let kind = self
            .document()
            .current_cell()
            .map_or(CellKind::Blank, |cell| cell.value.kind());
        self.write_kind(kind, value)
    }

    /// Write with the kind recorded for this column, text by default
    fn write_kind_map(&mut self, kinds: &BTreeMap<u16, CellKind>, value: &Value) -> Result<&mut Self> {
        let col = self.document().address()?.1;
        let kind = kinds.get(&col).copied().unwrap_or(CellKind::String);
        self.write_kind(kind, value)
    }

    /// Write a value as a native kind
    ///
    /// Numeric columns classify the text: integers and decimals become
    /// numbers, `yyyy-MM-dd` becomes a date and anything else stays text.
    fn write_kind(&mut self, kind: CellKind, value: &Value) -> Result<&mut Self> {
        if value.is_null() {
            return self.set_cell_blank();
        }
        let text = value_string(value);
        match kind {
            CellKind::Formula => self.write_formula(Some(&text)),
            CellKind::Numeric => {
                let trimmed = text.trim();
                if regex_is_match!(r"^[+-]?\d+$", trimmed) {
                    match trimmed.parse::<i64>() {
                        Ok(n) if n.unsigned_abs() <= MAX_EXACT_INTEGER => {
                            self.write_number(Some(n as f64))
                        }
                        // a numeric cell would round it; the digits are kept as text
                        _ => self.write_text(Some(trimmed)),
                    }
                } else if regex_is_match!(r"^[+-]?\d+\.\d+$", trimmed) {
                    let number = trimmed
                        .parse::<f64>()
                        .map_err(|_| Error::coercion(trimmed, "number"))?;
                    self.write_number(Some(number))
                } else if regex_is_match!(r"^[+-]?\d{4}-\d{1,2}-\d{1,2}$", trimmed) {
                    let date = parse_date(trimmed).ok_or_else(|| Error::coercion(trimmed, "date"))?;
                    self.write_date(Some(date))
                } else {
                    self.write_text(Some(trimmed))
                }
            }
            _ => self.write_text(Some(&text)),
        }
    }

    /// Write a value as a logical type
    fn write_data_type(&mut self, data_type: DataType, value: &Value) -> Result<&mut Self> {
        if value.is_null() {
            return self.set_cell_blank();
        }
        match data_type {
            DataType::String | DataType::Text => self.write_text(Some(&value_string(value))),
            DataType::Date => self.write_date(date_of(value)?),
            DataType::Formula => self.write_formula(Some(&value_string(value))),
            _ => {
                let number = decimal_of(value)?.map(decimal_to_f64).transpose()?;
                self.write_number(number)
            }
        }
    }

    // === Typed writers ===

    fn write_text(&mut self, value: Option<&str>) -> Result<&mut Self> {
        match value {
            Some(text) => {
                self.document_mut().current_cell_mut()?.value = CellValue::text(text);
                Ok(self)
            }
            None => self.set_cell_blank(),
        }
    }

    fn write_string(&mut self, value: Option<&str>) -> Result<&mut Self> {
        self.write_text(value)
    }

    fn write_number(&mut self, value: Option<f64>) -> Result<&mut Self> {
        match value {
            Some(number) => {
                self.document_mut().current_cell_mut()?.value = CellValue::Number(number);
                Ok(self)
            }
            None => self.set_cell_blank(),
        }
    }

    fn write_bool(&mut self, value: Option<bool>) -> Result<&mut Self> {
        match value {
            Some(b) => {
                self.document_mut().current_cell_mut()?.value = CellValue::Boolean(b);
                Ok(self)
            }
            None => self.set_cell_blank(),
        }
    }

    /// Write a date as a serial number
    ///
    /// A cell whose style has no date format gets the style with
    /// `yyyy-mm-dd` added, or `yyyy-mm-dd hh:mm:ss` when the value has a time.
    fn write_date(&mut self, value: Option<NaiveDateTime>) -> Result<&mut Self> {
        let Some(date) = value else {
            return self.set_cell_blank();
        };
        let (cell, styles) = self.document_mut().current_cell_and_styles_mut()?;
        cell.value = CellValue::Number(datetime_to_serial(date));
        let style = styles.resolve(cell.style);
        if !style.number_format.is_date_format() {
            let pattern = if date.num_seconds_from_midnight() == 0 {
                DATE_FORMAT
            } else {
                DATETIME_FORMAT
            };
            let dated = style.clone().number_format(pattern);
            cell.style = styles.intern(dated);
        }
        Ok(self)
    }

    /// Write a formula; an empty formula clears the cell
    fn write_formula(&mut self, formula: Option<&str>) -> Result<&mut Self> {
        match formula.filter(|f| !f.is_empty()) {
            Some(formula) => {
                self.document_mut().current_cell_mut()?.value = CellValue::formula(formula);
                Ok(self)
            }
            None => self.set_cell_blank(),
        }
    }

    /// Clear the value, keeping the style
    fn set_cell_blank(&mut self) -> Result<&mut Self> {
        self.document_mut().current_cell_mut()?.value = CellValue::Blank;
        Ok(self)
    }

    /// Clear the value unless the cell holds a formula
    fn set_cell_blank_ignore_formula(&mut self) -> Result<&mut Self> {
        let cell = self.document_mut().current_cell_mut()?;
        if !cell.value.is_formula() {
            cell.value = CellValue::Blank;
        }
        Ok(self)
    }

    // === Comments, styles, dropdowns ===

    /// Attach a comment to the selected cell; `None` removes it
    fn write_comment(&mut self, content: Option<&str>) -> Result<&mut Self> {
        let document = self.document_mut();
        let (row, col) = document.address()?;
        let author = document.options().comment_author.clone();
        let sheet = document.worksheet_mut()?;
        match content {
            Some(text) => sheet.set_comment(row, col, CellComment::new(author, text).anchored_at(row, col)),
            None => {
                sheet.remove_comment(row, col);
            }
        }
        Ok(self)
    }

    /// Apply the destination copy of a source style
    fn write_style_index(&mut self, index: Option<u32>) -> Result<&mut Self> {
        let Some(index) = index else {
            return Ok(self);
        };
        let style = self.document_mut().cloned_style(index)?;
        self.write_style(style)
    }

    /// Apply a style; `None` leaves the cell as it is
    fn write_style(&mut self, style: Option<StyleId>) -> Result<&mut Self> {
        if let Some(style) = style {
            self.document_mut().current_cell_mut()?.style = style;
        }
        Ok(self)
    }

    /// Apply the builder's overrides on top of the cell's style
    fn append_style(&mut self, styles: &mut CellStyles) -> Result<&mut Self> {
        let (cell, table) = self.document_mut().current_cell_and_styles_mut()?;
        cell.style = styles.append_clone(table, Some(cell.style));
        Ok(self)
    }

    fn lock(&mut self) -> Result<&mut Self> {
        self.append_style(&mut CellStyles::locking(true))
    }

    fn unlock(&mut self) -> Result<&mut Self> {
        self.append_style(&mut CellStyles::locking(false))
    }

    /// Restrict the selected cell to a list of values
    fn write_dropdown_list<S: AsRef<str>>(&mut self, items: &[S]) -> Result<&mut Self> {
        if items.len() > DataValidation::MAX_ITEMS {
            return Err(Error::invalid(format!(
                "dropdown lists take at most {} items, got {}",
                DataValidation::MAX_ITEMS,
                items.len()
            )));
        }
        let document = self.document_mut();
        let region = document.current_region()?;
        let validation = DataValidation::list(items.iter().map(AsRef::as_ref)).on(region);
        document.worksheet_mut()?.add_validation(validation);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Options;
    use crate::cursor::Document;
    use report_sheets_core::{Style, Workbook};
    use serde_json::json;

    struct Harness(Document);

    impl DocumentHandle for Harness {
        fn document(&self) -> &Document {
            &self.0
        }

        fn document_mut(&mut self) -> &mut Document {
            &mut self.0
        }
    }

    impl Writable for Harness {}

    fn harness() -> Harness {
        let mut workbook = Workbook::new();
        workbook.worksheet_mut(0).unwrap().create_row(0).unwrap();
        let mut document = Document::new(workbook, Options::default().with_comment_author("ops"));
        document.cursor_mut().select_sheet(0);
        document.cursor_mut().select_row(0, true);
        document.cursor_mut().select_cell(1);
        Harness(document)
    }

    fn value(target: &Harness) -> CellValue {
        target.0.current_cell().unwrap().value.clone()
    }

    #[test]
    fn test_none_blanks_and_keeps_style() {
        let mut target = harness();
        let style = target.0.workbook_mut().styles_mut().push(Style::new().bold(true));
        target.write_style(Some(style)).unwrap().write_number(Some(3.0)).unwrap();
        target.write_number(None).unwrap();
        let cell = target.0.current_cell().unwrap();
        assert_eq!(cell.value, CellValue::Blank);
        assert_eq!(cell.style, style);
    }

    #[test]
    fn test_write_kind_classifies_numeric_text() {
        let mut target = harness();
        target.write_kind(CellKind::Numeric, &json!("42")).unwrap();
        assert_eq!(value(&target), CellValue::Number(42.0));
        target.write_kind(CellKind::Numeric, &json!("-1.5")).unwrap();
        assert_eq!(value(&target), CellValue::Number(-1.5));
        target.write_kind(CellKind::Numeric, &json!("187-0000-0000")).unwrap();
        assert_eq!(value(&target), CellValue::text("187-0000-0000"));
        target.write_kind(CellKind::Numeric, &json!("2024-01-05")).unwrap();
        assert!(target.0.reader().date_value().is_some());
        target.write_kind(CellKind::String, &json!(12)).unwrap();
        assert_eq!(value(&target), CellValue::text("12"));
    }

    #[test]
    fn test_write_kind_keeps_large_integers_exact() {
        let mut target = harness();
        target.write_kind(CellKind::Numeric, &json!("9007199254740992")).unwrap();
        assert_eq!(value(&target), CellValue::Number(9_007_199_254_740_992.0));

        target.write_kind(CellKind::Numeric, &json!("9007199254740993")).unwrap();
        assert_eq!(value(&target), CellValue::text("9007199254740993"));
        assert_eq!(
            target.0.reader().number_value().unwrap(),
            Some(rust_decimal::Decimal::from(9_007_199_254_740_993_i64))
        );

        target.write_kind(CellKind::Numeric, &json!("123456789012345678901234")).unwrap();
        assert_eq!(value(&target), CellValue::text("123456789012345678901234"));
        target.write_kind(CellKind::Numeric, &json!("-17")).unwrap();
        assert_eq!(value(&target), CellValue::Number(-17.0));
    }

    #[test]
    fn test_write_data_type() {
        let mut target = harness();
        target.write_data_type(DataType::Integer, &json!("7")).unwrap();
        assert_eq!(value(&target), CellValue::Number(7.0));
        target.write_data_type(DataType::Formula, &json!("=A1*2")).unwrap();
        assert_eq!(value(&target), CellValue::formula("A1*2"));
        assert!(target.write_data_type(DataType::Number, &json!("seven")).is_err());
        assert!(target.write_data_type(DataType::Date, &json!("07/01/2024")).is_err());
        target.write_data_type(DataType::Text, &Value::Null).unwrap();
        assert_eq!(value(&target), CellValue::Blank);
    }

    #[test]
    fn test_write_logical_cell() {
        let mut target = harness();
        target
            .write(&Cell::new().with_type(DataType::Double).with_value(2.5))
            .unwrap();
        assert_eq!(value(&target), CellValue::Number(2.5));

        target
            .write(&Cell::new().with_type(DataType::Number).with_formula("B1*2"))
            .unwrap();
        assert_eq!(value(&target), CellValue::formula("B1*2"));

        target.write(&Cell::new().with_text("plain")).unwrap();
        assert_eq!(value(&target), CellValue::text("plain"));
    }

    #[test]
    fn test_write_date_adds_format() {
        let mut target = harness();
        let date = parse_date("2024-02-29 13:45:00");
        target.write_date(date).unwrap();
        let reader = target.0.reader();
        assert_eq!(reader.date_value(), date);
        assert_eq!(reader.data_format().unwrap().pattern(), DATETIME_FORMAT);
    }

    #[test]
    fn test_blank_ignore_formula() {
        let mut target = harness();
        target.write_formula(Some("A1+1")).unwrap();
        target.set_cell_blank_ignore_formula().unwrap();
        assert!(value(&target).is_formula());
        target.write_formula(Some("")).unwrap();
        assert_eq!(value(&target), CellValue::Blank);
    }

    #[test]
    fn test_comments() {
        let mut target = harness();
        target.write_comment(Some("check")).unwrap();
        let comment = target.0.worksheet().unwrap().comment(0, 1).unwrap();
        assert_eq!(comment.author, "ops");
        assert_eq!((comment.anchor.last_row, comment.anchor.last_col), (2, 3));

        target.write_comment(None).unwrap();
        assert!(target.0.worksheet().unwrap().comment(0, 1).is_none());
    }

    #[test]
    fn test_style_index_needs_cache() {
        let mut target = harness();
        assert!(matches!(
            target.write_style_index(Some(1)),
            Err(Error::MissingRequiredCollaborator("style cache"))
        ));
        target.write_style_index(None).unwrap();
    }

    #[test]
    fn test_lock_and_unlock() {
        let mut target = harness();
        target.unlock().unwrap();
        assert!(!target.0.reader().style().unwrap().protection.locked);
        target.lock().unwrap();
        assert!(target.0.reader().style().unwrap().protection.locked);
    }

    #[test]
    fn test_dropdown_limit() {
        let mut target = harness();
        target.write_dropdown_list(&["yes", "no"]).unwrap();
        assert_eq!(target.0.worksheet().unwrap().validations().len(), 1);

        let items: Vec<String> = (0..129).map(|i| i.to_string()).collect();
        assert!(matches!(
            target.write_dropdown_list(&items),
            Err(Error::InvalidArgument(_))
        ));
    }
}
