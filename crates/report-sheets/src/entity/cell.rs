//! Logical cell: what to write where, or what was read from where

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DataType, Row};
use crate::convert::{date_of, decimal_of};
use crate::coordinate::{Column, Position};
use crate::error::Result;
use crate::navigate::Navigable;
use crate::write::Writable;

/// A logical cell
///
/// Fields serialize in declaration order; absent fields are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<Column>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Key used instead of `label` when looking up row values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    /// Style index in the style source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sindex: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit index, else the column ordinal
    pub fn index(&self) -> Option<u32> {
        self.index
            .or_else(|| self.column.map(|c| u32::from(c.ordinal())))
    }

    /// Explicit column, else the named column at `index`
    pub fn column(&self) -> Option<Column> {
        self.column.or_else(|| {
            self.index
                .and_then(|i| u16::try_from(i).ok())
                .and_then(Column::from_ordinal)
        })
    }

    pub fn position(&self) -> Result<Option<Position>> {
        self.address.as_deref().map(Position::of).transpose()
    }

    /// Value as a number; text must parse
    pub fn number(&self) -> Result<Option<Decimal>> {
        decimal_of(self.value.as_ref().unwrap_or(&Value::Null))
    }

    /// Value as a date; epoch millis or date text
    pub fn date(&self) -> Result<Option<NaiveDateTime>> {
        date_of(self.value.as_ref().unwrap_or(&Value::Null))
    }

    /// Key this cell's value is stored under in row objects
    pub fn key(&self) -> Option<&str> {
        self.alias.as_deref().or(self.label.as_deref())
    }

    /// Value, falling back to the text
    pub fn data_value(&self) -> Value {
        match (&self.value, &self.text) {
            (Some(value), _) if !value.is_null() => value.clone(),
            (_, Some(text)) => Value::String(text.clone()),
            _ => Value::Null,
        }
    }

    /// Formula with `{column}` replaced by this cell's column name
    pub fn column_formula(&self) -> Option<String> {
        let formula = self.formula.as_deref()?;
        Some(match self.column() {
            Some(column) => formula.replace("{column}", &column.name()),
            None => formula.to_string(),
        })
    }

    /// Move the cursor to this cell; the address wins over the column
    pub fn select<N: Navigable + ?Sized>(&self, navigator: &mut N) -> Result<()> {
        if let Some(position) = self.position()? {
            navigator.cell_at_position(&position)?;
        } else if let Some(column) = self.column() {
            navigator.cell_at(column)?;
        }
        Ok(())
    }

    /// Write this cell's value from a data row at the writer's current cell
    ///
    /// The value is looked up by `alias`, else by `label`. `Seq` cells take
    /// `seq` when given; `Formula` cells with a formula write it.
    pub fn write_to<W: Writable + ?Sized>(
        &self,
        writer: &mut W,
        row: &Row,
        seq: Option<u32>,
    ) -> Result<()> {
        match (self.data_type, seq) {
            (Some(DataType::Seq), Some(seq)) => {
                writer.write_number(Some(f64::from(seq)))?;
            }
            (Some(DataType::Formula), _) if self.formula.is_some() => {
                writer.write_formula(self.column_formula().as_deref())?;
            }
            _ => {
                let value = row.lookup(self.alias.as_deref(), self.label.as_deref());
                writer.write_data_type(self.data_type.unwrap_or(DataType::Text), &value)?;
            }
        }
        Ok(())
    }

    // === Builder ===

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn with_sindex(mut self, sindex: u32) -> Self {
        self.sindex = Some(sindex);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }
}
