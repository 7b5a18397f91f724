//! Data rows, tables and sheet entities

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Cell, DataType};
use crate::convert::value_string;
use crate::error::Result;

/// A data row: cells keyed by header index (or any key), in insertion order
///
/// Nested rows and tables serialize under the `childs` and `table` keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(flatten)]
    cells: IndexMap<String, Cell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    childs: Option<Vec<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<Box<Table>>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell under its column index; `None` is skipped
    pub fn add_cell_at(&mut self, index: u32, cell: Option<Cell>) -> &mut Self {
        self.add_cell(index.to_string(), cell)
    }

    /// Add a cell under `key`; `None` is skipped
    pub fn add_cell(&mut self, key: impl Into<String>, cell: Option<Cell>) -> &mut Self {
        if let Some(cell) = cell {
            self.cells.insert(key.into(), cell);
        }
        self
    }

    /// Attach child rows; an empty list is skipped
    pub fn add_childs(&mut self, rows: Vec<Row>) -> &mut Self {
        if !rows.is_empty() {
            self.childs = Some(rows);
        }
        self
    }

    pub fn add_table(&mut self, table: Table) -> &mut Self {
        self.table = Some(Box::new(table));
        self
    }

    /// Take over every entry of `other`, replacing cells with the same key
    pub fn copy_from(&mut self, other: &Row) -> &mut Self {
        for (key, cell) in &other.cells {
            self.cells.insert(key.clone(), cell.clone());
        }
        if other.childs.is_some() {
            self.childs = other.childs.clone();
        }
        if other.table.is_some() {
            self.table = other.table.clone();
        }
        self
    }

    pub fn childs(&self) -> Option<&[Row]> {
        self.childs.as_deref()
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_deref()
    }

    pub fn cell(&self, key: &str) -> Option<&Cell> {
        self.cells.get(key)
    }

    pub fn cell_at(&self, index: u32) -> Option<&Cell> {
        self.cells.get(&index.to_string())
    }

    pub fn cell_type(&self, key: &str) -> Option<DataType> {
        self.cell(key).and_then(|c| c.data_type)
    }

    pub fn cell_text(&self, key: &str) -> Option<&str> {
        self.cell(key).and_then(|c| c.text.as_deref())
    }

    pub fn cell_date(&self, key: &str) -> Result<Option<NaiveDateTime>> {
        self.cell(key).map_or(Ok(None), Cell::date)
    }

    pub fn cell_number(&self, key: &str) -> Result<Option<Decimal>> {
        self.cell(key).map_or(Ok(None), Cell::number)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &Cell)> + '_ {
        self.cells.iter().map(|(key, cell)| (key.as_str(), cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value stored under `alias`, else under `label`; null when neither exists
    pub fn lookup(&self, alias: Option<&str>, label: Option<&str>) -> Value {
        alias
            .and_then(|key| self.cell(key))
            .or_else(|| label.and_then(|key| self.cell(key)))
            .map_or(Value::Null, Cell::data_value)
    }

    /// Header alias-or-label to value-or-text, as strings
    pub fn to_map_string(&self, header: &[Cell]) -> IndexMap<String, String> {
        self.header_entries(header)
            .map(|(key, value)| (key, value_string(&value)))
            .collect()
    }

    /// Header alias-or-label to value-or-text
    pub fn to_map_object(&self, header: &[Cell]) -> IndexMap<String, Value> {
        self.header_entries(header).collect()
    }

    /// Same as [`Row::to_map_object`], as a JSON object
    pub fn to_json_object(&self, header: &[Cell]) -> Value {
        Value::Object(self.header_entries(header).collect())
    }

    fn header_entries<'a>(
        &'a self,
        header: &'a [Cell],
    ) -> impl Iterator<Item = (String, Value)> + 'a {
        header.iter().filter_map(move |head| {
            let cell = self.cell_at(head.index()?)?;
            let key = head.key()?.to_string();
            Some((key, cell.data_value()))
        })
    }
}

impl FromIterator<(String, Cell)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Cell)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// A parsed or assembled table: header definitions plus data rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub index: u32,
    pub name: String,
    pub header: Vec<Cell>,
    pub body: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Value>,
}

impl Table {
    /// Body rows as alias-or-label to string maps
    pub fn to_objects(&self) -> Vec<IndexMap<String, String>> {
        self.body
            .iter()
            .map(|row| row.to_map_string(&self.header))
            .collect()
    }
}

/// A sheet with its table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetEntry {
    pub index: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn header() -> Vec<Cell> {
        vec![
            Cell::new().with_index(0).with_label("Name"),
            Cell::new().with_index(1).with_label("Phone").with_alias("phone"),
            Cell::new().with_index(2).with_label("Email"),
        ]
    }

    fn ann() -> Row {
        let mut row = Row::new();
        row.add_cell_at(0, Some(Cell::new().with_value("Ann")))
            .add_cell_at(1, Some(Cell::new().with_text("187-0000-0000")))
            .add_cell_at(2, None);
        row
    }

    #[test]
    fn test_add_cell_skips_none() {
        let row = ann();
        assert_eq!(row.len(), 2);
        assert!(row.cell("2").is_none());
    }

    #[test]
    fn test_to_map_string() {
        let map = ann().to_map_string(&header());
        let entries: Vec<(&str, &str)> = map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(entries, vec![("Name", "Ann"), ("phone", "187-0000-0000")]);
    }

    #[test]
    fn test_table_to_objects() {
        let table = Table {
            name: "People".to_string(),
            header: header(),
            body: vec![ann()],
            ..Table::default()
        };
        let objects = table.to_objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["Name"], "Ann");
    }

    #[test]
    fn test_childs_and_json_layout() {
        let mut row = ann();
        row.add_childs(vec![ann()]);
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["0"], json!({"value": "Ann"}));
        assert_eq!(value["childs"][0]["1"], json!({"text": "187-0000-0000"}));

        let back: Row = serde_json::from_value(value).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_copy_from_replaces_keys() {
        let mut row = ann();
        let mut other = Row::new();
        other.add_cell("0", Some(Cell::new().with_value("Bob")));
        row.copy_from(&other);
        assert_eq!(row.lookup(None, Some("0")), json!("Bob"));
        assert_eq!(row.len(), 2);
    }
}
