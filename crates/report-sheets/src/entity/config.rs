//! Template and parse descriptors

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Cell;
use crate::coordinate::Column;
use crate::rownum::Rownum;

/// A total row and the inclusive block of rows it sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TotalRange {
    pub total: Rownum,
    pub begin: Rownum,
    pub end: Rownum,
}

impl TotalRange {
    pub fn of(total: Rownum, begin: Rownum, end: Rownum) -> Self {
        Self { total, begin, end }
    }

    pub fn for_each<F: FnMut(Rownum)>(&self, mut action: F) -> &Self {
        for n in self.begin.get()..=self.end.get() {
            action(Rownum::of(n));
        }
        self
    }

    pub fn for_each_num<F: FnMut(u32)>(&self, action: F) -> &Self {
        (self.begin.get()..=self.end.get()).for_each(action);
        self
    }

    pub fn for_each_index<F: FnMut(u32)>(&self, action: F) -> &Self {
        (self.begin.index()..=self.end.index()).for_each(action);
        self
    }
}

/// A template row: where it is, where it was copied from, and its columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowConfig {
    pub row: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub columns: Vec<Cell>,
}

impl RowConfig {
    pub fn row(&self) -> Rownum {
        Rownum::of(self.row)
    }

    pub fn from(&self) -> Option<Rownum> {
        self.from.map(Rownum::of)
    }
}

/// Label and column of a table's closing total row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterConfig {
    pub label: String,
    pub column: Column,
}

impl FooterConfig {
    pub const DEFAULT_LABEL: &'static str = "合计";

    pub fn new(label: impl Into<String>, column: Column) -> Self {
        Self {
            label: label.into(),
            column,
        }
    }

    pub fn at(column: Column) -> Self {
        Self::new(Self::DEFAULT_LABEL, column)
    }
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self::at(Column::A)
    }
}

/// How to parse a sheet into a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseConfig {
    pub start_rownum: u32,
    #[serde(default)]
    pub header: Vec<Cell>,
    #[serde(default)]
    pub footer: FooterConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_total_range_is_inclusive() {
        let range = TotalRange::of(Rownum::of(10), Rownum::of(3), Rownum::of(5));
        let mut nums = Vec::new();
        let mut indexes = Vec::new();
        let mut rownums = Vec::new();
        range
            .for_each_num(|n| nums.push(n))
            .for_each_index(|i| indexes.push(i))
            .for_each(|r| rownums.push(r.get()));
        assert_eq!(nums, vec![3, 4, 5]);
        assert_eq!(indexes, vec![2, 3, 4]);
        assert_eq!(rownums, nums);
    }

    #[test]
    fn test_parse_config_defaults() {
        let config: ParseConfig = serde_json::from_str(r#"{"startRownum": 6}"#).unwrap();
        assert_eq!(config.start_rownum, 6);
        assert_eq!(config.footer.label, "合计");
        assert_eq!(config.footer.column, Column::A);
        assert!(config.header.is_empty());
    }

    #[test]
    fn test_row_config() {
        let config: RowConfig =
            serde_json::from_str(r#"{"row": 4, "from": 2, "columns": [{"index": 0}]}"#).unwrap();
        assert_eq!(config.row().index(), 3);
        assert_eq!(config.from().map(|r| r.get()), Some(2));
        assert_eq!(config.columns[0].index(), Some(0));
    }
}
