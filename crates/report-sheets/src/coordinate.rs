//! Positions, ranges and named columns
//!
//! Rows are addressed by 1-based row number (`rownum`) at this level, and by
//! 0-based row index when talking to the document model.

use std::fmt;

use lazy_regex::regex;
use report_sheets_core::{column_to_letters, letters_to_column, CellRegion, MAX_COLS};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formula::Formula;

/// A cell position: column name plus 1-based row number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub column: String,
    pub row: u32,
}

impl Position {
    /// Parse an address such as `B12`
    pub fn of(address: &str) -> Result<Self> {
        let caps = regex!(r"^([A-Z]+)([0-9]+)$")
            .captures(address)
            .ok_or_else(|| Error::invalid(format!("address '{address}'")))?;
        let row = caps[2]
            .parse::<u32>()
            .ok()
            .filter(|row| *row >= 1)
            .ok_or_else(|| Error::invalid(format!("row number in '{address}'")))?;
        Ok(Self {
            column: caps[1].to_string(),
            row,
        })
    }

    pub fn new(column: impl Into<String>, row: u32) -> Self {
        Self {
            column: column.into(),
            row,
        }
    }

    /// Position from 0-based row and column indexes
    pub fn at(row_index: u32, column_index: u32) -> Self {
        Self {
            column: Self::of_column(column_index),
            row: row_index + 1,
        }
    }

    /// Column name of a 0-based column index (`0` is `A`, `26` is `AA`)
    pub fn of_column(index: u32) -> String {
        column_to_letters(index)
    }

    /// 0-based column index of a column name
    pub fn column_index_of(name: &str) -> Result<u32> {
        letters_to_column(name).map_err(|_| Error::invalid(format!("column '{name}'")))
    }

    pub fn column_index(&self) -> Result<u32> {
        Self::column_index_of(&self.column)
    }

    pub fn row_index(&self) -> u32 {
        self.row.saturating_sub(1)
    }

    pub fn address(&self) -> String {
        format!("{}{}", self.column, self.row)
    }

    /// Column index narrowed to the sheet's column range
    pub(crate) fn column_u16(&self) -> Result<u16> {
        let index = self.column_index()?;
        u16::try_from(index)
            .ok()
            .filter(|col| *col < MAX_COLS)
            .ok_or_else(|| Error::invalid(format!("column '{}' beyond the sheet", self.column)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// A rectangular range between two positions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Parse `A1:B2`
    pub fn parse(range: &str) -> Result<Self> {
        if !regex!(r"^[A-Z]+\d+:[A-Z]+\d+$").is_match(range) {
            return Err(Error::invalid(format!("range '{range}'")));
        }
        let (start, end) = range
            .split_once(':')
            .ok_or_else(|| Error::invalid(format!("range '{range}'")))?;
        Self::of(start, end)
    }

    /// Range between two addresses
    pub fn of(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: Position::of(start)?,
            end: Position::of(end)?,
        })
    }

    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// `SUM(A1:A10)`
    pub fn sum(&self) -> String {
        Formula::Sum.of(self)
    }

    /// `AVG(A1:A10)`
    pub fn avg(&self) -> String {
        Formula::Avg.of(self)
    }

    /// Inclusive native region
    pub fn region(&self) -> Result<CellRegion> {
        Ok(CellRegion::new(
            self.start.row_index(),
            self.start.column_u16()?,
            self.end.row_index(),
            self.end.column_u16()?,
        ))
    }

    /// Visit every `(row_index, column_index)` of the range, ends included
    pub fn for_each<F>(&self, mut action: F) -> Result<()>
    where
        F: FnMut(u32, u32),
    {
        let (first_col, last_col) = (self.start.column_index()?, self.end.column_index()?);
        for row in self.start.row_index()..=self.end.row_index() {
            for col in first_col..=last_col {
                action(row, col);
            }
        }
        Ok(())
    }

    /// Map `(row_index, column_index)` pairs, excluding the end row and column
    pub fn map<R, F>(&self, mut mapper: F) -> Result<Vec<R>>
    where
        F: FnMut(u32, u32) -> R,
    {
        let (first_col, last_col) = (self.start.column_index()?, self.end.column_index()?);
        let mut out = Vec::new();
        for row in self.start.row_index()..self.end.row_index() {
            for col in first_col..last_col {
                out.push(mapper(row, col));
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// A named column, `A` through `IZ`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Column(u16);

impl Column {
    /// Number of named columns
    pub const COUNT: u16 = 260;

    pub const A: Column = Column(0);
    pub const B: Column = Column(1);
    pub const C: Column = Column(2);
    pub const D: Column = Column(3);
    pub const E: Column = Column(4);
    pub const F: Column = Column(5);
    pub const G: Column = Column(6);
    pub const H: Column = Column(7);
    pub const I: Column = Column(8);
    pub const J: Column = Column(9);
    pub const K: Column = Column(10);
    pub const L: Column = Column(11);
    pub const M: Column = Column(12);
    pub const N: Column = Column(13);
    pub const O: Column = Column(14);
    pub const P: Column = Column(15);
    pub const Q: Column = Column(16);
    pub const R: Column = Column(17);
    pub const S: Column = Column(18);
    pub const T: Column = Column(19);
    pub const U: Column = Column(20);
    pub const V: Column = Column(21);
    pub const W: Column = Column(22);
    pub const X: Column = Column(23);
    pub const Y: Column = Column(24);
    pub const Z: Column = Column(25);

    /// Column by name
    pub fn of(name: &str) -> Result<Self> {
        let ordinal = Position::column_index_of(name)?;
        u16::try_from(ordinal)
            .ok()
            .and_then(Self::from_ordinal)
            .ok_or_else(|| Error::invalid(format!("column '{name}' beyond IZ")))
    }

    pub fn from_ordinal(ordinal: u16) -> Option<Self> {
        (ordinal < Self::COUNT).then_some(Column(ordinal))
    }

    pub fn ordinal(self) -> u16 {
        self.0
    }

    pub fn name(self) -> String {
        Position::of_column(u32::from(self.0))
    }

    pub fn position(self, rownum: u32) -> Position {
        Position::new(self.name(), rownum)
    }

    pub fn address(self, rownum: u32) -> String {
        format!("{}{}", self.name(), rownum)
    }

    pub fn range(self, start_rownum: u32, end_rownum: u32) -> Range {
        Range::new(self.position(start_rownum), self.position(end_rownum))
    }

    /// `SUM(A1:A10)`
    pub fn sum(self, start_rownum: u32, end_rownum: u32) -> String {
        Formula::Sum.of_cells(&self.address(start_rownum), &self.address(end_rownum))
    }

    /// `A1+A2+...` over the given row numbers
    pub fn sum_of(self, rownums: &[u32]) -> String {
        Formula::Sum.of_list(&self.addresses(rownums))
    }

    /// `AVG(A1:A10)`
    pub fn avg(self, start_rownum: u32, end_rownum: u32) -> String {
        Formula::Avg.of_cells(&self.address(start_rownum), &self.address(end_rownum))
    }

    /// `(A1+A2+...)/n` over the given row numbers
    pub fn avg_of(self, rownums: &[u32]) -> String {
        Formula::Avg.of_list(&self.addresses(rownums))
    }

    fn addresses(self, rownums: &[u32]) -> Vec<String> {
        rownums.iter().map(|rownum| self.address(*rownum)).collect()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<Column> for String {
    fn from(column: Column) -> Self {
        column.name()
    }
}

impl TryFrom<String> for Column {
    type Error = Error;

    fn try_from(name: String) -> Result<Self> {
        Column::of(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_names() {
        assert_eq!(Position::of_column(0), "A");
        assert_eq!(Position::of_column(25), "Z");
        assert_eq!(Position::of_column(26), "AA");
        assert_eq!(Position::of_column(701), "ZZ");
        assert_eq!(Position::column_index_of("AB").unwrap(), 27);
        assert_eq!(Position::column_index_of("IZ").unwrap(), 259);
    }

    #[test]
    fn test_position_parse() {
        let pos = Position::of("B12").unwrap();
        assert_eq!(pos, Position::new("B", 12));
        assert_eq!(pos.row_index(), 11);
        assert_eq!(pos.column_index().unwrap(), 1);
        assert_eq!(pos.address(), "B12");
        assert_eq!(Position::at(0, 27).address(), "AB1");

        assert!(Position::of("b12").is_err());
        assert!(Position::of("B0").is_err());
        assert!(Position::of("12B").is_err());
    }

    #[test]
    fn test_range_parse() {
        let range = Range::parse("A1:C3").unwrap();
        assert_eq!(range.to_string(), "A1:C3");
        assert_eq!(range.sum(), "SUM(A1:C3)");
        assert_eq!(range.avg(), "AVG(A1:C3)");
        assert_eq!(range.region().unwrap(), CellRegion::new(0, 0, 2, 2));

        assert!(matches!(Range::parse("A1-C3"), Err(Error::InvalidArgument(_))));
        assert!(Range::parse("A1:C").is_err());
    }

    #[test]
    fn test_range_iteration_bounds() {
        let range = Range::parse("A1:B2").unwrap();

        let mut visited = Vec::new();
        range.for_each(|r, c| visited.push((r, c))).unwrap();
        assert_eq!(visited, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);

        let mapped = range.map(|r, c| (r, c)).unwrap();
        assert_eq!(mapped, vec![(0, 0)]);
    }

    #[test]
    fn test_range_json_field_order() {
        let json = serde_json::to_string(&Range::parse("A1:B2").unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"start":{"column":"A","row":1},"end":{"column":"B","row":2}}"#
        );
    }

    #[test]
    fn test_named_columns() {
        assert_eq!(Column::of("C").unwrap(), Column::C);
        assert_eq!(Column::from_ordinal(259).unwrap().name(), "IZ");
        assert!(Column::from_ordinal(260).is_none());
        assert!(Column::of("JA").is_err());

        assert_eq!(Column::A.address(3), "A3");
        assert_eq!(Column::A.sum(1, 10), "SUM(A1:A10)");
        assert_eq!(Column::B.avg(2, 4), "AVG(B2:B4)");
        assert_eq!(Column::A.sum_of(&[1, 2]), "A1+A2");
        assert_eq!(Column::A.avg_of(&[1, 2]), "(A1+A2)/2");
        assert_eq!(Column::D.range(1, 5).to_string(), "D1:D5");
    }

    #[test]
    fn test_column_serializes_as_name() {
        assert_eq!(serde_json::to_string(&Column::from_ordinal(26).unwrap()).unwrap(), r#""AA""#);
        let column: Column = serde_json::from_str(r#""K""#).unwrap();
        assert_eq!(column, Column::K);
    }
}
