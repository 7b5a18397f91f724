//! Cell references, inclusive regions and column-letter conversion

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// Convert a 0-based column index to its letter name (0 = A, 25 = Z, 26 = AA)
pub fn column_to_letters(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = u64::from(index) + 1;
    while n > 0 {
        letters.push((b'A' + ((n - 1) % 26) as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Convert a column letter name to its 0-based index ("A" = 0, "AA" = 26)
///
/// Letters are accepted in either case.
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress(letters.to_string()));
    }

    let mut value: u64 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(letters.to_string()));
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as u64 + 1;
        value = value * 26 + digit;
        if value > u64::from(u32::MAX) {
            return Err(Error::InvalidAddress(letters.to_string()));
        }
    }
    Ok((value - 1) as u32)
}

/// A single cell reference (0-based row and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    /// Create a reference from 0-based indices
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse an A1-style reference; `$` anchors are ignored
    pub fn parse(s: &str) -> Result<Self> {
        let cleaned: String = s.trim().chars().filter(|c| *c != '$').collect();
        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::InvalidAddress(s.to_string()))?;
        let (letters, digits) = cleaned.split_at(split);

        let col = letters_to_column(letters).map_err(|_| Error::InvalidAddress(s.to_string()))?;
        if col >= u32::from(MAX_COLS) {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(s.to_string()))?;
        if row == 0 || row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }

        Ok(Self::new(row - 1, col as u16))
    }

    /// A1-style text with `$` anchors on both parts
    pub fn to_absolute_string(&self) -> String {
        format!("${}${}", column_to_letters(u32::from(self.col)), self.row + 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_to_letters(u32::from(self.col)), self.row + 1)
    }
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An inclusive rectangular block of cells (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRegion {
    pub first_row: u32,
    pub last_row: u32,
    pub first_col: u16,
    pub last_col: u16,
}

impl CellRegion {
    /// Create a region, normalizing the corner order
    pub fn new(first_row: u32, first_col: u16, last_row: u32, last_col: u16) -> Self {
        Self {
            first_row: first_row.min(last_row),
            last_row: first_row.max(last_row),
            first_col: first_col.min(last_col),
            last_col: first_col.max(last_col),
        }
    }

    /// A region covering one cell
    pub fn single(row: u32, col: u16) -> Self {
        Self::new(row, col, row, col)
    }

    /// Region between two cell references
    pub fn from_refs(start: CellRef, end: CellRef) -> Self {
        Self::new(start.row, start.col, end.row, end.col)
    }

    /// Parse `A1:C3` or a single `B2`
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((start, end)) => {
                let start = CellRef::parse(start).map_err(|_| Error::InvalidRegion(s.into()))?;
                let end = CellRef::parse(end).map_err(|_| Error::InvalidRegion(s.into()))?;
                Ok(Self::from_refs(start, end))
            }
            None => {
                let cell = CellRef::parse(s).map_err(|_| Error::InvalidRegion(s.into()))?;
                Ok(Self::single(cell.row, cell.col))
            }
        }
    }

    /// Top-left corner
    pub fn start(&self) -> CellRef {
        CellRef::new(self.first_row, self.first_col)
    }

    /// Bottom-right corner
    pub fn end(&self) -> CellRef {
        CellRef::new(self.last_row, self.last_col)
    }

    /// Number of rows covered
    pub fn row_count(&self) -> u32 {
        self.last_row - self.first_row + 1
    }

    /// Number of columns covered
    pub fn col_count(&self) -> u16 {
        self.last_col - self.first_col + 1
    }

    /// True when the region covers exactly one cell
    pub fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }

    /// Check whether a cell lies inside the region
    pub fn contains(&self, row: u32, col: u16) -> bool {
        row >= self.first_row && row <= self.last_row && col >= self.first_col && col <= self.last_col
    }

    /// Check whether two regions share at least one cell
    pub fn overlaps(&self, other: &CellRegion) -> bool {
        self.first_row <= other.last_row
            && other.first_row <= self.last_row
            && self.first_col <= other.last_col
            && other.first_col <= self.last_col
    }

    /// Move the region vertically; `None` when it would leave the sheet
    pub fn shift_rows(&self, delta: i64) -> Option<CellRegion> {
        let first = i64::from(self.first_row) + delta;
        let last = i64::from(self.last_row) + delta;
        if first < 0 || last >= i64::from(MAX_ROWS) {
            return None;
        }
        Some(CellRegion {
            first_row: first as u32,
            last_row: last as u32,
            ..*self
        })
    }

    /// Iterate over every `(row, col)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16)> + '_ {
        (self.first_row..=self.last_row)
            .flat_map(move |row| (self.first_col..=self.last_col).map(move |col| (row, col)))
    }

    /// `$A$1:$B$2` form used by defined names and list sources
    pub fn to_absolute_string(&self) -> String {
        if self.is_single_cell() {
            self.start().to_absolute_string()
        } else {
            format!(
                "{}:{}",
                self.start().to_absolute_string(),
                self.end().to_absolute_string()
            )
        }
    }
}

impl fmt::Display for CellRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.start())
        } else {
            write!(f, "{}:{}", self.start(), self.end())
        }
    }
}

impl FromStr for CellRegion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_to_letters(0), "A");
        assert_eq!(column_to_letters(25), "Z");
        assert_eq!(column_to_letters(26), "AA");
        assert_eq!(column_to_letters(51), "AZ");
        assert_eq!(column_to_letters(701), "ZZ");
        assert_eq!(column_to_letters(702), "AAA");
        assert_eq!(column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(letters_to_column("A").unwrap(), 0);
        assert_eq!(letters_to_column("z").unwrap(), 25);
        assert_eq!(letters_to_column("AA").unwrap(), 26);
        assert_eq!(letters_to_column("XFD").unwrap(), 16383);
        assert!(letters_to_column("").is_err());
        assert!(letters_to_column("A1").is_err());
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(CellRef::parse("A1").unwrap(), CellRef::new(0, 0));
        assert_eq!(CellRef::parse("$C$12").unwrap(), CellRef::new(11, 2));
        assert!(CellRef::parse("A0").is_err());
        assert!(CellRef::parse("12").is_err());
        assert!(CellRef::parse("ZZZZ1").is_err());
        assert_eq!(CellRef::new(11, 2).to_string(), "C12");
        assert_eq!(CellRef::new(11, 2).to_absolute_string(), "$C$12");
    }

    #[test]
    fn test_region_parse_and_display() {
        let region = CellRegion::parse("C3:A1").unwrap();
        assert_eq!(region, CellRegion::new(0, 0, 2, 2));
        assert_eq!(region.to_string(), "A1:C3");
        assert_eq!(region.to_absolute_string(), "$A$1:$C$3");
        assert_eq!(CellRegion::parse("B2").unwrap().to_string(), "B2");
        assert_eq!(region.cells().count(), 9);
    }

    #[test]
    fn test_region_overlap_and_shift() {
        let a = CellRegion::parse("H2:I2").unwrap();
        let b = CellRegion::parse("I2:J3").unwrap();
        let c = CellRegion::parse("H3:I3").unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.shift_rows(1), Some(c));
        assert_eq!(a.shift_rows(-2), None);
    }
}
