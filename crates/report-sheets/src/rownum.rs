//! Mutable 1-based row-number counter

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 1-based row number that can be advanced in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rownum(u32);

impl Rownum {
    /// Row number 1
    pub fn one() -> Self {
        Rownum(1)
    }

    pub fn of(rownum: u32) -> Self {
        Rownum(rownum)
    }

    /// Row number of a 0-based row index
    pub fn of_index(index: u32) -> Self {
        Rownum(index + 1)
    }

    /// Increment, then return the counter
    pub fn next(&mut self) -> &mut Self {
        self.0 += 1;
        self
    }

    pub fn set(&mut self, rownum: i64) -> Result<&mut Self> {
        self.0 = u32::try_from(rownum)
            .map_err(|_| Error::invalid(format!("row number {rownum}")))?;
        Ok(self)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Return the current row number, then increment
    pub fn poll(&mut self) -> u32 {
        let current = self.0;
        self.0 += 1;
        current
    }

    /// 0-based row index
    pub fn index(&self) -> u32 {
        self.0.saturating_sub(1)
    }
}

impl Default for Rownum {
    fn default() -> Self {
        Rownum::one()
    }
}

impl fmt::Display for Rownum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        let mut rownum = Rownum::one();
        assert_eq!(rownum.next().get(), 2);
        assert_eq!(rownum.poll(), 2);
        assert_eq!(rownum.get(), 3);
        assert_eq!(rownum.index(), 2);

        rownum.set(10).unwrap();
        assert_eq!(rownum, Rownum::of(10));
        assert!(rownum.set(-1).is_err());
        assert_eq!(rownum.get(), 10);
        assert_eq!(Rownum::of_index(4), Rownum::of(5));
    }
}
