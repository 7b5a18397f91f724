//! Formula text helpers: aggregate builders and row-number rewriting

use report_sheets_core::formula::{map_row_references, replace_row_numbers};

use crate::coordinate::Range;

/// Placeholder for the row number in a formula template
pub const ROW_PLACEHOLDER: &str = "{0}";

/// Aggregate formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formula {
    Sum,
    Avg,
}

impl Formula {
    pub fn name(self) -> &'static str {
        match self {
            Formula::Sum => "SUM",
            Formula::Avg => "AVG",
        }
    }

    /// `NAME(start:end)` over a range
    pub fn of(self, range: &Range) -> String {
        self.of_cells(&range.start.address(), &range.end.address())
    }

    /// `NAME(start:end)` between two addresses
    pub fn of_cells(self, start: &str, end: &str) -> String {
        format!("{}({start}:{end})", self.name())
    }

    /// Aggregate over a list of addresses: `a+b` or `(a+b)/n`
    pub fn of_list<S: AsRef<str>>(self, addresses: &[S]) -> String {
        if addresses.is_empty() {
            return String::new();
        }
        let joined = addresses
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("+");
        match self {
            Formula::Sum => joined,
            Formula::Avg => format!("({joined})/{}", addresses.len()),
        }
    }
}

/// Replace relative references on row `from_rownum` with `to_rownum`
///
/// Only references whose row number equals `from_rownum` move, so a formula
/// reading several rows (`A1+A2`, `SUM(A1:A3)`) is only partly shifted.
pub fn shift_row_reference(formula: &str, from_rownum: u32, to_rownum: u32) -> String {
    map_row_references(formula, |row, absolute| {
        Some(if row == from_rownum && !absolute {
            to_rownum
        } else {
            row
        })
    })
}

/// Fill a formula template for row `rownum`
///
/// `{0}` placeholders take the row number. Without a placeholder every
/// relative row reference is set to `rownum`.
pub fn rebuild(formula: &str, rownum: u32) -> String {
    if formula.contains(ROW_PLACEHOLDER) {
        return formula.replace(ROW_PLACEHOLDER, &rownum.to_string());
    }
    map_row_references(formula, |row, absolute| Some(if absolute { row } else { rownum }))
}

/// Turn references to row `rownum` back into `{0}` placeholders
pub fn to_template(formula: &str, rownum: u32) -> String {
    replace_row_numbers(formula, |row, absolute| {
        (row == rownum && !absolute).then(|| ROW_PLACEHOLDER.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aggregates() {
        let range = Range::parse("A1:A10").unwrap();
        assert_eq!(Formula::Sum.of(&range), "SUM(A1:A10)");
        assert_eq!(Formula::Avg.of_cells("B1", "D1"), "AVG(B1:D1)");
        assert_eq!(Formula::Sum.of_list(&["A1", "A2", "A3"]), "A1+A2+A3");
        assert_eq!(Formula::Avg.of_list(&["A1", "A2"]), "(A1+A2)/2");
        assert_eq!(Formula::Sum.of_list::<&str>(&[]), "");
    }

    #[test]
    fn test_shift_single_row() {
        assert_eq!(shift_row_reference("A1+B1", 1, 5), "A5+B5");
        assert_eq!(shift_row_reference("SUM(A1:C1)", 1, 5), "SUM(A5:C5)");
        assert_eq!(shift_row_reference("A1*$B$1", 1, 5), "A5*$B$1");
    }

    #[test]
    fn test_shift_across_rows_is_partial() {
        assert_eq!(shift_row_reference("A1+A2", 1, 5), "A5+A2");
        assert_eq!(shift_row_reference("SUM(A1:A3)", 1, 5), "SUM(A5:A3)");
        assert_eq!(shift_row_reference("A1+A12", 1, 5), "A5+A12");
    }

    #[test]
    fn test_rebuild() {
        assert_eq!(rebuild("A{0}*B{0}", 100), "A100*B100");
        assert_eq!(rebuild("A1+B1", 100), "A100+B100");
        assert_eq!(rebuild("SUM(A1:C1)", 100), "SUM(A100:C100)");
        assert_eq!(rebuild("A1+A2+A3", 100), "A100+A100+A100");
    }

    #[test]
    fn test_template_round_trip() {
        let template = to_template("A9*B9-C8", 9);
        assert_eq!(template, "A{0}*B{0}-C8");
        assert_eq!(rebuild(&template, 12), "A12*B12-C8");
    }
}
