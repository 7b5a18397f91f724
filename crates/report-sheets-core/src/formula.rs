//! Row-reference rewriting for formula text
//!
//! References are recognised outside string literals and quoted sheet names.
//! A reference is a column run of one to three letters followed by a row
//! number, each part optionally anchored with `$`.

use lazy_regex::regex;

use crate::MAX_ROWS;

/// Rewrite the row number of every cell reference in `formula`
///
/// `map` receives the 1-based row number and whether the row is anchored with
/// `$`, and returns the new row number. Returning `None` replaces the whole
/// reference with `#REF!`.
pub fn map_row_references<F>(formula: &str, mut map: F) -> String
where
    F: FnMut(u32, bool) -> Option<u32>,
{
    rewrite(formula, |row, absolute| match map(row, absolute) {
        Some(new_row) => Rewrite::Row(new_row.to_string()),
        None => Rewrite::Invalid,
    })
}

/// Replace the row number text of cell references
///
/// `replace` receives the 1-based row number and whether it is anchored with
/// `$`; `None` leaves the reference as written.
pub fn replace_row_numbers<F>(formula: &str, mut replace: F) -> String
where
    F: FnMut(u32, bool) -> Option<String>,
{
    rewrite(formula, |row, absolute| {
        replace(row, absolute).map_or(Rewrite::Keep, Rewrite::Row)
    })
}

enum Rewrite {
    Keep,
    Row(String),
    Invalid,
}

fn rewrite<F>(formula: &str, mut map: F) -> String
where
    F: FnMut(u32, bool) -> Rewrite,
{
    let mut out = String::with_capacity(formula.len());
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in formula.char_indices() {
        match quote {
            Some(q) if c == q => {
                out.push_str(&formula[start..=i]);
                start = i + 1;
                quote = None;
            }
            Some(_) => {}
            None if c == '"' || c == '\'' => {
                rewrite_segment(&formula[start..i], &mut map, &mut out);
                start = i;
                quote = Some(c);
            }
            None => {}
        }
    }

    if quote.is_some() {
        out.push_str(&formula[start..]);
    } else {
        rewrite_segment(&formula[start..], &mut map, &mut out);
    }
    out
}

/// Shift every relative row reference by `delta`; `$`-anchored rows stay put
pub fn shift_relative_rows(formula: &str, delta: i64) -> String {
    if delta == 0 {
        return formula.to_string();
    }
    map_row_references(formula, |row, absolute| {
        if absolute {
            return Some(row);
        }
        let target = i64::from(row) + delta;
        (1..=i64::from(MAX_ROWS))
            .contains(&target)
            .then_some(target as u32)
    })
}

fn rewrite_segment<F>(segment: &str, map: &mut F, out: &mut String)
where
    F: FnMut(u32, bool) -> Rewrite,
{
    let reference = regex!(r"(\$?)([A-Za-z]{1,3})(\$?)([0-9]+)");
    let mut last = 0;

    for caps in reference.captures_iter(segment) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let before = segment[..whole.start()].chars().next_back();
        let after = segment[whole.end()..].chars().next();
        if before.map_or(false, is_name_char)
            || after.map_or(false, |c| is_name_char(c) || c == '(' || c == '!')
        {
            continue;
        }
        let row = match caps[4].parse::<u32>() {
            Ok(row) if row > 0 => row,
            _ => continue,
        };

        out.push_str(&segment[last..whole.start()]);
        match map(row, !caps[3].is_empty()) {
            Rewrite::Keep => out.push_str(whole.as_str()),
            Rewrite::Row(new_row) => {
                out.push_str(&caps[1]);
                out.push_str(&caps[2]);
                out.push_str(&caps[3]);
                out.push_str(&new_row);
            }
            Rewrite::Invalid => out.push_str("#REF!"),
        }
        last = whole.end();
    }
    out.push_str(&segment[last..]);
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_relative_rows() {
        assert_eq!(shift_relative_rows("A1+B1", 4), "A5+B5");
        assert_eq!(shift_relative_rows("SUM(A1:C3)", 2), "SUM(A3:C5)");
        assert_eq!(shift_relative_rows("A10*2", -3), "A7*2");
    }

    #[test]
    fn test_anchored_rows_stay() {
        assert_eq!(shift_relative_rows("$A$1+A$2+$B3", 5), "$A$1+A$2+$B8");
    }

    #[test]
    fn test_quoted_text_untouched() {
        assert_eq!(
            shift_relative_rows(r#"IF(A1>0,"B1","C2")"#, 1),
            r#"IF(A2>0,"B1","C2")"#
        );
        assert_eq!(shift_relative_rows("'Q1 2024'!B2*2", 1), "'Q1 2024'!B3*2");
    }

    #[test]
    fn test_functions_and_names_untouched() {
        assert_eq!(shift_relative_rows("LOG10(A1)", 1), "LOG10(A2)");
        assert_eq!(shift_relative_rows("Sheet1!A1", 1), "Sheet1!A2");
        assert_eq!(shift_relative_rows("TOTAL_2024+A1", 1), "TOTAL_2024+A2");
    }

    #[test]
    fn test_out_of_sheet_becomes_ref_error() {
        assert_eq!(shift_relative_rows("A1+B3", -2), "#REF!+B1");
    }

    #[test]
    fn test_map_row_references() {
        let deleted = 3;
        let result = map_row_references("A2+A3+A4", |row, _| match row {
            r if r == deleted => None,
            r if r > deleted => Some(r - 1),
            r => Some(r),
        });
        assert_eq!(result, "A2+#REF!+A3");
    }

    #[test]
    fn test_replace_row_numbers() {
        let result = replace_row_numbers("A7*B7+C$7-D8", |row, absolute| {
            (row == 7 && !absolute).then(|| "{0}".to_string())
        });
        assert_eq!(result, "A{0}*B{0}+C$7-D8");
    }
}
