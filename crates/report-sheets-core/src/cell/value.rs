//! Cell contents and native cell kinds

use std::fmt;

static BLANK: CellValue = CellValue::Blank;

/// Native storage kind of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum CellKind {
    Blank,
    Numeric,
    String,
    Boolean,
    Error,
    Formula,
}

/// Value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No content (a blank cell may still carry a style)
    #[default]
    Blank,

    /// Numeric value; dates are serial numbers with a date number format
    Number(f64),

    /// Text value
    Text(String),

    /// Boolean value
    Boolean(bool),

    /// Error value (#VALUE!, #REF!, ...)
    Error(CellError),

    /// Formula with its last calculated result
    Formula {
        /// Formula text without the leading `=`
        text: String,
        /// Cached result, `None` when never calculated
        cached: Option<Box<CellValue>>,
    },
}

impl CellValue {
    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Create a formula value without a cached result
    ///
    /// A leading `=` is stripped.
    pub fn formula(text: impl AsRef<str>) -> Self {
        let text = text.as_ref();
        CellValue::Formula {
            text: text.strip_prefix('=').unwrap_or(text).to_string(),
            cached: None,
        }
    }

    /// Create a formula value carrying a cached result
    pub fn formula_with_result(text: impl AsRef<str>, cached: CellValue) -> Self {
        match Self::formula(text) {
            CellValue::Formula { text, .. } => CellValue::Formula {
                text,
                cached: Some(Box::new(cached)),
            },
            other => other,
        }
    }

    /// Native kind of this value
    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Blank => CellKind::Blank,
            CellValue::Number(_) => CellKind::Numeric,
            CellValue::Text(_) => CellKind::String,
            CellValue::Boolean(_) => CellKind::Boolean,
            CellValue::Error(_) => CellKind::Error,
            CellValue::Formula { .. } => CellKind::Formula,
        }
    }

    /// Kind of the cached formula result; `Blank` when never calculated
    pub fn cached_kind(&self) -> Option<CellKind> {
        match self {
            CellValue::Formula { cached, .. } => {
                Some(cached.as_ref().map_or(CellKind::Blank, |v| v.kind()))
            }
            _ => None,
        }
    }

    /// Cached result for formulas, the value itself otherwise
    pub fn effective(&self) -> &CellValue {
        match self {
            CellValue::Formula {
                cached: Some(v), ..
            } => v.effective(),
            CellValue::Formula { cached: None, .. } => &BLANK,
            _ => self,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula { .. })
    }

    /// Numeric content (formulas answer with their cached result)
    pub fn as_number(&self) -> Option<f64> {
        match self.effective() {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text content (formulas answer with their cached result)
    pub fn as_text(&self) -> Option<&str> {
        match self.effective() {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content (formulas answer with their cached result)
    pub fn as_bool(&self) -> Option<bool> {
        match self.effective() {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Formula text if this is a formula cell
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellValue::Formula { text, .. } => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Blank => Ok(()),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Error(e) => write!(f, "{e}"),
            CellValue::Formula {
                cached: Some(v), ..
            } => write!(f, "{v}"),
            CellValue::Formula { text, .. } => write!(f, "={text}"),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Spreadsheet error values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #NULL!
    Null,
    /// #DIV/0!
    Div0,
    /// #VALUE!
    Value,
    /// #REF!
    Ref,
    /// #NAME?
    Name,
    /// #NUM!
    Num,
    /// #N/A
    Na,
    /// #GETTING_DATA
    GettingData,
}

impl CellError {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::Na => "#N/A",
            CellError::GettingData => "#GETTING_DATA",
        }
    }

    /// Parse the display text of an error value
    pub fn parse(s: &str) -> Option<Self> {
        let error = match s.trim().to_ascii_uppercase().as_str() {
            "#NULL!" => CellError::Null,
            "#DIV/0!" => CellError::Div0,
            "#VALUE!" => CellError::Value,
            "#REF!" => CellError::Ref,
            "#NAME?" => CellError::Name,
            "#NUM!" => CellError::Num,
            "#N/A" => CellError::Na,
            "#GETTING_DATA" => CellError::GettingData,
            _ => return None,
        };
        Some(error)
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_strips_equals() {
        let value = CellValue::formula("=SUM(A1:A3)");
        assert_eq!(value.formula_text(), Some("SUM(A1:A3)"));
        assert_eq!(value.kind(), CellKind::Formula);
        assert_eq!(value.cached_kind(), Some(CellKind::Blank));
    }

    #[test]
    fn test_cached_result() {
        let value = CellValue::formula_with_result("A1*2", CellValue::Number(4.0));
        assert_eq!(value.cached_kind(), Some(CellKind::Numeric));
        assert_eq!(value.as_number(), Some(4.0));
        assert_eq!(value.as_text(), None);
        assert_eq!(value.to_string(), "4");
    }

    #[test]
    fn test_error_parse() {
        assert_eq!(CellError::parse("#div/0!"), Some(CellError::Div0));
        assert_eq!(CellError::parse("#N/A"), Some(CellError::Na));
        assert_eq!(CellError::parse("oops"), None);
        assert_eq!(CellValue::from(CellError::Ref).to_string(), "#REF!");
    }
}
