//! Declared data types of logical cells

use report_sheets_core::CellKind;
use serde::{Deserialize, Serialize};

/// Declared type of a logical cell, serialized by upper-case name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    /// Running sequence number
    Seq,
    Number,
    BigDecimal,
    Double,
    Float,
    Long,
    Integer,
    Short,
    String,
    Text,
    Date,
    Percent,
    Formula,
}

impl DataType {
    /// Native kind the value is stored as
    pub fn kind(self) -> CellKind {
        match self {
            DataType::String | DataType::Text => CellKind::String,
            DataType::Formula => CellKind::Formula,
            _ => CellKind::Numeric,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.kind() == CellKind::Numeric
    }

    pub fn comment(self) -> &'static str {
        match self {
            DataType::Seq => "sequence number",
            DataType::Number => "number",
            DataType::BigDecimal => "exact decimal",
            DataType::Double => "double-precision number",
            DataType::Float => "single-precision number",
            DataType::Long => "64-bit integer",
            DataType::Integer => "32-bit integer",
            DataType::Short => "16-bit integer",
            DataType::String => "short text",
            DataType::Text => "text",
            DataType::Date => "date",
            DataType::Percent => "percentage",
            DataType::Formula => "formula",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(DataType::Date.kind(), CellKind::Numeric);
        assert_eq!(DataType::Percent.kind(), CellKind::Numeric);
        assert_eq!(DataType::Text.kind(), CellKind::String);
        assert_eq!(DataType::Formula.kind(), CellKind::Formula);
        assert!(!DataType::String.is_numeric());
    }

    #[test]
    fn test_names() {
        assert_eq!(serde_json::to_string(&DataType::BigDecimal).unwrap(), r#""BIGDECIMAL""#);
        let parsed: DataType = serde_json::from_str(r#""SEQ""#).unwrap();
        assert_eq!(parsed, DataType::Seq);
    }
}
