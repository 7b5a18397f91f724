//! Value coercion shared by the entity model and the cell capabilities

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{Error, Result};

const DATE_PATTERNS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M:%S"];

/// Plain decimal text of a number, never in scientific notation
pub fn number_string(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    Decimal::from_f64(n)
        .map(|d| d.normalize().to_string())
        .unwrap_or_else(|| n.to_string())
}

/// Text form of a JSON value; null is empty
pub fn value_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), number_string),
        other => other.to_string(),
    }
}

/// Parse decimal text; plain and scientific notation are accepted
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| Error::coercion(text, "number"))
}

/// Strict decimal coercion; null is `None`
pub fn decimal_of(value: &Value) -> Result<Option<Decimal>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .and_then(Decimal::from_f64)
            .map(Some)
            .ok_or_else(|| Error::coercion(n, "number")),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_decimal(s).map(Some),
        Value::Bool(b) => Ok(Some(Decimal::from(u8::from(*b)))),
        other => Err(Error::coercion(other, "number")),
    }
}

pub fn decimal_to_f64(value: Decimal) -> Result<f64> {
    value.to_f64().ok_or_else(|| Error::coercion(value, "number"))
}

/// Parse `yyyy-MM-dd`, optionally followed by a time
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DATE_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
}

/// Milliseconds since the Unix epoch, the date read as UTC
pub fn datetime_to_millis(datetime: NaiveDateTime) -> i64 {
    datetime.and_utc().timestamp_millis()
}

pub fn millis_to_datetime(millis: i64) -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Strict date coercion: epoch millis or date text; null is `None`
pub fn date_of(value: &Value) -> Result<Option<NaiveDateTime>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .and_then(millis_to_datetime)
            .map(Some)
            .ok_or_else(|| Error::coercion(n, "date")),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| Error::coercion(s, "date")),
        other => Err(Error::coercion(other, "date")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_string_avoids_exponent() {
        assert_eq!(number_string(18_700_000_000.0), "18700000000");
        assert_eq!(number_string(12.5), "12.5");
        assert_eq!(number_string(-3.0), "-3");
        assert!(!number_string(1e-7).contains('e'));
    }

    #[test]
    fn test_decimal_coercion() {
        assert_eq!(decimal_of(&json!("12.50")).unwrap(), Some(Decimal::new(1250, 2)));
        assert_eq!(decimal_of(&json!(true)).unwrap(), Some(Decimal::ONE));
        assert_eq!(decimal_of(&Value::Null).unwrap(), None);
        assert!(matches!(
            decimal_of(&json!("abc")),
            Err(Error::CoercionFailure { target: "number", .. })
        ));
    }

    #[test]
    fn test_dates() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!(date.to_string(), "2024-01-15 00:00:00");
        assert_eq!(parse_date("2024-01-15 08:30:00").unwrap().to_string(), "2024-01-15 08:30:00");
        assert!(parse_date("15/01/2024").is_none());

        let millis = datetime_to_millis(date);
        assert_eq!(millis_to_datetime(millis), Some(date));
        assert_eq!(date_of(&json!(millis)).unwrap(), Some(date));
        assert!(date_of(&json!("soon")).is_err());
    }
}
