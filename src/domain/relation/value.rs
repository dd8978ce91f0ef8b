//! Cell values carried by relations and local tables

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A single cell value
///
/// Variant order matters for deserialization: date-shaped strings become
/// `Date`, everything else that is a string stays `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Date(_) => "date",
            Self::Text(_) => "text",
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Calendar date of the value
    ///
    /// Text is accepted as `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339.
    pub fn as_date(&self) -> Result<Option<NaiveDate>, DomainError> {
        match self {
            Self::Null => Ok(None),
            Self::Date(date) => Ok(Some(*date)),
            Self::Text(text) => parse_date(text).map(Some).ok_or_else(|| {
                DomainError::inference(format!("Cannot interpret '{}' as a date", text))
            }),
            other => Err(DomainError::inference(format!(
                "Expected a date, got {}",
                other.type_name()
            ))),
        }
    }

    /// Month (1-12) of a date-like value; null stays null
    pub fn month(&self) -> Result<Value, DomainError> {
        Ok(match self.as_date()? {
            Some(date) => Value::Int(i64::from(date.month())),
            None => Value::Null,
        })
    }

    /// Equality with SQL semantics: any comparison involving null is unknown
    pub fn sql_eq(&self, other: &Value) -> Option<bool> {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => None,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => {
                Some((*a as f64) == *b)
            }
            (a, b) => Some(a == b),
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }

    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|datetime| datetime.date_naive())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_detects_dates() {
        let values: Vec<Value> =
            serde_json::from_str(r#"[null, true, 3, 2.5, "2024-01-15", "S1"]"#).unwrap();

        assert_eq!(values[0], Value::Null);
        assert_eq!(values[1], Value::Bool(true));
        assert_eq!(values[2], Value::Int(3));
        assert_eq!(values[3], Value::Float(2.5));
        assert_eq!(
            values[4],
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(values[5], Value::Text("S1".to_string()));
    }

    #[test]
    fn test_serialize_date_as_iso_string() {
        let value = Value::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"2024-02-01\"");
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
    }

    #[test]
    fn test_month_of_dates_and_text() {
        let date = Value::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(date.month().unwrap(), Value::Int(3));

        assert_eq!(Value::from("2024-01-31").month().unwrap(), Value::Int(1));
        assert_eq!(
            Value::from("2024-11-02 08:30:00").month().unwrap(),
            Value::Int(11)
        );
        assert_eq!(
            Value::from("2024-07-04T10:00:00Z").month().unwrap(),
            Value::Int(7)
        );
        assert_eq!(Value::Null.month().unwrap(), Value::Null);
    }

    #[test]
    fn test_month_rejects_non_dates() {
        assert!(Value::from("yesterday").month().is_err());
        assert!(Value::Int(20240101).month().is_err());
    }

    #[test]
    fn test_sql_eq() {
        assert_eq!(Value::Int(1).sql_eq(&Value::Int(1)), Some(true));
        assert_eq!(Value::Int(1).sql_eq(&Value::Float(1.0)), Some(true));
        assert_eq!(Value::Int(1).sql_eq(&Value::Int(2)), Some(false));
        assert_eq!(Value::Null.sql_eq(&Value::Int(1)), None);
    }
}
