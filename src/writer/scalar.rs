// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Typed scalar values and their engine encodings.
//!
//! [`Scalar`] is the closed set of leaf values the expression algebra
//! carries. Dates render as `YYYY-MM-DD`, timestamps as UTC RFC 3339 with
//! millisecond precision. Identifiers are carried as their natural scalar
//! form: numeric if numeric, else string.

use std::io::Write;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::writer::JsonWriter;

/// A typed scalar value in the query algebra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl Scalar {
    /// Render this value as a single JSON token.
    ///
    /// Non-finite floats are a caller bug and fail as unsupported input
    /// before reaching the output sink.
    pub fn write_to<W: Write>(&self, json: &mut JsonWriter<W>) -> Result<(), QueryError> {
        match self {
            Scalar::Bool(v) => json.write_bool(*v)?,
            Scalar::Int(v) => json.write_i64(*v)?,
            Scalar::UInt(v) => json.write_u64(*v)?,
            Scalar::Float(v) => {
                if !v.is_finite() {
                    return Err(QueryError::UnsupportedScalar(format!(
                        "non-finite float {}",
                        v
                    )));
                }
                json.write_f64(*v)?;
            }
            Scalar::Str(v) => json.write_string(v)?,
            Scalar::Date(v) => json.write_string(&v.format("%Y-%m-%d").to_string())?,
            Scalar::DateTime(v) => {
                json.write_string(&v.to_rfc3339_opts(SecondsFormat::Millis, true))?
            }
        }
        Ok(())
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::UInt(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(v: NaiveDate) -> Self {
        Scalar::Date(v)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(v: DateTime<Utc>) -> Self {
        Scalar::DateTime(v)
    }
}

/// Boundary conversion for callers holding loose JSON values.
/// Nulls, arrays and objects have no scalar form.
impl TryFrom<serde_json::Value> for Scalar {
    type Error = QueryError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Bool(v) => Ok(Scalar::Bool(v)),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Ok(Scalar::Int(v))
                } else if let Some(v) = n.as_u64() {
                    Ok(Scalar::UInt(v))
                } else if let Some(v) = n.as_f64() {
                    Ok(Scalar::Float(v))
                } else {
                    Err(QueryError::UnsupportedScalar(n.to_string()))
                }
            }
            serde_json::Value::String(v) => Ok(Scalar::Str(v)),
            other => Err(QueryError::UnsupportedScalar(format!(
                "JSON {} has no scalar form",
                match other {
                    serde_json::Value::Null => "null",
                    serde_json::Value::Array(_) => "array",
                    _ => "object",
                }
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn render(s: &Scalar) -> String {
        let mut json = JsonWriter::new(Vec::new());
        s.write_to(&mut json).unwrap();
        json.into_string().unwrap()
    }

    #[test]
    fn test_primitive_encodings() {
        assert_eq!(render(&Scalar::Bool(true)), "true");
        assert_eq!(render(&Scalar::Int(-7)), "-7");
        assert_eq!(render(&Scalar::UInt(42)), "42");
        assert_eq!(render(&Scalar::Float(2.0)), "2.0");
        assert_eq!(render(&Scalar::from("Rob")), "\"Rob\"");
    }

    #[test]
    fn test_date_encoding() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
        assert_eq!(render(&Scalar::Date(date)), "\"2024-05-14\"");
    }

    #[test]
    fn test_datetime_encoding_millis_utc() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 14, 10, 30, 0).unwrap();
        assert_eq!(render(&Scalar::DateTime(ts)), "\"2024-05-14T10:30:00.000Z\"");
    }

    #[test]
    fn test_non_finite_float_is_unsupported() {
        let mut json = JsonWriter::new(Vec::new());
        let err = Scalar::Float(f64::INFINITY).write_to(&mut json).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedScalar(_)));
    }

    #[test]
    fn test_try_from_json_value() {
        assert_eq!(
            Scalar::try_from(serde_json::json!(1)).unwrap(),
            Scalar::Int(1)
        );
        assert_eq!(
            Scalar::try_from(serde_json::json!("x")).unwrap(),
            Scalar::Str("x".into())
        );
        assert!(Scalar::try_from(serde_json::json!(null)).is_err());
        assert!(Scalar::try_from(serde_json::json!([1, 2])).is_err());
        assert!(Scalar::try_from(serde_json::json!({"a": 1})).is_err());
    }
}
