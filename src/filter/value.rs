use std::{borrow::Cow, fmt::Display};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::FilterError;

/**
 * The declared type of a column
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /**
     * Only a value can be null, a column is never declared as null
     */
    #[serde(skip)]
    Null,
    #[serde(rename = "boolean", alias = "bool")]
    Bool,
    Long,
    Double,
    String,
    /**
     * Structured or semi-structured value, kept as a JSON document
     */
    Json,
    Timestamp,
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Null => write!(f, "null"),
            ValueType::Bool => write!(f, "boolean"),
            ValueType::Long => write!(f, "long"),
            ValueType::Double => write!(f, "double"),
            ValueType::String => write!(f, "string"),
            ValueType::Json => write!(f, "json"),
            ValueType::Timestamp => write!(f, "timestamp"),
        }
    }
}

/**
 * One cell of a record.
 */
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    String(Cow<'static, str>),
    Json(serde_json::Value),
    Timestamp(DateTime<Utc>),
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(v),
            Value::Long(v) => serde_json::Value::Number(v.into()),
            // NaN and infinities have no JSON representation
            Value::Double(v) => Number::from_f64(v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(v) => serde_json::Value::String(v.into()),
            Value::Json(v) => v,
            Value::Timestamp(v) => serde_json::Value::String(v.to_rfc3339()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Long(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<Cow<'static, str>> for Value {
    fn from(value: Cow<'static, str>) -> Self {
        Value::String(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into())
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::String(value.into())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl Value {
    /**
     * Get the type of the value
     */
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Long(_) => ValueType::Long,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
            Value::Json(_) => ValueType::Json,
            Value::Timestamp(_) => ValueType::Timestamp,
        }
    }

    /**
     * True if the value is null
     */
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn get_bool(&self) -> Result<bool, FilterError> {
        match self {
            Value::Bool(v) => Ok(*v),
            _ => Err(FilterError::InvalidValueType(
                self.value_type(),
                ValueType::Bool,
            )),
        }
    }

    /**
     * Get the long value, numbers are never coerced between types
     */
    pub fn get_long(&self) -> Result<i64, FilterError> {
        match self {
            Value::Long(v) => Ok(*v),
            _ => Err(FilterError::InvalidValueType(
                self.value_type(),
                ValueType::Long,
            )),
        }
    }

    pub fn get_double(&self) -> Result<f64, FilterError> {
        match self {
            Value::Double(v) => Ok(*v),
            _ => Err(FilterError::InvalidValueType(
                self.value_type(),
                ValueType::Double,
            )),
        }
    }

    pub fn get_string(&self) -> Result<&str, FilterError> {
        match self {
            Value::String(v) => Ok(v.as_ref()),
            _ => Err(FilterError::InvalidValueType(
                self.value_type(),
                ValueType::String,
            )),
        }
    }

    pub fn get_json(&self) -> Result<&serde_json::Value, FilterError> {
        match self {
            Value::Json(v) => Ok(v),
            _ => Err(FilterError::InvalidValueType(
                self.value_type(),
                ValueType::Json,
            )),
        }
    }

    pub fn get_timestamp(&self) -> Result<DateTime<Utc>, FilterError> {
        match self {
            Value::Timestamp(v) => Ok(*v),
            _ => Err(FilterError::InvalidValueType(
                self.value_type(),
                ValueType::Timestamp,
            )),
        }
    }

    /**
     * Build a value of the given type from a JSON document, used by hosts that receive rows as JSON.
     * Timestamps are accepted as RFC 3339 strings or as seconds since the epoch.
     */
    pub fn from_json(value: serde_json::Value, value_type: ValueType) -> Result<Value, FilterError> {
        let format_error = |v: &serde_json::Value| FilterError::FormatError(v.to_string(), value_type);
        Ok(match (value_type, value) {
            (_, serde_json::Value::Null) => Value::Null,
            (ValueType::Bool, serde_json::Value::Bool(b)) => Value::Bool(b),
            (ValueType::Long, serde_json::Value::Number(n)) => {
                Value::Long(n.as_i64().ok_or_else(|| format_error(&n.clone().into()))?)
            }
            (ValueType::Double, serde_json::Value::Number(n)) => {
                Value::Double(n.as_f64().ok_or_else(|| format_error(&n.clone().into()))?)
            }
            (ValueType::String, serde_json::Value::String(s)) => Value::String(s.into()),
            (ValueType::Json, v) => Value::Json(v),
            (ValueType::Timestamp, serde_json::Value::String(s)) => Value::Timestamp(
                DateTime::parse_from_rfc3339(&s)
                    .map_err(|_| FilterError::FormatError(s.clone(), value_type))?
                    .with_timezone(&Utc),
            ),
            (ValueType::Timestamp, serde_json::Value::Number(n)) => Value::Timestamp(
                n.as_i64()
                    .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
                    .ok_or_else(|| format_error(&n.clone().into()))?,
            ),
            (_, v) => Err(format_error(&v))?,
        })
    }
}
