//! Cell values returned by the appliance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell of query data.
///
/// The appliance transports most cells as strings; [`ColumnType::coerce`]
/// turns them into native numbers according to the legend.
///
/// [`ColumnType::coerce`]: super::ColumnType::coerce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Convert to an integer if possible, otherwise return the value unchanged.
    pub fn into_int(self) -> Value {
        match self {
            Value::Text(s) => match s.trim().parse::<i64>() {
                Ok(n) => Value::Int(n),
                Err(_) => Value::Text(s),
            },
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 => Value::Int(f as i64),
            other => other,
        }
    }

    /// Convert to a float if possible, otherwise return the value unchanged.
    pub fn into_float(self) -> Value {
        match self {
            Value::Text(s) => match s.trim().parse::<f64>() {
                Ok(f) => Value::Float(f),
                Err(_) => Value::Text(s),
            },
            Value::Int(n) => Value::Float(n as f64),
            other => other,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}
