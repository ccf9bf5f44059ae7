//! Value - polymorphic row cell type
//!
//! A cell in a source row holds one of three shapes: a string, a number,
//! or null. The source's dynamically-typed property bags are replaced by
//! this explicit sum type; property copy into node properties becomes
//! name-based lookup with a documented skip on miss.
//!
//! ## Canonical text
//!
//! [`Value::canonical_text`] is the stable textual form used when hashing a
//! row for change classification. Numbers that are mathematically integral
//! render without a fractional part (`4` not `4.0`), so a source that
//! round-trips `4` through a float column does not register as a change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Polymorphic value for a row cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// String value
    String(String),
    /// Numeric value (64-bit float; source columns are untyped)
    Number(f64),
    /// Null/absent value
    Null,
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create a numeric value
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as f64 if this is a number
    ///
    /// Numeric strings are not coerced; a `"4.0"` string stays a string.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Canonical textual form, stable across runs
    pub fn canonical_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Value::Null => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}
