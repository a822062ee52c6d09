//! Typed field values and payload coercion.
//!
//! Stream payloads arrive untyped. [`FieldValue::coerce`] turns one payload
//! into a scalar by trying, in order:
//!
//! 1. the literal `false` → `Integer(0)`
//! 2. the literal `true` → `Integer(1)`
//! 3. a base-10 integer → `Integer`
//! 4. a finite floating-point number → `Float`
//! 5. anything else → `String`, verbatim
//!
//! Booleans are deliberately folded into `Integer(0/1)`; once stored they
//! cannot be told apart from a genuine `0`/`1` payload. Downstream consumers
//! of the JSON snapshot rely on that shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar field value as stored in a [`Snapshot`](crate::Snapshot).
///
/// Serializes as a bare JSON scalar (number or string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    String(String),
}

impl FieldValue {
    /// Coerces a textual payload into a typed value. Never fails.
    #[must_use]
    pub fn coerce(payload: &str) -> Self {
        match payload {
            "false" => return Self::Integer(0),
            "true" => return Self::Integer(1),
            _ => {}
        }

        if let Ok(int) = payload.parse::<i64>() {
            return Self::Integer(int);
        }

        // `f64::from_str` also accepts "inf" and "NaN", which have no JSON
        // representation; those stay strings.
        match payload.parse::<f64>() {
            Ok(float) if float.is_finite() => Self::Float(float),
            _ => Self::String(payload.to_string()),
        }
    }

    /// Coerces a raw payload. Invalid UTF-8 is replaced lossily and then
    /// ends up as a `String` value.
    #[must_use]
    pub fn from_payload(payload: &[u8]) -> Self {
        Self::coerce(&String::from_utf8_lossy(payload))
    }

    /// Returns the value as a float if it is numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::String(_) => None,
        }
    }

    /// Returns the value as a string slice if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
