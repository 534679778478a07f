//! Loosely typed input values and their normalized scalar forms.
//!
//! Callers hand the builder a [`Value`], which may be a plain scalar, an
//! absent marker, a database string wrapper, or a boxed (wrapped) value.
//! [`normalize`] reduces every input to either `None` (absent) or a concrete
//! [`Scalar`] drawn from a closed set of kinds. Anything unrecognized
//! normalizes to absent rather than erroring.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A caller-supplied value before normalization.
///
/// The `From` impls cover the common call-site shapes, so builder methods can
/// take `impl Into<Value>`:
///
/// ```
/// use sqlmason::Value;
///
/// let v: Value = "alice".into();
/// let absent: Value = None::<i64>.into();
/// assert_eq!(absent, Value::Null);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer (all widths funnel into i64).
    Int(i64),
    /// Floating point.
    Float(f64),
    /// String.
    Text(String),
    /// Timestamp without timezone.
    Timestamp(NaiveDateTime),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Arbitrary-precision decimal.
    Decimal(Decimal),
    /// Database varchar wrapper; normalizes to text.
    VarChar(String),
    /// Database varchar(max) wrapper; normalizes to text.
    VarCharMax(String),
    /// Database nvarchar(max) wrapper; normalizes to text.
    NVarCharMax(String),
    /// One level of wrapping around another value.
    ///
    /// Exactly one unwrap step is applied during normalization: a box inside
    /// a box normalizes to absent, never to the innermost value.
    Boxed(Box<Value>),
}

/// A normalized, concretely typed value.
///
/// This is the closed set of kinds that can appear in an argument list or be
/// rendered as a SQL literal. Structural equality (`PartialEq`) is what the
/// match-to-null sentinel comparison uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    /// String.
    Text(String),
    /// Integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Timestamp without timezone.
    Timestamp(NaiveDateTime),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Arbitrary-precision decimal.
    Decimal(Decimal),
}

impl Scalar {
    /// Borrow the text content, if this scalar is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Reduce a caller-supplied value to absent (`None`) or a concrete [`Scalar`].
///
/// A boxed value is unwrapped exactly once before classification; a
/// double-boxed value is absent. This is a total function: unrecognized
/// shapes normalize to absent silently.
pub fn normalize(value: &Value) -> Option<Scalar> {
    match value {
        Value::Boxed(inner) => classify(inner),
        other => classify(other),
    }
}

fn classify(value: &Value) -> Option<Scalar> {
    match value {
        Value::Null | Value::Boxed(_) => None,
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        Value::Int(n) => Some(Scalar::Int(*n)),
        Value::Float(f) => Some(Scalar::Float(*f)),
        Value::Timestamp(t) => Some(Scalar::Timestamp(*t)),
        Value::Bytes(b) => Some(Scalar::Bytes(b.clone())),
        Value::Decimal(d) => Some(Scalar::Decimal(*d)),
        Value::Text(s) | Value::VarChar(s) | Value::VarCharMax(s) | Value::NVarCharMax(s) => {
            Some(Scalar::Text(s.clone()))
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i8> for Value {
    fn from(n: i8) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i16> for Value {
    fn from(n: i16) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Value::Int(n as i64)
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Value::Int(n as i64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(t: NaiveDateTime) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Text(s) => Value::Text(s),
            Scalar::Int(n) => Value::Int(n),
            Scalar::Float(f) => Value::Float(f),
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Timestamp(t) => Value::Timestamp(t),
            Scalar::Bytes(b) => Value::Bytes(b),
            Scalar::Decimal(d) => Value::Decimal(d),
        }
    }
}
