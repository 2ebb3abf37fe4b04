//! Best-effort scalar typing of query-string tokens.
//!
//! Query strings carry nothing but text, and the collections behind the adapter are
//! schemaless, so there is no field type to consult. [`coerce`] guesses instead: a
//! token containing a `.` is tried as a float, any other token as an integer, and
//! whatever does not parse is kept verbatim as a string.
//!
//! The guess is lossy by nature. `"007"` becomes the integer `7`, and a numeric
//! looking string identifier such as `"12345"` can no longer match a stored string
//! `"12345"`. These are accepted limitations of filtering without a schema.

use bson::Bson;
use std::fmt;

/// A scalar value produced by [`coerce`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// A token that parsed as a signed 64-bit integer.
    Integer(i64),
    /// A token containing a `.` that parsed as a float.
    Float(f64),
    /// Anything else, kept exactly as received.
    String(String),
}

impl From<TypedValue> for Bson {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::Integer(value) => Bson::Int64(value),
            TypedValue::Float(value) => Bson::Double(value),
            TypedValue::String(value) => Bson::String(value),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Integer(value) => write!(f, "{value}"),
            TypedValue::Float(value) => write!(f, "{value}"),
            TypedValue::String(value) => write!(f, "{value:?}"),
        }
    }
}

/// Converts a raw token into its most likely scalar type.
///
/// This never fails. Surrounding whitespace is ignored while parsing, but a token
/// that falls back to [`TypedValue::String`] is returned untouched.
pub fn coerce(token: &str) -> TypedValue {
    let trimmed = token.trim();

    if token.contains('.') {
        if let Ok(value) = trimmed.parse::<f64>() {
            return TypedValue::Float(value);
        }
    } else if let Ok(value) = trimmed.parse::<i64>() {
        return TypedValue::Integer(value);
    }

    TypedValue::String(token.to_string())
}
