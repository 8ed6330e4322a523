//! Dynamic values carried through an exchange.
//!
//! Provides the value model shared by exchange bodies, exchange properties,
//! and message headers:
//! - [`Value`]: Scalar, binary, or opaque payloads
//! - [`CoercionError`]: String-coercion failures at the record boundary
//!
//! Values stay opaque while a pipeline runs; they are only coerced to
//! strings when the bridge turns a result exchange back into a platform
//! record, and only where the platform demands string-valued metadata.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// A dynamically typed value flowing through a pipeline exchange.
///
/// Scalars and byte payloads are stored inline. Engine-foreign objects that
/// must cross the pipeline boundary without the engine understanding them
/// (for example a platform schema descriptor) travel as [`Value::Opaque`]
/// and come back out via [`Value::downcast_ref`].
#[derive(Clone, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// An owned UTF-8 string.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// An engine-opaque object, retrievable by concrete type.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wraps an arbitrary object as an opaque value.
    #[must_use]
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Arc::new(value))
    }

    /// Returns the contained opaque object if it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Opaque(any) => any.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns a short name for the value's kind, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Returns `true` if this is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the value as a string slice if it is [`Value::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Converts the value to its string form for record metadata.
    ///
    /// Booleans, integers, floats, and strings always convert. Bytes
    /// convert when they hold valid UTF-8. `Null` and `Opaque` have no
    /// string form.
    ///
    /// # Errors
    ///
    /// Returns `CoercionError` if the value has no string representation.
    pub fn coerce_to_string(&self) -> Result<String, CoercionError> {
        match self {
            Value::Bool(b) => Ok(b.to_string()),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Str(s) => Ok(s.clone()),
            Value::Bytes(b) => std::str::from_utf8(b)
                .map(ToOwned::to_owned)
                .map_err(|e| CoercionError::InvalidUtf8(e.to_string())),
            Value::Null | Value::Opaque(_) => Err(CoercionError::Unsupported(self.kind())),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Value::Bytes(v) => f.debug_tuple("Bytes").field(&v.len()).finish(),
            Value::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            // Opaque values compare by identity, not contents
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

/// Errors that occur when coercing a [`Value`] to its string form.
#[derive(Debug, Error)]
pub enum CoercionError {
    /// The value kind has no string representation.
    #[error("{0} value has no string representation")]
    Unsupported(&'static str),

    /// Byte contents are not valid UTF-8.
    #[error("bytes are not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(Value::Bool(true).coerce_to_string().unwrap(), "true");
        assert_eq!(Value::Int(-42).coerce_to_string().unwrap(), "-42");
        assert_eq!(Value::Float(1.5).coerce_to_string().unwrap(), "1.5");
        assert_eq!(
            Value::Str("hello".into()).coerce_to_string().unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_coerce_utf8_bytes() {
        let v = Value::Bytes(b"payload".to_vec());
        assert_eq!(v.coerce_to_string().unwrap(), "payload");
    }

    #[test]
    fn test_coerce_invalid_utf8_bytes_fails() {
        let v = Value::Bytes(vec![0xff, 0xfe, 0x00]);
        let err = v.coerce_to_string().unwrap_err();
        assert!(matches!(err, CoercionError::InvalidUtf8(_)));
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_coerce_null_and_opaque_fail() {
        assert!(matches!(
            Value::Null.coerce_to_string().unwrap_err(),
            CoercionError::Unsupported("null")
        ));
        let v = Value::opaque(vec![1u32, 2, 3]);
        assert!(matches!(
            v.coerce_to_string().unwrap_err(),
            CoercionError::Unsupported("opaque")
        ));
    }

    #[test]
    fn test_opaque_downcast() {
        #[derive(Debug, PartialEq)]
        struct Marker(u32);

        let v = Value::opaque(Marker(7));
        assert_eq!(v.downcast_ref::<Marker>(), Some(&Marker(7)));
        assert!(v.downcast_ref::<String>().is_none());
        assert!(Value::Int(1).downcast_ref::<Marker>().is_none());
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7i32), Value::Int(7));
        assert_eq!(Value::from(7i64), Value::Int(7));
        assert_eq!(Value::from(2.5), Value::Float(2.5));
        assert_eq!(Value::from("x"), Value::Str("x".into()));
        assert_eq!(Value::from(String::from("y")), Value::Str("y".into()));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Bytes(vec![1, 2]));
    }

    #[test]
    fn test_opaque_equality_is_identity() {
        let shared = Value::opaque(String::from("schema"));
        let same = shared.clone();
        let other = Value::opaque(String::from("schema"));
        assert_eq!(shared, same);
        assert_ne!(shared, other);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Bytes(Vec::new()).kind(), "bytes");
        assert_eq!(Value::opaque(1u8).kind(), "opaque");
    }

    #[test]
    fn test_debug_hides_opaque_contents() {
        let v = Value::opaque(42u64);
        assert_eq!(format!("{v:?}"), "Opaque(..)");
        let b = Value::Bytes(vec![0, 1, 2]);
        assert_eq!(format!("{b:?}"), "Bytes(3)");
    }
}
