use std::fmt;

use bytes::Bytes;

use crate::error::CodecError;
use crate::field::FieldType;

/// A single typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unsigned integer, encoded as a varint.
    Int(u64),
    /// IEEE-754 double, encoded as 8 big-endian bytes.
    Float(f64),
    /// UTF-8 text, length-delimited.
    Str(String),
    /// Raw bytes, length-delimited.
    Bytes(Bytes),
}

impl Value {
    /// The field type this value satisfies.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Int(_) => FieldType::Int,
            Value::Float(_) => FieldType::Float,
            Value::Str(_) => FieldType::Str,
            Value::Bytes(_) => FieldType::Bytes,
        }
    }

    pub fn as_int(&self) -> Option<u64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Str(v) => write!(f, "{v:?}"),
            Value::Bytes(v) => {
                f.write_str("b\"")?;
                for byte in v.iter() {
                    write!(f, "\\x{byte:02x}")?;
                }
                f.write_str("\"")
            }
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(u64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(v))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(v))
    }
}

/// Signed integers are accepted only when non-negative.
impl TryFrom<i64> for Value {
    type Error = CodecError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        u64::try_from(v)
            .map(Value::Int)
            .map_err(|_| CodecError::NegativeInteger(v))
    }
}

macro_rules! impl_try_from_value {
    ($target:ty, $variant:ident, $expected:expr) => {
        impl TryFrom<Value> for $target {
            type Error = CodecError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(CodecError::TypeMismatch {
                        expected: $expected,
                        found: other.field_type(),
                    }),
                }
            }
        }
    };
}

impl_try_from_value!(u64, Int, FieldType::Int);
impl_try_from_value!(f64, Float, FieldType::Float);
impl_try_from_value!(String, Str, FieldType::Str);
impl_try_from_value!(Bytes, Bytes, FieldType::Bytes);
