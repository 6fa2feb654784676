//! Field types and their per-type wire rules.
//!
//! ```text
//! Int            := varint
//! Float          := 8 bytes, big-endian IEEE-754 double
//! Str | Bytes    := len:varint  payload:byte[len]
//! ```

use std::fmt;
use std::io::{ErrorKind, Read};

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::value::Value;
use crate::varint;

/// Width of an encoded float.
pub const FLOAT_LEN: usize = 8;

/// The closed set of declared field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Int,
    Float,
    Str,
    Bytes,
}

impl FieldType {
    /// Stable lowercase name, used in definition files and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Str => "string",
            FieldType::Bytes => "bytes",
        }
    }

    /// Parse a type name as produced by [`FieldType::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(FieldType::Int),
            "float" => Some(FieldType::Float),
            "string" => Some(FieldType::Str),
            "bytes" => Some(FieldType::Bytes),
            _ => None,
        }
    }

    /// Whether the wire form carries a varint length prefix.
    pub fn is_length_delimited(self) -> bool {
        matches!(self, FieldType::Str | FieldType::Bytes)
    }

    /// Reject values whose runtime type differs from this declared type.
    pub fn check(self, value: &Value) -> Result<()> {
        let found = value.field_type();
        if found == self {
            Ok(())
        } else {
            Err(CodecError::TypeMismatch {
                expected: self,
                found,
            })
        }
    }

    /// Append the wire form of `value` to `dst`.
    pub fn encode(self, value: &Value, dst: &mut BytesMut) -> Result<()> {
        self.check(value)?;
        match value {
            Value::Int(v) => varint::encode_into(*v, dst),
            Value::Float(v) => {
                dst.reserve(FLOAT_LEN);
                dst.put_f64(*v);
            }
            Value::Str(v) => write_length_delimited(v, dst),
            Value::Bytes(v) => write_length_delimited(v, dst),
        }
        Ok(())
    }

    /// Read one value of this type from `src`, consuming exactly its bytes.
    pub fn decode<R: Read + ?Sized>(self, src: &mut R, config: &CodecConfig) -> Result<Value> {
        match self {
            FieldType::Int => varint::decode_from(src).map(Value::Int),
            FieldType::Float => {
                let mut buf = [0u8; FLOAT_LEN];
                read_full(src, &mut buf)?;
                Ok(Value::Float(f64::from_be_bytes(buf)))
            }
            FieldType::Str => read_length_delimited(src, config.max_payload_len).map(Value::Str),
            FieldType::Bytes => {
                read_length_delimited(src, config.max_payload_len).map(Value::Bytes)
            }
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type whose wire form is `len:varint payload:byte[len]`.
pub trait LengthDelimited: Sized {
    /// The payload bytes, without the length prefix.
    fn payload(&self) -> &[u8];

    /// Rebuild a value from a payload read off the wire.
    fn from_payload(payload: Vec<u8>) -> Result<Self>;
}

impl LengthDelimited for String {
    fn payload(&self) -> &[u8] {
        self.as_bytes()
    }

    fn from_payload(payload: Vec<u8>) -> Result<Self> {
        Ok(String::from_utf8(payload)?)
    }
}

impl LengthDelimited for Bytes {
    fn payload(&self) -> &[u8] {
        self.as_ref()
    }

    fn from_payload(payload: Vec<u8>) -> Result<Self> {
        Ok(Bytes::from(payload))
    }
}

/// Append `varint(len) ++ payload` to `dst`.
pub fn write_length_delimited<T: LengthDelimited>(value: &T, dst: &mut BytesMut) {
    let payload = value.payload();
    dst.reserve(varint::encoded_len(payload.len() as u64) + payload.len());
    varint::encode_into(payload.len() as u64, dst);
    dst.put_slice(payload);
}

/// Read a varint length, then exactly that many payload bytes.
///
/// The length is checked against `max_payload_len` before allocating.
pub fn read_length_delimited<T, R>(src: &mut R, max_payload_len: usize) -> Result<T>
where
    T: LengthDelimited,
    R: Read + ?Sized,
{
    let len = varint::decode_from(src)?;
    if len > max_payload_len as u64 {
        debug!(size = len, max = max_payload_len, "rejecting oversized payload");
        return Err(CodecError::PayloadTooLarge {
            size: len,
            max: max_payload_len,
        });
    }

    let mut payload = vec![0u8; len as usize];
    read_full(src, &mut payload)?;
    T::from_payload(payload)
}

fn read_full<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(CodecError::Truncated {
                    needed: buf.len() - filled,
                })
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(CodecError::Io(err)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn roundtrip(ty: FieldType, value: Value) -> Value {
        let mut wire = BytesMut::new();
        ty.encode(&value, &mut wire).unwrap();
        let mut src = Cursor::new(wire.to_vec());
        let decoded = ty.decode(&mut src, &CodecConfig::default()).unwrap();
        assert_eq!(src.position() as usize, wire.len());
        decoded
    }

    #[test]
    fn int_roundtrip() {
        for n in [0u64, 1, 127, 128, 5030, u64::MAX] {
            assert_eq!(roundtrip(FieldType::Int, Value::Int(n)), Value::Int(n));
        }
    }

    #[test]
    fn float_is_fixed_width_big_endian() {
        let mut wire = BytesMut::new();
        FieldType::Float
            .encode(&Value::Float(1.0), &mut wire)
            .unwrap();
        assert_eq!(wire.as_ref(), &[0x3F, 0xF0, 0, 0, 0, 0, 0, 0]);

        for v in [0.0, -2.5, f64::MAX, f64::MIN_POSITIVE, f64::INFINITY] {
            assert_eq!(roundtrip(FieldType::Float, Value::Float(v)), Value::Float(v));
        }
    }

    #[test]
    fn string_roundtrip_including_multibyte() {
        for s in ["", "hello", "héllo wörld", "日本語", "🦀 crab"] {
            assert_eq!(roundtrip(FieldType::Str, Value::from(s)), Value::from(s));
        }
    }

    #[test]
    fn string_length_prefix_counts_bytes_not_chars() {
        let mut wire = BytesMut::new();
        FieldType::Str.encode(&Value::from("é"), &mut wire).unwrap();
        assert_eq!(wire.as_ref(), &[varint::encode(2)[0], 0xC3, 0xA9]);
    }

    #[test]
    fn bytes_roundtrip() {
        for b in [vec![], vec![0u8], vec![0xFF; 300]] {
            let value = Value::from(b);
            assert_eq!(roundtrip(FieldType::Bytes, value.clone()), value);
        }
    }

    #[test]
    fn invalid_utf8_is_encoding_error() {
        let mut wire = BytesMut::new();
        write_length_delimited(&Bytes::from_static(&[0xC3, 0x28]), &mut wire);
        let err = FieldType::Str
            .decode(&mut Cursor::new(wire.to_vec()), &CodecConfig::default())
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidUtf8(_)));
    }

    #[test]
    fn encode_rejects_mismatched_value() {
        let mut wire = BytesMut::new();
        let err = FieldType::Int
            .encode(&Value::from("5"), &mut wire)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::TypeMismatch {
                expected: FieldType::Int,
                found: FieldType::Str
            }
        ));
        assert!(wire.is_empty());
    }

    #[test]
    fn truncated_float() {
        let err = FieldType::Float
            .decode(&mut Cursor::new(vec![0x3F, 0xF0]), &CodecConfig::default())
            .unwrap_err();
        assert!(matches!(err, CodecError::Truncated { needed: 6 }));
    }

    #[test]
    fn truncated_payload() {
        let mut wire = BytesMut::new();
        write_length_delimited(&String::from("hello"), &mut wire);
        wire.truncate(3);
        let err = FieldType::Str
            .decode(&mut Cursor::new(wire.to_vec()), &CodecConfig::default())
            .unwrap_err();
        assert!(matches!(err, CodecError::Truncated { needed: 3 }));
    }

    #[test]
    fn oversized_length_rejected_before_read() {
        let mut wire = BytesMut::new();
        varint::encode_into(1024, &mut wire);
        let config = CodecConfig {
            max_payload_len: 16,
        };
        let err = FieldType::Bytes
            .decode(&mut Cursor::new(wire.to_vec()), &config)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::PayloadTooLarge { size: 1024, max: 16 }
        ));
    }

    #[test]
    fn names_roundtrip() {
        for ty in [
            FieldType::Int,
            FieldType::Float,
            FieldType::Str,
            FieldType::Bytes,
        ] {
            assert_eq!(FieldType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(FieldType::from_name("uuid"), None);
        assert!(FieldType::Bytes.is_length_delimited());
        assert!(!FieldType::Float.is_length_delimited());
    }
}
