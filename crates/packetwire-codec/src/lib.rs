//! Varint and typed-field wire codec.
//!
//! This is the lowest layer of packetwire. Every value on the wire is one of:
//! - an unsigned varint (7 data bits per byte, terminator flag in bit 0)
//! - an 8-byte big-endian IEEE-754 double
//! - a varint length followed by exactly that many payload bytes
//!
//! Decoding pulls from any blocking [`std::io::Read`] stream one value at a
//! time, so consecutive values can be read off a socket without an outer
//! length prefix.

pub mod config;
pub mod error;
pub mod field;
pub mod value;
pub mod varint;

pub use config::{CodecConfig, DEFAULT_MAX_PAYLOAD};
pub use error::{CodecError, Result};
pub use field::{read_length_delimited, write_length_delimited, FieldType, LengthDelimited};
pub use value::Value;
