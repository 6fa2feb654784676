use crate::field::FieldType;

/// Errors that can occur while encoding or decoding wire values.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The stream ended before a varint byte with the terminator flag set.
    #[error("varint did not terminate ({consumed} bytes read)")]
    Unterminated { consumed: usize },

    /// The varint does not fit in 64 bits.
    #[error("varint exceeds 64-bit range")]
    Overflow,

    /// A length prefix exceeds the configured maximum.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: u64, max: usize },

    /// The stream ended inside a fixed-width or length-delimited payload.
    #[error("stream ended inside a value ({needed} more bytes expected)")]
    Truncated { needed: usize },

    /// A string payload is not valid UTF-8.
    #[error("invalid UTF-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A value does not match the declared field type.
    #[error("expected {expected} value, got {found}")]
    TypeMismatch { expected: FieldType, found: FieldType },

    /// Integers are unsigned on the wire.
    #[error("negative integer {0} cannot be encoded")]
    NegativeInteger(i64),

    /// An I/O error occurred on the underlying stream.
    #[error("codec I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
