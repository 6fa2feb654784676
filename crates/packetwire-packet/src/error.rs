use packetwire_codec::{CodecError, FieldType};
use packetwire_schema::SchemaError;

/// Errors that can occur while building, encoding or decoding packets.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// Wire-level codec error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Schema or registry error, including unknown wire identifiers.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A value does not match the declared type of its field.
    #[error("field `{field}` of `{packet}` expects {expected}, got {found}")]
    TypeMismatch {
        packet: String,
        field: String,
        expected: FieldType,
        found: FieldType,
    },

    /// More positional values than the schema has fields.
    #[error("`{packet}` takes {expected} fields but {found} were given")]
    TooManyArguments {
        packet: String,
        expected: usize,
        found: usize,
    },

    /// A named value does not correspond to any field.
    #[error("`{packet}` has no field `{field}`")]
    UnknownField { packet: String, field: String },

    /// A field was left without a value.
    #[error("missing value for field `{field}` of `{packet}`")]
    MissingField { packet: String, field: String },

    /// A field was given a value more than once.
    #[error("multiple values for field `{field}` of `{packet}`")]
    MultipleValues { packet: String, field: String },

    /// A packet was converted into a typed struct of another packet type.
    #[error("expected packet `{expected}`, got `{found}`")]
    WrongPacketType { expected: String, found: String },

    /// The stream ended cleanly before the first byte of a packet.
    #[error("end of stream")]
    EndOfStream,

    /// The peer stopped accepting bytes mid-packet.
    #[error("connection closed (incomplete packet)")]
    ConnectionClosed,

    /// An I/O error occurred on the underlying stream.
    #[error("packet I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PacketError {
    /// Whether decoding hit a wire identifier missing from the registry.
    ///
    /// The stream position is indeterminate afterwards; close the stream.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, PacketError::Schema(SchemaError::UnknownType(_)))
    }
}

pub type Result<T> = std::result::Result<T, PacketError>;
