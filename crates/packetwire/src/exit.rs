use std::fmt;
use std::io;

use packetwire_codec::CodecError;
use packetwire_packet::PacketError;
use packetwire_schema::SchemaError;
use packetwire_server::ServerError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::AddrInUse | io::ErrorKind::AddrNotAvailable => TRANSPORT_ERROR,
        io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::Io(source) => io_error(context, source),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn packet_error(context: &str, err: PacketError) -> CliError {
    match err {
        PacketError::Codec(err) => codec_error(context, err),
        PacketError::Schema(err) => schema_error(context, err),
        PacketError::Io(source) => io_error(context, source),
        PacketError::EndOfStream | PacketError::ConnectionClosed => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        PacketError::TypeMismatch { .. }
        | PacketError::TooManyArguments { .. }
        | PacketError::UnknownField { .. }
        | PacketError::MissingField { .. }
        | PacketError::MultipleValues { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn server_error(context: &str, err: ServerError) -> CliError {
    match err {
        ServerError::Packet(err) => packet_error(context, err),
        ServerError::Bind(source) | ServerError::Io(source) => io_error(context, source),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use packetwire_codec::FieldType;

    use super::*;

    #[test]
    fn timeouts_map_to_timeout_code() {
        let err = packet_error(
            "receive failed",
            PacketError::Codec(CodecError::Io(io::Error::from(io::ErrorKind::WouldBlock))),
        );
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn construction_errors_are_usage() {
        let err = packet_error(
            "invalid packet",
            PacketError::TypeMismatch {
                packet: "Move".to_string(),
                field: "x".to_string(),
                expected: FieldType::Int,
                found: FieldType::Str,
            },
        );
        assert_eq!(err.code, USAGE);
        assert!(err.message.starts_with("invalid packet: "));
    }

    #[test]
    fn unknown_type_is_data_invalid() {
        let err = server_error(
            "receive failed",
            ServerError::Packet(PacketError::Schema(SchemaError::UnknownType(
                "Nope".to_string(),
            ))),
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn bind_in_use_is_transport_error() {
        let err = server_error(
            "bind failed",
            ServerError::Bind(io::Error::from(io::ErrorKind::AddrInUse)),
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
    }
}
