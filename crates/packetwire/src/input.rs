//! Conversion from command-line text to registries, values and packets.

use std::path::Path;
use std::sync::Arc;

use packetwire_codec::{FieldType, Value};
use packetwire_packet::Packet;
use packetwire_schema::TypeRegistry;

use crate::cmd::PacketArgs;
use crate::exit::{packet_error, schema_error, CliError, CliResult, DATA_INVALID, USAGE};

pub fn load_registry(path: &Path) -> CliResult<Arc<TypeRegistry>> {
    let registry = TypeRegistry::from_file(path)
        .map_err(|err| schema_error(&format!("failed loading {}", path.display()), err))?;
    Ok(Arc::new(registry))
}

/// Parse one field value. Bytes are given as hex.
pub fn parse_value(field: &str, ty: FieldType, text: &str) -> CliResult<Value> {
    let invalid =
        |detail: String| CliError::new(USAGE, format!("field `{field}` expects {ty}: {detail}"));
    match ty {
        FieldType::Int => text
            .trim()
            .parse::<u64>()
            .map(Value::Int)
            .map_err(|err| invalid(err.to_string())),
        FieldType::Float => text
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|err| invalid(err.to_string())),
        FieldType::Str => Ok(Value::from(text)),
        FieldType::Bytes => hex::decode(strip_hex(text))
            .map(Value::from)
            .map_err(|err| invalid(err.to_string())),
    }
}

/// Decode hex input, ignoring whitespace and an optional `0x` prefix.
pub fn decode_hex(text: &str) -> CliResult<Vec<u8>> {
    hex::decode(strip_hex(text))
        .map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex input: {err}")))
}

fn strip_hex(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.strip_prefix("0x") {
        Some(rest) => rest.to_string(),
        None => compact,
    }
}

/// Build a packet from `--arg` (positional) and `--field NAME=VALUE` input.
///
/// Each value is parsed by its field's declared type. Values that have no
/// matching field are passed through as text so the builder reports the
/// arity or name error.
pub fn build_packet(registry: &TypeRegistry, args: &PacketArgs) -> CliResult<Packet> {
    let packet_type = registry
        .resolve_by_name(&args.packet)
        .map_err(|err| CliError::new(USAGE, format!("unknown packet `{}`: {err}", args.packet)))?;
    let schema = packet_type.schema();

    let mut builder = Packet::builder(packet_type);
    for (index, text) in args.args.iter().enumerate() {
        builder = match schema.fields().get(index) {
            Some(field) => builder.arg(parse_value(field.name(), field.field_type(), text)?),
            None => builder.arg(text.as_str()),
        };
    }
    for assignment in &args.fields {
        let (name, text) = assignment.split_once('=').ok_or_else(|| {
            CliError::new(USAGE, format!("--field expects NAME=VALUE, got `{assignment}`"))
        })?;
        builder = match schema.field(name) {
            Some(field) => builder.field(name, parse_value(name, field.field_type(), text)?),
            None => builder.field(name, text),
        };
    }

    builder
        .build()
        .map_err(|err| packet_error("invalid packet", err))
}

#[cfg(test)]
mod tests {
    use packetwire_schema::PacketSchema;
    use std::path::PathBuf;

    use super::*;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                PacketSchema::builder("Move")
                    .int("x")
                    .float("speed")
                    .string("label")
                    .bytes("tag")
                    .build()
                    .expect("schema should build"),
            )
            .expect("type should register");
        registry
    }

    fn args(args: &[&str], fields: &[&str]) -> PacketArgs {
        PacketArgs {
            defs: PathBuf::from("unused.json"),
            packet: "Move".to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn builds_from_positional_and_named() {
        let packet = build_packet(
            &registry(),
            &args(&["7", "1.5"], &["tag=0xbeef", "label=a=b"]),
        )
        .expect("packet should build");

        assert_eq!(
            packet.values(),
            &[
                Value::Int(7),
                Value::Float(1.5),
                Value::from("a=b"),
                Value::from(vec![0xbeu8, 0xef]),
            ]
        );
    }

    #[test]
    fn bad_int_is_usage_error() {
        let err = build_packet(&registry(), &args(&["-1"], &[])).unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("field `x` expects int"));
    }

    #[test]
    fn extra_positional_reports_arity() {
        let err = build_packet(&registry(), &args(&["1", "2", "l", "00", "extra"], &[])).unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("takes 4 fields but 5 were given"));
    }

    #[test]
    fn unknown_field_name_reports_name() {
        let err = build_packet(&registry(), &args(&[], &["z=1"])).unwrap_err();
        assert!(err.message.contains("has no field `z`"));
    }

    #[test]
    fn unknown_packet_is_usage_error() {
        let mut packet_args = args(&[], &[]);
        packet_args.packet = "Jump".to_string();
        assert_eq!(build_packet(&registry(), &packet_args).unwrap_err().code, USAGE);
    }

    #[test]
    fn hex_input_tolerates_whitespace() {
        assert_eq!(decode_hex("0x4e 4d\n01").expect("hex"), vec![0x4e, 0x4d, 0x01]);
        assert_eq!(decode_hex("zz").unwrap_err().code, DATA_INVALID);
    }
}
