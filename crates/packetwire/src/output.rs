use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use packetwire_codec::Value;
use packetwire_packet::Packet;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PacketOutput<'a> {
    packet: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    peer: Option<u64>,
    fields: Vec<FieldOutput<'a>>,
}

#[derive(Serialize)]
struct FieldOutput<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    ty: &'static str,
    value: serde_json::Value,
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    packet: &'a str,
    len: usize,
    hex: String,
}

#[derive(Serialize)]
struct VarintOutput {
    value: u64,
    len: usize,
    hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining: Option<String>,
}

pub fn print_packet(packet: &Packet, peer: Option<u64>, format: OutputFormat) {
    let fields = packet
        .packet_type()
        .schema()
        .fields()
        .iter()
        .zip(packet.values());

    match format {
        OutputFormat::Json => {
            let out = PacketOutput {
                packet: packet.name(),
                peer,
                fields: fields
                    .map(|(field, value)| FieldOutput {
                        name: field.name(),
                        ty: field.field_type().name(),
                        value: json_value(value),
                    })
                    .collect(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PACKET", "FIELD", "TYPE", "VALUE"]);
            for (field, value) in fields {
                table.add_row(vec![
                    packet.name().to_string(),
                    field.name().to_string(),
                    field.field_type().to_string(),
                    text_value(value),
                ]);
            }
            if packet.values().is_empty() {
                table.add_row(vec![packet.name(), "-", "-", "-"]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => match peer {
            Some(peer) => println!("[peer {peer}] {packet}"),
            None => println!("{packet}"),
        },
    }
}

pub fn print_encoded(packet: &Packet, wire: &[u8], format: OutputFormat) {
    let hex = hex::encode(wire);
    match format {
        OutputFormat::Json => print_json(&EncodedOutput {
            packet: packet.name(),
            len: wire.len(),
            hex,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PACKET", "BYTES", "HEX"])
                .add_row(vec![packet.name().to_string(), wire.len().to_string(), hex]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{hex}"),
    }
}

/// Print a varint and its encoding. `remaining` is set when decoding left
/// bytes after the varint.
pub fn print_varint(value: u64, encoded: &[u8], remaining: Option<&[u8]>, format: OutputFormat) {
    let out = VarintOutput {
        value,
        len: encoded.len(),
        hex: hex::encode(encoded),
        remaining: remaining.map(hex::encode),
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["VALUE", "BYTES", "HEX", "REMAINING"])
                .add_row(vec![
                    out.value.to_string(),
                    out.len.to_string(),
                    out.hex,
                    out.remaining.unwrap_or_default(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match out.remaining {
            Some(rest) if !rest.is_empty() => {
                println!("{} = {} (remaining {rest})", out.value, out.hex)
            }
            _ => println!("{} = {}", out.value, out.hex),
        },
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Int(v) => (*v).into(),
        Value::Float(v) => serde_json::Number::from_f64(*v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Str(v) => v.as_str().into(),
        Value::Bytes(v) => hex::encode(v).into(),
    }
}

fn text_value(value: &Value) -> String {
    match value {
        Value::Str(v) => v.clone(),
        Value::Bytes(v) => hex::encode(v),
        other => other.to_string(),
    }
}
