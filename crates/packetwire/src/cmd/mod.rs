use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod listen;
pub mod send;
pub mod varint;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode or decode a single varint.
    Varint(VarintArgs),
    /// Encode one packet and print it as hex.
    Encode(EncodeArgs),
    /// Decode every packet in a hex byte stream.
    Decode(DecodeArgs),
    /// Run a packet server and print received packets.
    Listen(ListenArgs),
    /// Encode one packet and send it to a packet server.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Varint(args) => varint::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct VarintArgs {
    #[command(subcommand)]
    pub action: VarintAction,
}

#[derive(Subcommand, Debug)]
pub enum VarintAction {
    /// Encode an unsigned integer.
    Encode {
        /// Value to encode.
        value: u64,
    },
    /// Decode a varint from hex bytes; trailing bytes are reported.
    Decode {
        /// Hex-encoded bytes (e.g. 4e4d).
        hex: String,
    },
}

/// Packet selection and field values shared by `encode` and `send`.
#[derive(Args, Debug)]
pub struct PacketArgs {
    /// Packet definition file (JSON).
    #[arg(long, short = 'd', value_name = "FILE", env = "PACKETWIRE_DEFS")]
    pub defs: PathBuf,
    /// Packet type to build.
    #[arg(long, short = 'p', value_name = "NAME")]
    pub packet: String,
    /// Positional field value, in schema order (repeatable).
    #[arg(long = "arg", short = 'a', value_name = "VALUE", allow_hyphen_values = true)]
    pub args: Vec<String>,
    /// Named field value (repeatable). Bytes fields take hex.
    #[arg(long = "field", short = 'f', value_name = "NAME=VALUE")]
    pub fields: Vec<String>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub packet: PacketArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Packet definition file (JSON).
    #[arg(long, short = 'd', value_name = "FILE", env = "PACKETWIRE_DEFS")]
    pub defs: PathBuf,
    /// Hex-encoded packet stream. Read from stdin when omitted.
    pub hex: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Address to bind (e.g. 127.0.0.1:7070).
    pub addr: String,
    /// Packet definition file (JSON).
    #[arg(long, short = 'd', value_name = "FILE", env = "PACKETWIRE_DEFS")]
    pub defs: PathBuf,
    /// Only print these packet types (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,
    /// Exit after printing N packets.
    #[arg(long)]
    pub count: Option<usize>,
    /// Send every received packet back to its sender.
    #[arg(long)]
    pub echo: bool,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Server address (e.g. 127.0.0.1:7070).
    pub addr: String,
    #[command(flatten)]
    pub packet: PacketArgs,
    /// Wait for one reply packet and print it.
    #[arg(long)]
    pub wait: bool,
    /// Socket timeout for the send and the reply (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
