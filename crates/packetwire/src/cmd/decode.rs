use std::io::{Cursor, Read};

use packetwire_packet::PacketReader;

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, packet_error, CliResult, SUCCESS};
use crate::input::{decode_hex, load_registry};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = load_registry(&args.defs)?;
    let hex = match args.hex {
        Some(hex) => hex,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|err| io_error("failed reading stdin", err))?;
            input
        }
    };
    let bytes = decode_hex(&hex)?;

    let mut reader = PacketReader::new(Cursor::new(bytes), registry);
    for (index, packet) in reader.packets().enumerate() {
        let packet = packet.map_err(|err| packet_error(&format!("packet {index}"), err))?;
        print_packet(&packet, None, format);
    }
    Ok(SUCCESS)
}
