use crate::cmd::EncodeArgs;
use crate::exit::{packet_error, CliResult, SUCCESS};
use crate::input::{build_packet, load_registry};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = load_registry(&args.packet.defs)?;
    let packet = build_packet(&registry, &args.packet)?;
    let wire = packet
        .serialize(&registry)
        .map_err(|err| packet_error("encode failed", err))?;

    print_encoded(&packet, &wire, format);
    Ok(SUCCESS)
}
