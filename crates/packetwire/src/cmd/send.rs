use std::time::Duration;

use packetwire_server::{PacketConnection, ServerConfig};

use crate::cmd::SendArgs;
use crate::exit::{server_error, CliError, CliResult, SUCCESS, USAGE};
use crate::input::{build_packet, load_registry};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let registry = load_registry(&args.packet.defs)?;
    let packet = build_packet(&registry, &args.packet)?;

    let config = ServerConfig {
        read_timeout: Some(timeout),
        write_timeout: Some(timeout),
        ..ServerConfig::default()
    };
    let mut connection = PacketConnection::connect_with_config(args.addr.as_str(), registry, config)
        .map_err(|err| server_error("connect failed", err))?;

    connection
        .send(&packet)
        .map_err(|err| server_error("send failed", err))?;

    if args.wait {
        let reply = connection
            .recv()
            .map_err(|err| server_error("receive failed", err))?;
        print_packet(&reply, None, format);
    }

    Ok(SUCCESS)
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
