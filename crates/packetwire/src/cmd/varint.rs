use packetwire_codec::varint;

use crate::cmd::{VarintAction, VarintArgs};
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::input::decode_hex;
use crate::output::{print_varint, OutputFormat};

pub fn run(args: VarintArgs, format: OutputFormat) -> CliResult<i32> {
    match args.action {
        VarintAction::Encode { value } => {
            print_varint(value, &varint::encode(value), None, format);
        }
        VarintAction::Decode { hex } => {
            let bytes = decode_hex(&hex)?;
            let (value, rest) =
                varint::decode(&bytes).map_err(|err| codec_error("varint decode failed", err))?;
            let consumed = &bytes[..bytes.len() - rest.len()];
            print_varint(value, consumed, Some(rest), format);
        }
    }
    Ok(SUCCESS)
}
