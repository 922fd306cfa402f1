use bytes::BytesMut;
use serlink_frame::{encode_frame, FrameConfig};

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = FrameConfig::packet(args.mtu).map_err(|err| frame_error("invalid mtu", err))?;
    let payload = args.payload.resolve()?;

    let wire = encode_wire(&payload, &config)?;
    print_encoded(payload.len(), &wire, format);
    Ok(SUCCESS)
}

fn encode_wire(payload: &[u8], config: &FrameConfig) -> CliResult<BytesMut> {
    let mut wire = BytesMut::new();
    encode_frame(payload, config.mtu(), &mut wire)
        .map_err(|err| frame_error("encode failed", err))?;
    Ok(wire)
}
