use std::fs;

use serlink_frame::{Frame, FrameConfig, FrameReceiver, ReceiverStats};
use tracing::debug;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliResult, DATA_INVALID, SUCCESS};
use crate::hex::parse_hex;
use crate::output::{print_frame, print_stats, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    FrameConfig::packet(args.mtu).map_err(|err| frame_error("invalid mtu", err))?;
    let bytes = capture(&args)?;
    debug!(bytes = bytes.len(), mtu = args.mtu, "decoding capture");

    let (frames, stats) = decode_all(&bytes, args.mtu);
    for (index, frame) in (1u64..).zip(&frames) {
        print_frame(frame, index, format);
    }
    print_stats(&stats, format);

    if frames.is_empty() {
        Ok(DATA_INVALID)
    } else {
        Ok(SUCCESS)
    }
}

fn capture(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    let mut bytes = Vec::new();
    for chunk in &args.hex {
        bytes.extend(parse_hex(chunk)?);
    }
    Ok(bytes)
}

fn decode_all(bytes: &[u8], mtu: usize) -> (Vec<Frame>, ReceiverStats) {
    let mut receiver = FrameReceiver::new(mtu);
    let frames = bytes
        .iter()
        .filter_map(|&byte| receiver.push(byte))
        .collect();
    (frames, receiver.stats())
}
