use clap::{Args, Subcommand};
use std::fs;
use std::path::PathBuf;

use serlink_frame::{FrameConfig, FramingMode, DEFAULT_MTU};

use crate::exit::{frame_error, io_error, CliResult};
use crate::hex::parse_hex;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the wire bytes for one packet.
    Encode(EncodeArgs),
    /// Recover frames from a captured byte stream.
    Decode(DecodeArgs),
    /// Open a serial device and print received frames.
    Listen(ListenArgs),
    /// Open a serial device and send one frame.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Payload source for commands that transmit.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// UTF-8 text payload.
    #[arg(long)]
    pub data: Option<String>,
    /// Hex payload (e.g. "de ad be ef").
    #[arg(long)]
    pub hex: Option<String>,
    /// Read payload from file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl PayloadArgs {
    pub fn resolve(&self) -> CliResult<Vec<u8>> {
        if let Some(data) = &self.data {
            return Ok(data.as_bytes().to_vec());
        }
        if let Some(hex) = &self.hex {
            return parse_hex(hex);
        }
        if let Some(path) = &self.file {
            return fs::read(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
        }
        Ok(Vec::new())
    }
}

/// Framing options shared by commands that touch the wire.
#[derive(Args, Debug)]
pub struct FramingArgs {
    /// Maximum payload size in bytes (at most 255 in packet mode).
    #[arg(long, default_value_t = DEFAULT_MTU)]
    pub mtu: usize,
    /// Pass bytes through unframed.
    #[arg(long)]
    pub stream: bool,
}

impl FramingArgs {
    pub fn config(&self) -> CliResult<FrameConfig> {
        let mode = if self.stream {
            FramingMode::Stream
        } else {
            FramingMode::Packet
        };
        FrameConfig::new(mode, self.mtu).map_err(|err| frame_error("invalid framing", err))
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub payload: PayloadArgs,
    /// Maximum payload size in bytes.
    #[arg(long, default_value_t = DEFAULT_MTU)]
    pub mtu: usize,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Captured bytes as hex; multiple arguments are concatenated.
    #[arg(conflicts_with = "file")]
    pub hex: Vec<String>,
    /// Read captured bytes from a file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Maximum payload size in bytes.
    #[arg(long, default_value_t = DEFAULT_MTU)]
    pub mtu: usize,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Serial device path (e.g. /dev/ttyUSB0).
    pub device: PathBuf,
    #[command(flatten)]
    pub framing: FramingArgs,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device path (e.g. /dev/ttyUSB0).
    pub device: PathBuf,
    #[command(flatten)]
    pub payload: PayloadArgs,
    #[command(flatten)]
    pub framing: FramingArgs,
    /// Wait for one frame in reply and print it.
    #[arg(long)]
    pub wait: bool,
    /// Maximum time to wait for the reply when --wait is set (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub wait_timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Open a serial device at the fixed baud rate and run the startup drain.
#[cfg(unix)]
pub fn open_device(
    device: &std::path::Path,
    config: serlink_link::LinkConfig,
) -> CliResult<serlink_link::SerialTransport<serlink_transport::TtyLine>> {
    tracing::info!(
        device = %device.display(),
        baud = serlink_transport::BAUD_RATE,
        "opening serial device"
    );
    serlink_link::SerialTransport::open_tty(device, config)
        .map_err(|err| crate::exit::link_error("open failed", err))
}

#[cfg(not(unix))]
pub fn open_device(
    device: &std::path::Path,
    _config: serlink_link::LinkConfig,
) -> CliResult<serlink_link::SerialTransport<serlink_transport::MemoryLine>> {
    Err(crate::exit::CliError::new(
        crate::exit::TRANSPORT_ERROR,
        format!(
            "cannot open {}: serial devices are only supported on Unix",
            device.display()
        ),
    ))
}
