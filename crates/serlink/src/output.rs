use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serlink_frame::{Frame, ReceiverStats};
use serlink_link::DrainReport;

use crate::hex::format_hex;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    /// Payload bytes only, no decoration.
    Raw,
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
struct FrameOutput {
    index: u64,
    payload_size: usize,
    payload: String,
    hex: String,
    timestamp: String,
}

#[derive(Serialize)]
struct EncodedOutput {
    payload_size: usize,
    wire_size: usize,
    wire: String,
}

#[derive(Serialize)]
struct StatsOutput {
    frames: u64,
    noise_bytes: u64,
    bad_sync: u64,
    bad_length: u64,
}

#[derive(Serialize)]
struct SentOutput<'a> {
    device: &'a str,
    payload_size: usize,
    wire_size: usize,
    bytes_drained: usize,
    drain_ms: i32,
}

pub fn print_frame(frame: &Frame, index: u64, format: OutputFormat) {
    let payload = frame.payload.as_ref();
    match format {
        OutputFormat::Json => print_json(&FrameOutput {
            index,
            payload_size: payload.len(),
            payload: payload_preview(payload),
            hex: format_hex(payload),
            timestamp: now_unix_seconds(),
        }),
        OutputFormat::Table => print_table(
            vec!["#", "SIZE", "PAYLOAD", "HEX"],
            vec![
                index.to_string(),
                payload.len().to_string(),
                payload_preview(payload),
                format_hex(payload),
            ],
        ),
        OutputFormat::Pretty => {
            println!(
                "frame #{index} size={} payload={}",
                payload.len(),
                payload_preview(payload)
            );
        }
        OutputFormat::Raw => print_raw(payload),
    }
}

pub fn print_encoded(payload_size: usize, wire: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&EncodedOutput {
            payload_size,
            wire_size: wire.len(),
            wire: format_hex(wire),
        }),
        OutputFormat::Table => print_table(
            vec!["PAYLOAD", "WIRE", "BYTES"],
            vec![
                payload_size.to_string(),
                wire.len().to_string(),
                format_hex(wire),
            ],
        ),
        OutputFormat::Pretty => println!("{}", format_hex(wire)),
        OutputFormat::Raw => print_raw(wire),
    }
}

/// Raw output carries payloads only, so statistics are skipped there.
pub fn print_stats(stats: &ReceiverStats, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&StatsOutput {
            frames: stats.frames,
            noise_bytes: stats.noise_bytes,
            bad_sync: stats.bad_sync,
            bad_length: stats.bad_length,
        }),
        OutputFormat::Table => print_table(
            vec!["FRAMES", "NOISE", "BAD SYNC", "BAD LENGTH"],
            vec![
                stats.frames.to_string(),
                stats.noise_bytes.to_string(),
                stats.bad_sync.to_string(),
                stats.bad_length.to_string(),
            ],
        ),
        OutputFormat::Pretty => println!(
            "frames={} noise={} bad_sync={} bad_length={}",
            stats.frames, stats.noise_bytes, stats.bad_sync, stats.bad_length
        ),
        OutputFormat::Raw => {}
    }
}

pub fn print_sent(
    device: &str,
    payload_size: usize,
    wire_size: usize,
    drain: &DrainReport,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => print_json(&SentOutput {
            device,
            payload_size,
            wire_size,
            bytes_drained: drain.bytes_drained,
            drain_ms: drain.elapsed_ms(),
        }),
        OutputFormat::Table => print_table(
            vec!["DEVICE", "PAYLOAD", "WIRE", "DRAINED", "DRAIN MS"],
            vec![
                device.to_string(),
                payload_size.to_string(),
                wire_size.to_string(),
                drain.bytes_drained.to_string(),
                drain.elapsed_ms().to_string(),
            ],
        ),
        OutputFormat::Pretty => println!(
            "sent {payload_size} bytes ({wire_size} on wire) to {device}; drained {} in {} ms",
            drain.bytes_drained,
            drain.elapsed_ms()
        ),
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn print_table(header: Vec<&str>, row: Vec<String>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header)
        .add_row(row);
    println!("{table}");
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if !text.chars().any(char::is_control) => text.to_string(),
        _ => format!("<binary {} bytes>", payload.len()),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
