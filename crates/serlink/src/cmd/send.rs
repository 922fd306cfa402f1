use std::thread;
use std::time::{Duration, Instant};

use serlink_frame::Frame;
use serlink_link::{LinkConfig, SerialTransport};
use serlink_transport::{SerialAddress, SerialLine};

use crate::cmd::{open_device, SendArgs};
use crate::exit::{link_error, CliError, CliResult, SUCCESS, TIMEOUT, USAGE};
use crate::output::{print_frame, print_sent, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let wait_timeout = parse_duration(&args.wait_timeout)?;
    let config = LinkConfig {
        frame: args.framing.config()?,
        ..LinkConfig::default()
    };
    let payload = args.payload.resolve()?;

    let mut link = open_device(&args.device, config)?;
    let written = link
        .send(&payload, &SerialAddress)
        .map_err(|err| link_error("send failed", err))?;
    print_sent(
        &args.device.display().to_string(),
        payload.len(),
        written,
        link.drain_report(),
        format,
    );

    if args.wait {
        let frame = wait_for_frame(&mut link, wait_timeout)?;
        print_frame(&frame, 1, format);
    }

    Ok(SUCCESS)
}

fn wait_for_frame<L: SerialLine>(
    link: &mut SerialTransport<L>,
    timeout: Duration,
) -> CliResult<Frame> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(frame) = link
            .recv_frame()
            .map_err(|err| link_error("receive failed", err))?
        {
            return Ok(frame);
        }
        if Instant::now() >= deadline {
            return Err(CliError::new(
                TIMEOUT,
                format!("no reply within {}ms", timeout.as_millis()),
            ));
        }
        thread::sleep(Duration::from_millis(1));
    }
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(match unit {
        "ms" => Duration::from_millis(value),
        _ => Duration::from_secs(value),
    })
}

#[cfg(test)]
mod tests {
    use serlink_link::DrainTiming;
    use serlink_transport::{ManualClock, MemoryLine, Millis};

    use super::*;

    fn memory_link(line: MemoryLine) -> SerialTransport<MemoryLine> {
        let clock = ManualClock::stepping(Millis(0), 1);
        let config = LinkConfig {
            drain: DrainTiming {
                wait_input_ms: 5,
                drain_quiet_ms: 2,
            },
            ..LinkConfig::default()
        };
        SerialTransport::create(line, &clock, config).unwrap()
    }

    #[test]
    fn wait_returns_reply() {
        let line = MemoryLine::new();
        let mut link = memory_link(line.clone());
        line.inject(&[0xFF, 0x55, 0x02, b'o', b'k', b'\r', b'\n']);

        let frame = wait_for_frame(&mut link, Duration::from_millis(50)).unwrap();
        assert_eq!(frame.payload.as_ref(), b"ok");
    }

    #[test]
    fn wait_times_out_on_silence() {
        let mut link = memory_link(MemoryLine::new());
        let err = wait_for_frame(&mut link, Duration::from_millis(5)).unwrap_err();
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
    }
}
