//! Two serial transports on an in-memory null-modem cable.
//!
//! Run with: `cargo run -p serlink --example loopback`

use serlink::frame::FrameConfig;
use serlink::link::{DrainTiming, LinkConfig, SerialTransport};
use serlink::transport::{MemoryLine, SerialAddress, SystemClock};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (device, host) = MemoryLine::pair();

    // Power-on chatter from the device side before the link is up.
    host.inject(b"\x00\x13boot v1.2\r\n");

    let config = LinkConfig {
        frame: FrameConfig::packet(32)?,
        drain: DrainTiming {
            wait_input_ms: 200,
            drain_quiet_ms: 50,
        },
    };

    let clock = SystemClock::new();
    let mut device = SerialTransport::create(device, &clock, config)?;
    let mut host = SerialTransport::create(host, &clock, config)?;
    println!(
        "host drained {} bytes in {} ms",
        host.drain_report().bytes_drained,
        host.drain_report().elapsed_ms()
    );

    for reading in ["t=21.5", "t=21.7", "t=21.6"] {
        device.send(reading.as_bytes(), &SerialAddress)?;
    }

    let mut buf = [0u8; 32];
    let mut src = SerialAddress;
    loop {
        let n = host.poll_receive(&mut buf, &mut src)?;
        if n == 0 {
            break;
        }
        println!("received {:?}", String::from_utf8_lossy(&buf[..n]));
    }

    Ok(())
}
