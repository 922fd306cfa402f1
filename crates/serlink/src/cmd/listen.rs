use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serlink_link::{LinkConfig, SerialTransport};
use serlink_transport::SerialLine;
use tracing::info;

use crate::cmd::{open_device, ListenArgs};
use crate::exit::{link_error, CliError, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

/// Sleep between empty polls so an idle line does not pin a core.
const IDLE_POLL: Duration = Duration::from_millis(1);

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let config = LinkConfig {
        frame: args.framing.config()?,
        ..LinkConfig::default()
    };
    let link = open_device(&args.device, config)?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let received = listen(link, &running, args.count, format)?;
    info!(frames = received, "listener stopped");
    Ok(SUCCESS)
}

/// Print frames until `count` is reached or `running` is cleared.
fn listen<L: SerialLine>(
    mut link: SerialTransport<L>,
    running: &AtomicBool,
    count: Option<u64>,
    format: OutputFormat,
) -> CliResult<u64> {
    let mut received = 0u64;

    while running.load(Ordering::SeqCst) {
        let frame = link
            .recv_frame()
            .map_err(|err| link_error("receive failed", err))?;

        let Some(frame) = frame else {
            thread::sleep(IDLE_POLL);
            continue;
        };

        received = received.saturating_add(1);
        print_frame(&frame, received, format);

        if count.is_some_and(|count| received >= count) {
            break;
        }
    }

    let stats = link.stats();
    info!(
        noise_bytes = stats.noise_bytes,
        bad_sync = stats.bad_sync,
        bad_length = stats.bad_length,
        "receiver totals"
    );
    Ok(received)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
