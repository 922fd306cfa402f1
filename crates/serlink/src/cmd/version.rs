use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("serlink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: serlink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("SERLINK_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("baud: {}", serlink_transport::BAUD_RATE);
    println!("default_mtu: {}", serlink_frame::DEFAULT_MTU);
    println!("max_packet_mtu: {}", serlink_frame::MAX_PACKET_MTU);
    println!(
        "drain: wait_input={}ms quiet={}ms",
        serlink_link::WAIT_INPUT_MS,
        serlink_link::DRAIN_QUIET_MS
    );
    println!(
        "features: async={}, cli=true",
        cfg!(feature = "async")
    );

    Ok(SUCCESS)
}
