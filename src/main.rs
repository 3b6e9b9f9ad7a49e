#![warn(clippy::all)]

// main entry point
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};

use netsim::prelude::*;

/// Initialize the application logger
///
/// Logs go to stderr as `[HH:MM:SS.mmm] LEVEL - target: message` so they
/// never mix with the outcome lines on stdout. `RUST_LOG` takes precedence
/// over the default level.
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// Builds the admin API client from the config file and flags.
fn build_client(args: &Args) -> Result<ToxiproxyClient> {
    let file = FileConfig::discover(args.config.as_deref())?;
    let config = ClientConfig::resolve(file, args.api_url.clone(), args.timeout);
    debug!("Using admin API at {} (timeout: {:?})", config.api_url, config.timeout);

    ToxiproxyClient::new(&config)
}

/// Main entry point for netsim
fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    info!("netsim starting up");

    let client = match build_client(&args) {
        Ok(client) => client,
        Err(e) => {
            println!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut controller = Controller::new(client, io::stdout().lock());
    let outcome = execute(&mut controller, &args, wait_or_interrupt);

    debug!("Finished with {} reported error(s)", outcome.failures);
    ExitCode::from(outcome.exit_code())
}
