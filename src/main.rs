//! portscan - try to open TCP connections to a range of ports on a host.

use anyhow::Result;
use clap::Parser;
use portscan::cli::Args;
use portscan::output::{self, ConsoleReporter};
use portscan::pipeline::Coordinator;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    let settings = args.load_settings()?;
    let config = args.into_config(&settings)?;

    let coordinator = Coordinator::new(config, Arc::new(ConsoleReporter));
    output::print_scan_header(coordinator.config());

    let cancel = coordinator.cancel_token();
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            signal = tokio::signal::ctrl_c() => {
                if signal.is_ok() {
                    info!("interrupted, stopping scan");
                    cancel.cancel();
                }
            }
        }
    });

    let summary = coordinator.run().await;
    debug!(?summary, "done");
    Ok(())
}

/// Log to stderr so diagnostics never mix with the result stream.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
