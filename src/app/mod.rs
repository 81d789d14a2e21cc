//! Command-line entry point: sends a single test report.

pub mod cli;
pub mod logging;

pub use cli::Cli;
pub use logging::init_logging;

use crate::hook::LogbeatHook;
use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;

pub fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    cli.config = cli.config.resolve().context("invalid configuration")?;

    init_logging(cli.config.log_level())?;
    run(&cli)
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = &cli.config;
    let hook = LogbeatHook::new(&config.org_id, &config.app_id, &config.secret_token)
        .context("failed to create hook")?;

    let event = cli.event();
    info!(
        endpoint = %hook.client().endpoint(),
        level = %event.level,
        "Sending test report"
    );

    let response = hook
        .client()
        .notify(&event)
        .context("failed to deliver report")?;
    let status = response.status();

    println!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or(""));

    if !status.is_success() {
        bail!("intake rejected the report with HTTP {status}");
    }
    Ok(())
}
