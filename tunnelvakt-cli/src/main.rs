//! ## tunnelvakt-cli
//! **Operational front end for the enforcement simulator**
//!
//! Loads configuration, runs deterministic enforcement simulations, and
//! validates policy files without running anything.

use clap::Parser;

use tunnelvakt_telemetry::EventLogger;

mod commands;

use commands::{run_command, Cli};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    EventLogger::init();
    let cli = Cli::parse();
    run_command(cli)
}
