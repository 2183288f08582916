use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use tunnelvakt_config::TunnelvaktConfig;
use tunnelvakt_simulator::Simulation;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a deterministic enforcement simulation
    Simulate(SimulateArgs),
    /// Load and validate a configuration file, then exit
    CheckConfig(CheckConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Configuration file; defaults to config/tunnelvakt.yaml + environment
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the number of packets to simulate
    #[arg(long)]
    pub packets: Option<usize>,

    /// Override the simulation seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fail unless the run reproduces this decision-state hash
    #[arg(long)]
    pub validate_hash: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckConfigArgs {
    #[arg(short, long)]
    pub config: PathBuf,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("State hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
}

pub fn run_command(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match cli.command {
        Commands::Simulate(args) => run_simulate(args),
        Commands::CheckConfig(args) => run_check_config(args),
    }
}

fn run_simulate(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(packets) = args.packets {
        config.simulator.packet_count = packets;
    }
    if let Some(seed) = args.seed {
        config.simulator.seed = seed;
    }
    // Overrides land after the load-time validation pass.
    config.ensure_valid()?;

    let outcome = Simulation::new(&config)?.run();
    println!("{}", outcome.report);
    println!("state_hash={}", outcome.state_hash);
    println!("audit_log={}", config.enforcement.audit_log.display());

    if let Some(expected) = args.validate_hash {
        if expected != outcome.state_hash {
            return Err(Box::new(CliError::HashMismatch {
                expected,
                actual: outcome.state_hash,
            }));
        }
        info!("state hash validated");
    }
    Ok(())
}

fn run_check_config(args: CheckConfigArgs) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = TunnelvaktConfig::load_from_path(&args.config)?;
    println!(
        "configuration valid: block_ipsec={} block_openvpn={} block_other_tunnels={} threshold={}",
        config.enforcement.block_ipsec,
        config.enforcement.block_openvpn,
        config.enforcement.block_other_tunnels,
        config.enforcement.detection_threshold,
    );
    Ok(())
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<TunnelvaktConfig, tunnelvakt_config::ConfigError> {
    match path {
        Some(path) => TunnelvaktConfig::load_from_path(path),
        None => TunnelvaktConfig::load(),
    }
}
