//! escmon - ESC telemetry monitor
//!
//! Reads the 24-byte telemetry frames an ESC streams over its serial port and
//! samples a tachometer pulse train into an RPM estimate.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod config;
mod error;
mod output;
mod pump;
mod transport;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{PulseArgs, ReadArgs, ReplayArgs};
use crate::config::MonitorConfig;
use crate::error::MonitorError;

#[derive(Parser)]
#[command(name = "escmon")]
#[command(about = "ESC serial telemetry and tachometer RPM monitor")]
#[command(version)]
#[command(long_about = "
escmon decodes the fixed 24-byte telemetry frames streamed by an ESC over a
serial link and estimates motor RPM from a tachometer pulse train.

Use --json for one JSON object per line, suitable for piping into other tools.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// YAML configuration file
    #[arg(long, global = true, env = "ESCMON_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available serial ports
    Ports,

    /// Decode telemetry frames from a serial port
    Read(ReadArgs),

    /// Decode a captured byte stream
    Replay(ReplayArgs),

    /// Estimate RPM from tachometer pulses
    Pulse(PulseArgs),

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "escmon={log_level},esc_telemetry_protocol={log_level},esc_telemetry_pulse_rpm={log_level}"
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = execute_command(&cli).await;

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = e
                .downcast_ref::<MonitorError>()
                .map_or(1, MonitorError::exit_code);

            std::process::exit(exit_code);
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    let config = MonitorConfig::load_or_default(cli.config.as_deref())?;

    match &cli.command {
        Commands::Ports => commands::ports::execute(cli.json),
        Commands::Read(args) => commands::read::execute(args, config, cli.json).await,
        Commands::Replay(args) => commands::replay::execute(args, cli.json),
        Commands::Pulse(args) => commands::pulse::execute(args, config, cli.json).await,
        Commands::Config => commands::config::execute(&config, cli.json),
    }
}
