//! Command implementations for escmon

pub mod config;
pub mod ports;
pub mod pulse;
pub mod read;
pub mod replay;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Args;
use tracing::info;

use crate::config::{PulseConfig, SerialConfig};

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ReadArgs {
    /// Serial device, e.g. /dev/ttyUSB0 or COM3
    #[arg(short, long)]
    pub port: Option<String>,
    /// Baud rate
    #[arg(short, long)]
    pub baud: Option<u32>,
    /// Read timeout for one frame body, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// Stop after this many decoded frames
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,
}

impl ReadArgs {
    pub fn apply(&self, serial: &mut SerialConfig) {
        if let Some(port) = &self.port {
            serial.port.clone_from(port);
        }
        if let Some(baud) = self.baud {
            serial.baud_rate = baud;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            serial.timeout_ms = timeout_ms;
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ReplayArgs {
    /// Captured raw byte stream
    pub file: PathBuf,
    /// Stop after this many decoded frames
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct PulseArgs {
    /// BCM pin number of the tachometer signal
    #[arg(long)]
    pub pin: Option<u8>,
    /// Sampling interval in milliseconds
    #[arg(short, long)]
    pub interval_ms: Option<u64>,
    /// Pulses per mechanical revolution
    #[arg(long)]
    pub pulses_per_rev: Option<u32>,
    /// Stop after this many reports
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,
    /// Generate edges in software at this rate instead of reading a pin
    #[arg(long)]
    pub simulate_hz: Option<f64>,
}

impl PulseArgs {
    pub fn apply(&self, pulse: &mut PulseConfig) {
        if let Some(pin) = self.pin {
            pulse.pin = pin;
        }
        if let Some(interval_ms) = self.interval_ms {
            pulse.interval_ms = interval_ms;
        }
        if let Some(ppr) = self.pulses_per_rev {
            pulse.pulses_per_revolution = ppr;
        }
    }
}

/// Flag set once the user presses Ctrl+C.
pub(crate) fn stop_on_ctrl_c() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping");
            flag.store(true, Ordering::Relaxed);
        }
    });
    stop
}
