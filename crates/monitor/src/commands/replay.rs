//! Decode a captured byte stream through the same state machine as `read`.

use std::io::Cursor;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use esc_telemetry_protocol::FrameDecoder;
use tracing::info;

use crate::commands::ReplayArgs;
use crate::error::MonitorError;
use crate::output;
use crate::pump::{PumpOptions, pump};

pub fn execute(args: &ReplayArgs, json: bool) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .map_err(MonitorError::from)
        .with_context(|| format!("Failed to read capture {}", args.file.display()))?;
    info!(path = %args.file.display(), bytes = bytes.len(), "replaying capture");

    let mut source = Cursor::new(bytes);
    let mut decoder = FrameDecoder::new();
    let stop = AtomicBool::new(false);

    let delivered = pump(
        &mut source,
        &mut decoder,
        &PumpOptions::replay(args.count),
        &stop,
        |sample| output::print_sample(sample, json),
    )?;

    output::print_stats(&decoder.stats(), json);
    info!(delivered, "replay finished");
    Ok(())
}
