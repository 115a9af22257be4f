//! Live decoding from the serial port.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::Result;
use esc_telemetry_protocol::FrameDecoder;
use tracing::info;

use crate::commands::{ReadArgs, stop_on_ctrl_c};
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::output;
use crate::pump::{PumpOptions, pump};
use crate::transport::SerialSource;

pub async fn execute(args: &ReadArgs, mut config: MonitorConfig, json: bool) -> Result<()> {
    args.apply(&mut config.serial);
    config.validate()?;

    let serial = config.serial;
    let options = PumpOptions::live(args.count, serial.poll_interval());
    let stop = stop_on_ctrl_c();
    let worker_stop = Arc::clone(&stop);

    output::print_banner("Starting ESC Reader... Press Ctrl+C to stop.", json);

    // The port read blocks for up to the configured timeout.
    let stats = tokio::task::spawn_blocking(move || {
        let mut source = SerialSource::open(&serial)?;
        let mut decoder = FrameDecoder::new();
        pump(&mut source, &mut decoder, &options, &worker_stop, |sample| {
            output::print_sample(sample, json)
        })?;
        Ok::<_, MonitorError>(decoder.stats())
    })
    .await??;

    if stop.load(Ordering::Relaxed) {
        output::print_banner("ESC Reader stopped by user.", json);
    }
    info!(?stats, "serial reader finished");
    Ok(())
}
