//! Polling loop shared by `read` and `replay`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use esc_telemetry_protocol::{FrameDecoder, FrameOutcome, FrameSource, TelemetrySample};
use tracing::{debug, warn};

use crate::error::MonitorError;

#[derive(Debug, Clone)]
pub struct PumpOptions {
    /// Stop after this many samples
    pub limit: Option<u64>,
    /// Return once the source has no byte waiting instead of polling again
    pub stop_when_idle: bool,
    pub idle_backoff: Duration,
}

impl PumpOptions {
    /// Drain a finite capture.
    pub fn replay(limit: Option<u64>) -> Self {
        Self {
            limit,
            stop_when_idle: true,
            idle_backoff: Duration::ZERO,
        }
    }

    /// Poll a live port until stopped.
    pub fn live(limit: Option<u64>, idle_backoff: Duration) -> Self {
        Self {
            limit,
            stop_when_idle: false,
            idle_backoff,
        }
    }
}

/// Drive `decoder` over `source`, handing each sample to `on_sample`.
///
/// Invalid marker bytes are skipped. Timeouts while reading a body are logged
/// and the loop resynchronizes on the next call. Returns the number of
/// samples delivered.
pub fn pump<S, F>(
    source: &mut S,
    decoder: &mut FrameDecoder,
    options: &PumpOptions,
    stop: &AtomicBool,
    mut on_sample: F,
) -> Result<u64, MonitorError>
where
    S: FrameSource + ?Sized,
    F: FnMut(&TelemetrySample) -> Result<(), MonitorError>,
{
    let mut delivered = 0u64;

    while !stop.load(Ordering::Relaxed) {
        if options.limit.is_some_and(|limit| delivered >= limit) {
            break;
        }

        match decoder.try_read_frame(source) {
            Ok(FrameOutcome::Sample(sample)) => {
                on_sample(&sample)?;
                delivered += 1;
            }
            Ok(FrameOutcome::InvalidFrame { .. }) => {}
            Ok(FrameOutcome::NoDataYet) => {
                if options.stop_when_idle {
                    break;
                }
                std::thread::sleep(options.idle_backoff);
            }
            Err(e) if e.is_timeout() => {
                warn!(error = %e, "incomplete frame dropped");
            }
            Err(e) => return Err(e.into()),
        }
    }

    debug!(delivered, stats = ?decoder.stats(), "pump finished");
    Ok(delivered)
}
