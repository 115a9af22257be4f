//! Software edge generator for bench testing without a tachometer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use esc_telemetry_pulse_rpm::PulseRateEstimator;
use tracing::{info, warn};

use crate::error::MonitorError;
use crate::transport::EdgeSource;

/// Accepted edge rates. The floor bounds how long drop waits on the thread.
pub const MIN_SIMULATED_HZ: f64 = 1.0;
pub const MAX_SIMULATED_HZ: f64 = 100_000.0;

/// Feeds edges into an estimator at a fixed rate from a background thread.
///
/// The thread is stopped and joined on drop.
pub struct SimulatedEdges {
    hz: f64,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimulatedEdges {
    pub fn spawn(estimator: Arc<PulseRateEstimator>, hz: f64) -> Result<Self, MonitorError> {
        if !(MIN_SIMULATED_HZ..=MAX_SIMULATED_HZ).contains(&hz) {
            return Err(MonitorError::InvalidConfiguration(format!(
                "simulated edge rate must be between {MIN_SIMULATED_HZ} and {MAX_SIMULATED_HZ} Hz, got {hz}"
            )));
        }
        let period = Duration::from_secs_f64(1.0 / hz);
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = std::thread::Builder::new()
            .name("escmon-edges".into())
            .spawn(move || {
                let mut next = Instant::now() + period;
                while !flag.load(Ordering::Relaxed) {
                    std::thread::sleep(next.saturating_duration_since(Instant::now()));
                    estimator.record_edge();
                    next += period;
                }
            })?;

        info!(hz, "simulated edge source started");
        Ok(Self {
            hz,
            stop,
            handle: Some(handle),
        })
    }
}

impl EdgeSource for SimulatedEdges {
    fn label(&self) -> String {
        format!("simulated {} Hz", self.hz)
    }
}

impl Drop for SimulatedEdges {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("simulated edge thread panicked");
        }
    }
}
