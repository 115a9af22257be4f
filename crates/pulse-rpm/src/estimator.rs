//! Windowed RPM estimation from a rising-edge counter.
//!
//! This module provides [`PulseRateEstimator`], which pairs a lock-free edge
//! counter with a sampling window.
//!
//! # Concurrency
//!
//! - [`PulseRateEstimator::record_edge`] is a single relaxed `fetch_add` and
//!   may be called from an interrupt callback thread at any rate.
//! - [`PulseRateEstimator::sample_and_reset`] swaps the counter to zero while
//!   holding the window lock, so each edge lands in exactly one window and two
//!   samplers never share a window.

use core::num::NonZeroU32;
use core::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

/// Pulses per mechanical revolution of the reference motor.
pub const PULSES_PER_REVOLUTION: NonZeroU32 = match NonZeroU32::new(7) {
    Some(n) => n,
    None => NonZeroU32::MIN,
};

/// Result of one sampling step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseWindow {
    /// Edges counted since the previous reset
    pub edges: u64,
    /// Wall-clock length of the window
    pub elapsed: Duration,
    /// Estimated revolutions per minute
    pub rpm: f64,
}

#[derive(Debug)]
struct WindowState {
    start: Instant,
    current_rpm: f64,
}

/// Pulse counter and RPM estimator.
///
/// Shared between the edge callback and the sampling loop as
/// `Arc<PulseRateEstimator>`.
///
/// # Example
///
/// ```rust
/// use esc_telemetry_pulse_rpm::PulseRateEstimator;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let estimator = PulseRateEstimator::starting_at(start);
/// for _ in 0..7 {
///     estimator.record_edge();
/// }
///
/// let rpm = estimator.sample_and_reset(start + Duration::from_secs(1));
/// assert_eq!(rpm, 60.0);
/// assert_eq!(estimator.pending_edges(), 0);
/// ```
#[derive(Debug)]
pub struct PulseRateEstimator {
    edge_count: AtomicU64,
    pulses_per_revolution: NonZeroU32,
    window: Mutex<WindowState>,
}

impl Default for PulseRateEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseRateEstimator {
    /// Create an estimator whose first window starts now.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    #[must_use]
    pub fn starting_at(start: Instant) -> Self {
        Self::with_pulses_per_revolution(PULSES_PER_REVOLUTION, start)
    }

    #[must_use]
    pub fn with_pulses_per_revolution(pulses_per_revolution: NonZeroU32, start: Instant) -> Self {
        Self {
            edge_count: AtomicU64::new(0),
            pulses_per_revolution,
            window: Mutex::new(WindowState {
                start,
                current_rpm: 0.0,
            }),
        }
    }

    /// Count one rising edge.
    ///
    /// Lock-free; safe to call concurrently with sampling.
    #[inline]
    pub fn record_edge(&self) {
        self.edge_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Edges counted in the current, still open window.
    #[inline]
    #[must_use]
    pub fn pending_edges(&self) -> u64 {
        self.edge_count.load(Ordering::Relaxed)
    }

    pub fn pulses_per_revolution(&self) -> NonZeroU32 {
        self.pulses_per_revolution
    }

    /// Most recent estimate; 0 before the first sample.
    #[must_use]
    pub fn current_rpm(&self) -> f64 {
        self.window.lock().current_rpm
    }

    /// Close the current window at `now`, returning the new RPM estimate.
    ///
    /// A window of zero length (or a `now` earlier than the window start)
    /// yields 0.
    pub fn sample_and_reset(&self, now: Instant) -> f64 {
        self.sample_window(now).rpm
    }

    pub fn sample_now(&self) -> f64 {
        self.sample_and_reset(Instant::now())
    }

    /// Like [`sample_and_reset`](Self::sample_and_reset) but also reports the
    /// edge count and window length.
    #[allow(clippy::cast_precision_loss)]
    pub fn sample_window(&self, now: Instant) -> PulseWindow {
        let mut window = self.window.lock();
        let elapsed = now.saturating_duration_since(window.start);
        let edges = self.edge_count.swap(0, Ordering::Relaxed);
        window.start = now;

        let secs = elapsed.as_secs_f64();
        let rpm = if secs > 0.0 {
            (edges as f64 / f64::from(self.pulses_per_revolution.get())) / secs * 60.0
        } else {
            0.0
        };
        window.current_rpm = rpm;
        drop(window);

        trace!(edges, elapsed_us = elapsed.as_micros() as u64, rpm, "pulse window closed");
        PulseWindow {
            edges,
            elapsed,
            rpm,
        }
    }
}
