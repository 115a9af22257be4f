//! # esc-telemetry-pulse-rpm
//!
//! Shaft speed estimation from a tachometer pulse train.
//!
//! An edge-detection collaborator (a GPIO interrupt, a capture timer, a test
//! harness) calls [`PulseRateEstimator::record_edge`] once per rising edge. A
//! periodic timer calls [`PulseRateEstimator::sample_and_reset`], which turns
//! the edges counted since the previous call into revolutions per minute:
//!
//! ```text
//! rpm = (edges / pulses_per_revolution) / elapsed_seconds * 60
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use esc_telemetry_pulse_rpm::PulseRateEstimator;
//! use std::sync::Arc;
//!
//! let estimator = Arc::new(PulseRateEstimator::new());
//!
//! // Edge callback context
//! let edges = Arc::clone(&estimator);
//! edges.record_edge();
//!
//! // Sampling loop context
//! let rpm = estimator.sample_now();
//! assert!(rpm >= 0.0);
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_debug_implementations
)]

pub mod estimator;

pub use estimator::{PULSES_PER_REVOLUTION, PulseRateEstimator, PulseWindow};
