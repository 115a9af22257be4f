//! Serial telemetry decoding for brushless ESCs that stream a fixed 24-byte
//! frame.
//!
//! This crate is intentionally I/O-free. The transport is abstracted behind
//! [`FrameSource`]; serial port adapters live in the monitor binary, and
//! in-memory captures can be replayed through [`std::io::Cursor`].
//!
//! # Key Features
//! - Single-byte start marker synchronization with a three-way outcome
//! - Big-endian unsigned and two's-complement field extraction
//! - Calibration to percent, RPM, volts and amperes
//! - RPM plausibility ceiling for sensor glitches
//!
//! ```rust
//! use esc_telemetry_protocol::{FrameDecoder, FrameOutcome, RawFields};
//! use std::io::Cursor;
//!
//! let frame = RawFields { rx_throttle: 1024, ..Default::default() }.encode();
//! let mut source = Cursor::new(frame);
//! let mut decoder = FrameDecoder::new();
//!
//! match decoder.try_read_frame(&mut source) {
//!     Ok(FrameOutcome::Sample(sample)) => assert_eq!(sample.rx_throttle(), 100.0),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

#![deny(static_mut_refs)]

pub mod decoder;
pub mod error;
pub mod frame;
pub mod sample;
pub mod source;

pub use decoder::{DecoderStats, FrameDecoder, FrameOutcome, decode_frame};
pub use error::{EscError, EscResult};
pub use frame::{
    BODY_LEN, FRAME_LEN, RawFields, RawFrame, START_MARKER, body_layout, parse_frame,
    signed_from_raw,
};
pub use sample::{
    CURRENT_COUNTS_PER_AMP, RPM_PLAUSIBILITY_CEILING, THROTTLE_FULL_SCALE, TelemetrySample,
    VOLTAGE_COUNTS_PER_VOLT, is_plausible_rpm, round_to_tenth, rpm_candidate,
};
pub use source::FrameSource;
