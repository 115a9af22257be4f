//! Frame synchronization state machine.
//!
//! Each call to [`FrameDecoder::try_read_frame`] consumes at most one frame:
//! either nothing (no data), a single non-marker byte, or a marker plus the
//! full 23-byte body. Resynchronization is left to the caller, which simply
//! calls again.

use tracing::{debug, trace};

use crate::error::EscResult;
use crate::frame::{BODY_LEN, RawFrame, START_MARKER, parse_frame};
use crate::sample::{TelemetrySample, is_plausible_rpm, rpm_candidate};
use crate::source::FrameSource;

/// Result of one decode attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// The transport had nothing to read; no I/O was performed.
    NoDataYet,
    /// The first byte was not the start marker. It has been consumed.
    InvalidFrame { byte: u8 },
    Sample(TelemetrySample),
}

impl FrameOutcome {
    pub fn sample(&self) -> Option<&TelemetrySample> {
        match self {
            FrameOutcome::Sample(sample) => Some(sample),
            _ => None,
        }
    }

    pub fn is_sample(&self) -> bool {
        matches!(self, FrameOutcome::Sample(_))
    }
}

/// Running totals kept by a [`FrameDecoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    pub frames_decoded: u64,
    pub invalid_markers: u64,
    pub rpm_rejected: u64,
    pub read_failures: u64,
}

#[derive(Debug, Default)]
pub struct FrameDecoder {
    stats: DecoderStats,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Attempt to read one frame from `source`.
    ///
    /// # Errors
    ///
    /// Returns the transport's error when the body cannot be read in full.
    /// Marker mismatches are reported as [`FrameOutcome::InvalidFrame`], not
    /// as errors.
    pub fn try_read_frame<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> EscResult<FrameOutcome> {
        if !source.bytes_available()? {
            return Ok(FrameOutcome::NoDataYet);
        }

        let byte = source.read_byte()?;
        if byte != START_MARKER {
            self.stats.invalid_markers = self.stats.invalid_markers.saturating_add(1);
            trace!(byte, "discarding non-marker byte");
            return Ok(FrameOutcome::InvalidFrame { byte });
        }

        let mut body = [0u8; BODY_LEN];
        if let Err(e) = source.read_exact(&mut body) {
            self.stats.read_failures = self.stats.read_failures.saturating_add(1);
            debug!(error = %e, "frame body read failed");
            return Err(e);
        }

        let frame = RawFrame::from_body(body);
        let raw_rpm = frame.fields().rpm;
        let candidate = rpm_candidate(raw_rpm);
        if !is_plausible_rpm(candidate) {
            self.stats.rpm_rejected = self.stats.rpm_rejected.saturating_add(1);
            debug!(raw_rpm, candidate, "implausible rpm zeroed");
        }

        self.stats.frames_decoded = self.stats.frames_decoded.saturating_add(1);
        Ok(FrameOutcome::Sample(TelemetrySample::from_frame(&frame)))
    }
}

/// Decode one complete 24-byte frame without a transport.
///
/// # Errors
///
/// Returns [`EscError::InvalidLength`](crate::EscError::InvalidLength) or
/// [`EscError::InvalidMarker`](crate::EscError::InvalidMarker) when `bytes` is
/// not exactly one frame.
pub fn decode_frame(bytes: &[u8]) -> EscResult<TelemetrySample> {
    let frame = parse_frame(bytes)?;
    Ok(TelemetrySample::from_frame(&frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EscError;
    use crate::frame::RawFields;
    use std::io::Cursor;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    /// Source that fails the test if it is read while empty.
    struct EmptySource {
        reads: usize,
    }

    impl FrameSource for EmptySource {
        fn bytes_available(&mut self) -> EscResult<bool> {
            Ok(false)
        }

        fn read_exact(&mut self, _buf: &mut [u8]) -> EscResult<()> {
            self.reads += 1;
            Err(EscError::Transport("read while empty".to_string()))
        }
    }

    #[test]
    fn test_no_data_performs_no_io() -> TestResult {
        let mut decoder = FrameDecoder::new();
        let mut src = EmptySource { reads: 0 };
        assert_eq!(decoder.try_read_frame(&mut src)?, FrameOutcome::NoDataYet);
        assert_eq!(src.reads, 0);
        Ok(())
    }

    #[test]
    fn test_non_marker_consumes_one_byte() -> TestResult {
        let mut decoder = FrameDecoder::new();
        let mut src = Cursor::new(vec![0x00u8, 0x9B, 0x01]);
        let outcome = decoder.try_read_frame(&mut src)?;
        assert_eq!(outcome, FrameOutcome::InvalidFrame { byte: 0x00 });
        assert_eq!(src.position(), 1);
        assert_eq!(decoder.stats().invalid_markers, 1);
        Ok(())
    }

    #[test]
    fn test_full_frame_decodes() -> TestResult {
        let mut decoder = FrameDecoder::new();
        let bytes = RawFields {
            rx_throttle: 1024,
            busbar_current: -64,
            ..Default::default()
        }
        .encode();
        let mut src = Cursor::new(bytes);

        let outcome = decoder.try_read_frame(&mut src)?;
        let sample = outcome.sample().ok_or("expected a sample")?;
        assert_eq!(sample.rx_throttle(), 100.0);
        assert_eq!(sample.busbar_current(), -1.0);
        assert_eq!(src.position(), 24);
        assert_eq!(decoder.stats().frames_decoded, 1);
        Ok(())
    }

    #[test]
    fn test_truncated_body_is_error() -> TestResult {
        let mut decoder = FrameDecoder::new();
        let bytes = RawFields::default().encode();
        let mut src = Cursor::new(bytes[..10].to_vec());

        let result = decoder.try_read_frame(&mut src);
        assert!(matches!(result, Err(ref e) if e.is_timeout()));
        assert_eq!(decoder.stats().read_failures, 1);
        assert_eq!(decoder.stats().frames_decoded, 0);
        assert_eq!(decoder.try_read_frame(&mut src)?, FrameOutcome::NoDataYet);
        Ok(())
    }

    #[test]
    fn test_implausible_rpm_counted() -> TestResult {
        let mut decoder = FrameDecoder::new();
        let mut src = Cursor::new(
            RawFields {
                rpm: 6161,
                ..Default::default()
            }
            .encode(),
        );

        let outcome = decoder.try_read_frame(&mut src)?;
        let sample = outcome.sample().ok_or("expected a sample")?;
        assert_eq!(sample.electric_rpm(), 0.0);
        assert_eq!(decoder.stats().rpm_rejected, 1);
        Ok(())
    }
}
