//! Fuzzes single-frame decoding.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_frame_decode
#![no_main]
use esc_telemetry_protocol::{FRAME_LEN, RPM_PLAUSIBILITY_CEILING, decode_frame};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic; only exact-length, marker-led input decodes.
    if let Ok(sample) = decode_frame(data) {
        assert_eq!(data.len(), FRAME_LEN);
        assert!(sample.electric_rpm() >= 0.0);
        assert!(sample.electric_rpm() <= RPM_PLAUSIBILITY_CEILING);
    }
});
