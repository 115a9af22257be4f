//! Fuzzes the frame synchronization loop over an arbitrary byte stream.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_stream_decoder
#![no_main]
use std::io::Cursor;

use esc_telemetry_protocol::{FrameDecoder, FrameOutcome};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut source = Cursor::new(data);
    let mut decoder = FrameDecoder::new();
    let mut calls = 0usize;

    // Every call consumes at least one byte until the stream is drained.
    loop {
        calls += 1;
        assert!(calls <= data.len() + 1);
        match decoder.try_read_frame(&mut source) {
            Ok(FrameOutcome::NoDataYet) => break,
            Ok(_) => {}
            Err(e) => assert!(e.is_timeout()),
        }
    }

    let stats = decoder.stats();
    let consumed = stats.invalid_markers + stats.frames_decoded * 24;
    assert!(consumed <= data.len() as u64);
});
