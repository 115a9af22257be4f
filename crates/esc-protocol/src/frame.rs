//! Frame layout and raw field extraction.
//!
//! A frame is a single `0x9B` start marker followed by a 23-byte body. There is
//! no length prefix and no checksum. All multi-byte fields are big-endian and
//! their offsets index into the body, not the full frame.

use crate::error::{EscError, EscResult};

/// Start marker byte that opens every frame.
pub const START_MARKER: u8 = 0x9B;

/// Body bytes following the start marker.
pub const BODY_LEN: usize = 23;

/// Full frame length including the start marker.
pub const FRAME_LEN: usize = BODY_LEN + 1;

/// Body offsets of the decoded fields.
///
/// Body bytes 0..5 and 17..23 are reserved and ignored.
pub mod body_layout {
    pub const RX_THROTTLE: usize = 5;
    pub const ACTUAL_THROTTLE: usize = 7;
    pub const RPM: usize = 9;
    pub const BUSBAR_VOLTAGE: usize = 11;
    pub const BUSBAR_CURRENT: usize = 13;
    pub const PHASE_LINE_CURRENT: usize = 15;
}

/// Reinterpret a raw 16-bit field as two's complement.
///
/// Values below `0x8000` are returned unchanged; values at or above it map to
/// `value - 0x1_0000`.
pub fn signed_from_raw(raw: u16) -> i16 {
    i16::from_be_bytes(raw.to_be_bytes())
}

fn be_u16(body: &[u8], offset: usize) -> u16 {
    match body.get(offset..offset.saturating_add(2)) {
        Some(&[hi, lo]) => u16::from_be_bytes([hi, lo]),
        _ => 0,
    }
}

fn put_be_u16(body: &mut [u8], offset: usize, value: u16) {
    if let Some(dst) = body.get_mut(offset..offset.saturating_add(2)) {
        dst.copy_from_slice(&value.to_be_bytes());
    }
}

/// The 23 body bytes of a frame whose start marker has already matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame {
    body: [u8; BODY_LEN],
}

impl RawFrame {
    pub fn from_body(body: [u8; BODY_LEN]) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &[u8; BODY_LEN] {
        &self.body
    }

    /// Extract the undecoded integer fields.
    pub fn fields(&self) -> RawFields {
        RawFields {
            rx_throttle: be_u16(&self.body, body_layout::RX_THROTTLE),
            actual_throttle: be_u16(&self.body, body_layout::ACTUAL_THROTTLE),
            rpm: be_u16(&self.body, body_layout::RPM),
            busbar_voltage: be_u16(&self.body, body_layout::BUSBAR_VOLTAGE),
            busbar_current: signed_from_raw(be_u16(&self.body, body_layout::BUSBAR_CURRENT)),
            phase_line_current: signed_from_raw(be_u16(
                &self.body,
                body_layout::PHASE_LINE_CURRENT,
            )),
        }
    }
}

/// Undecoded field values as they appear on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawFields {
    pub rx_throttle: u16,
    pub actual_throttle: u16,
    pub rpm: u16,
    pub busbar_voltage: u16,
    pub busbar_current: i16,
    pub phase_line_current: i16,
}

impl RawFields {
    /// Build the 23-byte body for these fields, reserved bytes zeroed.
    pub fn encode_body(&self) -> [u8; BODY_LEN] {
        let mut body = [0u8; BODY_LEN];
        put_be_u16(&mut body, body_layout::RX_THROTTLE, self.rx_throttle);
        put_be_u16(&mut body, body_layout::ACTUAL_THROTTLE, self.actual_throttle);
        put_be_u16(&mut body, body_layout::RPM, self.rpm);
        put_be_u16(&mut body, body_layout::BUSBAR_VOLTAGE, self.busbar_voltage);
        put_be_u16(
            &mut body,
            body_layout::BUSBAR_CURRENT,
            u16::from_be_bytes(self.busbar_current.to_be_bytes()),
        );
        put_be_u16(
            &mut body,
            body_layout::PHASE_LINE_CURRENT,
            u16::from_be_bytes(self.phase_line_current.to_be_bytes()),
        );
        body
    }

    /// Build a complete frame, start marker included.
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        if let Some((marker, body)) = frame.split_first_mut() {
            *marker = START_MARKER;
            body.copy_from_slice(&self.encode_body());
        }
        frame
    }
}

/// Split a complete frame into its body after checking length and marker.
pub fn parse_frame(bytes: &[u8]) -> EscResult<RawFrame> {
    if bytes.len() != FRAME_LEN {
        return Err(EscError::InvalidLength {
            expected: FRAME_LEN,
            actual: bytes.len(),
        });
    }

    let Some((&marker, body)) = bytes.split_first() else {
        return Err(EscError::InvalidLength {
            expected: FRAME_LEN,
            actual: 0,
        });
    };
    if marker != START_MARKER {
        return Err(EscError::InvalidMarker(marker));
    }

    let mut raw = [0u8; BODY_LEN];
    raw.copy_from_slice(body);
    Ok(RawFrame::from_body(raw))
}
