//! Calibrated telemetry samples.

use core::fmt;

use serde::Serialize;

use crate::frame::{RawFields, RawFrame};

/// Full-scale raw throttle count (100 %).
pub const THROTTLE_FULL_SCALE: f64 = 1024.0;

/// Raw voltage counts per volt.
pub const VOLTAGE_COUNTS_PER_VOLT: f64 = 10.0;

/// Raw current counts per ampere, busbar and phase line alike.
pub const CURRENT_COUNTS_PER_AMP: f64 = 64.0;

/// Derived RPM values strictly above this are treated as sensor noise.
pub const RPM_PLAUSIBILITY_CEILING: f64 = 8800.0;

/// Round to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// RPM implied by a raw field before the plausibility ceiling is applied.
pub fn rpm_candidate(raw: u16) -> f64 {
    round_to_tenth(f64::from(raw) * 10.0 / 7.0)
}

pub fn is_plausible_rpm(candidate: f64) -> bool {
    candidate <= RPM_PLAUSIBILITY_CEILING
}

fn throttle_percent(raw: u16) -> f64 {
    f64::from(raw) * 100.0 / THROTTLE_FULL_SCALE
}

fn current_amps(raw: i16) -> f64 {
    f64::from(raw) / CURRENT_COUNTS_PER_AMP
}

/// One decoded telemetry frame in physical units.
///
/// Only constructed from a frame whose marker matched and whose body was read
/// in full; fields are read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetrySample {
    rx_throttle: f64,
    actual_throttle: f64,
    electric_rpm: f64,
    busbar_voltage: f64,
    busbar_current: f64,
    phase_line_current: f64,
}

impl TelemetrySample {
    pub fn from_frame(frame: &RawFrame) -> Self {
        Self::from_fields(&frame.fields())
    }

    pub(crate) fn from_fields(fields: &RawFields) -> Self {
        let candidate = rpm_candidate(fields.rpm);
        let electric_rpm = if is_plausible_rpm(candidate) {
            candidate
        } else {
            0.0
        };

        Self {
            rx_throttle: throttle_percent(fields.rx_throttle),
            actual_throttle: throttle_percent(fields.actual_throttle),
            electric_rpm,
            busbar_voltage: f64::from(fields.busbar_voltage) / VOLTAGE_COUNTS_PER_VOLT,
            busbar_current: current_amps(fields.busbar_current),
            phase_line_current: current_amps(fields.phase_line_current),
        }
    }

    /// Throttle commanded by the receiver, percent.
    pub fn rx_throttle(&self) -> f64 {
        self.rx_throttle
    }

    /// Throttle the controller is actually applying, percent.
    pub fn actual_throttle(&self) -> f64 {
        self.actual_throttle
    }

    /// Electrical RPM; 0 when the raw value was implausible.
    pub fn electric_rpm(&self) -> f64 {
        self.electric_rpm
    }

    pub fn busbar_voltage(&self) -> f64 {
        self.busbar_voltage
    }

    pub fn busbar_current(&self) -> f64 {
        self.busbar_current
    }

    pub fn phase_line_current(&self) -> f64 {
        self.phase_line_current
    }
}

impl fmt::Display for TelemetrySample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RX Throttle: {:.2}%, Actual Throttle: {:.2}%, RPM: {:.1}, Voltage: {:.1}V, \
             Busbar Current: {:.2}A, Phase Line Current: {:.2}A",
            self.rx_throttle,
            self.actual_throttle,
            self.electric_rpm,
            self.busbar_voltage,
            self.busbar_current,
            self.phase_line_current
        )
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(500))]

        #[test]
        fn prop_electric_rpm_within_ceiling(rpm in any::<u16>()) {
            let s = TelemetrySample::from_fields(&RawFields { rpm, ..Default::default() });
            prop_assert!(s.electric_rpm() >= 0.0);
            prop_assert!(s.electric_rpm() <= RPM_PLAUSIBILITY_CEILING);
        }

        #[test]
        fn prop_only_rpm_is_filtered(
            rx in any::<u16>(),
            volts in any::<u16>(),
            amps in any::<i16>(),
        ) {
            let s = TelemetrySample::from_fields(&RawFields {
                rx_throttle: rx,
                busbar_voltage: volts,
                busbar_current: amps,
                rpm: u16::MAX,
                ..Default::default()
            });
            prop_assert!((s.rx_throttle() - f64::from(rx) * 100.0 / 1024.0).abs() < 1e-9);
            prop_assert!((s.busbar_voltage() - f64::from(volts) / 10.0).abs() < 1e-9);
            prop_assert!((s.busbar_current() - f64::from(amps) / 64.0).abs() < 1e-9);
        }
    }
}
