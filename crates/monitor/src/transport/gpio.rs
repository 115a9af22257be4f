//! Rising-edge interrupts from a GPIO pin.
//!
//! Only available on Linux builds with the `gpio` feature; elsewhere
//! [`EdgeInput::open`] reports [`MonitorError::Unsupported`].

use std::sync::Arc;

use esc_telemetry_pulse_rpm::PulseRateEstimator;

use crate::error::MonitorError;
use crate::transport::EdgeSource;

#[cfg(all(feature = "gpio", target_os = "linux"))]
mod imp {
    use super::*;
    use rppal::gpio::{Gpio, InputPin, Trigger};
    use tracing::{info, warn};

    pub struct EdgeInput {
        pin: InputPin,
    }

    impl EdgeInput {
        pub fn open(pin: u8, estimator: Arc<PulseRateEstimator>) -> Result<Self, MonitorError> {
            let gpio = Gpio::new().map_err(|e| MonitorError::Gpio(e.to_string()))?;
            let mut pin = gpio
                .get(pin)
                .map_err(|e| MonitorError::Gpio(format!("pin {pin}: {e}")))?
                .into_input_pulldown();
            pin.set_async_interrupt(Trigger::RisingEdge, None, move |_| {
                estimator.record_edge();
            })
            .map_err(|e| MonitorError::Gpio(e.to_string()))?;
            info!(pin = pin.pin(), "listening for rising edges");
            Ok(Self { pin })
        }
    }

    impl EdgeSource for EdgeInput {
        fn label(&self) -> String {
            format!("gpio pin {}", self.pin.pin())
        }
    }

    impl Drop for EdgeInput {
        fn drop(&mut self) {
            if let Err(e) = self.pin.clear_async_interrupt() {
                warn!(error = %e, "failed to clear edge interrupt");
            }
        }
    }
}

#[cfg(not(all(feature = "gpio", target_os = "linux")))]
mod imp {
    use super::*;

    pub enum EdgeInput {}

    impl EdgeSource for EdgeInput {
        fn label(&self) -> String {
            match *self {}
        }
    }

    impl EdgeInput {
        pub fn open(pin: u8, _estimator: Arc<PulseRateEstimator>) -> Result<Self, MonitorError> {
            Err(MonitorError::Unsupported(format!(
                "GPIO pin {pin} requires a Linux build with the `gpio` feature; \
                 use --simulate-hz for a software edge source"
            )))
        }
    }
}

/// Tachometer input feeding an estimator from the interrupt thread.
///
/// The interrupt is released on drop.
pub use imp::EdgeInput;
