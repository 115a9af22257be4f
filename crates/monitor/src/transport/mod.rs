//! Hardware adapters: the telemetry serial port and tachometer edge inputs.

pub mod gpio;
pub mod serial;
pub mod simulated;

pub use gpio::EdgeInput;
pub use serial::{PortEntry, SerialSource, list_ports};
pub use simulated::SimulatedEdges;

/// A running producer of tachometer edges.
///
/// Edges flow into the estimator the source was started with; dropping the
/// source stops the feed and releases the hardware.
pub trait EdgeSource: Send {
    fn label(&self) -> String;
}
