//! Serial port transport for the frame decoder.

use std::io::Read;

use esc_telemetry_protocol::{EscError, EscResult, FrameSource};
use serde::Serialize;
use serialport::{SerialPort, SerialPortType};
use tracing::info;

use crate::config::SerialConfig;
use crate::error::MonitorError;

/// An open serial port feeding [`FrameSource`] reads.
///
/// The port is closed when this value is dropped.
pub struct SerialSource {
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    pub fn open(config: &SerialConfig) -> Result<Self, MonitorError> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(config.timeout())
            .open()
            .map_err(|source| MonitorError::PortOpen {
                port: config.port.clone(),
                source,
            })?;
        info!(
            port = %config.port,
            baud_rate = config.baud_rate,
            timeout_ms = config.timeout_ms,
            "serial port opened"
        );
        Ok(Self { port })
    }
}

impl FrameSource for SerialSource {
    fn bytes_available(&mut self) -> EscResult<bool> {
        self.port
            .bytes_to_read()
            .map(|waiting| waiting > 0)
            .map_err(|e| EscError::Transport(e.to_string()))
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> EscResult<()> {
        Read::read_exact(&mut self.port, buf).map_err(EscError::from)
    }
}

/// A serial port visible to the operating system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortEntry {
    pub name: String,
    pub kind: String,
    pub description: Option<String>,
}

pub fn list_ports() -> Result<Vec<PortEntry>, MonitorError> {
    let ports = serialport::available_ports().map_err(std::io::Error::from)?;
    Ok(ports
        .into_iter()
        .map(|info| {
            let (kind, description) = describe(&info.port_type);
            PortEntry {
                name: info.port_name,
                kind: kind.to_string(),
                description,
            }
        })
        .collect())
}

fn describe(port_type: &SerialPortType) -> (&'static str, Option<String>) {
    match port_type {
        SerialPortType::UsbPort(usb) => {
            let product = usb.product.clone().unwrap_or_default();
            (
                "usb",
                Some(format!("{:04x}:{:04x} {}", usb.vid, usb.pid, product).trim_end().to_string()),
            )
        }
        SerialPortType::PciPort => ("pci", None),
        SerialPortType::BluetoothPort => ("bluetooth", None),
        SerialPortType::Unknown => ("unknown", None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_non_usb() {
        assert_eq!(describe(&SerialPortType::PciPort), ("pci", None));
        assert_eq!(describe(&SerialPortType::Unknown), ("unknown", None));
    }

    #[test]
    fn test_open_missing_port_is_port_open_error() {
        let config = SerialConfig {
            port: "/dev/escmon-does-not-exist".into(),
            ..SerialConfig::default()
        };
        let result = SerialSource::open(&config);
        assert!(matches!(result, Err(MonitorError::PortOpen { .. })));
    }
}
