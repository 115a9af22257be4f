//! Error types for escmon

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Failed to open serial port {port}")]
    PortOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Failed to read configuration file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("GPIO error: {0}")]
    Gpio(String),

    #[error("Unsupported on this build: {0}")]
    Unsupported(String),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] esc_telemetry_protocol::EscError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl MonitorError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            MonitorError::PortOpen { .. } => 2,
            MonitorError::Telemetry(_) | MonitorError::IoError(_) => 3,
            MonitorError::ConfigRead { .. }
            | MonitorError::InvalidConfiguration(_)
            | MonitorError::YamlError(_) => 4,
            MonitorError::Gpio(_) => 5,
            MonitorError::Unsupported(_) => 6,
            MonitorError::JsonError(_) => 1,
        }
    }
}
