//! Monitor configuration.
//!
//! Values come from an optional YAML file and are then overridden by command
//! line flags. Every field has a default, so an empty file is valid.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MonitorError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub serial: SerialConfig,
    pub pulse: PulseConfig,
}

/// Serial link to the ESC telemetry port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    /// Per-read timeout while waiting for a frame body
    pub timeout_ms: u64,
    /// Sleep between polls when no byte is waiting
    pub poll_interval_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,
            timeout_ms: 1000,
            poll_interval_ms: 1,
        }
    }
}

impl SerialConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Tachometer input and sampling cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// BCM pin number of the tachometer signal
    pub pin: u8,
    pub pulses_per_revolution: u32,
    pub interval_ms: u64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            pin: 17,
            pulses_per_revolution: 7,
            interval_ms: 1000,
        }
    }
}

impl PulseConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl MonitorConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, MonitorError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, MonitorError> {
        let text = std::fs::read_to_string(path).map_err(|source| MonitorError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration file");
        Self::from_yaml_str(&text)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, MonitorError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.serial.port.trim().is_empty() {
            return Err(MonitorError::InvalidConfiguration(
                "serial.port must not be empty".into(),
            ));
        }
        if self.serial.baud_rate == 0 {
            return Err(MonitorError::InvalidConfiguration(
                "serial.baud_rate must be positive".into(),
            ));
        }
        if self.serial.timeout_ms == 0 {
            return Err(MonitorError::InvalidConfiguration(
                "serial.timeout_ms must be positive".into(),
            ));
        }
        if self.pulse.pulses_per_revolution == 0 {
            return Err(MonitorError::InvalidConfiguration(
                "pulse.pulses_per_revolution must be positive".into(),
            ));
        }
        if self.pulse.interval_ms == 0 {
            return Err(MonitorError::InvalidConfiguration(
                "pulse.interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, MonitorError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
