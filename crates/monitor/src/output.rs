//! Output formatting for escmon
//!
//! Human output goes to stdout with `colored` highlights. With `--json` each
//! sample or report is one JSON object per line so the stream can be piped.

use anyhow::Error;
use colored::*;
use esc_telemetry_protocol::{DecoderStats, TelemetrySample};
use esc_telemetry_pulse_rpm::PulseWindow;
use serde::Serialize;
use serde_json::json;

use crate::error::MonitorError;
use crate::transport::PortEntry;

/// One RPM sampling step as printed by `pulse`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RpmReport {
    pub edges: u64,
    pub elapsed_ms: f64,
    pub rpm: f64,
}

impl From<PulseWindow> for RpmReport {
    fn from(window: PulseWindow) -> Self {
        Self {
            edges: window.edges,
            elapsed_ms: window.elapsed.as_secs_f64() * 1000.0,
            rpm: window.rpm,
        }
    }
}

pub fn format_sample_json(sample: &TelemetrySample) -> Result<String, MonitorError> {
    Ok(serde_json::to_string(sample)?)
}

pub fn print_sample(sample: &TelemetrySample, json: bool) -> Result<(), MonitorError> {
    if json {
        println!("{}", format_sample_json(sample)?);
    } else {
        println!("{sample}");
    }
    Ok(())
}

pub fn format_rpm_human(report: &RpmReport) -> String {
    format!("Current RPM: {:.2}", report.rpm)
}

pub fn print_rpm(report: &RpmReport, json: bool) -> Result<(), MonitorError> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        println!("{}", format_rpm_human(report));
    }
    Ok(())
}

pub fn format_stats_human(stats: &DecoderStats) -> String {
    format!(
        "Frames decoded: {}, invalid bytes skipped: {}, rpm rejected: {}, read failures: {}",
        stats.frames_decoded, stats.invalid_markers, stats.rpm_rejected, stats.read_failures
    )
}

/// Decoder totals printed when a stream ends.
pub fn print_stats(stats: &DecoderStats, json: bool) {
    if json {
        let output = json!({
            "stats": {
                "frames_decoded": stats.frames_decoded,
                "invalid_markers": stats.invalid_markers,
                "rpm_rejected": stats.rpm_rejected,
                "read_failures": stats.read_failures,
            }
        });
        println!("{output}");
    } else {
        println!("{}", format_stats_human(stats).dimmed());
    }
}

pub fn print_ports(ports: &[PortEntry], json: bool) {
    if json {
        let output = json!({
            "success": true,
            "ports": ports
        });
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Failed to format port list as JSON: {e}"),
        }
        return;
    }

    if ports.is_empty() {
        println!("{}", "No serial ports found".yellow());
        return;
    }

    println!("{}", "Serial Ports:".bold());
    for port in ports {
        match &port.description {
            Some(description) => {
                println!("  {} ({}) {}", port.name.bold(), port.kind, description.dimmed());
            }
            None => println!("  {} ({})", port.name.bold(), port.kind),
        }
    }
}

/// Status line for humans; suppressed in JSON mode so stdout stays parseable.
pub fn print_banner(message: &str, json: bool) {
    if !json {
        eprintln!("{}", message.cyan());
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    match error.downcast_ref::<MonitorError>() {
        Some(MonitorError::PortOpen { .. }) => "PortOpen",
        Some(MonitorError::ConfigRead { .. }) => "ConfigRead",
        Some(MonitorError::InvalidConfiguration(_)) => "InvalidConfiguration",
        Some(MonitorError::Gpio(_)) => "Gpio",
        Some(MonitorError::Unsupported(_)) => "Unsupported",
        Some(MonitorError::Telemetry(_)) => "Telemetry",
        Some(MonitorError::IoError(_)) => "IoError",
        Some(MonitorError::YamlError(_)) => "YamlError",
        Some(MonitorError::JsonError(_)) => "JsonError",
        None => "Unknown",
    }
}
