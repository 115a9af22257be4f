//! Integration tests for the escmon binary
//!
//! Hardware-free: serial decoding is exercised through `replay` and the
//! pulse sampler through its software edge source.

use assert_cmd::Command;
use esc_telemetry_protocol::RawFields;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn escmon() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("escmon")?;
    cmd.env_remove("ESCMON_CONFIG").env_remove("RUST_LOG");
    Ok(cmd)
}

fn sample_frame() -> [u8; 24] {
    RawFields {
        rx_throttle: 512,
        actual_throttle: 256,
        rpm: 700,
        busbar_voltage: 168,
        busbar_current: 64,
        phase_line_current: -32,
    }
    .encode()
}

/// Two frames with three garbage bytes around them.
fn write_capture(dir: &TempDir) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let mut bytes = vec![0x00, 0x55];
    bytes.extend_from_slice(&sample_frame());
    bytes.push(0xFF);
    bytes.extend_from_slice(
        &RawFields {
            rpm: 6161,
            ..RawFields::default()
        }
        .encode(),
    );
    let path = dir.path().join("capture.bin");
    fs::write(&path, bytes)?;
    Ok(path)
}

fn json_lines(stdout: &[u8]) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let text = std::str::from_utf8(stdout)?;
    let mut values = Vec::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        values.push(serde_json::from_str(line)?);
    }
    Ok(values)
}

#[test]
fn test_help_lists_commands() -> TestResult {
    escmon()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("read"))
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("pulse"))
        .stdout(predicate::str::contains("ports"));
    Ok(())
}

#[test]
fn test_replay_human_output() -> TestResult {
    let dir = TempDir::new()?;
    let capture = write_capture(&dir)?;

    escmon()?
        .arg("replay")
        .arg(&capture)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "RX Throttle: 50.00%, Actual Throttle: 25.00%, RPM: 1000.0, Voltage: 16.8V, \
             Busbar Current: 1.00A, Phase Line Current: -0.50A",
        ))
        .stdout(predicate::str::contains("RPM: 0.0,"))
        .stdout(predicate::str::contains("invalid bytes skipped: 3"));
    Ok(())
}

#[test]
fn test_replay_json_lines() -> TestResult {
    let dir = TempDir::new()?;
    let capture = write_capture(&dir)?;

    let output = escmon()?
        .args(["replay", "--json"])
        .arg(&capture)
        .output()?;
    assert!(output.status.success());

    let lines = json_lines(&output.stdout)?;
    let [first, rejected, summary] = lines.as_slice() else {
        return Err(format!("expected 3 lines, got {}", lines.len()).into());
    };
    assert_eq!(first["electric_rpm"], 1000.0);
    assert_eq!(first["busbar_voltage"], 16.8);
    assert_eq!(rejected["electric_rpm"], 0.0);
    assert_eq!(summary["stats"]["frames_decoded"], 2);
    assert_eq!(summary["stats"]["invalid_markers"], 3);
    assert_eq!(summary["stats"]["rpm_rejected"], 1);
    Ok(())
}

#[test]
fn test_replay_count_limits_output() -> TestResult {
    let dir = TempDir::new()?;
    let capture = write_capture(&dir)?;

    let output = escmon()?
        .args(["replay", "--json", "-n", "1"])
        .arg(&capture)
        .output()?;
    assert!(output.status.success());

    let lines = json_lines(&output.stdout)?;
    let [_, summary] = lines.as_slice() else {
        return Err(format!("expected 2 lines, got {}", lines.len()).into());
    };
    assert_eq!(summary["stats"]["frames_decoded"], 1);
    Ok(())
}

#[test]
fn test_replay_truncated_capture_keeps_complete_frames() -> TestResult {
    let dir = TempDir::new()?;
    let mut bytes = sample_frame().to_vec();
    bytes.extend(sample_frame().iter().take(12));
    let path = dir.path().join("truncated.bin");
    fs::write(&path, bytes)?;

    let output = escmon()?.args(["replay", "--json"]).arg(&path).output()?;
    assert!(output.status.success());

    let lines = json_lines(&output.stdout)?;
    let [_, summary] = lines.as_slice() else {
        return Err(format!("expected 2 lines, got {}", lines.len()).into());
    };
    assert_eq!(summary["stats"]["read_failures"], 1);
    Ok(())
}

#[test]
fn test_replay_missing_file_fails() -> TestResult {
    escmon()?
        .args(["replay", "/nonexistent/capture.bin"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Failed to read capture"));
    Ok(())
}

#[test]
fn test_replay_missing_file_json_error() -> TestResult {
    let output = escmon()?
        .args(["replay", "/nonexistent/capture.bin", "--json"])
        .output()?;
    assert_eq!(output.status.code(), Some(3));

    let error: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(error["success"], false);
    assert!(error["error"]["message"].is_string());
    Ok(())
}

#[test]
fn test_config_defaults() -> TestResult {
    escmon()?
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("port: /dev/ttyUSB0"))
        .stdout(predicate::str::contains("baud_rate: 115200"))
        .stdout(predicate::str::contains("pin: 17"));
    Ok(())
}

#[test]
fn test_config_file_overrides() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("escmon.yaml");
    fs::write(&path, "serial:\n  port: /dev/ttyAMA0\npulse:\n  interval_ms: 250\n")?;

    let output = escmon()?
        .args(["config", "--json", "--config"])
        .arg(&path)
        .output()?;
    assert!(output.status.success());

    let config: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(config["serial"]["port"], "/dev/ttyAMA0");
    assert_eq!(config["serial"]["baud_rate"], 115_200);
    assert_eq!(config["pulse"]["interval_ms"], 250);
    Ok(())
}

#[test]
fn test_config_from_environment() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("escmon.yaml");
    fs::write(&path, "serial:\n  baud_rate: 57600\n")?;

    escmon()?
        .env("ESCMON_CONFIG", &path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("baud_rate: 57600"));
    Ok(())
}

#[test]
fn test_invalid_config_exit_code() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("escmon.yaml");
    fs::write(&path, "pulse:\n  pulses_per_revolution: 0\n")?;

    escmon()?
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("pulses_per_revolution"));
    Ok(())
}

#[test]
fn test_read_missing_port_exit_code() -> TestResult {
    escmon()?
        .args(["read", "--port", "/dev/escmon-does-not-exist", "-n", "1"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("/dev/escmon-does-not-exist"));
    Ok(())
}

#[test]
fn test_pulse_simulated_reports() -> TestResult {
    let output = escmon()?
        .args([
            "pulse",
            "--simulate-hz",
            "700",
            "--interval-ms",
            "100",
            "-n",
            "2",
            "--json",
        ])
        .output()?;
    assert!(output.status.success());

    let lines = json_lines(&output.stdout)?;
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert!(line["rpm"].as_f64().is_some_and(|rpm| rpm > 0.0));
        assert!(line["edges"].as_u64().is_some_and(|edges| edges > 0));
    }
    Ok(())
}

#[test]
fn test_pulse_rejects_bad_simulation_rate() -> TestResult {
    escmon()?
        .args(["pulse", "--simulate-hz", "0", "-n", "1"])
        .assert()
        .failure()
        .code(4);
    Ok(())
}

#[cfg(not(feature = "gpio"))]
#[test]
fn test_pulse_without_gpio_is_unsupported() -> TestResult {
    escmon()?
        .args(["pulse", "-n", "1"])
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("--simulate-hz"));
    Ok(())
}
