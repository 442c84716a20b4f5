//! CLI Integration Tests
//!
//! Tests for the CLI interface using assert_cmd

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn lokafit_cmd() -> Command {
    // Use CARGO_BIN_EXE_<name> environment variable set by cargo test
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lokafit"));
    cmd.env("RUST_LOG", "off");
    cmd
}

fn write_png(dir: &TempDir, name: &str, color: [u8; 3]) -> PathBuf {
    let path = dir.path().join(name);
    RgbImage::from_pixel(40, 30, Rgb(color)).save(&path).unwrap();
    path
}

// TC-CLI-001: help
#[test]
fn test_help_command() {
    lokafit_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lokafit"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("profile"))
        .stdout(predicate::str::contains("match"))
        .stdout(predicate::str::contains("info"));
}

// TC-CLI-002: version
#[test]
fn test_version_command() {
    lokafit_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_info_command() {
    lokafit_cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("lokafit"))
        .stdout(predicate::str::contains("System Information"))
        .stdout(predicate::str::contains("Environment"));
}

#[test]
fn test_info_with_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    std::fs::write(&config, "environment = \"production\"\n[server]\nport = 9123\n").unwrap();

    let mut cmd = lokafit_cmd();
    cmd.env_remove("ENVIRONMENT")
        .args(["info", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("production"));
}

// TC-CLI-003: scan without input
#[test]
fn test_scan_no_input_argument() {
    lokafit_cmd()
        .arg("scan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

// TC-CLI-004: missing input file
#[test]
fn test_scan_missing_input() {
    lokafit_cmd()
        .args(["scan", "/nonexistent/shirt.jpg"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_scan_json() {
    let dir = TempDir::new().unwrap();
    let red = write_png(&dir, "red.png", [200, 30, 30]);
    let blue = write_png(&dir, "blue.png", [20, 40, 200]);

    let output = lokafit_cmd()
        .args(["scan", "--json"])
        .arg(&red)
        .arg(&blue)
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Input order is preserved
    assert_eq!(entries[0]["color_name"], "Red");
    assert_eq!(entries[1]["color_name"], "Blue");
    assert_eq!(entries[0]["status"], "success");
    assert_eq!(entries[0]["confidence"], 0.85);
    assert_eq!(entries[0]["measurements"]["image_width"], 40);
}

#[test]
fn test_scan_quick_summary() {
    let dir = TempDir::new().unwrap();
    let red = write_png(&dir, "red.png", [200, 30, 30]);

    lokafit_cmd()
        .args(["scan", "--quick"])
        .arg(&red)
        .assert()
        .success()
        .stdout(predicate::str::contains("Red"))
        .stdout(predicate::str::contains("Type:").not());
}

#[test]
fn test_scan_undecodable_image() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("bogus.png");
    std::fs::write(&bogus, b"definitely not a png").unwrap();

    lokafit_cmd()
        .arg("scan")
        .arg(&bogus)
        .assert()
        .code(5)
        .stdout(predicate::str::contains("Invalid image format"))
        .stderr(predicate::str::contains("1 of 1 images"));
}

#[test]
fn test_scan_quick_json_keeps_failed_files() {
    let dir = TempDir::new().unwrap();
    let red = write_png(&dir, "red.png", [200, 30, 30]);
    let bogus = dir.path().join("bogus.png");
    std::fs::write(&bogus, b"not an image").unwrap();

    let output = lokafit_cmd()
        .args(["scan", "--quick", "--json"])
        .arg(&red)
        .arg(&bogus)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["status"], "success");
    assert_eq!(entries[0]["color_name"], "Red");
    assert!(entries[0].get("measurements").is_none());
    assert_eq!(entries[1]["status"], "error");
    assert_eq!(entries[1]["confidence"], 0.0);
    assert!(entries[1]["file"].as_str().unwrap().ends_with("bogus.png"));
    assert!(entries[1]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid image format"));
}

#[test]
fn test_profile_white_image() {
    let dir = TempDir::new().unwrap();
    let white = write_png(&dir, "face.png", [255, 255, 255]);

    lokafit_cmd()
        .arg("profile")
        .arg(&white)
        .assert()
        .success()
        .stdout(predicate::str::contains("Light"))
        .stdout(predicate::str::contains("Neutral"))
        .stdout(predicate::str::contains("#000080"));
}

#[test]
fn test_match_json() {
    let output = lokafit_cmd()
        .args(["match", "#FF0000", "-u", "Warm", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["status"], "success");
    assert_eq!(outcome["item_color"], "#FF0000");
    assert_eq!(outcome["confidence"], 0.88);
    let recs = outcome["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 5);
    assert_eq!(recs[0]["theory"], "complementary");
    assert!(recs[0]["color_hex"].as_str().unwrap().starts_with('#'));
}

#[test]
fn test_match_malformed_color() {
    lokafit_cmd()
        .args(["match", "#ZZZ"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_match_invalid_undertone() {
    lokafit_cmd()
        .args(["match", "#FF0000", "--undertone", "Olive"])
        .assert()
        .code(2);
}
