//! Tests for host configuration loading.

use std::fs;
use tempfile::TempDir;

use tictactoe_host::HostConfig;

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = HostConfig::load_or_default(dir.path().join("absent.toml")).expect("defaults");
    assert_eq!(config, HostConfig::default());
    assert_eq!(*config.tick_rate(), 10);
    assert_eq!(*config.bot_delay_ticks(), 5);
    assert_eq!(*config.seed(), None);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("tictactoe.toml");
    fs::write(&path, "seed = 42\nbot_delay_ticks = 0\n").expect("Write failed");

    let config = HostConfig::from_file(&path).expect("Load failed");
    assert_eq!(*config.seed(), Some(42));
    assert_eq!(*config.bot_delay_ticks(), 0);
    assert_eq!(*config.tick_rate(), 10);
    assert_eq!(config.match_settings().bot_delay_ticks, 0);
}

#[test]
fn test_invalid_toml_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "tick_rate = \"fast\"").expect("Write failed");

    let err = HostConfig::from_file(&path).expect_err("bad config must fail");
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_zero_tick_rate_in_file_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("zero.toml");
    fs::write(&path, "tick_rate = 0").expect("Write failed");

    assert!(HostConfig::load_or_default(&path).is_err());
}
