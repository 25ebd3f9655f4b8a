//! Config file round-trip and service wiring tests.

use std::fs;

use nominis::{LoadedCredentials, NominisConfig, build_service};
use tempfile::TempDir;

#[test]
fn save_and_load_round_trip() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("nested").join("config.toml");

    let mut config = NominisConfig::default();
    config.euipo.timeout_seconds = 12;
    config.euipo.status_filter = Some(vec!["REGISTERED".into(), "OPPOSITION".into()]);
    config.search.page_size = 25;
    config.save_to_file(&path).expect("save");

    let loaded = NominisConfig::from_file(&path).expect("load");
    assert_eq!(loaded.euipo.timeout_seconds, 12);
    assert_eq!(
        loaded.euipo.status_filter,
        Some(vec!["REGISTERED".to_owned(), "OPPOSITION".to_owned()])
    );
    assert_eq!(loaded.search.page_size, 25);
}

#[test]
fn saved_file_never_contains_secrets() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("config.toml");

    let mut config = NominisConfig::default();
    config.euipo = config.euipo.with_credentials("visible-id", "super-secret");
    config.save_to_file(&path).expect("save");

    let text = fs::read_to_string(&path).expect("read");
    assert!(!text.contains("super-secret"));
    assert!(!text.contains("visible-id"));
}

#[test]
fn explicit_path_wins_in_load() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[search]\npage_size = 60\n").expect("write");

    let config = NominisConfig::load(Some(&path)).expect("load");
    assert_eq!(config.search.page_size, 60);
    assert_eq!(config.euipo.timeout_seconds, 30);
}

#[test]
fn malformed_file_is_config_error() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[euipo\ntimeout_seconds = ").expect("write");

    let err = NominisConfig::from_file(&path).unwrap_err();
    assert_eq!(err.code(), "CONFIG_INVALID");
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let err = NominisConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert_eq!(err.code(), "IO_ERROR");
}

#[test]
fn invalid_file_values_rejected_by_build_service() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[euipo]\napi_base = \"nope\"\n").expect("write");

    let config = NominisConfig::from_file(&path).expect("parse");
    let err = build_service(&config, &LoadedCredentials::default()).unwrap_err();
    assert!(err.to_string().contains("api_base"));
}
