//! Integration tests for Settings loading.
//!
//! Note: `Settings::load` also reads the global config and SWSTATE_* env vars;
//! only one test here touches the environment, to keep tests independent.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use swstate::application::ApplicationError;
use swstate::config::{Settings, DEFAULT_POOL_CAPACITY};

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("swstate.toml");
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_no_config_when_default_then_compiled_defaults() {
    let settings = Settings::default();

    assert_eq!(settings.pool_capacity, DEFAULT_POOL_CAPACITY);
    assert!(settings.pretty_json);
    assert_eq!(settings.state_file, None);
}

#[test]
fn given_partial_file_when_loaded_then_unspecified_keep_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "pool_capacity = 3\n");

    // Act
    let settings = Settings::from_file(&path).expect("load settings");

    // Assert
    assert_eq!(settings.pool_capacity, 3);
    assert!(settings.pretty_json);
    assert_eq!(settings.state_file, None);
}

#[test]
fn given_state_file_with_tilde_when_loaded_then_expanded() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "state_file = \"~/switch/state.json\"\n");

    let settings = Settings::from_file(&path).unwrap();

    let state_file = settings.state_file.expect("state_file set");
    assert!(!state_file.to_string_lossy().starts_with('~'));
    assert!(state_file.ends_with("switch/state.json"));
}

#[test]
fn given_invalid_toml_when_loaded_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "pool_capacity = \"many\"\n");

    let err = Settings::from_file(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_missing_explicit_file_when_loaded_then_config_error() {
    let dir = TempDir::new().unwrap();

    let err = Settings::from_file(&dir.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_file_and_env_when_loaded_then_env_overrides_file() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "pool_capacity = 3\npretty_json = false\n");
    std::env::set_var("SWSTATE_POOL_CAPACITY", "42");
    std::env::set_var("SWSTATE_STATE_FILE", "/srv/switch/state.json");

    // Act
    let settings = Settings::load(Some(path.as_path()));
    std::env::remove_var("SWSTATE_POOL_CAPACITY");
    std::env::remove_var("SWSTATE_STATE_FILE");

    // Assert: single-underscore prefix is honored, untouched keys keep file values
    let settings = settings.expect("load settings");
    assert_eq!(settings.pool_capacity, 42);
    assert_eq!(
        settings.state_file,
        Some(PathBuf::from("/srv/switch/state.json"))
    );
    assert!(!settings.pretty_json);
}

#[test]
fn given_settings_when_rendered_then_toml_parses_back() {
    let settings = Settings {
        pool_capacity: 5,
        pretty_json: false,
        state_file: Some(PathBuf::from("/var/lib/swstate/state.json")),
    };

    let text = settings.to_toml().unwrap();
    let back: Settings = toml::from_str(&text).unwrap();

    assert_eq!(back, settings);
}
