//! Loading `ModalConfig` from disk.

#![cfg(feature = "config")]

use std::io::Write;

use modal_core::{AppearanceMode, ConfigError, LifecyclePolicy, ModalConfig, ModalManager};
use modal_harness::{DEBUG_KEY, DebugProps, debug_windows};

#[test]
fn toml_file_drives_manager_policy() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[lifecycle]\ntype = \"queue\"\nappearance-mode = \"during-close\"").unwrap();

    let config = ModalConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(
        config.lifecycle,
        LifecyclePolicy::queue(AppearanceMode::DuringClose)
    );

    let manager = ModalManager::with_config(debug_windows(), config);
    let a = manager.open_with(DEBUG_KEY, DebugProps::new("a")).unwrap();
    let b = manager.open_with(DEBUG_KEY, DebugProps::new("b")).unwrap();
    let _hold = manager.handle(a).unwrap().capture();
    manager.close(Some(a));
    assert_eq!(manager.active_id(), Some(b));
}

#[test]
fn json_file_multiple() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"lifecycle": {{"type": "multiple"}}}}"#).unwrap();

    let config = ModalConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.lifecycle, LifecyclePolicy::Multiple);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModalConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("I/O error"));
}

#[test]
fn malformed_toml_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[lifecycle\ntype = ").unwrap();
    let err = ModalConfig::from_toml_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn both_appearance_spellings_load() {
    for key in ["appearance-mode", "appearanceMode"] {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[lifecycle]\ntype = \"queue\"\n{key} = \"during-close\"").unwrap();
        let config = ModalConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(
            config.lifecycle,
            LifecyclePolicy::queue(AppearanceMode::DuringClose),
            "key {key}"
        );

        let mut json = tempfile::NamedTempFile::new().unwrap();
        write!(
            json,
            r#"{{"lifecycle": {{"type": "queue", "{key}": "during-close"}}}}"#
        )
        .unwrap();
        let config = ModalConfig::from_json_file(json.path()).unwrap();
        assert_eq!(
            config.lifecycle,
            LifecyclePolicy::queue(AppearanceMode::DuringClose),
            "key {key}"
        );
    }
}

#[test]
fn misspelled_appearance_key_fails_to_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[lifecycle]\ntype = \"queue\"\nappearance_mode = \"during-close\"").unwrap();
    let err = ModalConfig::from_toml_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}
