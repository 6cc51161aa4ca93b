//! Unit tests for settings module.

use chartboard::chart::BackendKind;
use chartboard::settings::{Settings, SettingsError, default_settings_path};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{"optimizer": {"max_points": 250}, "rendering": {"backend": "static"}}"#,
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.optimizer.max_points, 250);
    assert_eq!(settings.rendering.backend, BackendKind::Static);
    assert_eq!(settings.rendering.fallback, Some(BackendKind::Static));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = Settings::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SettingsError::Io { .. }));
}

#[test]
fn test_load_or_default_on_bad_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "not json").unwrap();
    assert_eq!(Settings::load_or_default(&path), Settings::default());
}

#[test]
fn test_component_configs_follow_settings() {
    let settings =
        Settings::from_json(r#"{"processing": {"missing_threshold": 0.5, "max_eager_rows": 10}}"#)
            .unwrap();
    let processor = settings.processor_config();
    assert_eq!(processor.missing_threshold, 0.5);
    assert_eq!(processor.max_eager_rows, 10);
    assert_eq!(settings.chart_config().width, 800);
}

#[test]
fn test_default_paths() {
    // These should return Some on most systems
    let settings = default_settings_path();
    assert!(settings.is_some() || cfg!(target_os = "unknown"));
}
