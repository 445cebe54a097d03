// Unit tests for the optional TOML settings file

use crate::config::{RequestConfig, Settings};
use crate::error::ConfigError;
use crate::DEFAULT_FORMAT;

use std::fs;

use tempfile::TempDir;

fn write_settings(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weather.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

/// **VALUE**: Verifies a settings file overrides only the segments it names.
///
/// **BUG THIS CATCHES**: Would catch `apply_to` resetting unset segments to "" or
/// ignoring the `[request]` table.
#[test]
fn given_partial_settings_when_applied_then_only_named_segments_change() {
    // GIVEN: A settings file with two overrides
    let (_dir, path) = write_settings(
        r#"
[api]
base_url = "https://example.test"

[request]
location = "52.52,13.405"
parameters = "t_2m:C"
"#,
    );

    // WHEN: Loading and applying it
    let settings = Settings::load(&path).unwrap();
    let mut config = RequestConfig::with_credentials("alice", "pw");
    settings.apply_to(&mut config);

    // THEN: Named segments change, others keep defaults
    assert_eq!(settings.api.base_url.as_deref(), Some("https://example.test"));
    assert_eq!(config.location, "52.52,13.405");
    assert_eq!(config.parameters, "t_2m:C");
    assert_eq!(config.format, DEFAULT_FORMAT);
}

/// **VALUE**: Verifies credentials cannot be smuggled in through the settings file.
///
/// **WHY THIS MATTERS**: Settings files get committed to repositories. Credentials are
/// only ever read from the environment.
///
/// **BUG THIS CATCHES**: Would catch removing `deny_unknown_fields`.
#[test]
fn given_password_in_settings_when_loading_then_parse_error() {
    let (_dir, path) = write_settings(
        r#"
[request]
password = "hunter2"
"#,
    );

    let err = Settings::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn given_missing_file_when_loading_then_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = Settings::load(&dir.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, ConfigError::ReadError { .. }));
}

#[test]
fn given_empty_segment_in_settings_when_loading_then_validation_error() {
    let (_dir, path) = write_settings(
        r#"
[request]
format = ""
"#,
    );

    let err = Settings::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::ValidationError { .. }));
}

#[test]
fn given_empty_file_when_loading_then_defaults() {
    let (_dir, path) = write_settings("");

    let settings = Settings::load(&path).unwrap();

    assert_eq!(settings, Settings::default());
}
