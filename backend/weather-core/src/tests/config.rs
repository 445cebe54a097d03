// Unit tests for request config and credential validation

use crate::config::{Credentials, PASSWORD_ENV_VAR, RequestConfig, USERNAME_ENV_VAR};
use crate::error::ConfigError;
use crate::{DEFAULT_DATETIME, DEFAULT_FORMAT, DEFAULT_LOCATION, DEFAULT_PARAMETERS};

use common::RedactedSecret;

use std::collections::HashMap;
use std::env::VarError;

fn lookup_from(
    vars: &[(&'static str, &'static str)],
) -> impl Fn(&str) -> Result<String, VarError> {
    let vars: HashMap<&str, &str> = vars.iter().copied().collect();
    move |name| {
        vars.get(name)
            .map(|value| value.to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// **VALUE**: Verifies both variables are read and the request segments use defaults.
#[test]
fn given_both_variables_when_loading_then_credentials_and_defaults_present() {
    // GIVEN: Both credential variables set
    let lookup = lookup_from(&[(USERNAME_ENV_VAR, "alice"), (PASSWORD_ENV_VAR, "s3cret")]);

    // WHEN: Building the config
    let config = RequestConfig::from_lookup(lookup).unwrap();

    // THEN: Credentials validate and defaults are in place
    let credentials = config.credentials().unwrap();
    assert_eq!(credentials.username(), "alice");
    assert_eq!(credentials.password().expose(), "s3cret");
    assert_eq!(config.datetime, DEFAULT_DATETIME);
    assert_eq!(config.parameters, DEFAULT_PARAMETERS);
    assert_eq!(config.location, DEFAULT_LOCATION);
    assert_eq!(config.format, DEFAULT_FORMAT);
}

/// **VALUE**: Verifies an absent variable is not an error until validation.
///
/// **WHY THIS MATTERS**: Missing credentials must surface as InvalidConfig at the
/// validation stage, with the variable name, never be replaced by a default.
///
/// **BUG THIS CATCHES**: Would catch defaulting a missing username to "".
#[test]
fn given_missing_username_when_validating_then_missing_credential_names_variable() {
    let lookup = lookup_from(&[(PASSWORD_ENV_VAR, "s3cret")]);
    let config = RequestConfig::from_lookup(lookup).unwrap();

    let err = config.credentials().unwrap_err();

    match err {
        ConfigError::MissingCredential { variable, .. } => {
            assert_eq!(variable, USERNAME_ENV_VAR)
        }
        other => panic!("expected MissingCredential, got {other:?}"),
    }
}

#[test]
fn given_missing_password_when_validating_then_missing_credential_names_variable() {
    let lookup = lookup_from(&[(USERNAME_ENV_VAR, "alice")]);
    let config = RequestConfig::from_lookup(lookup).unwrap();

    let err = config.credentials().unwrap_err();

    assert!(matches!(
        err,
        ConfigError::MissingCredential { variable: PASSWORD_ENV_VAR, .. }
    ));
}

/// **VALUE**: Verifies empty strings are rejected just like absent variables.
///
/// **BUG THIS CATCHES**: Would catch an `is_some()` check that lets `""` through.
#[test]
fn given_empty_credentials_when_validating_then_empty_credential() {
    let empty_user = RequestConfig::with_credentials("", "s3cret");
    let empty_password = RequestConfig::with_credentials("alice", "");

    assert!(matches!(
        empty_user.credentials(),
        Err(ConfigError::EmptyCredential { variable: USERNAME_ENV_VAR, .. })
    ));
    assert!(matches!(
        empty_password.credentials(),
        Err(ConfigError::EmptyCredential { variable: PASSWORD_ENV_VAR, .. })
    ));
}

#[cfg(unix)]
#[test]
fn given_non_unicode_variable_when_loading_then_not_unicode_error() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let lookup = |name: &str| {
        if name == USERNAME_ENV_VAR {
            Err(VarError::NotUnicode(OsString::from_vec(vec![0xff, 0xfe])))
        } else {
            Ok("s3cret".to_string())
        }
    };

    let err = RequestConfig::from_lookup(lookup).unwrap_err();

    assert!(matches!(err, ConfigError::NotUnicode { variable: USERNAME_ENV_VAR, .. }));
}

/// **VALUE**: Verifies the config's Debug output never contains the password.
///
/// **BUG THIS CATCHES**: Would catch storing the password as a plain String.
#[test]
fn given_config_when_debug_formatted_then_password_hidden() {
    let config = RequestConfig::with_credentials("alice", "hunter2");

    let debug = format!("{config:?}");

    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("REDACTED"));
}

#[test]
fn given_credentials_constructor_when_parts_present_then_ok() {
    let credentials = Credentials::new("alice", RedactedSecret::new("pw")).unwrap();

    assert_eq!(credentials.username(), "alice");
    assert_eq!(credentials.password().len(), 2);
}

#[test]
fn given_segment_with_slash_when_validating_segments_then_validation_error() {
    let mut config = RequestConfig::with_credentials("alice", "pw");
    config.location = "1,2/3".to_string();

    let err = config.validate_segments().unwrap_err();

    assert!(matches!(err, ConfigError::ValidationError { .. }));
    assert!(err.to_string().contains("location"));
}

#[test]
fn given_empty_segment_when_validating_segments_then_validation_error() {
    let mut config = RequestConfig::with_credentials("alice", "pw");
    config.format = " ".to_string();

    assert!(config.validate_segments().is_err());
    assert!(RequestConfig::default().validate_segments().is_ok());
}

/// **VALUE**: Verifies segments that the URL parser would reinterpret are refused.
///
/// **WHY THIS MATTERS**: `..` drops the previous segment, `?` and `#` push the later
/// segments into the query or fragment, and `\` is read as `/`. Any of them sends the
/// request to a path other than the five configured segments.
///
/// **BUG THIS CATCHES**: Would catch a check that only looks for `/`.
#[test]
fn given_segments_the_url_parser_rewrites_when_validating_then_validation_error() {
    let rejected = [
        ("datetime", ".."),
        ("datetime", "."),
        ("location", "0,0?x=1#"),
        ("location", "0,0#frag"),
        ("datetime", "a\\b"),
        ("parameters", "t_2m:C precip_1h:mm"),
        ("format", "json\n"),
    ];

    for (field, value) in rejected {
        let mut config = RequestConfig::with_credentials("alice", "pw");
        match field {
            "datetime" => config.datetime = value.to_string(),
            "location" => config.location = value.to_string(),
            "parameters" => config.parameters = value.to_string(),
            _ => config.format = value.to_string(),
        }

        let err = config
            .validate_segments()
            .expect_err(&format!("{field} = {value:?} must be rejected"));

        assert!(matches!(err, ConfigError::ValidationError { .. }));
        assert!(err.to_string().contains(field));
    }
}

#[test]
fn given_dots_inside_segment_when_validating_then_accepted() {
    let mut config = RequestConfig::with_credentials("alice", "pw");
    config.location = "37.7749,-122.4194".to_string();
    config.datetime = "2024-10-23T00:00:00Z..2024-10-24T00:00:00Z:PT1H".to_string();

    assert!(config.validate_segments().is_ok());
}
