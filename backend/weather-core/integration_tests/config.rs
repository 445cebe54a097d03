use weather_core::config::{PASSWORD_ENV_VAR, RequestConfig, USERNAME_ENV_VAR};

use serial_test::serial;

fn set(name: &str, value: Option<&str>) {
    // SAFETY: every test touching these variables is #[serial]
    unsafe {
        match value {
            Some(value) => std::env::set_var(name, value),
            None => std::env::remove_var(name),
        }
    }
}

/// **VALUE**: Verifies credentials are picked up from the real process environment.
///
/// **BUG THIS CATCHES**: Would catch reading the wrong variable names.
#[test]
#[serial]
fn given_credentials_in_environment_when_loading_then_config_has_them() {
    // GIVEN: Both variables exported
    set(USERNAME_ENV_VAR, Some("env-user"));
    set(PASSWORD_ENV_VAR, Some("env-pass"));

    // WHEN: Loading from the environment
    let config = RequestConfig::from_env().unwrap();

    // THEN: Credentials validate
    let credentials = config.credentials().unwrap();
    assert_eq!(credentials.username(), "env-user");
    assert_eq!(credentials.password().expose(), "env-pass");

    set(USERNAME_ENV_VAR, None);
    set(PASSWORD_ENV_VAR, None);
}

#[test]
#[serial]
fn given_empty_password_in_environment_when_validating_then_error() {
    set(USERNAME_ENV_VAR, Some("env-user"));
    set(PASSWORD_ENV_VAR, Some(""));

    let config = RequestConfig::from_env().unwrap();

    assert!(config.credentials().is_err());

    set(USERNAME_ENV_VAR, None);
    set(PASSWORD_ENV_VAR, None);
}
