pub mod settings;

pub use settings::Settings;

use crate::error::config::ConfigError;
use crate::{DEFAULT_DATETIME, DEFAULT_FORMAT, DEFAULT_LOCATION, DEFAULT_PARAMETERS};

use common::{ErrorLocation, RedactedSecret};

use std::env::{self, VarError};
use std::panic::Location;
use std::path::PathBuf;

use log::{debug, warn};

pub const USERNAME_ENV_VAR: &str = "METEOMATICS_USERNAME";
pub const PASSWORD_ENV_VAR: &str = "METEOMATICS_PASSWORD";

/// API credentials that passed validation: both parts are non-empty.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: RedactedSecret,
}

impl Credentials {
    /// Validate and bundle a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if either part is empty.
    #[track_caller]
    pub fn new(username: impl Into<String>, password: RedactedSecret) -> Result<Self, ConfigError> {
        let username = username.into();

        if username.is_empty() {
            return Err(ConfigError::EmptyCredential {
                variable: USERNAME_ENV_VAR,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if password.is_empty() {
            return Err(ConfigError::EmptyCredential {
                variable: PASSWORD_ENV_VAR,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &RedactedSecret {
        &self.password
    }
}

/// Everything one run needs to know about the request.
///
/// Built once, read-only afterwards. Credentials stay optional here so that
/// a missing variable is reported by [`RequestConfig::credentials`] at the
/// validation stage instead of while reading the environment.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub username: Option<String>,
    pub password: Option<RedactedSecret>,
    pub datetime: String,
    pub parameters: String,
    /// `latitude,longitude`
    pub location: String,
    pub format: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            datetime: DEFAULT_DATETIME.to_string(),
            parameters: DEFAULT_PARAMETERS.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl RequestConfig {
    /// Config with the given credentials and default request segments.
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(RedactedSecret::new(password)),
            ..Self::default()
        }
    }

    /// Read credentials from the process environment.
    ///
    /// Call [`load_dotenv`] first to pick up a `.env` file. Absent variables
    /// are kept as `None`; they are rejected later by
    /// [`RequestConfig::credentials`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotUnicode`] if a variable holds invalid unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name))
    }

    /// Read credentials through `lookup`, which follows [`std::env::var`] semantics.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let username = read_variable(&lookup, USERNAME_ENV_VAR)?;
        let password = read_variable(&lookup, PASSWORD_ENV_VAR)?.map(RedactedSecret::new);

        if let Some(ref password) = password {
            debug!("Found {PASSWORD_ENV_VAR} ({} chars)", password.len());
        }

        Ok(Self {
            username,
            password,
            ..Self::default()
        })
    }

    /// Check the credentials are present and non-empty.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingCredential`] if a variable was never set
    /// - [`ConfigError::EmptyCredential`] if a variable is set but empty
    #[track_caller]
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let username = self
            .username
            .as_deref()
            .ok_or(ConfigError::MissingCredential {
                variable: USERNAME_ENV_VAR,
                location: ErrorLocation::from(Location::caller()),
            })?;

        let password = self
            .password
            .as_ref()
            .ok_or(ConfigError::MissingCredential {
                variable: PASSWORD_ENV_VAR,
                location: ErrorLocation::from(Location::caller()),
            })?;

        Credentials::new(username, password.clone())
    }

    /// Check that every URL segment is usable as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an empty segment, a `.` or
    /// `..` segment, or one containing `/`, `\`, `?`, `#` or whitespace.
    #[track_caller]
    pub fn validate_segments(&self) -> Result<(), ConfigError> {
        let segments = [
            ("datetime", &self.datetime),
            ("parameters", &self.parameters),
            ("location", &self.location),
            ("format", &self.format),
        ];

        for (name, value) in segments {
            if let Err(reason) = check_segment(name, value) {
                return Err(ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason,
                });
            }
        }

        Ok(())
    }
}

pub(crate) fn check_segment(name: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{name} cannot be empty"));
    }
    if value == "." || value == ".." {
        return Err(format!("{name} cannot be a dot segment: {value}"));
    }
    if let Some(c) = value
        .chars()
        .find(|c| matches!(c, '/' | '\\' | '?' | '#') || c.is_whitespace())
    {
        return Err(format!("{name} cannot contain {c:?}: {value}"));
    }
    Ok(())
}

#[track_caller]
fn read_variable<F>(lookup: &F, variable: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(variable) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => {
            debug!("{variable} is not set");
            Ok(None)
        }
        Err(VarError::NotUnicode(_)) => {
            warn!("{variable} contains invalid unicode");
            Err(ConfigError::NotUnicode {
                variable,
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}

/// Load `.env` from the working directory, then from the executable's directory.
///
/// Variables already in the environment are never overridden. Returns the
/// file that was loaded, if any. This usually runs before logging is set up,
/// so it reports through its return value instead of the log.
pub fn load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        return Some(path);
    }

    let exe_path = env::current_exe().ok()?;
    let env_path = exe_path.parent()?.join(".env");
    if !env_path.exists() {
        return None;
    }

    dotenvy::from_path(&env_path).ok().map(|()| env_path)
}
