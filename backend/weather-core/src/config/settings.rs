use super::{RequestConfig, check_segment};
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::Path;

use log::info;
use serde::Deserialize;

// ============================================
// SETTINGS STRUCTS
// ============================================

/// Where to send the request.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApiSettings {
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Overrides for the request path segments.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RequestSettings {
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub parameters: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

/// Optional TOML settings file.
///
/// Credentials are deliberately not representable here: they only come from
/// the environment, and unknown keys such as `password` are rejected.
///
/// ```toml
/// [api]
/// base_url = "https://api.meteomatics.com"
///
/// [request]
/// datetime = "2024-10-23T00:00:00Z"
/// parameters = "t_2m:C"
/// location = "52.52,13.405"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub request: RequestSettings,
}

// ============================================
// IMPLEMENTATION
// ============================================

impl Settings {
    /// Load settings from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid TOML,
    /// or fails [`Settings::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source: e,
        })?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        settings.validate()?;

        info!("Settings loaded from {}", path.display());
        Ok(settings)
    }

    /// Validate settings values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if a value is set but unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.api.base_url {
            if url.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason: "api.base_url cannot be empty string".to_string(),
                });
            }
        }

        let segments = [
            ("request.datetime", &self.request.datetime),
            ("request.parameters", &self.request.parameters),
            ("request.location", &self.request.location),
            ("request.format", &self.request.format),
        ];

        for (name, value) in segments {
            if let Some(value) = value {
                check_segment(name, value).map_err(|reason| ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason,
                })?;
            }
        }

        Ok(())
    }

    /// Copy every segment override that is set into `config`.
    pub fn apply_to(&self, config: &mut RequestConfig) {
        let overrides = [
            (&self.request.datetime, &mut config.datetime),
            (&self.request.parameters, &mut config.parameters),
            (&self.request.location, &mut config.location),
            (&self.request.format, &mut config.format),
        ];

        for (value, target) in overrides {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
    }
}
