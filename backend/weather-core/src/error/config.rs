use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid Config: missing credentials: {variable} is not set at {location}")]
    MissingCredential {
        variable: &'static str,
        location: ErrorLocation,
    },

    #[error("Invalid Config: missing credentials: {variable} is empty at {location}")]
    EmptyCredential {
        variable: &'static str,
        location: ErrorLocation,
    },

    #[error("Invalid Config: {variable} is not valid unicode at {location}")]
    NotUnicode {
        variable: &'static str,
        location: ErrorLocation,
    },

    #[error("Invalid Config: base URL '{url}': {reason} at {location}")]
    InvalidBaseUrl {
        url: String,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Settings Read Error: {path}: {source} at {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings Parse Error: {path}: {reason} at {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Settings Validation Error: {reason} at {location}")]
    ValidationError {
        location: ErrorLocation,
        reason: String,
    },
}
