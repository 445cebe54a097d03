use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SanitizeError {
    #[error("JSON Parse Error: {message} at {location}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
        location: ErrorLocation,
    },
}

impl From<serde_json::Error> for SanitizeError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        SanitizeError::Parse {
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
