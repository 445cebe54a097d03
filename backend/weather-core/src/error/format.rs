use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum FormatError {
    #[error("JSON Format Error: {message} at {location}")]
    Serialize {
        message: String,
        location: ErrorLocation,
    },

    #[error("Output Write Error: {source} at {location}")]
    Write {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl From<serde_json::Error> for FormatError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        FormatError::Serialize {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for FormatError {
    #[track_caller]
    fn from(error: std::io::Error) -> Self {
        FormatError::Write {
            source: error,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
