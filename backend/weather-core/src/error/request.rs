use common::{ErrorLocation, HttpStatusCode};

use std::error::Error as StdError;
use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RequestError {
    #[error("Transport Error: {message} at {location}")]
    Transport {
        message: String,
        is_timeout: bool,
        is_connect: bool,
        location: ErrorLocation,
    },

    #[error("HTTP Error: status {status_code} - {message} at {location}")]
    Status {
        status_code: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Response Too Large: transfer aborted after exceeding {max_size} bytes at {location}")]
    TooLarge {
        max_size: usize,
        location: ErrorLocation,
    },
}

impl RequestError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestError::Transport { is_timeout: true, .. })
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, RequestError::Transport { is_connect: true, .. })
    }
}

impl From<reqwest::Error> for RequestError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        RequestError::Transport {
            message: describe_chain(&error),
            is_timeout: error.is_timeout(),
            is_connect: error.is_connect(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Flatten an error and its sources into one line.
///
/// reqwest keeps the useful cause (DNS, TLS, refused) in the source chain.
fn describe_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
