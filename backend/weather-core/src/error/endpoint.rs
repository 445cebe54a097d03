use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum UrlError {
    #[error("URL Construction Error: URL does not fit in {max_length} bytes at {location}")]
    TooLong {
        max_length: usize,
        location: ErrorLocation,
    },

    #[error("URL Construction Error: '{assembled}' does not parse as a plain path (got '{parsed}') at {location}")]
    Rewritten {
        assembled: String,
        parsed: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} at {location}")]
    Parse {
        message: String,
        location: ErrorLocation,
    },
}
