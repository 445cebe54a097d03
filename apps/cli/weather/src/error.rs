use common::ErrorLocation;

use thiserror::Error;

/// Failures of the binary itself, outside the fetch pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    /// Logger could not be set up
    #[error("Logger Error: {message} at {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    /// Async runtime could not be built
    #[error("Runtime Error: {message} at {location}")]
    Runtime {
        message: String,
        location: ErrorLocation,
    },
}
