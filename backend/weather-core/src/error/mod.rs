pub mod buffer;
pub mod config;
pub mod endpoint;
pub mod format;
pub mod request;
pub mod sanitize;

pub use buffer::BufferError;
pub use config::ConfigError;
pub use endpoint::UrlError;
pub use format::FormatError;
pub use request::RequestError;
pub use sanitize::SanitizeError;

use std::fmt;

use thiserror::Error;

/// Every way a run can fail. All of them are terminal for the run.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error(transparent)]
    InvalidMemory(#[from] BufferError),

    #[error(transparent)]
    UrlConstruction(#[from] UrlError),

    #[error(transparent)]
    Transport(#[from] RequestError),

    #[error(transparent)]
    Parse(#[from] SanitizeError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Coarse failure bucket, one per [`WeatherError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidConfig,
    InvalidMemory,
    UrlConstruction,
    Transport,
    Parse,
    Format,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            WeatherError::InvalidMemory(_) => ErrorKind::InvalidMemory,
            WeatherError::UrlConstruction(_) => ErrorKind::UrlConstruction,
            WeatherError::Transport(_) => ErrorKind::Transport,
            WeatherError::Parse(_) => ErrorKind::Parse,
            WeatherError::Format(_) => ErrorKind::Format,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidConfig => "invalid configuration",
            ErrorKind::InvalidMemory => "invalid memory",
            ErrorKind::UrlConstruction => "URL construction",
            ErrorKind::Transport => "transport",
            ErrorKind::Parse => "parse",
            ErrorKind::Format => "format",
        };
        write!(f, "{name}")
    }
}
