//! Fetch, bound, sanitize and format a Meteomatics weather dataset.
//!
//! The run is a straight line: validate credentials, build the request URL,
//! stream the response into a [`buffer::GrowthBuffer`], parse and redact it,
//! then write the indented document. See [`pipeline::WeatherPipeline`].

pub mod buffer;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod pipeline;
pub mod request;
pub mod sanitize;

#[cfg(test)]
mod tests;

pub use config::{Credentials, RequestConfig};
pub use error::{ErrorKind, WeatherError};
pub use pipeline::WeatherPipeline;
pub use sanitize::SanitizedDocument;

pub const API_HOSTNAME: &str = "api.meteomatics.com";
pub const API_BASE_URL: &str = const_format::concatcp!("https://", API_HOSTNAME);

pub const DEFAULT_DATETIME: &str = "2024-10-23T00:00:00Z";
pub const DEFAULT_PARAMETERS: &str = "t_2m:C,precip_1h:mm,wind_speed_10m:ms";
/// San Francisco, as `latitude,longitude`.
pub const DEFAULT_LOCATION: &str = "37.7749,-122.4194";
pub const DEFAULT_FORMAT: &str = "json";
