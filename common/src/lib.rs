//! Shared building blocks for the weather workspace.
//!
//! This crate holds the small value types every other crate leans on:
//! error locations, secrets that refuse to leak, and HTTP status codes.
//!
//! ## Architecture
//!
//! - **common** (this crate): Plain values with no I/O
//! - **weather-core**: Fetch, buffer, sanitize and format a dataset
//! - **weather**: Command-line wiring, logging and process exit status

pub mod error;
pub mod http_status;
pub mod redacted_secret;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;
