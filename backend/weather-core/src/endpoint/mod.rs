//! Request URL assembly.
//!
//! The URL is `<base>/<datetime>/<parameters>/<location>/<format>`, written
//! through a bounded writer that reports overflow instead of truncating.

use crate::API_BASE_URL;
use crate::config::RequestConfig;
use crate::error::config::ConfigError;
use crate::error::endpoint::UrlError;

use common::ErrorLocation;

use std::fmt::{self, Write};
use std::net::IpAddr;
use std::panic::Location;

use url::{Host, Url};

/// Size of the URL buffer in bytes, terminator included.
pub const MAX_URL_LENGTH: usize = 512;

/// Validated API base URL.
///
/// `https` is required. Plain `http` is only accepted for loopback hosts,
/// which is what a local mock server looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    base: String,
}

impl Default for ApiEndpoint {
    fn default() -> Self {
        Self {
            base: API_BASE_URL.to_string(),
        }
    }
}

impl ApiEndpoint {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL does not parse, uses
    /// a scheme other than `https` for a non-loopback host, or carries a
    /// query or fragment.
    #[track_caller]
    pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
        let location = ErrorLocation::from(Location::caller());
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
            location,
        };

        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;

        match url.scheme() {
            "https" => {}
            "http" if is_loopback(&url) => {}
            "http" => return Err(invalid("plain http is only allowed for loopback hosts".into())),
            other => return Err(invalid(format!("unsupported scheme '{other}'"))),
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".into()));
        }

        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Full request URL for `config`, bounded by [`MAX_URL_LENGTH`].
    #[track_caller]
    pub fn request_url(&self, config: &RequestConfig) -> Result<Url, UrlError> {
        construct_url(&self.base, config, MAX_URL_LENGTH)
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
        Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
        None => false,
    }
}

/// Join the five segments with `/` into a buffer of `buffer_size` bytes.
///
/// One byte of `buffer_size` is reserved for the terminator, so the URL
/// itself may be at most `buffer_size - 1` bytes long.
///
/// # Errors
///
/// - [`UrlError::TooLong`] if the URL does not fit
/// - [`UrlError::Parse`] if the assembled text is not a valid URL
/// - [`UrlError::Rewritten`] if parsing changed the text, e.g. by resolving
///   `..`, percent-encoding, or moving segments into a query or fragment
#[track_caller]
pub fn construct_url(
    base: &str,
    config: &RequestConfig,
    buffer_size: usize,
) -> Result<Url, UrlError> {
    let location = ErrorLocation::from(Location::caller());
    let mut writer = BoundedWriter::new(buffer_size.saturating_sub(1));

    write!(
        writer,
        "{}/{}/{}/{}/{}",
        base, config.datetime, config.parameters, config.location, config.format
    )
    .map_err(|_| UrlError::TooLong {
        max_length: buffer_size,
        location,
    })?;

    let url = Url::parse(writer.as_str()).map_err(|e| UrlError::Parse {
        message: e.to_string(),
        location,
    })?;

    // The request must go to exactly the text that was bounds-checked, as a path
    if url.as_str() != writer.as_str() || url.query().is_some() || url.fragment().is_some() {
        return Err(UrlError::Rewritten {
            assembled: writer.as_str().to_string(),
            parsed: url.to_string(),
            location,
        });
    }

    Ok(url)
}

/// Fixed-capacity string sink that fails instead of growing past its limit.
struct BoundedWriter {
    buffer: String,
    limit: usize,
}

impl BoundedWriter {
    fn new(limit: usize) -> Self {
        Self {
            buffer: String::with_capacity(limit),
            limit,
        }
    }

    fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.buffer.len() + s.len() > self.limit {
            return Err(fmt::Error);
        }
        self.buffer.push_str(s);
        Ok(())
    }
}
