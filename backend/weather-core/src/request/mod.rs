//! Single authenticated GET that streams into a [`ResponseSink`].

use crate::buffer::ResponseSink;
use crate::config::Credentials;
use crate::error::buffer::BufferError;
use crate::error::request::RequestError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;
use reqwest::redirect::Policy;
use url::Url;

/// Total time allowed for connect, TLS handshake, and body transfer.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = const_format::concatcp!("weather/", env!("CARGO_PKG_VERSION"));

/// HTTP client for one run.
///
/// Certificate and hostname verification use the client defaults and there
/// is no way to turn them off. Redirects are not followed, so credentials are
/// only ever sent to the configured host.
#[derive(Clone)]
pub struct RequestExecutor {
    client: Client,
}

impl RequestExecutor {
    pub fn new() -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Issue the request and push every body chunk into `sink`.
    ///
    /// Nothing is retried. When the sink rejects a chunk the response is
    /// dropped, which aborts the transfer and closes the connection.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Transport`] for DNS, connect, TLS, timeout or body read failures
    /// - [`RequestError::Status`] for a non-2xx status
    /// - [`RequestError::TooLarge`] when the body passes the sink's size ceiling
    pub async fn execute<S>(
        &self,
        url: Url,
        credentials: &Credentials,
        sink: &mut S,
    ) -> Result<(), RequestError>
    where
        S: ResponseSink,
    {
        debug!("GET {url}");

        let mut response = self
            .client
            .get(url)
            .basic_auth(credentials.username(), Some(credentials.password().expose()))
            .send()
            .await?;

        let status_code = HttpStatusCode(response.status().as_u16());
        if !status_code.is_success() {
            if status_code.is_auth_failure() {
                warn!("API rejected the credentials (HTTP {status_code})");
            }
            return Err(RequestError::Status {
                status_code,
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown Status")
                    .to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut received = 0usize;
        while let Some(chunk) = response.chunk().await? {
            if let Err(e) = sink.append(&chunk) {
                warn!("Aborting transfer after {received} bytes: {e}");
                drop(response);
                return Err(abort_error(e));
            }
            received += chunk.len();
        }

        info!("Received {received} bytes (HTTP {status_code})");
        Ok(())
    }
}

#[track_caller]
fn abort_error(error: BufferError) -> RequestError {
    let location = ErrorLocation::from(Location::caller());
    match error {
        BufferError::CapacityExceeded { max_size, .. } => {
            RequestError::TooLarge { max_size, location }
        }
        other => RequestError::Transport {
            message: format!("write aborted: {other}"),
            is_timeout: false,
            is_connect: false,
            location,
        },
    }
}
