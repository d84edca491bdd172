//! Blocking HTTP transport: the single injectable network seam.

use std::time::Duration;

use crate::error::{Error, Result};

/// Raw result of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, decoded as UTF-8 text.
    pub body: String,
}

/// Pluggable blocking fetch capability.
///
/// Implementations perform exactly one GET per call: no retries, no
/// caching. Errors are reserved for exchanges that produced no HTTP
/// response at all (connection failure, timeout); non-success statuses
/// come back as data and are judged by the caller. Tests substitute
/// canned implementations; everything else uses [`HttpTransport`].
pub trait Transport: Send + Sync {
    /// Fetch the URL and return the raw status and body.
    fn fetch(&self, url: &str) -> Result<RawResponse>;
}

/// Default transport over a blocking `reqwest` client.
pub struct HttpTransport {
    http: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<RawResponse> {
        let response = self.http.get(url).send().map_err(exchange_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(exchange_error)?;
        Ok(RawResponse { status, body })
    }
}

/// Map an exchange that never completed into the transport error shape.
fn exchange_error(error: reqwest::Error) -> Error {
    let code = error.status().map(|s| s.as_u16()).unwrap_or(0);
    let message = if error.is_timeout() {
        "the request timed out".to_string()
    } else {
        error.to_string()
    };
    Error::Transport { code, message }
}
