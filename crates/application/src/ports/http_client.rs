//! HTTP Client port

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use restcheck_domain::{Credentials, request::HttpMethod, response::ResponseSpec};

/// A fully resolved HTTP call, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute target URL.
    pub url: Url,
    /// Basic-auth credentials to attach, if any.
    pub credentials: Option<Credentials>,
    /// Request body, if any.
    pub body: Option<String>,
}

impl OutgoingRequest {
    /// Creates a request without credentials or body.
    #[must_use]
    pub const fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            credentials: None,
            body: None,
        }
    }

    /// Attaches basic-auth credentials (builder pattern).
    #[must_use]
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the request body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Transport-level failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL was rejected by the transport.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("DNS resolution failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Transport message.
        message: String,
    },

    /// The remote end refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// Implementations must not follow redirects themselves; the executor
/// decides whether to issue a redirect hop.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, or other transport problems. Non-2xx statuses are responses,
    /// not errors.
    async fn send(&self, request: &OutgoingRequest) -> Result<ResponseSpec, HttpClientError>;
}
