//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while preparing a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A declared path parameter has no bound value.
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// The HTTP method is not supported by the harness.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request target could not be turned into a URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
