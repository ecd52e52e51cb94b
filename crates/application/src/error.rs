//! Application error types

use restcheck_domain::DomainError;
use thiserror::Error;

/// Application-level errors.
///
/// These cover setting a run up. Once a request is being executed every
/// failure is folded into an outcome bucket instead.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The run configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP transport could not be set up.
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
