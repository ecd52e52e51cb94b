//! Schema validator port

use async_trait::async_trait;
use thiserror::Error;

/// Result of running the external validator over a response body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// True when the validator exited with status 0.
    pub ok: bool,
    /// Exit status, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured validator output.
    pub diagnostics: String,
}

impl ValidationReport {
    /// A successful report with no diagnostics.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            ok: true,
            exit_code: Some(0),
            diagnostics: String::new(),
        }
    }

    /// A failed report with the validator's exit status and output.
    #[must_use]
    pub fn mismatch(exit_code: Option<i32>, diagnostics: impl Into<String>) -> Self {
        Self {
            ok: false,
            exit_code,
            diagnostics: diagnostics.into(),
        }
    }
}

/// The validator could not be run at all.
///
/// A body that does not match its schema is a `ValidationReport` with
/// `ok == false`, never one of these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidatorError {
    /// The validator program could not be started.
    #[error("validator '{program}' unavailable: {message}")]
    Unavailable {
        /// Program that failed to start.
        program: String,
        /// Launch failure.
        message: String,
    },

    /// The body could not be staged for validation.
    #[error("failed to stage body for validation: {0}")]
    Io(String),
}

/// Port for validating a structured body against a named schema.
#[async_trait]
pub trait SchemaValidator: Send + Sync {
    /// Validates `body` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns `ValidatorError` only when validation could not be attempted.
    async fn validate(&self, body: &str, schema: &str) -> Result<ValidationReport, ValidatorError>;
}
