//! Terminal classification of one request invocation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The outcome bucket a request invocation finalizes into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// Status (and schema, if any) checks succeeded.
    Passed,
    /// Status or schema check failed.
    Failed,
    /// The request's verb is not exercised by the harness.
    Unsupported,
    /// The request could not be carried out, with an optional reason.
    Error(Option<String>),
    /// The request was excluded by the active filter.
    Skipped,
}

impl ExecutionOutcome {
    /// Creates an error outcome with a message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(Some(message.into()))
    }

    /// Returns the narration tag printed when the outcome is finalized.
    ///
    /// Skipped requests are silent and have no tag.
    #[must_use]
    pub fn tag(&self) -> Option<String> {
        match self {
            Self::Passed => Some("  PASSED".to_string()),
            Self::Failed => Some("  FAILED".to_string()),
            Self::Unsupported => Some("  UNSUPPORTED".to_string()),
            Self::Error(None) => Some("  ERROR".to_string()),
            Self::Error(Some(message)) => Some(format!("  ERROR: {message}")),
            Self::Skipped => None,
        }
    }

    /// Returns true for the passed bucket.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::Error(None) => write!(f, "error"),
            Self::Error(Some(message)) => write!(f, "error: {message}"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}
