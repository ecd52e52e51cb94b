//! Response classification.
//!
//! A response passes the status check when its code equals the caller's
//! expected code or falls in the 2xx class. The 2xx check applies even when
//! an explicit expected code was given and did not match: expectations widen
//! the accepted set, they never narrow it.

use serde::{Deserialize, Serialize};

use crate::response::StatusCode;

/// Verdict of the status check for one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Status accepted and no schema result is attached.
    Pass,
    /// Status rejected; body validation is never attempted.
    Fail,
    /// Status accepted; the body must be validated against the schema.
    NeedsValidation,
}

impl Classification {
    /// Returns true if the status check accepted the response.
    #[must_use]
    pub const fn status_accepted(self) -> bool {
        !matches!(self, Self::Fail)
    }
}

/// Returns true if `status` satisfies the expected-or-success policy.
#[must_use]
pub fn status_accepted(status: StatusCode, expected: Option<u16>) -> bool {
    expected.is_some_and(|code| status.as_u16() == code) || status.is_success()
}

/// Classifies a response status.
#[must_use]
pub fn classify(
    status: StatusCode,
    expected: Option<u16>,
    has_schema_result: bool,
) -> Classification {
    if !status_accepted(status, expected) {
        Classification::Fail
    } else if has_schema_result {
        Classification::NeedsValidation
    } else {
        Classification::Pass
    }
}
