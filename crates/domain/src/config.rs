//! Run-level configuration
//!
//! Everything a run needs to know before the first request is issued:
//! host aliases, the request filter, output flags, credentials and the
//! body sent with PUT requests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::substitution::VariableBindings;

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default external schema validator program.
pub const DEFAULT_VALIDATOR_PROGRAM: &str = "xmllint";

/// Basic-auth credentials.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// User name.
    pub user: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// Creates credentials from a user name and password.
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Empty credentials, sent when GET auth is forced without configuration.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// When GET requests carry basic-auth credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPolicy {
    /// Always attach credentials, empty ones if none are configured.
    #[default]
    Always,
    /// Attach credentials only when they are configured.
    IfConfigured,
}

/// Mapping from declared host strings to the hosts actually contacted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostAliasTable {
    aliases: BTreeMap<String, String>,
}

impl HostAliasTable {
    /// Creates an empty alias table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `old` to be contacted as `new`, replacing any previous alias.
    pub fn alias(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.aliases.insert(old.into(), new.into());
    }

    /// Returns the host to connect to for a declared host.
    #[must_use]
    pub fn resolve<'a>(&'a self, host: &'a str) -> &'a str {
        self.aliases.get(host).map_or(host, String::as_str)
    }

    /// Returns the number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns true if no alias is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Pre-run configuration of a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Declared host to actual host.
    pub host_aliases: HostAliasTable,
    /// Regular expression a request identity must match to run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_filter: Option<String>,
    /// Keep the narration of passing requests.
    pub show_passed: bool,
    /// Echo response bodies of requests with a result descriptor.
    pub show_body: bool,
    /// Basic-auth credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
    /// Body sent with PUT requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_body: Option<String>,
    /// Credential policy for GET requests.
    pub get_auth: AuthPolicy,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// External schema validator program.
    pub validator_program: String,
    /// Initial parameter bindings.
    pub bindings: VariableBindings,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            host_aliases: HostAliasTable::new(),
            request_filter: None,
            show_passed: false,
            show_body: false,
            credentials: None,
            put_body: None,
            get_auth: AuthPolicy::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            validator_program: DEFAULT_VALIDATOR_PROGRAM.to_string(),
            bindings: VariableBindings::new(),
        }
    }
}
