//! Connection target derived from a (possibly aliased) host string.

use std::fmt;

use url::Url;

use crate::error::{DomainError, DomainResult};

/// Host name and optional port split out of a `name[:port]` host string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTarget {
    /// Host name to connect to.
    pub name: String,
    /// Explicit port, if the host string carried one.
    pub port: Option<u16>,
}

impl HostTarget {
    /// Splits a host string at the first `:`.
    ///
    /// An empty port segment (`"host:"`) means the default port.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the name is empty or the port is
    /// not a number.
    pub fn parse(host: &str) -> DomainResult<Self> {
        let (name, port) = match host.split_once(':') {
            Some((name, "")) => (name, None),
            Some((name, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| DomainError::InvalidUrl(format!("invalid port in '{host}'")))?;
                (name, Some(port))
            }
            None => (host, None),
        };

        if name.trim().is_empty() {
            return Err(DomainError::InvalidUrl(format!("empty host name in '{host}'")));
        }

        Ok(Self {
            name: name.to_string(),
            port,
        })
    }

    /// Builds the absolute URL for a concrete request path.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the path is not absolute or the
    /// combination does not form a valid URL.
    pub fn url_for(&self, path: &str) -> DomainResult<Url> {
        if !path.starts_with('/') {
            return Err(DomainError::InvalidUrl(format!(
                "path must start with '/': {path}"
            )));
        }
        let raw = format!("http://{self}{path}");
        Url::parse(&raw).map_err(|e| DomainError::InvalidUrl(format!("{e}: {raw}")))
    }
}

impl fmt::Display for HostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{port}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
