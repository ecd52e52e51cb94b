//! Run configuration loading.
//!
//! Configuration files are YAML (`.yaml`, `.yml`) or JSON (`.json`); the
//! format is picked from the file extension.

use std::path::{Path, PathBuf};

use restcheck_domain::RunConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// YAML deserialization failed.
    #[error("YAML deserialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is not a known configuration format.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

/// Supported configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedFormat` for unknown extensions.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parses a run configuration from text.
///
/// # Errors
///
/// Returns an error if the document is invalid or doesn't match `RunConfig`.
pub fn parse_run_config(text: &str, format: ConfigFormat) -> Result<RunConfig, ConfigError> {
    match format {
        ConfigFormat::Yaml => Ok(serde_yaml::from_str(text)?),
        ConfigFormat::Json => Ok(serde_json::from_str(text)?),
    }
}

/// Loads a run configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unknown extension or
/// does not deserialize into `RunConfig`.
pub async fn load_run_config(path: impl AsRef<Path>) -> Result<RunConfig, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_run_config(&text, format)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use restcheck_domain::{AuthPolicy, Credentials};

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("run.yaml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("run.YML")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("run.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("run.toml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r"
host_aliases:
  api.example.com: localhost:8080
request_filter: items
show_passed: true
credentials:
  user: alice
  password: secret
get_auth: if_configured
put_body: <item/>
timeout_ms: 5000
bindings:
  id: '42'
";
        let config = parse_run_config(yaml, ConfigFormat::Yaml).unwrap();

        assert_eq!(config.host_aliases.resolve("api.example.com"), "localhost:8080");
        assert_eq!(config.request_filter.as_deref(), Some("items"));
        assert!(config.show_passed);
        assert!(!config.show_body);
        assert_eq!(config.credentials, Some(Credentials::new("alice", "secret")));
        assert_eq!(config.get_auth, AuthPolicy::IfConfigured);
        assert_eq!(config.put_body.as_deref(), Some("<item/>"));
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.validator_program, "xmllint");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_run_config("{not json", ConfigFormat::Json),
            Err(ConfigError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_run_config("/nonexistent/restcheck.yaml").await;
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
