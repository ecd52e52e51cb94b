//! External schema validator adapter.
//!
//! Stages the response body in a temporary file and runs
//! `<program> --noout --schema <schema> <file>`. The temporary file is
//! removed when the staging handle drops, on every exit path.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

use restcheck_application::ports::{SchemaValidator, ValidationReport, ValidatorError};
use restcheck_domain::{DEFAULT_VALIDATOR_PROGRAM, RunConfig};

/// Schema validator backed by the `xmllint` command line tool.
#[derive(Debug, Clone)]
pub struct XmllintValidator {
    program: PathBuf,
}

impl XmllintValidator {
    /// Creates a validator running `xmllint` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program(DEFAULT_VALIDATOR_PROGRAM)
    }

    /// Creates a validator running a specific program.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Creates a validator configured from a run configuration.
    #[must_use]
    pub fn from_config(config: &RunConfig) -> Self {
        Self::with_program(&config.validator_program)
    }

    /// Returns the validator program.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn stage(body: &str) -> Result<NamedTempFile, ValidatorError> {
        let mut file = tempfile::Builder::new()
            .prefix("restcheck-validator")
            .suffix(".xml")
            .tempfile()
            .map_err(|e| ValidatorError::Io(e.to_string()))?;
        file.write_all(body.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| ValidatorError::Io(e.to_string()))?;
        Ok(file)
    }
}

impl Default for XmllintValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaValidator for XmllintValidator {
    async fn validate(&self, body: &str, schema: &str) -> Result<ValidationReport, ValidatorError> {
        let staged = Self::stage(body)?;

        debug!(program = %self.program.display(), schema, file = %staged.path().display(), "running schema validator");
        let output = Command::new(&self.program)
            .arg("--noout")
            .arg("--schema")
            .arg(schema)
            .arg(staged.path())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ValidatorError::Unavailable {
                program: self.program.display().to_string(),
                message: e.to_string(),
            })?;

        let mut diagnostics = String::from_utf8_lossy(&output.stdout).into_owned();
        diagnostics.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(ValidationReport {
                ok: true,
                exit_code: output.status.code(),
                diagnostics,
            })
        } else {
            Ok(ValidationReport::mismatch(output.status.code(), diagnostics))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_program() {
        assert_eq!(XmllintValidator::new().program(), Path::new("xmllint"));

        let config = RunConfig {
            validator_program: "/opt/bin/xmllint".to_string(),
            ..RunConfig::default()
        };
        assert_eq!(
            XmllintValidator::from_config(&config).program(),
            Path::new("/opt/bin/xmllint")
        );
    }

    #[test]
    fn test_stage_writes_body_and_cleans_up() {
        let staged = XmllintValidator::stage("<ok/>").expect("stage body");
        let path = staged.path().to_path_buf();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<ok/>");

        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let validator = XmllintValidator::with_program("/nonexistent/restcheck-validator");
        let result = validator.validate("<ok/>", "item.xsd").await;
        assert!(matches!(result, Err(ValidatorError::Unavailable { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_decides() {
        let passing = XmllintValidator::with_program("true");
        let report = passing.validate("<ok/>", "item.xsd").await.unwrap();
        assert!(report.ok);
        assert_eq!(report.exit_code, Some(0));

        let failing = XmllintValidator::with_program("false");
        let report = failing.validate("<ok/>", "item.xsd").await.unwrap();
        assert!(!report.ok);
        assert_eq!(report.exit_code, Some(1));
    }
}
