//! Wiring of the production adapters into a ready-to-run executor.

use std::sync::Arc;

use restcheck_application::{ApplicationError, ApplicationResult, RequestExecutor, RunContext};
use restcheck_domain::{RunConfig, request::RequestCatalog};

use crate::adapters::{ConsoleReporter, ReqwestHttpClient, XmllintValidator};

/// Executor over the reqwest transport, `xmllint` and the console.
pub type ConsoleExecutor = RequestExecutor<ReqwestHttpClient, XmllintValidator, ConsoleReporter>;

/// Builds an executor and a fresh run context from a configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created or the request
/// filter is invalid.
pub fn build_harness(
    config: &RunConfig,
    catalog: RequestCatalog,
    reporter: ConsoleReporter,
) -> ApplicationResult<(ConsoleExecutor, RunContext)> {
    let client = ReqwestHttpClient::from_config(config)
        .map_err(|e| ApplicationError::Http(e.to_string()))?;
    let validator = XmllintValidator::from_config(config);
    let context = RunContext::from_config(config)?;

    let executor = RequestExecutor::new(
        Arc::new(catalog),
        Arc::new(client),
        Arc::new(validator),
        reporter,
    );
    Ok((executor, context))
}
