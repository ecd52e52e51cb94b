//! Execute Request Use Case
//!
//! Runs one catalog request end to end: filter, lookup, host and path
//! resolution, dispatch by verb with a single redirect hop for GET, status
//! classification, optional schema validation and finalization into the
//! run statistics.

use std::sync::Arc;

use tracing::{debug, warn};

use restcheck_domain::{
    Classification, DomainError, ExecutionOutcome, classify,
    request::{HostTarget, HttpMethod, RequestCatalog, RequestDescriptor},
    response::ResponseSpec,
    substitute,
};

use crate::context::RunContext;
use crate::ports::{HttpClient, OutgoingRequest, ReportSink, SchemaValidator, ValidatorError};

/// What happened to one request invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationReport {
    /// Identity the request was looked up by.
    pub identity: String,
    /// Finalized outcome; `None` when the request is not in the catalog.
    pub outcome: Option<ExecutionOutcome>,
    /// Concrete path after parameter substitution.
    pub path: Option<String>,
    /// Final HTTP response, after any redirect hop.
    pub response: Option<ResponseSpec>,
}

impl InvocationReport {
    fn new(identity: &str) -> Self {
        Self {
            identity: identity.to_string(),
            outcome: None,
            path: None,
            response: None,
        }
    }
}

/// Use case for executing catalog requests.
///
/// The executor owns the transport, the validator and the report sink; all
/// per-run state lives in the `RunContext` passed to each call.
///
/// # Example
///
/// ```ignore
/// let mut executor = RequestExecutor::new(catalog, client, validator, ConsoleReporter::stdout());
/// let mut ctx = RunContext::from_config(&config)?;
///
/// executor.request(&mut ctx, "GET /items/<id>", None).await;
/// ctx.print_summary(executor.sink_mut());
/// ```
pub struct RequestExecutor<C, V, R> {
    catalog: Arc<RequestCatalog>,
    client: Arc<C>,
    validator: Arc<V>,
    sink: R,
}

impl<C, V, R> RequestExecutor<C, V, R>
where
    C: HttpClient,
    V: SchemaValidator,
    R: ReportSink,
{
    /// Creates an executor over a catalog.
    pub fn new(catalog: Arc<RequestCatalog>, client: Arc<C>, validator: Arc<V>, sink: R) -> Self {
        Self {
            catalog,
            client,
            validator,
            sink,
        }
    }

    /// Returns the catalog requests are looked up in.
    #[must_use]
    pub fn catalog(&self) -> &RequestCatalog {
        &self.catalog
    }

    /// Returns the report sink.
    pub const fn sink(&self) -> &R {
        &self.sink
    }

    /// Returns the report sink mutably, e.g. for printing the summary.
    pub const fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    /// Consumes the executor, returning the report sink.
    pub fn into_sink(self) -> R {
        self.sink
    }

    /// Executes the request named `identity` and returns the final response.
    ///
    /// `expected` is an additional status code accepted besides 2xx.
    pub async fn request(
        &mut self,
        ctx: &mut RunContext,
        identity: &str,
        expected: Option<u16>,
    ) -> Option<ResponseSpec> {
        self.run(ctx, identity, expected).await.response
    }

    /// Executes the request named `identity` and reports what happened.
    pub async fn run(
        &mut self,
        ctx: &mut RunContext,
        identity: &str,
        expected: Option<u16>,
    ) -> InvocationReport {
        let mut report = InvocationReport::new(identity);
        ctx.begin();

        if !ctx.matches_filter(identity) {
            self.finish(ctx, &mut report, ExecutionOutcome::Skipped);
            return report;
        }

        ctx.narrate(format!("REQUEST: {identity}"));

        let catalog = Arc::clone(&self.catalog);
        let Some(request) = catalog.find(identity) else {
            warn!(identity, "Request not defined");
            ctx.discard_narration();
            return report;
        };

        let outcome = self.execute(ctx, request, expected, &mut report).await;
        self.finish(ctx, &mut report, outcome);
        report
    }

    fn finish(&mut self, ctx: &mut RunContext, report: &mut InvocationReport, outcome: ExecutionOutcome) {
        debug!(identity = %report.identity, %outcome, "request finalized");
        ctx.finalize(&outcome, &mut self.sink);
        report.outcome = Some(outcome);
    }

    async fn execute(
        &self,
        ctx: &mut RunContext,
        request: &RequestDescriptor,
        expected: Option<u16>,
        report: &mut InvocationReport,
    ) -> ExecutionOutcome {
        if let Some(result) = &request.result {
            ctx.narrate(format!("  RESULT: {}", result.label()));
        }

        ctx.narrate(format!("  host: '{}'", request.host));
        if request.host.trim().is_empty() {
            return ExecutionOutcome::error("No host defined");
        }

        let host = ctx.host_aliases().resolve(&request.host).to_string();
        ctx.narrate(format!("  aliased host: {host}"));

        let path = match substitute(&request.path, &request.parameters, ctx.bindings()) {
            Ok(path) => path,
            Err(DomainError::MissingParameter(name)) => {
                ctx.narrate(format!("  Can't substitute parameter '{name}'."));
                return ExecutionOutcome::Error(None);
            }
            Err(e) => return ExecutionOutcome::error(e.to_string()),
        };
        ctx.narrate(format!("  Path: {path}"));
        report.path = Some(path.clone());

        let target = match HostTarget::parse(&host) {
            Ok(target) => target,
            Err(e) => return ExecutionOutcome::error(e.to_string()),
        };
        ctx.narrate(format!(
            "  Host name: {} port: {}",
            target.name,
            target.port.map(|p| p.to_string()).unwrap_or_default()
        ));

        let Ok(method) = request.verb.parse::<HttpMethod>() else {
            warn!(verb = %request.verb, "Test of method '{}' not supported yet.", request.verb);
            return ExecutionOutcome::Unsupported;
        };

        let url = match target.url_for(&path) {
            Ok(url) => url,
            Err(e) => return ExecutionOutcome::error(e.to_string()),
        };

        let dispatched = if method.has_body() {
            let Some(body) = Self::body_for(ctx, method) else {
                return ExecutionOutcome::error(format!("No body data defined for {method}"));
            };
            let outgoing = OutgoingRequest::new(method, url)
                .with_credentials(ctx.credentials_for(method))
                .with_body(body);
            self.send(&outgoing).await
        } else {
            self.get(ctx, url).await
        };

        let response = match dispatched {
            Ok(response) => response,
            Err(outcome) => return outcome,
        };

        ctx.narrate(format!("  return code: {}", response.status.as_u16()));
        if request.result.is_some() && ctx.show_body() {
            ctx.narrate(response.body.clone());
        }

        let outcome = self.judge(ctx, request, &response, expected).await;
        report.response = Some(response);
        outcome
    }

    /// Request body for a body-carrying method: empty for POST, the
    /// configured PUT body for PUT.
    fn body_for(ctx: &mut RunContext, method: HttpMethod) -> Option<String> {
        if method != HttpMethod::Put {
            return Some(String::new());
        }
        let body = ctx.put_body()?.to_string();
        ctx.narrate("  PUT");
        Some(body)
    }

    /// Issues a GET and follows at most one redirect.
    ///
    /// A redirect status without a `Location` is returned as the response.
    async fn get(
        &self,
        ctx: &mut RunContext,
        url: url::Url,
    ) -> Result<ResponseSpec, ExecutionOutcome> {
        let first = OutgoingRequest::new(HttpMethod::Get, url.clone())
            .with_credentials(ctx.credentials_for(HttpMethod::Get));
        let response = self.send(&first).await?;
        if !response.status.is_redirection() {
            return Ok(response);
        }

        let Some(location) = response.location().map(ToString::to_string) else {
            warn!(status = response.status.as_u16(), "redirect without Location header");
            return Ok(response);
        };
        let target = url.join(&location).map_err(|e| {
            ExecutionOutcome::error(format!("invalid redirect location '{location}': {e}"))
        })?;
        ctx.narrate(format!("  Redirected to {target}"));

        let hop = OutgoingRequest::new(HttpMethod::Get, target)
            .with_credentials(ctx.credentials().cloned());
        self.send(&hop).await
    }

    async fn send(&self, request: &OutgoingRequest) -> Result<ResponseSpec, ExecutionOutcome> {
        self.client.send(request).await.map_err(|e| {
            warn!(method = %request.method, url = %request.url, error = %e, "transport failure");
            ExecutionOutcome::error(e.to_string())
        })
    }

    /// Maps a response to passed or failed, validating the body if required.
    async fn judge(
        &self,
        ctx: &mut RunContext,
        request: &RequestDescriptor,
        response: &ResponseSpec,
        expected: Option<u16>,
    ) -> ExecutionOutcome {
        match classify(response.status, expected, request.result.is_some()) {
            Classification::Pass => ExecutionOutcome::Passed,
            Classification::Fail => ExecutionOutcome::Failed,
            Classification::NeedsValidation => {
                let Some(schema) = request.result.as_ref().and_then(|r| r.schema_reference()) else {
                    return ExecutionOutcome::error("No schema defined for result");
                };
                match self.validator.validate(&response.body, &schema).await {
                    Ok(validation) if validation.ok => {
                        ctx.narrate(format!("  Response validates against schema '{schema}'"));
                        ExecutionOutcome::Passed
                    }
                    Ok(validation) => {
                        let status = validation
                            .exit_code
                            .map_or_else(|| "signal".to_string(), |c| c.to_string());
                        warn!(%schema, exit_code = ?validation.exit_code, "schema validation failed");
                        ctx.narrate(format!(
                            "  Response does not validate against schema '{schema}' (validator status {status})"
                        ));
                        for line in validation.diagnostics.lines() {
                            ctx.narrate(format!("    {line}"));
                        }
                        ExecutionOutcome::Failed
                    }
                    Err(e @ ValidatorError::Unavailable { .. }) => {
                        warn!(error = %e, "schema validator unavailable");
                        ExecutionOutcome::error(e.to_string())
                    }
                    Err(e) => ExecutionOutcome::error(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::significant_drop_tightening
)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use restcheck_domain::{
        AuthPolicy, Credentials, RunStatistics,
        request::ResultDescriptor,
    };

    use crate::ports::{HttpClientError, ValidationReport};

    /// Mock HTTP client replaying canned responses in order.
    struct MockHttpClient {
        responses: Mutex<VecDeque<Result<ResponseSpec, HttpClientError>>>,
        sent: Mutex<Vec<OutgoingRequest>>,
    }

    impl MockHttpClient {
        fn new(responses: Vec<Result<ResponseSpec, HttpClientError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn status(code: u16) -> Self {
            Self::new(vec![Ok(response(code, "<ok/>"))])
        }

        fn sent(&self) -> Vec<OutgoingRequest> {
            self.sent.lock().expect("Lock poisoned").clone()
        }
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn send(&self, request: &OutgoingRequest) -> Result<ResponseSpec, HttpClientError> {
            self.sent.lock().expect("Lock poisoned").push(request.clone());
            self.responses
                .lock()
                .expect("Lock poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(HttpClientError::Other("no canned response".to_string())))
        }
    }

    /// Mock validator returning a fixed verdict.
    struct MockValidator {
        result: Result<ValidationReport, ValidatorError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockValidator {
        fn returning(result: Result<ValidationReport, ValidatorError>) -> Self {
            Self {
                result,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn ok() -> Self {
            Self::returning(Ok(ValidationReport::success()))
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().expect("Lock poisoned").clone()
        }
    }

    #[async_trait]
    impl SchemaValidator for MockValidator {
        async fn validate(&self, body: &str, schema: &str) -> Result<ValidationReport, ValidatorError> {
            self.calls
                .lock()
                .expect("Lock poisoned")
                .push((body.to_string(), schema.to_string()));
            self.result.clone()
        }
    }

    fn response(status: u16, body: &str) -> ResponseSpec {
        ResponseSpec::new(status, HashMap::new(), body.as_bytes())
    }

    fn redirect(status: u16, location: &str) -> ResponseSpec {
        let mut headers = HashMap::new();
        headers.insert("Location".to_string(), location.to_string());
        ResponseSpec::new(status, headers, b"")
    }

    fn items_request() -> RequestDescriptor {
        RequestDescriptor::new("GET", "api.example.com", "/items/<id>").with_parameter("id")
    }

    fn context() -> RunContext {
        let mut ctx = RunContext::new();
        ctx.alias_host("api.example.com", "localhost:8080");
        ctx.bind("id", "42");
        ctx
    }

    type Executor = RequestExecutor<MockHttpClient, MockValidator, Vec<String>>;

    fn executor(
        requests: Vec<RequestDescriptor>,
        client: MockHttpClient,
        validator: MockValidator,
    ) -> (Executor, Arc<MockHttpClient>, Arc<MockValidator>) {
        let client = Arc::new(client);
        let validator = Arc::new(validator);
        let executor = RequestExecutor::new(
            Arc::new(requests.into_iter().collect()),
            Arc::clone(&client),
            Arc::clone(&validator),
            Vec::new(),
        );
        (executor, client, validator)
    }

    #[tokio::test]
    async fn test_get_passes_with_aliased_host() {
        let (mut executor, client, _) =
            executor(vec![items_request()], MockHttpClient::status(200), MockValidator::ok());
        let mut ctx = context();

        let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Passed));
        assert_eq!(report.path.as_deref(), Some("/items/42"));
        assert_eq!(report.response.unwrap().body, "<ok/>");
        assert_eq!(
            *ctx.statistics(),
            RunStatistics {
                tested: 1,
                passed: 1,
                ..RunStatistics::default()
            }
        );

        let sent = client.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url.as_str(), "http://localhost:8080/items/42");
        assert_eq!(sent[0].method, HttpMethod::Get);
        // Passing narration is hidden unless show_passed is set.
        assert!(executor.sink().is_empty());
    }

    #[tokio::test]
    async fn test_missing_binding_is_error_without_network() {
        let (mut executor, client, _) =
            executor(vec![items_request()], MockHttpClient::status(200), MockValidator::ok());
        let mut ctx = context();
        ctx.unbind("id");

        let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Error(None)));
        assert_eq!(report.path, None);
        assert!(client.sent().is_empty());
        assert_eq!(ctx.statistics().tested, 1);
        assert_eq!(ctx.statistics().error, 1);
        assert!(executor
            .sink()
            .contains(&"  Can't substitute parameter 'id'.".to_string()));
        assert_eq!(executor.sink().last().map(String::as_str), Some("  ERROR"));
    }

    #[tokio::test]
    async fn test_filtered_request_is_skipped() {
        let (mut executor, client, _) =
            executor(vec![items_request()], MockHttpClient::status(200), MockValidator::ok());
        let mut ctx = context();
        ctx.set_filter("^POST").unwrap();

        let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Skipped));
        assert!(client.sent().is_empty());
        assert_eq!(ctx.statistics().tested, 1);
        assert_eq!(ctx.statistics().skipped, 1);
        assert!(executor.sink().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_request_counts_only_as_tested() {
        let (mut executor, client, _) =
            executor(vec![items_request()], MockHttpClient::status(200), MockValidator::ok());
        let mut ctx = context();

        let response = executor.request(&mut ctx, "GET /nowhere", None).await;

        assert!(response.is_none());
        assert!(client.sent().is_empty());
        assert_eq!(ctx.statistics().tested, 1);
        assert_eq!(ctx.statistics().finalized(), 0);
        assert_eq!(ctx.statistics().undefined(), 1);
        assert!(executor.sink().is_empty());
    }

    #[tokio::test]
    async fn test_empty_host_is_error() {
        let request = RequestDescriptor::new("GET", "", "/status");
        let (mut executor, client, _) =
            executor(vec![request], MockHttpClient::status(200), MockValidator::ok());
        let mut ctx = RunContext::new();

        let report = executor.run(&mut ctx, "GET /status", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::error("No host defined")));
        assert!(client.sent().is_empty());
        assert_eq!(
            executor.sink().last().map(String::as_str),
            Some("  ERROR: No host defined")
        );
    }

    #[tokio::test]
    async fn test_status_failure() {
        let (mut executor, _, _) =
            executor(vec![items_request()], MockHttpClient::status(404), MockValidator::ok());
        let mut ctx = context();

        let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Failed));
        assert_eq!(report.response.map(|r| r.status.as_u16()), Some(404));
        assert_eq!(ctx.statistics().failed, 1);
        assert!(executor.sink().contains(&"  return code: 404".to_string()));
        assert_eq!(executor.sink().last().map(String::as_str), Some("  FAILED"));
    }

    #[tokio::test]
    async fn test_expected_code_accepts_non_success() {
        let (mut executor, _, _) =
            executor(vec![items_request()], MockHttpClient::status(404), MockValidator::ok());
        let mut ctx = context();

        let report = executor.run(&mut ctx, "GET /items/<id>", Some(404)).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Passed));
    }

    #[tokio::test]
    async fn test_redirect_followed_once() {
        let client = MockHttpClient::new(vec![
            Ok(redirect(302, "http://mirror.example.com:9000/items/42")),
            Ok(response(200, "<ok/>")),
        ]);
        let (mut executor, client, _) = executor(vec![items_request()], client, MockValidator::ok());
        let mut ctx = context();
        ctx.set_show_passed(true);

        let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Passed));
        let sent = client.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].url.as_str(), "http://mirror.example.com:9000/items/42");
        assert!(executor
            .sink()
            .contains(&"  Redirected to http://mirror.example.com:9000/items/42".to_string()));
    }

    #[tokio::test]
    async fn test_redirect_chain_not_chased() {
        let client = MockHttpClient::new(vec![
            Ok(redirect(301, "/moved")),
            Ok(redirect(302, "/moved-again")),
            Ok(response(200, "<ok/>")),
        ]);
        let (mut executor, client, _) = executor(vec![items_request()], client, MockValidator::ok());
        let mut ctx = context();

        let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Failed));
        let sent = client.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].url.as_str(), "http://localhost:8080/moved");
    }

    #[tokio::test]
    async fn test_redirect_without_location_is_judged() {
        let client = MockHttpClient::new(vec![Ok(response(304, "")), Ok(response(304, ""))]);
        let (mut executor, client, _) =
            executor(vec![items_request()], client, MockValidator::ok());
        let mut ctx = context();

        let unexpected = executor.run(&mut ctx, "GET /items/<id>", None).await;
        let expected = executor.run(&mut ctx, "GET /items/<id>", Some(304)).await;

        assert_eq!(unexpected.outcome, Some(ExecutionOutcome::Failed));
        assert_eq!(expected.outcome, Some(ExecutionOutcome::Passed));
        assert_eq!(expected.response.unwrap().status.as_u16(), 304);
        // No hop is attempted.
        assert_eq!(client.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_get_auth_policy() {
        let client = MockHttpClient::new(vec![
            Ok(redirect(302, "/next")),
            Ok(response(200, "")),
            Ok(response(200, "")),
        ]);
        let (mut executor, client, _) = executor(vec![items_request()], client, MockValidator::ok());
        let mut ctx = context();

        executor.run(&mut ctx, "GET /items/<id>", None).await;
        ctx.set_get_auth(AuthPolicy::IfConfigured);
        executor.run(&mut ctx, "GET /items/<id>", None).await;

        let sent = client.sent();
        assert_eq!(sent[0].credentials, Some(Credentials::empty()));
        // The redirect hop only carries configured credentials.
        assert_eq!(sent[1].credentials, None);
        assert_eq!(sent[2].credentials, None);
    }

    #[tokio::test]
    async fn test_post_sends_empty_body() {
        let request = RequestDescriptor::new("POST", "api.example.com", "/items");
        let (mut executor, client, _) =
            executor(vec![request], MockHttpClient::status(201), MockValidator::ok());
        let mut ctx = context();
        ctx.set_credentials(Some(Credentials::new("alice", "secret")));

        let report = executor.run(&mut ctx, "POST /items", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Passed));
        let sent = client.sent();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].body.as_deref(), Some(""));
        assert_eq!(sent[0].credentials, Some(Credentials::new("alice", "secret")));
    }

    #[tokio::test]
    async fn test_put_without_body_is_error_without_network() {
        let request = RequestDescriptor::new("PUT", "api.example.com", "/items/<id>").with_parameter("id");
        let (mut executor, client, _) =
            executor(vec![request], MockHttpClient::status(200), MockValidator::ok());
        let mut ctx = context();

        let report = executor.run(&mut ctx, "PUT /items/<id>", None).await;

        assert_eq!(
            report.outcome,
            Some(ExecutionOutcome::error("No body data defined for PUT"))
        );
        assert!(client.sent().is_empty());
        assert_eq!(ctx.statistics().error, 1);
    }

    #[tokio::test]
    async fn test_put_sends_configured_body() {
        let request = RequestDescriptor::new("put", "api.example.com", "/items/<id>").with_parameter("id");
        let (mut executor, client, _) =
            executor(vec![request], MockHttpClient::status(204), MockValidator::ok());
        let mut ctx = context();
        ctx.set_put_body(Some("<item/>".to_string()));

        let report = executor.run(&mut ctx, "put /items/<id>", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Passed));
        let sent = client.sent();
        assert_eq!(sent[0].method, HttpMethod::Put);
        assert_eq!(sent[0].body.as_deref(), Some("<item/>"));
        assert_eq!(sent[0].credentials, None);
    }

    #[tokio::test]
    async fn test_other_verbs_unsupported() {
        let request = RequestDescriptor::new("DELETE", "api.example.com", "/items");
        let (mut executor, client, _) =
            executor(vec![request], MockHttpClient::status(200), MockValidator::ok());
        let mut ctx = context();

        let report = executor.run(&mut ctx, "DELETE /items", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Unsupported));
        assert!(client.sent().is_empty());
        assert_eq!(ctx.statistics().unsupported, 1);
        assert_eq!(executor.sink().last().map(String::as_str), Some("  UNSUPPORTED"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_error() {
        let client = MockHttpClient::new(vec![Err(HttpClientError::ConnectionRefused {
            host: "localhost".to_string(),
            port: 8080,
        })]);
        let (mut executor, _, _) = executor(vec![items_request()], client, MockValidator::ok());
        let mut ctx = context();

        let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

        assert_eq!(
            report.outcome,
            Some(ExecutionOutcome::error("connection refused by localhost:8080"))
        );
        assert!(report.response.is_none());
        assert_eq!(ctx.statistics().error, 1);
    }

    #[tokio::test]
    async fn test_schema_validation_pass() {
        let request = items_request().with_result(ResultDescriptor::named("item"));
        let (mut executor, _, validator) =
            executor(vec![request], MockHttpClient::status(200), MockValidator::ok());
        let mut ctx = context();
        ctx.set_show_passed(true);
        ctx.set_show_body(true);

        let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Passed));
        assert_eq!(
            validator.calls(),
            vec![("<ok/>".to_string(), "item.xsd".to_string())]
        );
        assert_eq!(
            executor.sink().clone(),
            vec![
                "REQUEST: GET /items/<id>",
                "  RESULT: item",
                "  host: 'api.example.com'",
                "  aliased host: localhost:8080",
                "  Path: /items/42",
                "  Host name: localhost port: 8080",
                "  return code: 200",
                "<ok/>",
                "  Response validates against schema 'item.xsd'",
                "  PASSED",
            ]
        );
    }

    #[tokio::test]
    async fn test_schema_mismatch_fails_with_diagnostics() {
        let request = items_request().with_result(ResultDescriptor::named("item").with_schema("v2.xsd"));
        let validator = MockValidator::returning(Ok(ValidationReport::mismatch(
            Some(3),
            "element ok: not expected",
        )));
        let (mut executor, _, validator) =
            executor(vec![request], MockHttpClient::status(200), validator);
        let mut ctx = context();

        let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Failed));
        assert_eq!(validator.calls()[0].1, "v2.xsd");
        assert!(executor
            .sink()
            .contains(&"    element ok: not expected".to_string()));
    }

    #[tokio::test]
    async fn test_status_failure_skips_validation() {
        let request = items_request().with_result(ResultDescriptor::named("item"));
        let (mut executor, _, validator) =
            executor(vec![request], MockHttpClient::status(500), MockValidator::ok());
        let mut ctx = context();

        let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

        assert_eq!(report.outcome, Some(ExecutionOutcome::Failed));
        assert!(validator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_validator_unavailable_is_error() {
        let request = items_request().with_result(ResultDescriptor::named("item"));
        let validator = MockValidator::returning(Err(ValidatorError::Unavailable {
            program: "xmllint".to_string(),
            message: "not found".to_string(),
        }));
        let (mut executor, _, _) = executor(vec![request], MockHttpClient::status(200), validator);
        let mut ctx = context();

        let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

        assert!(matches!(report.outcome, Some(ExecutionOutcome::Error(Some(_)))));
        assert_eq!(ctx.statistics().error, 1);
        assert_eq!(ctx.statistics().failed, 0);
    }

    #[tokio::test]
    async fn test_run_statistics_balance() {
        let requests = vec![
            items_request(),
            RequestDescriptor::new("DELETE", "api.example.com", "/items"),
            RequestDescriptor::new("PUT", "api.example.com", "/items"),
        ];
        let client = MockHttpClient::new(vec![Ok(response(200, "")), Ok(response(500, ""))]);
        let (mut executor, _, _) = executor(requests, client, MockValidator::ok());
        let mut ctx = context();

        for identity in [
            "GET /items/<id>",
            "GET /items/<id>",
            "DELETE /items",
            "PUT /items",
            "GET /unknown",
        ] {
            executor.run(&mut ctx, identity, None).await;
        }
        ctx.print_summary(executor.sink_mut());

        let stats = *ctx.statistics();
        assert_eq!(stats.tested, 5);
        assert_eq!(
            stats.tested,
            stats.passed + stats.failed + stats.unsupported + stats.error + stats.skipped + stats.undefined()
        );
        assert_eq!(stats.undefined(), 1);
        let sink = executor.into_sink();
        assert_eq!(
            sink[sink.len() - 6..].to_vec(),
            vec![
                "Total 5 tests",
                "  1 passed",
                "  1 failed",
                "  1 unsupported",
                "  1 errors",
                "  1 undefined",
            ]
        );
    }
}
