//! End-to-end tests of the request executor over the real reqwest
//! transport, against a local stub server.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::Path,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;

use restcheck_application::{RequestExecutor, RunContext};
use restcheck_domain::{
    AuthPolicy, Credentials, ExecutionOutcome, RunConfig, RunStatistics,
    request::{RequestCatalog, RequestDescriptor, ResultDescriptor},
};
use restcheck_infrastructure::{
    ConsoleReporter, ReqwestHttpClient, XmllintValidator, build_harness, load_run_config,
};

const API_HOST: &str = "api.example.com";

async fn item(Path(id): Path<String>) -> Response {
    if id == "missing" {
        StatusCode::NOT_FOUND.into_response()
    } else {
        format!("<item id=\"{id}\"/>").into_response()
    }
}

async fn echo(body: String) -> String {
    body
}

async fn created() -> StatusCode {
    StatusCode::CREATED
}

async fn moved(Path(id): Path<String>) -> Redirect {
    Redirect::temporary(&format!("/items/{id}"))
}

async fn endless() -> Redirect {
    Redirect::temporary("/loop")
}

async fn whoami(headers: HeaderMap) -> String {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous")
        .to_string()
}

async fn spawn_stub() -> SocketAddr {
    let app = Router::new()
        .route("/items/{id}", get(item).put(echo))
        .route("/items", post(created))
        .route("/old/{id}", get(moved))
        .route("/loop", get(endless))
        .route("/whoami", get(whoami));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn catalog() -> RequestCatalog {
    [
        RequestDescriptor::new("GET", API_HOST, "/items/<id>").with_parameter("id"),
        RequestDescriptor::new("PUT", API_HOST, "/items/<id>").with_parameter("id"),
        RequestDescriptor::new("POST", API_HOST, "/items"),
        RequestDescriptor::new("GET", API_HOST, "/old/<id>").with_parameter("id"),
        RequestDescriptor::new("GET", API_HOST, "/loop"),
        RequestDescriptor::new("GET", API_HOST, "/whoami"),
        RequestDescriptor::new("GET", API_HOST, "/schema/<id>")
            .with_parameter("id")
            .with_result(ResultDescriptor::named("item")),
    ]
    .into_iter()
    .collect()
}

type TestExecutor = RequestExecutor<ReqwestHttpClient, XmllintValidator, Vec<String>>;

fn executor_with(validator: XmllintValidator) -> TestExecutor {
    RequestExecutor::new(
        Arc::new(catalog()),
        Arc::new(ReqwestHttpClient::with_timeout(5_000).unwrap()),
        Arc::new(validator),
        Vec::new(),
    )
}

fn executor() -> TestExecutor {
    executor_with(XmllintValidator::new())
}

fn context(addr: SocketAddr) -> RunContext {
    let mut ctx = RunContext::new();
    ctx.alias_host(API_HOST, addr.to_string());
    ctx
}

#[tokio::test]
async fn test_get_with_alias_and_binding_passes() {
    let addr = spawn_stub().await;
    let mut executor = executor();
    let mut ctx = context(addr);
    ctx.bind("id", "42");

    let report = executor.run(&mut ctx, "GET /items/<id>", None).await;

    assert_eq!(report.outcome, Some(ExecutionOutcome::Passed));
    assert_eq!(report.path.as_deref(), Some("/items/42"));
    assert_eq!(report.response.unwrap().body, "<item id=\"42\"/>");
    assert_eq!(
        *ctx.statistics(),
        RunStatistics {
            tested: 1,
            passed: 1,
            ..RunStatistics::default()
        }
    );
}

#[tokio::test]
async fn test_missing_binding_is_error() {
    let addr = spawn_stub().await;
    let mut executor = executor();
    let mut ctx = context(addr);

    let response = executor.request(&mut ctx, "GET /items/<id>", None).await;

    assert!(response.is_none());
    assert_eq!(ctx.statistics().tested, 1);
    assert_eq!(ctx.statistics().error, 1);
}

#[tokio::test]
async fn test_not_found_fails_unless_expected() {
    let addr = spawn_stub().await;
    let mut executor = executor();
    let mut ctx = context(addr);
    ctx.bind("id", "missing");

    let failed = executor.run(&mut ctx, "GET /items/<id>", None).await;
    let expected = executor.run(&mut ctx, "GET /items/<id>", Some(404)).await;

    assert_eq!(failed.outcome, Some(ExecutionOutcome::Failed));
    assert_eq!(expected.outcome, Some(ExecutionOutcome::Passed));
    assert_eq!(ctx.statistics().failed, 1);
    assert_eq!(ctx.statistics().passed, 1);
}

#[tokio::test]
async fn test_redirect_hop_reaches_target() {
    let addr = spawn_stub().await;
    let mut executor = executor();
    let mut ctx = context(addr);
    ctx.bind("id", "7");
    ctx.set_show_passed(true);

    let report = executor.run(&mut ctx, "GET /old/<id>", None).await;

    assert_eq!(report.outcome, Some(ExecutionOutcome::Passed));
    assert_eq!(report.response.unwrap().body, "<item id=\"7\"/>");
    let expected = format!("  Redirected to http://{addr}/items/7");
    assert!(executor.sink().contains(&expected));
}

#[tokio::test]
async fn test_redirect_is_followed_only_once() {
    let addr = spawn_stub().await;
    let mut executor = executor();
    let mut ctx = context(addr);

    let report = executor.run(&mut ctx, "GET /loop", None).await;

    assert_eq!(report.outcome, Some(ExecutionOutcome::Failed));
    assert_eq!(report.response.unwrap().status.as_u16(), 307);
}

#[tokio::test]
async fn test_put_and_post() {
    let addr = spawn_stub().await;
    let mut executor = executor();
    let mut ctx = context(addr);
    ctx.bind("id", "9");

    let without_body = executor.run(&mut ctx, "PUT /items/<id>", None).await;
    assert_eq!(
        without_body.outcome,
        Some(ExecutionOutcome::error("No body data defined for PUT"))
    );

    ctx.set_put_body(Some("<item id=\"9\"/>".to_string()));
    let with_body = executor.run(&mut ctx, "PUT /items/<id>", None).await;
    assert_eq!(with_body.outcome, Some(ExecutionOutcome::Passed));
    assert_eq!(with_body.response.unwrap().body, "<item id=\"9\"/>");

    let post = executor.run(&mut ctx, "POST /items", None).await;
    assert_eq!(post.outcome, Some(ExecutionOutcome::Passed));
    assert_eq!(post.response.unwrap().status.as_u16(), 201);

    assert_eq!(ctx.statistics().tested, 3);
    assert_eq!(ctx.statistics().passed, 2);
    assert_eq!(ctx.statistics().error, 1);
}

#[tokio::test]
async fn test_get_credentials() {
    let addr = spawn_stub().await;
    let mut executor = executor();
    let mut ctx = context(addr);

    let forced = executor.request(&mut ctx, "GET /whoami", None).await.unwrap();
    assert_eq!(forced.body, "Basic Og==");

    ctx.set_get_auth(AuthPolicy::IfConfigured);
    let anonymous = executor.request(&mut ctx, "GET /whoami", None).await.unwrap();
    assert_eq!(anonymous.body, "anonymous");

    ctx.set_credentials(Some(Credentials::new("alice", "secret")));
    let configured = executor.request(&mut ctx, "GET /whoami", None).await.unwrap();
    assert_eq!(configured.body, "Basic YWxpY2U6c2VjcmV0");
}

#[tokio::test]
async fn test_connection_refused_is_error() {
    let closed = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let mut executor = executor();
    let mut ctx = context(closed);

    let report = executor.run(&mut ctx, "GET /whoami", None).await;

    assert!(matches!(report.outcome, Some(ExecutionOutcome::Error(Some(_)))));
    assert!(report.response.is_none());
    assert_eq!(ctx.statistics().error, 1);
}

#[tokio::test]
async fn test_validator_unavailable_is_error() {
    let addr = spawn_stub().await;
    let mut executor = executor_with(XmllintValidator::with_program(
        "/nonexistent/restcheck-validator",
    ));
    let mut ctx = context(addr);
    ctx.bind("id", "1");

    // The stub has no /schema route, so expect its 404 to reach validation.
    let report = executor.run(&mut ctx, "GET /schema/<id>", Some(404)).await;

    assert!(matches!(report.outcome, Some(ExecutionOutcome::Error(Some(_)))));
    assert_eq!(ctx.statistics().failed, 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_validator_exit_status_decides() {
    let addr = spawn_stub().await;
    let mut ctx = context(addr);
    ctx.bind("id", "1");

    let mut passing = executor_with(XmllintValidator::with_program("true"));
    let report = passing.run(&mut ctx, "GET /schema/<id>", Some(404)).await;
    assert_eq!(report.outcome, Some(ExecutionOutcome::Passed));

    let mut failing = executor_with(XmllintValidator::with_program("false"));
    let report = failing.run(&mut ctx, "GET /schema/<id>", Some(404)).await;
    assert_eq!(report.outcome, Some(ExecutionOutcome::Failed));
    assert_eq!(failing.sink().last().map(String::as_str), Some("  FAILED"));
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_harness_from_config_file() {
    let addr = spawn_stub().await;
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        "host_aliases:\n  {API_HOST}: '{addr}'\nrequest_filter: items\nshow_passed: true\nbindings:\n  id: '42'\n"
    )
    .unwrap();

    let config = load_run_config(file.path()).await.unwrap();
    let buffer = SharedBuffer::default();
    let (mut executor, mut ctx) =
        build_harness(&config, catalog(), ConsoleReporter::new(buffer.clone())).unwrap();

    executor.run(&mut ctx, "GET /items/<id>", None).await;
    executor.run(&mut ctx, "GET /whoami", None).await;
    ctx.print_summary(executor.sink_mut());

    let output = buffer.contents();
    assert!(output.starts_with("REQUEST: GET /items/<id>\n"));
    assert!(output.contains("  Path: /items/42\n"));
    assert!(output.contains("  PASSED\n"));
    assert!(!output.contains("/whoami"));
    assert!(output.ends_with("Total 2 tests\n  1 passed\n  0 failed\n  1 skipped\n"));
}

#[test]
fn test_invalid_filter_rejected() {
    let config = RunConfig {
        request_filter: Some("[".to_string()),
        ..RunConfig::default()
    };
    let result = build_harness(&config, catalog(), ConsoleReporter::stdout());
    assert!(result.is_err());
}
