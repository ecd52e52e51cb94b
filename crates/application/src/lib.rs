//! Restcheck Application - Ports and the request executor
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP transport, schema validator, report sink)
//! - The explicit per-run context
//! - The request execution use case

pub mod context;
pub mod error;
pub mod execute_request;
pub mod ports;

pub use context::RunContext;
pub use error::{ApplicationError, ApplicationResult};
pub use execute_request::{InvocationReport, RequestExecutor};
pub use ports::{
    HttpClient, HttpClientError, OutgoingRequest, ReportSink, SchemaValidator, ValidationReport,
    ValidatorError,
};
