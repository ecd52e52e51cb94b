//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the harness core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod http_client;
mod report_sink;
mod schema_validator;

pub use http_client::{HttpClient, HttpClientError, OutgoingRequest};
pub use report_sink::ReportSink;
pub use schema_validator::{SchemaValidator, ValidationReport, ValidatorError};
