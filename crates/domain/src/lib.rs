//! Restcheck Domain - Core harness types
//!
//! This crate defines the domain model of the restcheck API test harness:
//! request descriptors, parameter substitution, status classification,
//! outcomes and run statistics. All types here are pure Rust with no I/O.

pub mod classify;
pub mod config;
pub mod error;
pub mod outcome;
pub mod request;
pub mod response;
pub mod statistics;
pub mod substitution;

pub use classify::{Classification, classify, status_accepted};
pub use config::{
    AuthPolicy, Credentials, DEFAULT_TIMEOUT_MS, DEFAULT_VALIDATOR_PROGRAM, HostAliasTable, RunConfig,
};
pub use error::{DomainError, DomainResult};
pub use outcome::ExecutionOutcome;
pub use statistics::RunStatistics;
pub use substitution::{VariableBindings, VariableLookup, substitute};
