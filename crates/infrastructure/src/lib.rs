//! Restcheck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, configuration loading and
//! logging setup.

pub mod adapters;
pub mod config;
pub mod harness;
pub mod logging;

pub use adapters::{ConsoleReporter, ReqwestHttpClient, XmllintValidator};
pub use config::{ConfigError, ConfigFormat, load_run_config, parse_run_config};
pub use harness::{ConsoleExecutor, build_harness};
pub use logging::init_tracing;
