//! Infrastructure adapters

mod console_reporter;
mod reqwest_client;
mod xmllint_validator;

pub use console_reporter::ConsoleReporter;
pub use reqwest_client::ReqwestHttpClient;
pub use xmllint_validator::XmllintValidator;
