//! Request descriptors and connection targets

mod descriptor;
mod method;
mod target;

pub use descriptor::{RequestCatalog, RequestDescriptor, ResultDescriptor};
pub use method::HttpMethod;
pub use target::HostTarget;
