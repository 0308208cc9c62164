//! Transport implementations.
//!
//! Concrete implementations of the domain-level `Transport` trait. Optional
//! transports sit behind feature flags and are exposed through constructor
//! functions and their public types only.

mod func;

#[cfg(feature = "transport_http")]
mod http;

pub use func::transport_fn;

#[cfg(feature = "transport_http")]
pub use http::{create_transport as create_http_transport, HttpTransport};
