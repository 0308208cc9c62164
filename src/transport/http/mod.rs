// src/transport/http/mod.rs

//! HTTP transport implementation.
//!
//! The default transport of an [`RpcContext`](crate::RpcContext) when the
//! `transport_http` feature is enabled. It is deliberately thin: one POST per
//! payload, body returned as text. Anything beyond that (retries, timeouts,
//! auth refresh) belongs in the `reqwest::Client` handed to
//! [`HttpTransport::with_client`] or in a custom [`Transport`](crate::Transport).

mod transport;

pub use transport::{create_transport, HttpTransport};
