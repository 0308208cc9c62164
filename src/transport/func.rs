// src/transport/func.rs

//! Closure-backed transport.
//!
//! Adapts a synchronous function returning the response body into a
//! [`Transport`]. Always available; the usual way to plug in a stub for tests
//! or to bridge into an existing blocking-free client.

use std::sync::Arc;

use crate::{Payload, Result, Transport, TransportContext, TransportPtr};

struct FnTransport<F> {
    // ---
    func: F,
}

#[async_trait::async_trait]
impl<F> Transport for FnTransport<F>
where
    F: Fn(&str, &Payload, &TransportContext) -> Result<String> + Send + Sync,
{
    async fn send(&self, url: &str, payload: &Payload, ctx: &TransportContext) -> Result<String> {
        (self.func)(url, payload, ctx)
    }
}

/// Wrap a synchronous function as a transport.
///
/// The function receives the endpoint, the outbound payload and the effective
/// options, and returns the raw response body.
///
/// ```
/// use jsonrpc_context::{transport_fn, RpcContext, RpcOptions};
///
/// let echo = transport_fn(|_url, payload, _ctx| {
///     Ok(serde_json::to_string(payload)?)
/// });
/// let ctx = RpcContext::new("memory://echo", RpcOptions::new().with_transport_ptr(echo));
/// ```
pub fn transport_fn<F>(func: F) -> TransportPtr
where
    F: Fn(&str, &Payload, &TransportContext) -> Result<String> + Send + Sync + 'static,
{
    Arc::new(FnTransport { func })
}
