// src/domain/transport.rs

//! Transport domain abstractions.
//!
//! A transport moves one outbound [`Payload`] to an endpoint and hands back
//! the raw response body as text. It knows nothing about ids, results, or
//! errors inside the body; interpretation happens in the protocol layer.
//!
//! Concrete implementations live under `src/transport/`.
use std::sync::Arc;

use crate::{Payload, Result, RpcOptions};

/// Per-send information handed to the transport alongside the payload.
///
/// `options` are the effective options of the operation, i.e. the context
/// defaults with any per-call overrides already merged in. Transports read
/// the fields they understand (for HTTP, `headers`) and ignore the rest.
#[derive(Debug, Clone)]
pub struct TransportContext {
    /// Endpoint the context is bound to.
    pub url: String,

    /// Effective options for this send.
    pub options: RpcOptions,
}

/// Transport abstraction.
///
/// Implementations must:
/// - serialize `payload` themselves (it serializes to a JSON object for a
///   single request and a JSON array for a batch);
/// - return the response body as text, or an empty string when there is no
///   body (a notification acknowledged with `204 No Content`, for example);
/// - report failures as errors; they reach the caller unchanged.
///
/// Retries, timeouts and connection reuse are transport concerns.
///
/// # Notes
///
/// This trait uses `async_trait`; the expanded documentation may show explicit
/// lifetimes and a boxed `Future`. Treat `send` as a normal `async fn`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    // ---
    /// Deliver `payload` to `url` and return the raw response body.
    async fn send(&self, url: &str, payload: &Payload, ctx: &TransportContext) -> Result<String>;
}

/// Shared transport pointer.
///
/// An `Arc<dyn Transport>`: cloning is cheap and clones share the
/// underlying client.
pub type TransportPtr = Arc<dyn Transport>;
