//! JSON-RPC 2.0 client with call, notify and batch semantics over a
//! pluggable transport.
//!
//! An [`RpcContext`] binds one endpoint and one set of default options. It
//! builds request objects, assigns ids, hands payloads to a [`Transport`],
//! and interprets what comes back: results, JSON-RPC error objects, blank
//! bodies and batch arrays.
//!
//! The transport only moves text. The default one POSTs over HTTP
//! (`transport_http` feature); [`transport_fn`] turns any closure into a
//! transport, which is how tests stub the wire.
//!
//! ```
//! use jsonrpc_context::{transport_fn, RpcContext, RpcOptions};
//! use serde_json::json;
//!
//! # async fn example() -> jsonrpc_context::Result<()> {
//! let stub = transport_fn(|_url, _payload, _ctx| {
//!     Ok(r#"{"jsonrpc":"2.0","result":42,"id":1}"#.to_string())
//! });
//! let rpc = RpcContext::new("memory://", RpcOptions::new().with_transport_ptr(stub));
//!
//! assert_eq!(rpc.call("answer", (), None).await?, Some(json!(42)));
//! # Ok(())
//! # }
//! ```

// Import all sub modules once...
mod context;
mod domain;
mod protocol;
mod transport;

mod context_builder;
mod rpc_options;

mod error;
mod macros;

pub(crate) use macros::{log_debug, log_trace, log_warn};

// Re-export main types
pub use context::{BatchBuilder, RpcContext};
pub use context_builder::RpcContextBuilder;
pub use rpc_options::RpcOptions;

pub use error::{JsonRpcError, Result, RpcError};

// --- public re-exports
pub use domain::{
    //
    Transport,
    TransportContext,
    TransportPtr,
};

pub use protocol::{
    //
    id_generator_fn,
    BatchResponse,
    CallSite,
    CounterIdGenerator,
    IdGenerator,
    IdGeneratorPtr,
    IntoParams,
    Params,
    Payload,
    Request,
    RequestId,
    Response,
    UuidIdGenerator,
    JSONRPC_VERSION,
};

pub use transport::transport_fn;

#[cfg(feature = "transport_http")]
pub use transport::{create_http_transport, HttpTransport};

/// Transport used when none is configured.
///
/// The HTTP transport with the `transport_http` feature; `None` otherwise.
pub fn create_default_transport() -> Option<TransportPtr> {
    // ---
    #[cfg(feature = "transport_http")]
    {
        Some(create_http_transport())
    }

    #[cfg(not(feature = "transport_http"))]
    {
        log_debug!("no default transport compiled in");
        None
    }
}
