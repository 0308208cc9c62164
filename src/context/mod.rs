// src/context/mod.rs
//! RPC context implementation.
//!
//! This module contains [`RpcContext`], the façade that binds one endpoint
//! and one set of default options to the `send`, `call`, `notify` and `batch`
//! operations.
//!
//! # Pipeline
//!
//! Every operation is a single pass: merge options, build the request(s),
//! hand the payload to the transport, interpret the returned text. There is
//! no background task, no pending-response table and no retry loop; each
//! future awaits its own transport invocation, and that is what ties a
//! response to its request.
//!
//! # Concurrency
//!
//! The only shared mutable state is the identifier counter of the default
//! generator. Ids are drawn before the first await point with a single atomic
//! increment, so any number of operations may be in flight on clones of the
//! same context without colliding.

mod batch;

pub use batch::BatchBuilder;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::protocol::{interpret_batch, interpret_call, parse_body};
use crate::{
    // ---
    log_debug,
    BatchResponse,
    CallSite,
    CounterIdGenerator,
    IdGeneratorPtr,
    IntoParams,
    Payload,
    Request,
    Result,
    RpcContextBuilder,
    RpcError,
    RpcOptions,
    TransportContext,
};

/// JSON-RPC 2.0 client bound to one endpoint.
///
/// Cheap to clone (internally `Arc`-backed). Clones share the endpoint, the
/// default options and therefore the default identifier counter.
///
/// # Example
///
/// ```no_run
/// use jsonrpc_context::{RpcContext, RpcOptions};
/// use serde_json::json;
///
/// # async fn example() -> jsonrpc_context::Result<()> {
/// let rpc = RpcContext::new("http://localhost:8545", RpcOptions::new());
///
/// let sum = rpc.call("add", json!([2, 3]), None).await?;
/// rpc.notify("log", json!({"level": "info"}), None).await?;
///
/// let replies = rpc
///     .batch(|b| {
///         b.call("add", json!([2, 2]))
///             .notify("ping", ())
///             .call("mul", json!([3, 3]));
///     }, None)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RpcContext {
    inner: Arc<Inner>,
}

struct Inner {
    // ---
    url: String,
    defaults: RpcOptions,
}

impl RpcContext {
    // ---
    /// Create a context for `url`.
    ///
    /// Missing defaults are filled in: the identifier generator becomes a
    /// fresh [`CounterIdGenerator`] owned by this context, and the transport
    /// becomes the crate default (HTTP when the `transport_http` feature is
    /// enabled). Without a default transport, operations fail with
    /// [`RpcError::MissingConfig`] unless a transport is supplied per call.
    pub fn new(url: impl Into<String>, options: RpcOptions) -> Self {
        // ---
        let mut defaults = options;

        if defaults.id.is_none() {
            let ids: IdGeneratorPtr = Arc::new(CounterIdGenerator::new());
            defaults.id = Some(ids);
        }

        if defaults.transport.is_none() {
            defaults.transport = crate::create_default_transport();
        }

        Self {
            inner: Arc::new(Inner {
                url: url.into(),
                defaults,
            }),
        }
    }

    /// Start a fluent builder for `url`.
    pub fn builder(url: impl Into<String>) -> RpcContextBuilder {
        RpcContextBuilder::new(url)
    }

    /// Endpoint this context talks to.
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Default options, with generator and transport already filled in.
    pub fn options(&self) -> &RpcOptions {
        &self.inner.defaults
    }

    /// Send a prepared payload and return the parsed response body.
    ///
    /// `Ok(None)` means the transport returned a blank body, which is not an
    /// error. No interpretation beyond JSON parsing happens here.
    ///
    /// # Errors
    ///
    /// - `RpcError::MissingConfig` - no transport in the effective options
    /// - any error raised by the transport, unchanged
    /// - `RpcError::Parse` - the body is not valid JSON
    pub async fn send(
        &self,
        payload: impl Into<Payload>,
        overrides: Option<&RpcOptions>,
    ) -> Result<Option<Value>> {
        // ---
        let options = self.inner.defaults.merged(overrides);
        self.send_with(&payload.into(), options).await
    }

    /// Call `method` and return its result.
    ///
    /// The identifier generator is invoked exactly once, with the method and
    /// params. `Ok(None)` means there was no answer: a blank body or a
    /// response without a `result` member. A `null` result is `Ok(Some(Value::Null))`.
    ///
    /// # Errors
    ///
    /// - `RpcError::Protocol` - the response carries an `error` payload
    /// - `RpcError::InvalidParams` - params are not an array or object
    /// - everything [`send`](Self::send) can return
    pub async fn call(
        &self,
        method: &str,
        params: impl IntoParams,
        overrides: Option<&RpcOptions>,
    ) -> Result<Option<Value>> {
        // ---
        let params = params.into_params()?;
        let options = self.inner.defaults.merged(overrides);

        let ids = options
            .id
            .clone()
            .ok_or_else(|| RpcError::MissingConfig("id generator".into()))?;
        let id = ids.next_id(Some(CallSite {
            method,
            params: params.as_ref(),
        }));

        let request = Request::call(method, params, id.clone());
        let body = self.send_with(&Payload::Single(request), options).await?;

        interpret_call(body, &id)
    }

    /// Call `method` and deserialize its result into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`call`](Self::call) can return, plus
    /// `RpcError::Serialization` if the result does not fit `T`.
    pub async fn call_as<T>(
        &self,
        method: &str,
        params: impl IntoParams,
        overrides: Option<&RpcOptions>,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        // ---
        let result = self.call(method, params, overrides).await?;
        let typed = result.map(serde_json::from_value).transpose()?;
        Ok(typed)
    }

    /// Send a notification.
    ///
    /// Whatever the server answers is discarded, including error objects.
    ///
    /// # Errors
    ///
    /// Transport failures and unparseable bodies, as for [`send`](Self::send).
    pub async fn notify(
        &self,
        method: &str,
        params: impl IntoParams,
        overrides: Option<&RpcOptions>,
    ) -> Result<()> {
        // ---
        let params = params.into_params()?;
        let options = self.inner.defaults.merged(overrides);

        let request = Request::notification(method, params);
        let _ignored = self.send_with(&Payload::Single(request), options).await?;

        Ok(())
    }

    /// Build and send a batch.
    ///
    /// `build` runs synchronously and appends entries to the builder; each
    /// call entry draws an id from the effective generator. The whole batch
    /// goes out as one payload. The responses come back as received, with
    /// per-entry errors left in place for the caller to inspect.
    ///
    /// # Errors
    ///
    /// - the first params conversion failure inside `build` (nothing is sent)
    /// - `RpcError::InvalidResponse` - the body is not a batch response
    /// - everything [`send`](Self::send) can return
    pub async fn batch<F>(&self, build: F, overrides: Option<&RpcOptions>) -> Result<BatchResponse>
    where
        F: FnOnce(&mut BatchBuilder<'_>),
    {
        // ---
        let options = self.inner.defaults.merged(overrides);

        let ids = options
            .id
            .clone()
            .ok_or_else(|| RpcError::MissingConfig("id generator".into()))?;

        let requests = {
            let mut builder = BatchBuilder::new(ids.as_ref());
            build(&mut builder);
            builder.finish()?
        };

        let body = self.send_with(&Payload::Batch(requests), options).await?;
        interpret_batch(body)
    }

    async fn send_with(&self, payload: &Payload, options: RpcOptions) -> Result<Option<Value>> {
        // ---
        let transport = options
            .transport
            .clone()
            .ok_or_else(|| RpcError::MissingConfig("transport".into()))?;

        let url = self.inner.url.as_str();
        let ctx = TransportContext {
            url: url.to_string(),
            options,
        };

        log_debug!("sending {} request(s) to {url}", payload.len());

        let text = transport.send(url, payload, &ctx).await?;
        parse_body(&text)
    }
}

impl std::fmt::Debug for RpcContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcContext")
            .field("url", &self.inner.url)
            .field("options", &self.inner.defaults)
            .finish()
    }
}
