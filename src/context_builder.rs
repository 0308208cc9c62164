//! RPC context builder.
//!
//! Fluent alternative to assembling [`RpcOptions`] by hand before calling
//! [`RpcContext::new`].

use std::sync::Arc;

use serde_json::Value;

use crate::{
    // ---
    IdGenerator,
    IdGeneratorPtr,
    RpcContext,
    RpcOptions,
    Transport,
    TransportPtr,
};

/// Builder for [`RpcContext`] instances.
///
/// # Examples
///
/// ## Default HTTP transport with an auth header
/// ```no_run
/// use jsonrpc_context::RpcContextBuilder;
///
/// let rpc = RpcContextBuilder::new("https://rpc.example.com")
///     .header("Authorization", "Bearer t0ken")
///     .build();
/// ```
///
/// ## Custom transport and string ids
/// ```
/// use jsonrpc_context::{transport_fn, RpcContextBuilder, UuidIdGenerator};
///
/// let rpc = RpcContextBuilder::new("memory://")
///     .transport_ptr(transport_fn(|_, _, _| Ok(String::new())))
///     .id_generator(UuidIdGenerator)
///     .build();
/// ```
#[derive(Debug)]
pub struct RpcContextBuilder {
    // ---
    url: String,
    options: RpcOptions,
}

impl RpcContextBuilder {
    /// Create a builder for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        // ---
        Self {
            url: url.into(),
            options: RpcOptions::new(),
        }
    }

    /// Start from an existing option set.
    pub fn options(mut self, options: RpcOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the identifier generator.
    ///
    /// If not specified, the context gets its own [`CounterIdGenerator`](crate::CounterIdGenerator).
    pub fn id_generator(mut self, generator: impl IdGenerator + 'static) -> Self {
        self.options.id = Some(Arc::new(generator));
        self
    }

    /// Set a shared identifier generator.
    ///
    /// Contexts built with the same pointer draw from the same sequence.
    pub fn id_generator_ptr(mut self, generator: IdGeneratorPtr) -> Self {
        self.options.id = Some(generator);
        self
    }

    /// Set the transport adapter.
    ///
    /// If not specified, uses the crate default transport.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.options.transport = Some(Arc::new(transport));
        self
    }

    /// Set a shared transport adapter.
    pub fn transport_ptr(mut self, transport: TransportPtr) -> Self {
        self.options.transport = Some(transport);
        self
    }

    /// Add a default header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options = self.options.with_header(name, value);
        self
    }

    /// Carry an unrecognized option through to the transport.
    pub fn extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.extensions.insert(key.into(), value);
        self
    }

    /// Build the context (consumes self).
    pub fn build(self) -> RpcContext {
        RpcContext::new(self.url, self.options)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::{transport_fn, RequestId};
    use serde_json::json;

    #[test]
    fn test_builder_fills_options() {
        // ---
        let rpc = RpcContextBuilder::new("memory://test")
            .transport_ptr(transport_fn(|_, _, _| Ok(String::new())))
            .header("X-Api-Key", "k")
            .extension("tenant", json!("acme"))
            .build();

        assert_eq!(rpc.url(), "memory://test");

        let options = rpc.options();
        assert!(options.transport.is_some());
        assert_eq!(
            options.headers.as_ref().and_then(|h| h.get("X-Api-Key")),
            Some(&"k".to_string())
        );
        assert_eq!(options.extensions.get("tenant"), Some(&json!("acme")));

        // default generator was filled in
        let ids = options.id.as_ref().unwrap();
        assert_eq!(ids.next_id(None), RequestId::from(1u64));
    }
}
