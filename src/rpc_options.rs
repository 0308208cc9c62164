//! Per-context and per-call options.
//!
//! Options are layered: a context holds defaults, and each operation may pass
//! an override set that is merged over them field by field. Merging is
//! shallow; an override `headers` map replaces the default map wholesale.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{IdGenerator, IdGeneratorPtr, Transport, TransportPtr};

/// Options recognized by an [`RpcContext`](crate::RpcContext).
///
/// Every field is optional so the same type serves as both defaults and
/// overrides. Unset fields in an override leave the default in place.
///
/// # Example
///
/// ```
/// use jsonrpc_context::{RpcOptions, UuidIdGenerator};
///
/// let overrides = RpcOptions::new()
///     .with_header("Authorization", "Bearer t0ken")
///     .with_id_generator(UuidIdGenerator);
/// ```
#[derive(Clone, Default)]
pub struct RpcOptions {
    // ---
    /// Identifier generator for calls.
    pub id: Option<IdGeneratorPtr>,

    /// Transport-specific metadata (HTTP headers for the default transport).
    pub headers: Option<BTreeMap<String, String>>,

    /// Transport adapter.
    pub transport: Option<TransportPtr>,

    /// Keys the crate does not interpret, passed through to the transport.
    ///
    /// Merged key by key, like the recognized fields.
    pub extensions: BTreeMap<String, Value>,
}

impl RpcOptions {
    /// Empty option set; as an override it changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier generator.
    pub fn with_id_generator(mut self, generator: impl IdGenerator + 'static) -> Self {
        self.id = Some(Arc::new(generator));
        self
    }

    /// Set an already shared identifier generator.
    pub fn with_id_generator_ptr(mut self, generator: IdGeneratorPtr) -> Self {
        self.id = Some(generator);
        self
    }

    /// Replace the header map.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = Some(
            headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Add one header to this option set's map.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set the transport adapter.
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set an already shared transport adapter.
    pub fn with_transport_ptr(mut self, transport: TransportPtr) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Carry an unrecognized key through to the transport.
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Overlay `overrides` on top of `self`.
    ///
    /// Each field set in `overrides` wins; unset fields keep the value from
    /// `self`. Neither input is modified.
    pub fn merge(&self, overrides: &RpcOptions) -> RpcOptions {
        // ---
        let mut extensions = self.extensions.clone();
        extensions.extend(
            overrides
                .extensions
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        RpcOptions {
            id: overrides.id.clone().or_else(|| self.id.clone()),
            headers: overrides.headers.clone().or_else(|| self.headers.clone()),
            transport: overrides
                .transport
                .clone()
                .or_else(|| self.transport.clone()),
            extensions,
        }
    }

    /// Merge an optional override set; `None` yields a copy of `self`.
    pub(crate) fn merged(&self, overrides: Option<&RpcOptions>) -> RpcOptions {
        match overrides {
            Some(overrides) => self.merge(overrides),
            None => self.clone(),
        }
    }
}

impl fmt::Debug for RpcOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcOptions")
            .field("id", &self.id.as_ref().map(|_| "<generator>"))
            .field("headers", &self.headers)
            .field("transport", &self.transport.as_ref().map(|_| "<transport>"))
            .field("extensions", &self.extensions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::{transport_fn, CounterIdGenerator, RequestId, UuidIdGenerator};
    use serde_json::json;

    #[test]
    fn test_override_wins_per_field() {
        // ---
        let defaults = RpcOptions::new()
            .with_id_generator(CounterIdGenerator::new())
            .with_header("X-Default", "1")
            .with_transport_ptr(transport_fn(|_, _, _| Ok(String::new())));

        let overrides = RpcOptions::new().with_id_generator(UuidIdGenerator);
        let merged = defaults.merge(&overrides);

        // id overridden, the rest kept
        let id = merged.id.as_ref().unwrap().next_id(None);
        assert!(matches!(id, RequestId::String(_)));
        assert_eq!(
            merged.headers.as_ref().and_then(|h| h.get("X-Default")),
            Some(&"1".to_string())
        );
        assert!(merged.transport.is_some());
    }

    #[test]
    fn test_headers_replaced_not_combined() {
        // ---
        let defaults = RpcOptions::new().with_header("A", "1").with_header("B", "2");
        let overrides = RpcOptions::new().with_header("C", "3");

        let merged = defaults.merge(&overrides);
        let headers = merged.headers.unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("C"), Some(&"3".to_string()));

        // defaults untouched
        assert_eq!(defaults.headers.as_ref().map(|h| h.len()), Some(2));
    }

    #[test]
    fn test_extensions_merge_key_by_key() {
        // ---
        let defaults = RpcOptions::new()
            .with_extension("trace", json!(true))
            .with_extension("tenant", json!("a"));
        let overrides = RpcOptions::new().with_extension("tenant", json!("b"));

        let merged = defaults.merge(&overrides);
        assert_eq!(merged.extensions.get("trace"), Some(&json!(true)));
        assert_eq!(merged.extensions.get("tenant"), Some(&json!("b")));
    }

    #[test]
    fn test_empty_override_is_identity() {
        // ---
        let defaults = RpcOptions::new().with_header("A", "1");
        let merged = defaults.merged(None);
        assert_eq!(merged.headers, defaults.headers);

        let merged = defaults.merged(Some(&RpcOptions::new()));
        assert_eq!(merged.headers, defaults.headers);
        assert!(merged.id.is_none());
    }
}
