// src/transport/http/transport.rs

//! HTTP transport built on `reqwest`.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};

use crate::{
    // ---
    log_debug,
    log_trace,
    Payload,
    Result,
    RpcError,
    Transport,
    TransportContext,
    TransportPtr,
};

const APPLICATION_JSON: &str = "application/json";

/// JSON-RPC over HTTP POST.
///
/// ## Semantics
///
/// - The payload is serialized to JSON and sent as the request body.
/// - `Content-Type` and `Accept` default to `application/json`; entries in the
///   effective `headers` option are applied on top and may replace them.
/// - The body is returned as text whatever the status code. JSON-RPC servers
///   commonly attach error responses to non-2xx statuses, and the protocol
///   layer is the one that decides what the body means.
///
/// Timeouts, proxies, TLS and pooling come from the wrapped
/// [`reqwest::Client`].
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    // ---
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport with a default `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport reusing a caller-configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn build_headers(ctx: &TransportContext) -> Result<HeaderMap> {
    // ---
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

    if let Some(extra) = &ctx.options.headers {
        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RpcError::Transport(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| RpcError::Transport(format!("invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }
    }

    Ok(headers)
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    // ---
    async fn send(&self, url: &str, payload: &Payload, ctx: &TransportContext) -> Result<String> {
        // ---
        let body = Bytes::from(serde_json::to_vec(payload)?);
        let headers = build_headers(ctx)?;

        log_trace!("POST {url} ({} bytes)", body.len());

        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let _status = response.status();
        let text = response.text().await?;

        log_debug!("POST {url} -> {_status} ({} bytes)", text.len());

        Ok(text)
    }
}

/// Create the default HTTP transport.
pub fn create_transport() -> TransportPtr {
    // ---
    Arc::new(HttpTransport::new())
}
