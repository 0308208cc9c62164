use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Error object carried in the `error` member of a JSON-RPC 2.0 response.
///
/// The fields are taken verbatim from the server's payload; nothing is
/// normalized or reinterpreted on the way to the caller.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("JSON-RPC error {code}: {message}")]
pub struct JsonRpcError {
    /// Error code as sent by the server.
    pub code: i64,

    /// Short description of the error; empty if the server left it out.
    #[serde(default)]
    pub message: String,

    /// Additional server-defined information, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Any other members of the error object, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JsonRpcError {
    // ---
    /// Invalid JSON was received by the server.
    pub const PARSE_ERROR: i64 = -32700;

    /// The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i64 = -32600;

    /// The method does not exist or is not available.
    pub const METHOD_NOT_FOUND: i64 = -32601;

    /// Invalid method parameter(s).
    pub const INVALID_PARAMS: i64 = -32602;

    /// Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i64 = -32603;

    /// Create an error object without `data`.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        // ---
        Self {
            code,
            message: message.into(),
            data: None,
            extra: Map::new(),
        }
    }

    /// Attach server-defined `data`.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// True for codes in the range reserved for implementation-defined
    /// server errors (`-32099..=-32000`).
    pub fn is_server_error(&self) -> bool {
        (-32099..=-32000).contains(&self.code)
    }
}

/// Errors that can occur during RPC operations
#[derive(Error, Debug)]
pub enum RpcError {
    /// The server answered a call with an `error` payload
    #[error(transparent)]
    Protocol(#[from] JsonRpcError),

    /// Transport adapter failure, passed through as reported by the adapter
    #[error("transport error: {0}")]
    Transport(String),

    /// HTTP client failure from the default transport
    #[cfg(feature = "transport_http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body is not valid JSON
    #[error("parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Request or result (de)serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Params did not serialize to a JSON array or object
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Response parsed but cannot be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Required configuration missing
    #[error("missing configuration: {0}")]
    MissingConfig(String),
}

impl RpcError {
    /// Borrow the JSON-RPC error payload if this is a protocol error.
    pub fn as_protocol(&self) -> Option<&JsonRpcError> {
        match self {
            RpcError::Protocol(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for RPC operations
pub type Result<T> = std::result::Result<T, RpcError>;
