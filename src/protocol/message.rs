//! JSON-RPC 2.0 wire envelopes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{JsonRpcError, Result, RpcError};

use super::RequestId;

/// Protocol version tag carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// Method parameters: positional or named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    /// Positional parameters.
    Array(Vec<Value>),
    /// Named parameters.
    Object(Map<String, Value>),
}

impl Params {
    /// Convert any serializable value into params.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::InvalidParams`] if the value does not serialize to a
    /// JSON array or object, and [`RpcError::Serialization`] if serialization
    /// itself fails.
    pub fn from_serialize<T: Serialize>(value: T) -> Result<Self> {
        // ---
        Params::try_from(serde_json::to_value(value)?)
    }
}

impl TryFrom<Value> for Params {
    type Error = RpcError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Params::Array(items)),
            Value::Object(map) => Ok(Params::Object(map)),
            other => Err(RpcError::InvalidParams(format!(
                "expected array or object, got {other}"
            ))),
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(items: Vec<Value>) -> Self {
        Params::Array(items)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params::Object(map)
    }
}

/// Conversion into optional request params.
///
/// Implemented for the shapes callers usually have at hand. `()` means "no
/// params"; the `params` member is then left off the wire. A JSON `null`
/// means the same thing.
pub trait IntoParams {
    /// Convert, failing if the value is not an array or object.
    fn into_params(self) -> Result<Option<Params>>;
}

impl IntoParams for () {
    fn into_params(self) -> Result<Option<Params>> {
        Ok(None)
    }
}

impl IntoParams for Params {
    fn into_params(self) -> Result<Option<Params>> {
        Ok(Some(self))
    }
}

impl IntoParams for Option<Params> {
    fn into_params(self) -> Result<Option<Params>> {
        Ok(self)
    }
}

impl IntoParams for Vec<Value> {
    fn into_params(self) -> Result<Option<Params>> {
        Ok(Some(Params::Array(self)))
    }
}

impl IntoParams for Map<String, Value> {
    fn into_params(self) -> Result<Option<Params>> {
        Ok(Some(Params::Object(self)))
    }
}

impl IntoParams for Value {
    fn into_params(self) -> Result<Option<Params>> {
        match self {
            Value::Null => Ok(None),
            other => Params::try_from(other).map(Some),
        }
    }
}

/// A single request object.
///
/// With `id` set this is a call and a response is expected; without it this
/// is a notification. `id` and `params` are left off the wire when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Always [`JSONRPC_VERSION`].
    pub jsonrpc: String,

    /// Method name.
    pub method: String,

    /// Method parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,

    /// Correlation id, present for calls only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl Request {
    /// Build a call.
    pub fn call(method: impl Into<String>, params: Option<Params>, id: RequestId) -> Self {
        // ---
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: Some(id),
        }
    }

    /// Build a notification.
    pub fn notification(method: impl Into<String>, params: Option<Params>) -> Self {
        // ---
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: None,
        }
    }

    /// True when no response is expected.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outbound payload handed to a transport: one request or an ordered batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// A single request object.
    Single(Request),
    /// A JSON array of request objects, in build order.
    Batch(Vec<Request>),
}

impl Payload {
    /// Number of request objects in the payload.
    pub fn len(&self) -> usize {
        match self {
            Payload::Single(_) => 1,
            Payload::Batch(requests) => requests.len(),
        }
    }

    /// True for an empty batch.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Request> for Payload {
    fn from(request: Request) -> Self {
        Payload::Single(request)
    }
}

impl From<Vec<Request>> for Payload {
    fn from(requests: Vec<Request>) -> Self {
        Payload::Batch(requests)
    }
}

// `result: null` must stay distinguishable from a missing `result`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// Moves `key` out of `obj` only if it decodes as `T`.
fn take_as<T: DeserializeOwned>(obj: &mut Map<String, Value>, key: &str) -> Option<T> {
    let typed = T::deserialize(obj.get(key)?).ok()?;
    obj.remove(key);
    Some(typed)
}

/// A single response object.
///
/// `error`, when present and not `null`, is authoritative regardless of
/// `result`. `result: Some(Value::Null)` means the server answered `null`;
/// `result: None` means the member was absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Protocol version as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,

    /// Result member.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,

    /// Error member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,

    /// Echoed request id; `None` when the server could not determine it.
    #[serde(default)]
    pub id: Option<RequestId>,

    /// Any other members, kept as sent. Also holds `error` or `id` when
    /// they did not fit the typed fields (see [`from_value`](Self::from_value)).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Response {
    /// Success response (mostly useful for tests and transport stubs).
    pub fn success(id: RequestId, result: Value) -> Self {
        // ---
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            result: Some(result),
            error: None,
            id: Some(id),
            extra: Map::new(),
        }
    }

    /// Failure response (mostly useful for tests and transport stubs).
    pub fn failure(id: Option<RequestId>, error: JsonRpcError) -> Self {
        // ---
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            result: None,
            error: Some(error),
            id,
            extra: Map::new(),
        }
    }

    /// Decode one response entry without rejecting it.
    ///
    /// Members that do not fit their typed field, such as an `error` that is
    /// not an error object or an `id` that is neither a number nor a string,
    /// stay in [`extra`](Self::extra) under their own names. A non-object
    /// entry decodes to an empty response.
    pub fn from_value(entry: Value) -> Self {
        // ---
        if let Ok(response) = Response::deserialize(&entry) {
            return response;
        }

        let mut extra = match entry {
            Value::Object(obj) => obj,
            _ => Map::new(),
        };

        let jsonrpc = take_as::<String>(&mut extra, "jsonrpc");
        let error = take_as::<JsonRpcError>(&mut extra, "error");
        let id = take_as::<RequestId>(&mut extra, "id");
        let result = extra.remove("result");

        Self {
            jsonrpc,
            result,
            error,
            id,
            extra,
        }
    }

    /// True when the response carries a non-null `error` member, typed or not.
    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.extra.get("error").is_some_and(|e| !e.is_null())
    }

    /// Split into the call outcome.
    ///
    /// # Errors
    ///
    /// - [`RpcError::Protocol`] if the response carries an error payload
    /// - [`RpcError::InvalidResponse`] if the `error` member is not an error object
    pub fn into_result(mut self) -> Result<Option<Value>> {
        // ---
        if let Some(err) = self.error {
            return Err(RpcError::Protocol(err));
        }

        match self.extra.remove("error") {
            None | Some(Value::Null) => Ok(self.result),
            Some(raw) => Err(RpcError::InvalidResponse(format!(
                "malformed error object: {raw}"
            ))),
        }
    }
}

/// Responses to a batch, in the order the server sent them.
///
/// Order is not guaranteed to match the request order; correlate by id.
/// The entries are also kept exactly as received, see [`entries`](Self::entries).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResponse {
    entries: Vec<Value>,
    responses: Vec<Response>,
}

impl BatchResponse {
    /// Wrap typed responses.
    pub fn new(responses: Vec<Response>) -> Self {
        // ---
        let entries = responses
            .iter()
            .map(|r| serde_json::to_value(r).unwrap_or_default())
            .collect();

        Self { entries, responses }
    }

    /// Wrap raw entries as received; no entry is rejected.
    pub fn from_entries(entries: Vec<Value>) -> Self {
        // ---
        let responses = entries.iter().cloned().map(Response::from_value).collect();
        Self { entries, responses }
    }

    /// Entries exactly as the server sent them, in arrival order.
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// Take ownership of the raw entries.
    pub fn into_entries(self) -> Vec<Value> {
        self.entries
    }

    /// Number of responses.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// True when the server sent nothing back.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Iterate responses in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, Response> {
        self.responses.iter()
    }

    /// First response echoing `id`.
    pub fn find(&self, id: &RequestId) -> Option<&Response> {
        self.responses.iter().find(|r| r.id.as_ref() == Some(id))
    }

    /// Take ownership of the responses.
    pub fn into_vec(self) -> Vec<Response> {
        self.responses
    }
}

impl IntoIterator for BatchResponse {
    type Item = Response;
    type IntoIter = std::vec::IntoIter<Response>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResponse {
    type Item = &'a Response;
    type IntoIter = std::slice::Iter<'a, Response>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.iter()
    }
}

impl std::ops::Index<usize> for BatchResponse {
    type Output = Response;

    fn index(&self, index: usize) -> &Self::Output {
        &self.responses[index]
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_wire_shape() {
        // ---
        let req = Request::call("add", Some(vec![json!(2), json!(2)].into()), 1u64.into());
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"jsonrpc": "2.0", "method": "add", "params": [2, 2], "id": 1})
        );
    }

    #[test]
    fn test_notification_has_no_id_key() {
        // ---
        let req = Request::notification("ping", None);
        let value = serde_json::to_value(&req).unwrap();

        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("params"));
        assert!(req.is_notification());
    }

    #[test]
    fn test_params_from_serialize() {
        // ---
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let params = Params::from_serialize(Point { x: 1, y: 2 }).unwrap();
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"x": 1, "y": 2})
        );

        let params = Params::from_serialize((1, "two")).unwrap();
        assert_eq!(params, Params::Array(vec![json!(1), json!("two")]));

        let err = Params::from_serialize(42).unwrap_err();
        assert!(matches!(err, RpcError::InvalidParams(_)));
    }

    #[test]
    fn test_into_params_shapes() {
        // ---
        assert_eq!(().into_params().unwrap(), None);
        assert_eq!(Value::Null.into_params().unwrap(), None);
        assert_eq!(
            json!([1]).into_params().unwrap(),
            Some(Params::Array(vec![json!(1)]))
        );
        assert!(matches!(
            json!({"a": 1}).into_params().unwrap(),
            Some(Params::Object(_))
        ));
        assert!(matches!(
            json!("scalar").into_params(),
            Err(RpcError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_null_result_is_present() {
        // ---
        let resp: Response =
            serde_json::from_value(json!({"jsonrpc": "2.0", "result": null, "id": 1})).unwrap();
        assert_eq!(resp.result, Some(Value::Null));

        let resp: Response = serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1})).unwrap();
        assert_eq!(resp.result, None);
    }

    #[test]
    fn test_error_wins_over_result() {
        // ---
        let resp: Response = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "result": 1,
            "error": {"code": -32000, "message": "boom"},
            "id": 1
        }))
        .unwrap();

        let err = resp.into_result().unwrap_err();
        assert_eq!(err.as_protocol().map(|e| e.code), Some(-32000));
    }

    #[test]
    fn test_null_error_is_not_an_error() {
        // ---
        let resp: Response =
            serde_json::from_value(json!({"result": 5, "error": null, "id": 1})).unwrap();
        assert!(!resp.is_error());
        assert_eq!(resp.into_result().unwrap(), Some(json!(5)));
    }

    #[test]
    fn test_response_keeps_unknown_members() {
        // ---
        let entry = json!({
            "jsonrpc": "2.0",
            "error": {"code": -32000, "message": "m", "extra": 1},
            "id": 2,
            "meta": {"t": 1}
        });

        let resp = Response::from_value(entry.clone());
        assert_eq!(resp.extra.get("meta"), Some(&json!({"t": 1})));
        assert_eq!(serde_json::to_value(&resp).unwrap(), entry);
    }

    #[test]
    fn test_untyped_error_member_is_kept() {
        // ---
        let entry = json!({"error": "exploded", "id": {"nested": true}});
        let resp = Response::from_value(entry.clone());

        assert_eq!(resp.error, None);
        assert_eq!(resp.id, None);
        assert_eq!(resp.extra.get("id"), Some(&json!({"nested": true})));
        assert!(resp.is_error());

        let err = resp.into_result().unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }

    #[test]
    fn test_non_object_entry() {
        // ---
        let batch = BatchResponse::from_entries(vec![json!(7), json!({"result": 1, "id": 1})]);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.entries()[0], json!(7));
        assert!(!batch[0].is_error());
        assert_eq!(batch[0].result, None);
        assert_eq!(batch[1].result, Some(json!(1)));
    }

    #[test]
    fn test_batch_find_by_id() {
        // ---
        let batch = BatchResponse::new(vec![
            Response::success(2u64.into(), json!("b")),
            Response::success(1u64.into(), json!("a")),
        ]);

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.find(&RequestId::from(1u64)).and_then(|r| r.result.clone()),
            Some(json!("a"))
        );
        assert!(batch.find(&RequestId::from(3u64)).is_none());
        assert_eq!(batch[0].id, Some(RequestId::from(2u64)));
    }

    #[test]
    fn test_batch_payload_is_array() {
        // ---
        let payload = Payload::from(vec![
            Request::call("a", None, 1u64.into()),
            Request::notification("b", None),
        ]);
        assert_eq!(payload.len(), 2);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!([
                {"jsonrpc": "2.0", "method": "a", "id": 1},
                {"jsonrpc": "2.0", "method": "b"}
            ])
        );
    }
}
