//! Response interpretation.
//!
//! Turns the raw text returned by a transport into call outcomes. The
//! request that produced the text is never touched here.

use serde_json::Value;

use crate::{log_debug, log_warn, JsonRpcError, Result, RpcError};

use super::{BatchResponse, RequestId};

/// Parse a raw response body.
///
/// Surrounding whitespace is ignored. A blank body yields `Ok(None)`, which
/// is distinct from a body consisting of the literal `null`.
///
/// # Errors
///
/// Returns [`RpcError::Parse`] if the body is not valid JSON.
pub(crate) fn parse_body(text: &str) -> Result<Option<Value>> {
    // ---
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(text).map(Some).map_err(RpcError::Parse)
}

/// Extract the outcome of a single call from its parsed response.
///
/// - no body: `Ok(None)`
/// - non-null `error` member: `Err(RpcError::Protocol)` with the payload as sent
/// - otherwise: the `result` member, `None` if absent
///
/// The echoed id is compared only for diagnostics; a mismatch is logged and
/// the response is still returned.
pub(crate) fn interpret_call(body: Option<Value>, expected: &RequestId) -> Result<Option<Value>> {
    // ---
    let mut obj = match body {
        None => return Ok(None),
        Some(Value::Object(obj)) => obj,
        Some(_other) => {
            log_warn!("call {expected}: response is not an object, treating as no result: {_other}");
            return Ok(None);
        }
    };

    match obj.remove("error") {
        None | Some(Value::Null) => {}
        Some(err) => {
            let err: JsonRpcError = serde_json::from_value(err).map_err(|e| {
                RpcError::InvalidResponse(format!("malformed error object: {e}"))
            })?;
            log_debug!("call {expected}: server error {}: {}", err.code, err.message);
            return Err(RpcError::Protocol(err));
        }
    }

    if let Some(echoed) = obj.get("id") {
        let matches = serde_json::from_value::<RequestId>(echoed.clone())
            .map(|id| id == *expected)
            .unwrap_or(false);
        if !matches {
            log_warn!("call {expected}: response echoed a different id: {echoed}");
        }
    }

    Ok(obj.remove("result"))
}

/// Collect the responses to a batch.
///
/// A blank body or `null` yields an empty batch. An array is returned entry by
/// entry, in arrival order, without inspecting per-entry errors; an entry that
/// does not fit the response shape is kept rather than rejected. A lone object
/// (servers answer an unusable batch with one error response) becomes a
/// one-element batch.
///
/// # Errors
///
/// Returns [`RpcError::InvalidResponse`] if the body is some other JSON value.
pub(crate) fn interpret_batch(body: Option<Value>) -> Result<BatchResponse> {
    // ---
    let entries = match body {
        None | Some(Value::Null) => return Ok(BatchResponse::default()),
        Some(Value::Array(entries)) => entries,
        Some(obj @ Value::Object(_)) => {
            log_warn!("batch answered with a single response object");
            vec![obj]
        }
        Some(other) => {
            return Err(RpcError::InvalidResponse(format!(
                "expected array of responses, got {other}"
            )));
        }
    };

    log_debug!("batch returned {} response(s)", entries.len());
    Ok(BatchResponse::from_entries(entries))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    fn id(n: u64) -> RequestId {
        RequestId::from(n)
    }

    #[test]
    fn test_blank_body_is_no_answer() {
        // ---
        assert_eq!(parse_body("").unwrap(), None);
        assert_eq!(parse_body("  \r\n\t ").unwrap(), None);
        assert_eq!(parse_body("null").unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        // ---
        let err = parse_body("{\"result\": ").unwrap_err();
        assert!(matches!(err, RpcError::Parse(_)));
    }

    #[test]
    fn test_call_result_values() {
        // ---
        for value in [json!(null), json!(0), json!(false), json!([]), json!("x")] {
            let body = json!({"jsonrpc": "2.0", "result": value.clone(), "id": 1});
            assert_eq!(interpret_call(Some(body), &id(1)).unwrap(), Some(value));
        }
    }

    #[test]
    fn test_call_missing_result() {
        // ---
        let body = json!({"jsonrpc": "2.0", "id": 1});
        assert_eq!(interpret_call(Some(body), &id(1)).unwrap(), None);
    }

    #[test]
    fn test_call_error_payload() {
        // ---
        let body = json!({
            "jsonrpc": "2.0",
            "error": {"code": -32601, "message": "Method not found", "data": "nope"},
            "id": 1
        });

        let err = interpret_call(Some(body), &id(1)).unwrap_err();
        let payload = err.as_protocol().unwrap();
        assert_eq!(payload.code, -32601);
        assert_eq!(payload.message, "Method not found");
        assert_eq!(payload.data, Some(json!("nope")));
    }

    #[test]
    fn test_call_malformed_error_payload() {
        // ---
        let body = json!({"error": "bad things", "id": 1});
        let err = interpret_call(Some(body), &id(1)).unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }

    #[test]
    fn test_call_error_without_message() {
        // ---
        let body = json!({"error": {"code": -32000}, "id": 1});
        let err = interpret_call(Some(body), &id(1)).unwrap_err();

        let payload = err.as_protocol().unwrap();
        assert_eq!(payload.code, -32000);
        assert_eq!(payload.message, "");
    }

    #[test]
    fn test_call_id_mismatch_still_returns_result() {
        // ---
        let body = json!({"result": 3, "id": 99});
        assert_eq!(interpret_call(Some(body), &id(1)).unwrap(), Some(json!(3)));
    }

    #[test]
    fn test_call_non_object_body() {
        // ---
        assert_eq!(interpret_call(Some(json!([1, 2])), &id(1)).unwrap(), None);
    }

    #[test]
    fn test_batch_empty_shapes() {
        // ---
        assert!(interpret_batch(None).unwrap().is_empty());
        assert!(interpret_batch(Some(Value::Null)).unwrap().is_empty());
        assert!(interpret_batch(Some(json!([]))).unwrap().is_empty());
    }

    #[test]
    fn test_batch_keeps_arrival_order_and_errors() {
        // ---
        let body = json!([
            {"jsonrpc": "2.0", "result": 9, "id": 2},
            {"jsonrpc": "2.0", "error": {"code": -32602, "message": "Invalid params"}, "id": 1}
        ]);

        let batch = interpret_batch(Some(body)).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id, Some(id(2)));
        assert_eq!(batch[0].result, Some(json!(9)));
        assert!(batch[1].is_error());
    }

    #[test]
    fn test_batch_single_object() {
        // ---
        let body = json!({
            "jsonrpc": "2.0",
            "error": {"code": -32600, "message": "Invalid Request"},
            "id": null
        });

        let batch = interpret_batch(Some(body)).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, None);
        assert_eq!(
            batch[0].error.as_ref().map(|e| e.code),
            Some(JsonRpcError::INVALID_REQUEST)
        );
    }

    #[test]
    fn test_batch_malformed_entry_kept() {
        // ---
        let body = json!([
            {"jsonrpc": "2.0", "result": 4, "id": 1, "meta": {"t": 1}},
            {"jsonrpc": "2.0", "error": "bad things", "id": 2},
            {"jsonrpc": "2.0", "result": 6, "id": [3]}
        ]);

        let batch = interpret_batch(Some(body.clone())).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.entries(), body.as_array().unwrap().as_slice());

        assert_eq!(batch[0].result, Some(json!(4)));
        assert_eq!(batch[0].extra.get("meta"), Some(&json!({"t": 1})));

        assert_eq!(batch[1].id, Some(id(2)));
        assert!(batch[1].is_error());

        assert_eq!(batch[2].result, Some(json!(6)));
        assert_eq!(batch[2].id, None);
    }

    #[test]
    fn test_batch_scalar_body() {
        // ---
        let err = interpret_batch(Some(json!(42))).unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }
}
