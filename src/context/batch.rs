// src/context/batch.rs

use crate::{IdGenerator, IntoParams, Request, RequestId, Result, RpcError};

/// Accumulates the requests of one batch in build order.
///
/// Handed to the closure passed to [`RpcContext::batch`](crate::RpcContext::batch).
/// Methods return `&mut Self` so several entries can be chained in one
/// expression.
///
/// Params that cannot be used (a JSON scalar, say) do not interrupt the
/// chain; the first such failure is kept and reported by
/// [`finish`](Self::finish), and nothing is sent.
///
/// ```
/// # use jsonrpc_context::{BatchBuilder, CounterIdGenerator};
/// # use serde_json::json;
/// # let ids = CounterIdGenerator::new();
/// # let mut b = BatchBuilder::new(&ids);
/// b.call("add", json!([2, 2]))
///     .notify("ping", ())
///     .call("mul", json!([3, 3]));
/// ```
pub struct BatchBuilder<'a> {
    // ---
    ids: &'a dyn IdGenerator,
    requests: Vec<Request>,
    error: Option<RpcError>,
}

impl<'a> BatchBuilder<'a> {
    /// Start an empty batch drawing ids from `ids`.
    pub fn new(ids: &'a dyn IdGenerator) -> Self {
        Self {
            ids,
            requests: Vec::new(),
            error: None,
        }
    }

    /// Append a call.
    ///
    /// The id comes from the generator, invoked without a call site.
    pub fn call(&mut self, method: impl Into<String>, params: impl IntoParams) -> &mut Self {
        // ---
        let params = match params.into_params() {
            Ok(params) => params,
            Err(err) => return self.fail(err),
        };

        let id = self.ids.next_id(None);
        self.requests.push(Request::call(method, params, id));
        self
    }

    /// Append a notification (no id, no response expected).
    pub fn notify(&mut self, method: impl Into<String>, params: impl IntoParams) -> &mut Self {
        // ---
        let params = match params.into_params() {
            Ok(params) => params,
            Err(err) => return self.fail(err),
        };

        self.requests.push(Request::notification(method, params));
        self
    }

    fn fail(&mut self, err: RpcError) -> &mut Self {
        if self.error.is_none() {
            self.error = Some(err);
        }
        self
    }

    /// Ids of the calls appended so far, in build order.
    pub fn ids(&self) -> Vec<RequestId> {
        self.requests.iter().filter_map(|r| r.id.clone()).collect()
    }

    /// Number of entries appended so far.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// True until the first entry is appended.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Consume the builder, yielding the requests in build order.
    ///
    /// # Errors
    ///
    /// Returns the first params conversion failure seen while building.
    pub fn finish(self) -> Result<Vec<Request>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.requests),
        }
    }
}
