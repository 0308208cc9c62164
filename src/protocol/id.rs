//! Request identifiers and the generators that produce them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Number;
use uuid::Uuid;

use super::Params;

/// Identifier carried by a call and echoed back in its response.
///
/// Any JSON number or string is accepted on the wire. The value is opaque;
/// the only operation the crate performs on it is equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric identifier (the default generator produces these).
    Number(Number),
    /// String identifier.
    String(String),
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        RequestId::Number(value.into())
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        RequestId::Number(value.into())
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        RequestId::String(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId::String(value.to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::String(s) => f.write_str(s),
        }
    }
}

/// The call an identifier is being generated for.
///
/// Supplied on the single-call path. Batch builders invoke the generator
/// without one, so generators must accept `None`.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    /// Method name of the call.
    pub method: &'a str,
    /// Params of the call, if any.
    pub params: Option<&'a Params>,
}

/// Source of request identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce the identifier for the next call.
    fn next_id(&self, site: Option<CallSite<'_>>) -> RequestId;
}

/// Shared identifier generator pointer.
pub type IdGeneratorPtr = Arc<dyn IdGenerator>;

/// Monotonic counter generator.
///
/// Each instance owns its own counter; the first id handed out is `1`.
/// The increment is a single atomic operation, so concurrent callers always
/// receive distinct values.
#[derive(Debug, Default)]
pub struct CounterIdGenerator {
    // ---
    last: AtomicU64,
}

impl CounterIdGenerator {
    /// Create a counter that has not handed out any id yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last id handed out, `0` before the first call.
    pub fn current(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

impl IdGenerator for CounterIdGenerator {
    fn next_id(&self, _site: Option<CallSite<'_>>) -> RequestId {
        // ---
        let id = self.last.fetch_add(1, Ordering::Relaxed) + 1;
        RequestId::from(id)
    }
}

/// Random UUID v4 generator producing string identifiers.
///
/// Useful when several contexts talk to the same endpoint and ids must not
/// collide across them.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self, _site: Option<CallSite<'_>>) -> RequestId {
        RequestId::String(Uuid::new_v4().to_string())
    }
}

struct FnIdGenerator<F>(F);

impl<F> IdGenerator for FnIdGenerator<F>
where
    F: Fn(Option<CallSite<'_>>) -> RequestId + Send + Sync,
{
    fn next_id(&self, site: Option<CallSite<'_>>) -> RequestId {
        (self.0)(site)
    }
}

/// Wrap a closure as an [`IdGenerator`].
///
/// ```
/// use jsonrpc_context::{id_generator_fn, RequestId};
///
/// let ids = id_generator_fn(|site| match site {
///     Some(site) => RequestId::from(format!("{}-1", site.method)),
///     None => RequestId::from("batch-1"),
/// });
/// ```
pub fn id_generator_fn<F>(f: F) -> IdGeneratorPtr
where
    F: Fn(Option<CallSite<'_>>) -> RequestId + Send + Sync + 'static,
{
    Arc::new(FnIdGenerator(f))
}
