//! JSON-RPC 2.0 protocol layer.
//!
//! Wire envelopes, request identifiers, and the interpretation of raw
//! response text. Nothing in here knows about transports or options.
mod id;
mod interpret;
mod message;

pub use id::{
    //
    id_generator_fn,
    CallSite,
    CounterIdGenerator,
    IdGenerator,
    IdGeneratorPtr,
    RequestId,
    UuidIdGenerator,
};
pub use message::{
    //
    BatchResponse,
    IntoParams,
    Params,
    Payload,
    Request,
    Response,
    JSONRPC_VERSION,
};

pub(crate) use interpret::{interpret_batch, interpret_call, parse_body};
