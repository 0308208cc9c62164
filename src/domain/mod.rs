//! Domain layer public interface.
//!
//! Abstractions that are independent of any concrete transport. Consumers
//! import through this module rather than the individual files.

mod transport;

pub use transport::{
    //
    Transport,
    TransportContext,
    TransportPtr,
};
