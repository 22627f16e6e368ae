//! # Wiretype Protocol
//!
//! Typed messages of a debug adapter protocol subset, generated at build time
//! from `schemas/debug_protocol.json`.
//!
//! Every message implements [`JsonCodec`]; requests with a matching response
//! are routed by [`dispatch_request`] to a [`RequestHandlers`] implementation.
//!
//! ```ignore
//! use wiretype_protocol::*;
//!
//! let request = serde_json::json!({
//!     "seq": 1,
//!     "type": "request",
//!     "command": "threads",
//! });
//! let response = dispatch_request(&MyAdapter, &request)?;
//! ```

#[allow(clippy::all, missing_docs)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/debug_protocol.rs"));
}

pub use generated::*;

/// Recursive and untyped shapes from `schemas/structures.json`.
#[allow(clippy::all, missing_docs)]
pub mod structures {
    include!(concat!(env!("OUT_DIR"), "/structures.rs"));
}
pub use wiretype_core::{DecodeError, DecodeErrorKind, JsonCodec, Value};
