//! Error types for the gateway.
//!
//! # Design
//! Expected failure modes (a non-2xx status, a success body that does not
//! parse) are not errors here; they are folded into the result envelope so
//! callers always receive one uniform shape and branch on its `ok` flag.
//! The variants below cover only the unexpected cases: a payload that cannot
//! be serialized and a round trip that never produced a response.

use thiserror::Error;

/// The transport could not complete the round trip (DNS, connect, TLS,
/// interrupted read). Carries the transport's own description.
#[derive(Debug, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

/// Errors surfaced by `Gateway::build` and `Gateway::send`.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request payload could not be serialized to JSON.
    #[error("request serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
