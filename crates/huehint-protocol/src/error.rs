//! Error types for the protocol layer.
//!
//! Each Huehint crate defines its own error enum. A `ProtocolError` always
//! means the bytes on the wire were the problem, never the game rules.

/// Errors that can occur while encoding, decoding, or validating wire data.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (malformed JSON, missing fields, unknown
    /// request type, and so on).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but violates a protocol rule, for example a
    /// client sending a `Response` payload to the server.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
