//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding frames.
///
/// Decode failures are expected in normal operation (the authority may
/// ship kinds this client doesn't know); callers log and drop the
/// offending frame rather than propagate.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of an outbound message failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// An inbound frame was malformed or of an unknown kind.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
