//! Frame codec: converts [`Message`] values to and from text frames.
//!
//! The transport deals in opaque text frames; only this layer knows the
//! JSON shapes. The trait exists so tests (and a future binary format)
//! can swap the implementation without touching the client.

use crate::{Message, ProtocolError};

/// Encodes and decodes protocol messages as text frames.
pub trait FrameCodec: Send + Sync + 'static {
    /// Serializes a message into a single text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails. For
    /// well-formed [`Message`] values this does not happen in practice.
    fn encode(&self, msg: &Message) -> Result<String, ProtocolError>;

    /// Parses a text frame into a message.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] for malformed frames and
    /// unknown kinds. Callers are expected to log and drop the frame.
    fn decode(&self, frame: &str) -> Result<Message, ProtocolError>;
}

/// The default [`FrameCodec`]: newline-free JSON text frames.
///
/// Matches the authority's wire format; see [`Message`] for the shapes.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl FrameCodec for JsonCodec {
    fn encode(&self, msg: &Message) -> Result<String, ProtocolError> {
        serde_json::to_string(msg).map_err(ProtocolError::Encode)
    }

    fn decode(&self, frame: &str) -> Result<Message, ProtocolError> {
        serde_json::from_str(frame).map_err(ProtocolError::Decode)
    }
}
