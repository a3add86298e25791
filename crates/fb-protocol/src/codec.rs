//! JSON encoding of [`Message`]s.

use crate::message::Message;
use crate::ProtocolResult;

/// Serialize a message to its JSON bytes.
pub fn encode(message: &Message) -> ProtocolResult<Vec<u8>> {
    Ok(serde_json::to_vec(message)?)
}

/// Parse JSON bytes into a message.  Unknown tags and missing required
/// fields are [`ProtocolError::Malformed`](crate::ProtocolError::Malformed).
pub fn decode(bytes: &[u8]) -> ProtocolResult<Message> {
    Ok(serde_json::from_slice(bytes)?)
}
