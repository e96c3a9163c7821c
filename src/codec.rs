//! Encoding of message logs and state snapshots.

use crate::error::{ReplayError, Result};
use crate::types::{PayloadEncoding, Record};

/// Decode a message log. The payload must be an array of objects.
pub fn decode_messages(bytes: &[u8], encoding: PayloadEncoding) -> Result<Vec<Record>> {
    match encoding {
        PayloadEncoding::Json => serde_json::from_slice(bytes)
            .map_err(|e| ReplayError::Deserialization(e.to_string())),
        PayloadEncoding::MessagePack => Ok(rmp_serde::from_slice(bytes)?),
    }
}

/// Encode a state snapshot.
pub fn encode_state(records: &[Record], encoding: PayloadEncoding) -> Result<Vec<u8>> {
    match encoding {
        PayloadEncoding::Json => Ok(serde_json::to_vec(records)?),
        PayloadEncoding::MessagePack => Ok(rmp_serde::to_vec(records)?),
    }
}
