use super::{ChunkReader, ChunkTag};
use crate::{ChunkError, message::OpaqueMessage};
use alloc::vec::Vec;

/// A chunk of a type this crate does not interpret.
///
/// Reading it always succeeds and yields the payload unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnknownChunk {
    tag: ChunkTag,
    length: u32,
    payload: Vec<u8>,
}

impl UnknownChunk {
    /// Keep a chunk as-is.
    ///
    /// Fails if the payload is too long for the chunk framing.
    pub fn new(tag: ChunkTag, payload: Vec<u8>) -> Result<Self, ChunkError> {
        let length = super::payload_length(tag, payload.len())?;
        Ok(Self {
            tag,
            length,
            payload,
        })
    }

    /// Take the payload
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl ChunkReader for UnknownChunk {
    type Message = OpaqueMessage;

    fn tag(&self) -> ChunkTag {
        self.tag
    }

    fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn length(&self) -> u32 {
        self.length
    }

    fn read_message(&self) -> Result<OpaqueMessage, ChunkError> {
        Ok(OpaqueMessage::new(self.payload.clone()))
    }
}
