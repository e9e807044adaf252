use super::{ChunkReader, ChunkTag};
use crate::{ChunkError, HeaderError, file::HeaderMessage, message::Message};
use alloc::vec::Vec;

/// The `MThd` chunk. Its payload is always six bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderChunk {
    payload: Vec<u8>,
}

impl HeaderChunk {
    /// Wrap a header payload, rejecting any length but six.
    pub fn new(payload: Vec<u8>) -> Result<Self, ChunkError> {
        if payload.len() != HeaderMessage::LEN {
            return Err(ChunkError::header(HeaderError::Length(payload.len())));
        }
        Ok(Self { payload })
    }

    /// The chunk holding `header`
    pub fn from_message(header: &HeaderMessage) -> Self {
        Self {
            payload: header.to_bytes(),
        }
    }
}

impl ChunkReader for HeaderChunk {
    type Message = HeaderMessage;

    fn tag(&self) -> ChunkTag {
        ChunkTag::HEADER
    }

    fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn length(&self) -> u32 {
        HeaderMessage::LEN as u32
    }

    fn read_message(&self) -> Result<HeaderMessage, ChunkError> {
        // parse checks the length again along with the format type
        HeaderMessage::parse(&self.payload).map_err(ChunkError::header)
    }
}

#[test]
fn header_chunk_lengths() {
    for len in [0, 5, 7, 12] {
        let err = HeaderChunk::new(alloc::vec![0; len]).unwrap_err();
        assert_eq!(err, ChunkError::header(HeaderError::Length(len)));
    }
    let chunk = HeaderChunk::new(alloc::vec![0, 0, 0, 1, 0, 96]).unwrap();
    let header = chunk.read_message().unwrap();
    assert_eq!(header.division(), 96);
    assert_eq!(chunk.chunk_header().to_array(), *b"MThd\x00\x00\x00\x06");
}

#[test]
fn header_chunk_rejects_format() {
    let chunk = HeaderChunk::new(alloc::vec![0, 9, 0, 1, 0, 96]).unwrap();
    assert_eq!(
        chunk.read_message(),
        Err(ChunkError::header(HeaderError::FormatType(9)))
    );
}
