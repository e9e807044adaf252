#![doc = r#"
Contains types for MIDI file chunks

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then the chunk data. The Standard MIDI File
(SMF) specification defines two chunk types, though files may contain additional proprietary
chunks.

Anything that does not fall into the standard chunk types is an unknown chunk, which must
not stop the rest of the file from being read.

## [`HeaderChunk`]

The header chunk (identified by "MThd") must be the first chunk in a MIDI file. Its payload
is always 6 bytes and decodes into a [`HeaderMessage`](crate::file::HeaderMessage).

## [`TrackChunk`]

Track chunks (identified by "MTrk") contain a sequence of delta-timed events that decode
into [`TrackEvents`](crate::message::TrackEvents).

## [`UnknownChunk`]

Any chunk with a type identifier other than "MThd" or "MTrk". Its tag and payload are
preserved, and reading it yields the payload untouched.

# Example Structure

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
[Track Chunk 2: "MTrk"]
...
[Track Chunk N: "MTrk"]
[Optional Unknown Chunks]
```

Chunk selection is a pure function of the tag, see [`Chunk::from_parts`].
"#]

mod unknown_chunk;
pub use unknown_chunk::*;

mod header;
pub use header::*;

mod track;
pub use track::*;

use crate::{
    ChunkError,
    file::HeaderMessage,
    message::{Message, OpaqueMessage, TrackEvents},
};
use alloc::vec::Vec;
use core::fmt;

/// The four byte type identifier of a chunk.
///
/// Compared byte for byte, so `"mthd"` is not a header.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkTag([u8; 4]);

impl ChunkTag {
    /// `MThd`
    pub const HEADER: Self = Self(*b"MThd");
    /// `MTrk`
    pub const TRACK: Self = Self(*b"MTrk");

    /// Create a tag from its bytes
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
    /// The tag bytes
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for ChunkTag {
    fn from(value: [u8; 4]) -> Self {
        Self(value)
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkTag(\"{self}\")")
    }
}

#[doc = r#"
The eight bytes that frame a chunk: tag then big-endian length.

# Example
```rust
# use midix_chunks::prelude::*;
let framing = ChunkHeader::new(ChunkTag::HEADER, 6);
assert_eq!(framing.to_bytes(), b"MThd\x00\x00\x00\x06".to_vec());
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkHeader {
    tag: ChunkTag,
    length: u32,
}

impl ChunkHeader {
    /// Length of the framing
    pub const LEN: usize = 8;

    /// Frame a payload of `length` bytes
    pub const fn new(tag: ChunkTag, length: u32) -> Self {
        Self { tag, length }
    }
    /// The tag
    pub const fn tag(&self) -> ChunkTag {
        self.tag
    }
    /// The payload length
    pub const fn length(&self) -> u32 {
        self.length
    }
    /// Tag followed by big-endian length
    pub const fn to_array(&self) -> [u8; Self::LEN] {
        let [t0, t1, t2, t3] = self.tag.0;
        let [l0, l1, l2, l3] = self.length.to_be_bytes();
        [t0, t1, t2, t3, l0, l1, l2, l3]
    }
}

impl Message for ChunkHeader {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_array().to_vec()
    }
}

/// The framing length for a payload of `len` bytes
pub(crate) fn payload_length(tag: ChunkTag, len: usize) -> Result<u32, ChunkError> {
    u32::try_from(len).map_err(|_| ChunkError::too_long(tag, len))
}

/// Shared behaviour of every chunk: a tag, a payload, and a way to decode it.
pub trait ChunkReader {
    /// What the payload decodes into
    type Message: Message;

    /// The chunk's tag
    fn tag(&self) -> ChunkTag;

    /// The raw payload, without framing
    fn payload(&self) -> &[u8];

    /// Decode the payload
    fn read_message(&self) -> Result<Self::Message, ChunkError>;

    /// The payload length as written in the framing
    fn length(&self) -> u32;

    /// The framing for this chunk
    fn chunk_header(&self) -> ChunkHeader {
        ChunkHeader::new(self.tag(), self.length())
    }
}

/// A chunk read off a stream, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Chunk {
    /// `MThd`
    Header(HeaderChunk),
    /// `MTrk`
    Track(TrackChunk),
    /// Anything else
    Unknown(UnknownChunk),
}

impl Chunk {
    /// Build the chunk matching `tag`.
    ///
    /// Fails if a known chunk type rejects its payload, or if the payload
    /// is too long to frame.
    pub fn from_parts(tag: ChunkTag, payload: Vec<u8>) -> Result<Self, ChunkError> {
        match tag {
            ChunkTag::HEADER => HeaderChunk::new(payload).map(Self::Header),
            ChunkTag::TRACK => TrackChunk::new(payload).map(Self::Track),
            tag => UnknownChunk::new(tag, payload).map(Self::Unknown),
        }
    }

    /// The chunk's tag
    pub fn tag(&self) -> ChunkTag {
        match self {
            Self::Header(c) => c.tag(),
            Self::Track(c) => c.tag(),
            Self::Unknown(c) => c.tag(),
        }
    }

    /// The payload
    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Header(c) => c.payload(),
            Self::Track(c) => c.payload(),
            Self::Unknown(c) => c.payload(),
        }
    }

    /// The payload length
    pub fn length(&self) -> u32 {
        self.chunk_header().length()
    }

    /// The framing
    pub fn chunk_header(&self) -> ChunkHeader {
        match self {
            Self::Header(c) => c.chunk_header(),
            Self::Track(c) => c.chunk_header(),
            Self::Unknown(c) => c.chunk_header(),
        }
    }

    /// Decode the payload
    pub fn read_message(&self) -> Result<ChunkMessage, ChunkError> {
        Ok(match self {
            Self::Header(c) => ChunkMessage::Header(c.read_message()?),
            Self::Track(c) => ChunkMessage::Track(c.read_message()?),
            Self::Unknown(c) => ChunkMessage::Unknown(c.read_message()?),
        })
    }

    /// The framing and payload exactly as read
    pub fn to_bytes(&self) -> Vec<u8> {
        let payload = self.payload();
        let mut bytes = Vec::with_capacity(ChunkHeader::LEN + payload.len());
        bytes.extend_from_slice(&self.chunk_header().to_array());
        bytes.extend_from_slice(payload);
        bytes
    }

    /// True for `MThd`
    pub const fn is_header(&self) -> bool {
        matches!(self, Self::Header(_))
    }

    /// True for `MTrk`
    pub const fn is_track(&self) -> bool {
        matches!(self, Self::Track(_))
    }

    /// True for anything else
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

/// The decoded content of a [`Chunk`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChunkMessage {
    /// The file header
    Header(HeaderMessage),
    /// The events of a track
    Track(TrackEvents),
    /// An uninterpreted payload
    Unknown(OpaqueMessage),
}

impl Message for ChunkMessage {
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Header(m) => m.to_bytes(),
            Self::Track(m) => m.to_bytes(),
            Self::Unknown(m) => m.to_bytes(),
        }
    }
}

#[test]
fn dispatch_by_exact_tag() {
    assert!(Chunk::from_parts(ChunkTag::HEADER, alloc::vec![0, 0, 0, 1, 0, 96]).unwrap().is_header());
    assert!(Chunk::from_parts(ChunkTag::TRACK, alloc::vec![]).unwrap().is_track());
    assert!(Chunk::from_parts(ChunkTag::new(*b"mthd"), alloc::vec![1]).unwrap().is_unknown());
    assert!(Chunk::from_parts(ChunkTag::new(*b"MTr "), alloc::vec![]).unwrap().is_unknown());

    let err = Chunk::from_parts(ChunkTag::HEADER, alloc::vec![0; 7]).unwrap_err();
    assert_eq!(err.tag(), ChunkTag::HEADER);
    assert!(err.is_header());
}

#[test]
fn chunk_to_bytes_keeps_framing() {
    use pretty_assertions::assert_eq;
    let chunk = Chunk::from_parts(ChunkTag::new(*b"XYZZ"), alloc::vec![1, 2, 3]).unwrap();
    assert_eq!(chunk.length(), 3);
    assert_eq!(chunk.to_bytes(), b"XYZZ\x00\x00\x00\x03\x01\x02\x03".to_vec());
}

#[test]
fn tag_display_escapes_binary() {
    use alloc::string::ToString;
    assert_eq!(ChunkTag::TRACK.to_string(), "MTrk");
    assert_eq!(ChunkTag::new([b'A', 0, b'B', 0xFF]).to_string(), "A\\x00B\\xff");
}

#[test]
fn framing_length_fits_u32() {
    use crate::ChunkErrorKind;
    let tag = ChunkTag::new(*b"XYZZ");
    assert_eq!(payload_length(tag, 3), Ok(3));
    assert_eq!(payload_length(tag, u32::MAX as usize), Ok(u32::MAX));
    #[cfg(target_pointer_width = "64")]
    {
        let err = payload_length(tag, u32::MAX as usize + 1).unwrap_err();
        assert_eq!(err.tag(), tag);
        assert_eq!(err.kind(), &ChunkErrorKind::TooLong(u32::MAX as usize + 1));
    }
}
