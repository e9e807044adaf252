use crate::{file::builder::chunk::ChunkTag, vlq::VlqError};
use thiserror::Error;

#[doc = r#"
Any error that can occur while turning bytes into typed chunks and messages.

Framing problems on a byte stream are reported separately by the
[`ReaderError`](crate::reader::ReaderError), which wraps this type.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A chunk payload broke its layout contract
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// The chunks could not be assembled into a file
    #[error("File: {0}")]
    File(#[from] FileError),
    /// An SMPTE value was out of range, such as the header's division
    #[error("Smpte: {0}")]
    Smpte(#[from] SmpteError),
}

#[doc = r#"
A malformed chunk.

Carries the tag of the offending chunk so diagnostics can name it. The error is
scoped to the chunk: the byte stream stays aligned on the next chunk boundary.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Malformed {tag} chunk: {kind}")]
pub struct ChunkError {
    tag: ChunkTag,
    kind: ChunkErrorKind,
}

impl ChunkError {
    /// Create a chunk error for some tag
    pub const fn new(tag: ChunkTag, kind: ChunkErrorKind) -> Self {
        Self { tag, kind }
    }

    /// An error in the `MThd` chunk
    pub const fn header(error: HeaderError) -> Self {
        Self::new(ChunkTag::HEADER, ChunkErrorKind::Header(error))
    }

    /// An error decoding the event starting at `offset` of an `MTrk` chunk
    pub const fn track(offset: usize, error: TrackError) -> Self {
        Self::new(ChunkTag::TRACK, ChunkErrorKind::Track { offset, error })
    }

    /// A payload too large for the 32 bit length field
    pub const fn too_long(tag: ChunkTag, len: usize) -> Self {
        Self::new(tag, ChunkErrorKind::TooLong(len))
    }

    /// The tag of the chunk that failed
    pub const fn tag(&self) -> ChunkTag {
        self.tag
    }

    /// What went wrong
    pub const fn kind(&self) -> &ChunkErrorKind {
        &self.kind
    }

    /// True if the header chunk was malformed
    pub const fn is_header(&self) -> bool {
        matches!(self.kind, ChunkErrorKind::Header(_))
    }
}

/// The reason a chunk was rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkErrorKind {
    /// Header payload violation
    #[error("header: {0}")]
    Header(#[from] HeaderError),
    /// Track event decoding failed
    #[error("track event at offset {offset}: {error}")]
    Track {
        /// Offset of the failing event within the chunk payload
        offset: usize,
        /// The failure
        error: TrackError,
    },
    /// The payload does not fit a `u32` length
    #[error("payload of {0} bytes does not fit a 32 bit length")]
    TooLong(usize),
}

/// Violations of the fixed 6 byte header layout
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    /// The payload was not exactly 6 bytes
    #[error("expected a 6 byte payload, found {0} bytes")]
    Length(usize),
    /// Only formats 0, 1 and 2 exist
    #[error("unknown format type {0}")]
    FormatType(u16),
}

/// Errors decoding the events of a track chunk
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TrackError {
    /// A delta time or length could not be decoded
    #[error("{0}")]
    Vlq(#[from] VlqError),
    /// The payload ended inside an event
    #[error("payload ended inside an event")]
    UnexpectedEnd,
    /// A data byte appeared before any channel status byte
    #[error("data byte with no running status")]
    MissingRunningStatus,
    /// A channel data byte had its top bit set
    #[error("invalid data byte {0:#04x}")]
    InvalidDataByte(u8),
    /// Event data longer than a variable length quantity can describe
    #[error("{0} bytes of event data do not fit a 32 bit length")]
    DataTooLong(usize),
}

/// Errors assembling chunks into a whole file
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FileError {
    /// No `MThd` chunk was found
    #[error("no header chunk")]
    MissingHeader,
    /// More than one `MThd` chunk was found
    #[error("duplicate header chunk")]
    DuplicateHeader,
    /// Format 0 files hold exactly one track
    #[error("format 0 file contains {0} tracks")]
    MultipleTracksForSingleMultiChannel(usize),
}

/// Out-of-range SMPTE values, both in the header division and in the offset meta event
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SmpteError {
    /// The header division's frame byte was not -24, -25, -29 or -30
    #[error("invalid header frame rate {0}")]
    HeaderFrameTime(i8),
    /// The offset payload was not 5 bytes
    #[error("offset must be 5 bytes, found {0}")]
    Length(usize),
    /// The offset frame type bits were invalid
    #[error("invalid frame type {0}")]
    TrackFrame(u8),
    /// Hours above 23
    #[error("invalid hour {0}")]
    HourOffset(u8),
    /// Minutes above 59
    #[error("invalid minute {0}")]
    MinuteOffset(u8),
    /// Seconds above 59
    #[error("invalid second {0}")]
    SecondOffset(u8),
    /// Subframes above 99
    #[error("invalid subframe {0}")]
    Subframe(u8),
}
