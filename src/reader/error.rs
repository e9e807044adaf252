use crate::{ChunkError, ParseError};
use core::fmt;
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading chunks off a byte stream
"#]
#[derive(Debug, Error)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// The part of a chunk's framing a short read happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingSection {
    /// The four tag bytes
    Tag,
    /// The four length bytes
    Length,
    /// The payload
    Payload,
}

impl fmt::Display for FramingSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tag => "tag",
            Self::Length => "length",
            Self::Payload => "payload",
        })
    }
}

/// A kind of error that a reader can produce
#[derive(Debug, Error)]
pub enum ReaderErrorKind {
    /// Parsing errors. The stream is still aligned on a chunk boundary.
    #[error("Parsing {0}")]
    ParseError(#[from] ParseError),
    /// The stream ended inside a chunk. Nothing after this can be trusted.
    #[error("Truncated {section}: expected {expected} bytes, found {found}")]
    TruncatedFraming {
        /// Where the stream ran out
        section: FramingSection,
        /// Bytes required
        expected: usize,
        /// Bytes available
        found: usize,
    },
    /// The underlying reader failed
    #[error("I/O {0}")]
    Io(#[from] std::io::Error),
}

impl ReaderErrorKind {
    pub(crate) const fn chunk(chunk_err: ChunkError) -> Self {
        Self::ParseError(ParseError::Chunk(chunk_err))
    }
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if the stream ended partway through a chunk
    pub const fn is_truncated_framing(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::TruncatedFraming { .. })
    }
    /// True if a chunk was read whole but its payload was malformed
    pub const fn is_malformed_chunk(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::ParseError(ParseError::Chunk(_)))
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new parse error
    pub const fn parse_error(position: usize, error: ParseError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::ParseError(error),
        }
    }

    /// Create a new truncated framing error
    pub const fn truncated(
        position: usize,
        section: FramingSection,
        expected: usize,
        found: usize,
    ) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::TruncatedFraming {
                section,
                expected,
                found,
            },
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
