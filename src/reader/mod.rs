#![doc = r#"
Reading chunks off a byte stream

[`ChunkStream`] pulls one chunk at a time out of any [`std::io::Read`]:

1. four tag bytes. Nothing at all here is a clean end of stream;
2. a big-endian `u32` length;
3. exactly `length` payload bytes.

A short read in any of these is fatal: the declared lengths can no longer be
trusted to find the next chunk. The chunk is then built from its tag and
handed back undecoded. Decoding is a separate step, see
[`Chunk::read_message`](crate::file::builder::chunk::Chunk::read_message).

# Example
```rust
# use midix_chunks::prelude::*;
let bytes = b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x00\x60XYZZ\x00\x00\x00\x02hi";
let mut stream = ChunkStream::from_byte_slice(bytes);

let header = stream.read_chunk().unwrap().unwrap();
assert!(header.is_header());

let unknown = stream.read_chunk().unwrap().unwrap();
assert_eq!(unknown.tag(), ChunkTag::new(*b"XYZZ"));
assert_eq!(unknown.read_message().unwrap().to_bytes(), b"hi".to_vec());

assert!(stream.read_chunk().unwrap().is_none());
```
"#]

mod error;
pub use error::*;

use crate::file::builder::chunk::{Chunk, ChunkTag};
use alloc::vec::Vec;
use std::io::{ErrorKind, Read};

// payloads larger than this grow as bytes arrive instead of trusting the length up front
const PREALLOCATION_LIMIT: usize = 64 * 1024;

/// Reads framed chunks from a blocking byte stream.
#[derive(Debug)]
pub struct ChunkStream<R> {
    inner: R,
    position: usize,
    finished: bool,
}

impl<'a> ChunkStream<&'a [u8]> {
    /// Read chunks out of an in-memory buffer
    pub const fn from_byte_slice(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<R> ChunkStream<R> {
    /// Wrap a reader
    pub const fn new(inner: R) -> Self {
        Self {
            inner,
            position: 0,
            finished: false,
        }
    }

    /// Bytes consumed from the reader so far
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Give back the reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ChunkStream<R> {
    /// Read the next chunk.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly on a chunk boundary.
    pub fn read_chunk(&mut self) -> ReadResult<Option<Chunk>> {
        let start = self.position;

        let mut tag = [0; 4];
        match self.fill(&mut tag)? {
            0 => return Ok(None),
            4 => {}
            found => return Err(ReaderError::truncated(start, FramingSection::Tag, 4, found)),
        }

        let mut length = [0; 4];
        let found = self.fill(&mut length)?;
        if found < length.len() {
            return Err(ReaderError::truncated(
                start,
                FramingSection::Length,
                4,
                found,
            ));
        }
        let length = u32::from_be_bytes(length);

        let tag = ChunkTag::new(tag);
        let payload = self.read_payload(start, length)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Read {} chunk of {} bytes at {}", tag, length, start);

        Chunk::from_parts(tag, payload)
            .map(Some)
            .map_err(|e| ReaderError::new(start, ReaderErrorKind::chunk(e)))
    }

    /// Read into `buf` until it is full or the stream ends, returning the bytes read.
    fn fill(&mut self, buf: &mut [u8]) -> ReadResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    return Err(ReaderError::new(
                        self.position + filled,
                        ReaderErrorKind::Io(e),
                    ));
                }
            }
        }
        self.position += filled;
        Ok(filled)
    }

    fn read_payload(&mut self, start: usize, length: u32) -> ReadResult<Vec<u8>> {
        let expected = length as usize;
        let mut payload = Vec::with_capacity(expected.min(PREALLOCATION_LIMIT));
        let position = self.position;
        let found = (&mut self.inner)
            .take(u64::from(length))
            .read_to_end(&mut payload)
            .map_err(|e| ReaderError::new(position, ReaderErrorKind::Io(e)))?;
        self.position += found;

        if found < expected {
            return Err(ReaderError::truncated(
                start,
                FramingSection::Payload,
                expected,
                found,
            ));
        }
        Ok(payload)
    }
}

impl<R: Read> Iterator for ChunkStream<R> {
    type Item = ReadResult<Chunk>;

    /// Yields chunks until the end of the stream or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Stopped reading chunks: {}", e);
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

#[test]
fn partial_tag_is_truncated_framing() {
    let mut stream = ChunkStream::from_byte_slice(b"MT");
    let err = stream.read_chunk().unwrap_err();
    assert!(err.is_truncated_framing());
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::TruncatedFraming {
            section: FramingSection::Tag,
            expected: 4,
            found: 2
        }
    ));
}

#[test]
fn short_length_and_payload_are_truncated_framing() {
    let err = ChunkStream::from_byte_slice(b"MTrk\x00\x00")
        .read_chunk()
        .unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::TruncatedFraming {
            section: FramingSection::Length,
            found: 2,
            ..
        }
    ));

    let err = ChunkStream::from_byte_slice(b"MTrk\x00\x00\x00\x05\x00\xFF")
        .read_chunk()
        .unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::TruncatedFraming {
            section: FramingSection::Payload,
            expected: 5,
            found: 2
        }
    ));
    assert_eq!(err.position(), 0);
}

#[test]
fn iterator_stops_after_error() {
    let bytes = b"ABCD\x00\x00\x00\x00MThd\x00\x00\x00\x05\x00\x00\x00\x01\x00ABCD\x00\x00\x00\x00";
    let mut stream = ChunkStream::from_byte_slice(bytes);
    assert!(stream.next().unwrap().is_ok());
    let err = stream.next().unwrap().unwrap_err();
    assert!(err.is_malformed_chunk());
    assert_eq!(err.position(), 8);
    assert!(stream.next().is_none());
}

#[test]
fn interrupted_reads_are_retried() {
    struct Flaky<'a> {
        bytes: &'a [u8],
        interrupt: bool,
    }
    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(ErrorKind::Interrupted.into());
            }
            // one byte at a time
            let n = buf.len().min(1).min(self.bytes.len());
            buf[..n].copy_from_slice(&self.bytes[..n]);
            self.bytes = &self.bytes[n..];
            Ok(n)
        }
    }

    let stream = ChunkStream::new(Flaky {
        bytes: b"MTrk\x00\x00\x00\x04\x00\xFF\x2F\x00",
        interrupt: false,
    });
    let chunks: Vec<_> = stream.collect::<Result<_, _>>().unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].payload(), &[0x00, 0xFF, 0x2F, 0x00]);
}
