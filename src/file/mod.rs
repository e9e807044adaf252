#![doc = r#"
Rusty representation of a [`MidiFile`]
"#]

/// Contains the [`MidiFileBuilder`](builder::MidiFileBuilder) and the chunk types it consumes.
pub mod builder;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

mod meta;
pub use meta::*;

use crate::{
    ChunkError, FileError,
    file::builder::chunk::{ChunkHeader, ChunkReader, HeaderChunk, TrackChunk, UnknownChunk},
    message::TrackEvents,
};
use alloc::vec::Vec;

#[doc = r#"
A whole Standard MIDI File: the header, every track, and any chunks
this crate does not interpret.

The order the chunks were read in is kept, so unknown chunks sitting
between tracks are written back in place.

# Example
```rust
# use midix_chunks::prelude::*;
let header = HeaderMessage::new(FormatType::SingleMultiChannel, 1, 96);
let track: TrackEvents = [
    TrackEvent::new(0, TrackMessage::Meta(MetaMessage::tempo_event(500_000))),
    TrackEvent::new(96, TrackMessage::Meta(MetaMessage::end_of_track())),
]
.into_iter()
.collect();

let file = MidiFile::new(header, vec![track]).unwrap();
let parsed = MidiFile::parse(&file.to_bytes().unwrap()).unwrap();
assert_eq!(parsed, file);

// a format 0 file holds one track
assert_eq!(
    MidiFile::new(header, vec![TrackEvents::default(), TrackEvents::default()]),
    Err(FileError::MultipleTracksForSingleMultiChannel(2))
);
```
"#]
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    header: HeaderMessage,
    tracks: Vec<TrackEvents>,
    unknown_chunks: Vec<UnknownChunk>,
    order: Vec<ChunkSlot>,
}

/// Which kind of chunk came next in the file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum ChunkSlot {
    Header,
    Track,
    Unknown,
}

impl MidiFile {
    /// Create a file from a header and tracks.
    ///
    /// Fails if the header is format 0 and there is more than one track.
    pub fn new(header: HeaderMessage, tracks: Vec<TrackEvents>) -> Result<Self, FileError> {
        Self::check_track_count(&header, tracks.len())?;
        let mut order = Vec::with_capacity(tracks.len() + 1);
        order.push(ChunkSlot::Header);
        order.extend(tracks.iter().map(|_| ChunkSlot::Track));
        Ok(Self {
            header,
            tracks,
            unknown_chunks: Vec::new(),
            order,
        })
    }

    fn check_track_count(header: &HeaderMessage, tracks: usize) -> Result<(), FileError> {
        if header.format_type() == FormatType::SingleMultiChannel && tracks > 1 {
            return Err(FileError::MultipleTracksForSingleMultiChannel(tracks));
        }
        Ok(())
    }

    /// Parse a set of bytes into a file struct
    #[cfg(feature = "std")]
    pub fn parse(bytes: &[u8]) -> crate::reader::ReadResult<Self> {
        Self::read(bytes)
    }

    /// Read every chunk from `reader` and assemble them.
    #[cfg(feature = "std")]
    pub fn read<R: std::io::Read>(reader: R) -> crate::reader::ReadResult<Self> {
        use crate::reader::{ChunkStream, ReaderError};

        let mut stream = ChunkStream::new(reader);
        let mut builder = builder::MidiFileBuilder::default();

        loop {
            let start = stream.position();
            let Some(chunk) = stream.read_chunk()? else {
                break;
            };
            // decoding errors point at the start of the chunk that failed
            builder
                .handle_chunk(chunk)
                .map_err(|e| ReaderError::parse_error(start, e))?;
        }

        builder
            .build()
            .map_err(|e| ReaderError::parse_error(stream.position(), e.into()))
    }

    /// The header
    pub fn header(&self) -> &HeaderMessage {
        &self.header
    }

    /// Returns the format type for the file.
    pub fn format_type(&self) -> FormatType {
        self.header.format_type()
    }

    /// The tracks, in file order
    pub fn tracks(&self) -> &[TrackEvents] {
        &self.tracks
    }

    /// Chunks other than `MThd` and `MTrk`, in file order
    pub fn unknown_chunks(&self) -> &[UnknownChunk] {
        &self.unknown_chunks
    }

    /// Add a chunk to be written after everything else
    pub fn push_unknown_chunk(&mut self, chunk: UnknownChunk) {
        self.unknown_chunks.push(chunk);
        self.order.push(ChunkSlot::Unknown);
    }

    /// Write every chunk in the order it was read or added.
    ///
    /// Tracks are re-encoded with explicit status bytes, so this fails only
    /// if a track grows too long for its framing.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ChunkError> {
        let mut bytes = Vec::new();
        let mut write = |framing: ChunkHeader, payload: &[u8]| {
            bytes.extend_from_slice(&framing.to_array());
            bytes.extend_from_slice(payload);
        };

        let mut tracks = self.tracks.iter();
        let mut unknown_chunks = self.unknown_chunks.iter();
        for slot in &self.order {
            match slot {
                ChunkSlot::Header => {
                    let header = HeaderChunk::from_message(&self.header);
                    write(header.chunk_header(), header.payload());
                }
                ChunkSlot::Track => {
                    if let Some(events) = tracks.next() {
                        let track = TrackChunk::from_events(events)?;
                        write(track.chunk_header(), track.payload());
                    }
                }
                ChunkSlot::Unknown => {
                    if let Some(chunk) = unknown_chunks.next() {
                        write(chunk.chunk_header(), chunk.payload());
                    }
                }
            }
        }
        Ok(bytes)
    }
}
