pub mod chunk;

use super::{ChunkSlot, MidiFile};
use crate::{
    FileError, ParseError,
    file::{HeaderMessage, builder::chunk::*},
    message::TrackEvents,
};
use alloc::vec::Vec;

/// A builder used to create a new [`MidiFile`] from the chunks of a stream.
#[derive(Default, Debug)]
pub struct MidiFileBuilder {
    header: Option<HeaderMessage>,
    tracks: Vec<TrackEvents>,
    unknown_chunks: Vec<UnknownChunk>,
    order: Vec<ChunkSlot>,
}

impl MidiFileBuilder {
    /// Decodes a chunk of a midi file and keeps the result.
    ///
    /// The header's division is checked here, so a file with an invalid SMPTE
    /// frame rate is rejected before its tracks are read.
    pub fn handle_chunk(&mut self, chunk: Chunk) -> Result<(), ParseError> {
        let slot = match chunk {
            Chunk::Header(h) => {
                if self.header.is_some() {
                    return Err(FileError::DuplicateHeader.into());
                }
                let header = h.read_message()?;
                header.timing()?;
                self.header = Some(header);
                ChunkSlot::Header
            }
            Chunk::Track(t) => {
                let events = t.read_message()?;
                #[cfg(feature = "tracing")]
                if !events.has_end_of_track() {
                    tracing::warn!(
                        "Track {} does not end with an end of track event",
                        self.tracks.len()
                    );
                }
                self.tracks.push(events);
                ChunkSlot::Track
            }
            Chunk::Unknown(data) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    "Keeping unknown {} chunk of {} bytes",
                    data.tag(),
                    data.payload().len()
                );
                self.unknown_chunks.push(data);
                ChunkSlot::Unknown
            }
        };
        self.order.push(slot);
        Ok(())
    }

    /// Attempts to finish the midifile from the provided chunks.
    pub fn build(self) -> Result<MidiFile, FileError> {
        let Some(header) = self.header else {
            return Err(FileError::MissingHeader);
        };
        MidiFile::check_track_count(&header, self.tracks.len())?;
        #[cfg(feature = "tracing")]
        if usize::from(header.track_count()) != self.tracks.len() {
            tracing::warn!(
                "Header declares {} tracks, but the file holds {}",
                header.track_count(),
                self.tracks.len()
            );
        }
        Ok(MidiFile {
            header,
            tracks: self.tracks,
            unknown_chunks: self.unknown_chunks,
            order: self.order,
        })
    }
}

#[cfg(test)]
fn header_chunk(format: u16, tracks: u16) -> Chunk {
    header_chunk_with_division(format, tracks, 96)
}

#[cfg(test)]
fn header_chunk_with_division(format: u16, tracks: u16, division: u16) -> Chunk {
    Chunk::from_parts(
        ChunkTag::HEADER,
        HeaderMessage::from_raw(format, tracks, division)
            .unwrap()
            .to_array()
            .to_vec(),
    )
    .unwrap()
}

#[test]
fn builder_requires_one_header() {
    let builder = MidiFileBuilder::default();
    assert_eq!(builder.build().unwrap_err(), FileError::MissingHeader);

    let mut builder = MidiFileBuilder::default();
    builder.handle_chunk(header_chunk(1, 0)).unwrap();
    assert_eq!(
        builder.handle_chunk(header_chunk(1, 0)),
        Err(ParseError::File(FileError::DuplicateHeader))
    );
}

#[test]
fn builder_keeps_unknown_chunks() {
    let mut builder = MidiFileBuilder::default();
    builder.handle_chunk(header_chunk(1, 1)).unwrap();
    builder
        .handle_chunk(Chunk::from_parts(ChunkTag::new(*b"XFIH"), alloc::vec![9, 9]).unwrap())
        .unwrap();
    builder
        .handle_chunk(Chunk::from_parts(ChunkTag::TRACK, alloc::vec![0x00, 0xFF, 0x2F, 0x00]).unwrap())
        .unwrap();
    let file = builder.build().unwrap();
    assert_eq!(file.tracks().len(), 1);
    assert_eq!(file.unknown_chunks().len(), 1);
    assert_eq!(file.unknown_chunks()[0].tag(), ChunkTag::new(*b"XFIH"));
}

#[test]
fn format_zero_holds_one_track() {
    let mut builder = MidiFileBuilder::default();
    builder.handle_chunk(header_chunk(0, 1)).unwrap();
    for _ in 0..2 {
        builder
            .handle_chunk(Chunk::from_parts(ChunkTag::TRACK, alloc::vec![]).unwrap())
            .unwrap();
    }
    assert_eq!(
        builder.build().unwrap_err(),
        FileError::MultipleTracksForSingleMultiChannel(2)
    );
}

#[test]
fn header_division_is_checked() {
    use crate::SmpteError;
    let mut builder = MidiFileBuilder::default();
    // -32 frames per second
    assert_eq!(
        builder.handle_chunk(header_chunk_with_division(0, 0, 0xE028)),
        Err(ParseError::Smpte(SmpteError::HeaderFrameTime(-32)))
    );
    assert_eq!(builder.build().unwrap_err(), FileError::MissingHeader);

    // 25 fps, 40 ticks per frame
    let mut builder = MidiFileBuilder::default();
    builder.handle_chunk(header_chunk_with_division(0, 0, 0xE728)).unwrap();
    assert!(builder.build().is_ok());
}

#[test]
fn builder_keeps_chunk_order() {
    use pretty_assertions::assert_eq;
    let end_of_track = || Chunk::from_parts(ChunkTag::TRACK, alloc::vec![0x00, 0xFF, 0x2F, 0x00]).unwrap();
    let mut builder = MidiFileBuilder::default();
    builder.handle_chunk(header_chunk(1, 2)).unwrap();
    builder.handle_chunk(end_of_track()).unwrap();
    builder
        .handle_chunk(Chunk::from_parts(ChunkTag::new(*b"XFIH"), alloc::vec![9]).unwrap())
        .unwrap();
    builder.handle_chunk(end_of_track()).unwrap();
    let file = builder.build().unwrap();

    let mut expected = b"MThd\x00\x00\x00\x06".to_vec();
    expected.extend_from_slice(&HeaderMessage::from_raw(1, 2, 96).unwrap().to_array());
    expected.extend_from_slice(b"MTrk\x00\x00\x00\x04\x00\xFF\x2F\x00");
    expected.extend_from_slice(b"XFIH\x00\x00\x00\x01\x09");
    expected.extend_from_slice(b"MTrk\x00\x00\x00\x04\x00\xFF\x2F\x00");
    assert_eq!(file.to_bytes().unwrap(), expected);
}
