use midix_chunks::prelude::*;
use pretty_assertions::assert_eq;
use std::io::{self, Read};

fn framed(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut bytes = ChunkHeader::new(ChunkTag::new(*tag), payload.len() as u32).to_bytes();
    bytes.extend_from_slice(payload);
    bytes
}

fn song() -> Vec<u8> {
    let mut bytes = framed(b"MThd", &[0x00, 0x01, 0x00, 0x02, 0x01, 0xE0]);
    bytes.extend(framed(
        b"MTrk",
        &[
            0x00, 0xFF, 0x03, 0x05, b'T', b'e', b'm', b'p', b'o', // track name
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 120 bpm
            0x00, 0xFF, 0x2F, 0x00,
        ],
    ));
    bytes.extend(framed(b"XFIH", b"vendor data"));
    bytes.extend(framed(
        b"MTrk",
        &[
            0x00, 0x90, 0x3C, 0x64, // note on
            0x83, 0x60, 0x3C, 0x00, // running status note on, velocity 0, 480 ticks later
            0x00, 0xFF, 0x2F, 0x00,
        ],
    ));
    bytes
}

/// Reads every chunk, panicking on the first error
fn loop_through(bytes: &[u8]) -> Vec<Chunk> {
    let mut stream = ChunkStream::from_byte_slice(bytes);
    let mut chunks = Vec::new();
    loop {
        match stream.read_chunk() {
            Ok(Some(chunk)) => chunks.push(chunk),
            Ok(None) => break,
            Err(e) => panic!("Error at {}, {:?}", stream.position(), e),
        }
    }
    assert_eq!(stream.position(), bytes.len());
    chunks
}

#[test]
fn read_song() {
    let chunks = loop_through(&song());
    let tags: Vec<ChunkTag> = chunks.iter().map(Chunk::tag).collect();
    assert_eq!(
        tags,
        vec![
            ChunkTag::HEADER,
            ChunkTag::TRACK,
            ChunkTag::new(*b"XFIH"),
            ChunkTag::TRACK
        ]
    );

    let ChunkMessage::Header(header) = chunks[0].read_message().unwrap() else {
        panic!("expected a header");
    };
    assert_eq!(header, HeaderMessage::new(FormatType::Simultaneous, 2, 480));

    let ChunkMessage::Unknown(vendor) = chunks[2].read_message().unwrap() else {
        panic!("expected an opaque payload");
    };
    assert_eq!(vendor.to_bytes(), b"vendor data".to_vec());

    // every chunk writes back exactly as read
    let rewritten: Vec<u8> = chunks.iter().flat_map(Chunk::to_bytes).collect();
    assert_eq!(rewritten, song());
}

#[test]
fn read_song_as_file() {
    let file = MidiFile::parse(&song()).unwrap();
    assert_eq!(file.tracks().len(), 2);
    assert_eq!(file.unknown_chunks().len(), 1);

    let conductor = &file.tracks()[0];
    let TrackMessage::Meta(name) = conductor.events()[0].message() else {
        panic!("expected a meta event");
    };
    assert_eq!(name.text(), Some("Tempo"));

    let notes = &file.tracks()[1];
    assert_eq!(notes.duration(), 480);
    assert!(notes.has_end_of_track());

    // unknown chunks stay between the tracks, running status is expanded
    let bytes = file.to_bytes().unwrap();
    let chunks = loop_through(&bytes);
    let tags: Vec<ChunkTag> = chunks.iter().map(Chunk::tag).collect();
    assert_eq!(
        tags,
        vec![
            ChunkTag::HEADER,
            ChunkTag::TRACK,
            ChunkTag::new(*b"XFIH"),
            ChunkTag::TRACK
        ]
    );
    assert_eq!(chunks[2].payload(), b"vendor data");
    assert_eq!(
        chunks[3].payload(),
        &[0x00, 0x90, 0x3C, 0x64, 0x83, 0x60, 0x90, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00]
    );
    assert_eq!(MidiFile::parse(&bytes).unwrap(), file);
}

#[test]
fn pushed_unknown_chunks_are_written_last() {
    let mut file = MidiFile::parse(&song()).unwrap();
    file.push_unknown_chunk(UnknownChunk::new(ChunkTag::new(*b"LAST"), b"end".to_vec()).unwrap());

    let bytes = file.to_bytes().unwrap();
    let tags: Vec<ChunkTag> = loop_through(&bytes).iter().map(Chunk::tag).collect();
    assert_eq!(
        tags,
        vec![
            ChunkTag::HEADER,
            ChunkTag::TRACK,
            ChunkTag::new(*b"XFIH"),
            ChunkTag::TRACK,
            ChunkTag::new(*b"LAST")
        ]
    );
    assert_eq!(MidiFile::parse(&bytes).unwrap(), file);
}

#[test]
fn read_damaged_song() {
    let song = song();
    // cut the stream inside the second chunk's tag
    let damaged = &song[..14 + 2];
    let mut stream = ChunkStream::from_byte_slice(damaged);
    assert!(stream.next().unwrap().is_ok());
    let err = stream.next().unwrap().unwrap_err();
    assert!(err.is_truncated_framing());
    assert_eq!(err.position(), 14);
    assert!(stream.next().is_none());

    // a cut payload is just as fatal
    let err = MidiFile::parse(&song[..song.len() - 1]).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::TruncatedFraming {
            section: FramingSection::Payload,
            ..
        }
    ));
}

#[test]
fn malformed_header_names_its_tag() {
    let bytes = framed(b"MThd", &[0, 1, 0, 1, 0]);
    let err = ChunkStream::from_byte_slice(&bytes).read_chunk().unwrap_err();
    assert!(err.is_malformed_chunk());
    assert_eq!(err.position(), 0);
    let ReaderErrorKind::ParseError(ParseError::Chunk(chunk_err)) = err.error_kind() else {
        panic!("expected a chunk error, got {err:?}");
    };
    assert_eq!(chunk_err.tag(), ChunkTag::HEADER);
    assert_eq!(chunk_err.kind(), &ChunkErrorKind::Header(HeaderError::Length(5)));

    let bytes = framed(b"MThd", &[0, 3, 0, 1, 0, 96]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_malformed_chunk());
    assert!(err.to_string().contains("MThd"));
}

#[test]
fn file_assembly_errors() {
    let header = framed(b"MThd", &[0, 1, 0, 0, 0, 96]);

    let err = MidiFile::parse(&framed(b"MTrk", &[])).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::ParseError(ParseError::File(FileError::MissingHeader))
    ));

    let twice = [header.clone(), header].concat();
    let err = MidiFile::parse(&twice).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::ParseError(ParseError::File(FileError::DuplicateHeader))
    ));

    let format_zero = [
        framed(b"MThd", &[0, 0, 0, 2, 0, 96]),
        framed(b"MTrk", &[]),
        framed(b"MTrk", &[]),
    ]
    .concat();
    let err = MidiFile::parse(&format_zero).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::ParseError(ParseError::File(
            FileError::MultipleTracksForSingleMultiChannel(2)
        ))
    ));
}

#[test]
fn format_zero_file_cannot_be_built_with_two_tracks() {
    let header = HeaderMessage::new(FormatType::SingleMultiChannel, 2, 96);
    assert_eq!(
        MidiFile::new(header, vec![TrackEvents::default(), TrackEvents::default()]),
        Err(FileError::MultipleTracksForSingleMultiChannel(2))
    );

    // anything that builds also parses back
    let one = MidiFile::new(header, vec![TrackEvents::default()]).unwrap();
    assert_eq!(MidiFile::parse(&one.to_bytes().unwrap()).unwrap(), one);

    let header = HeaderMessage::new(FormatType::Simultaneous, 2, 96);
    let two = MidiFile::new(header, vec![TrackEvents::default(), TrackEvents::default()]).unwrap();
    assert_eq!(MidiFile::parse(&two.to_bytes().unwrap()).unwrap(), two);
}

#[test]
fn invalid_smpte_division_is_rejected() {
    // format 0, no tracks, division 0xE028: -32 frames per second
    let err = MidiFile::parse(b"MThd\0\0\0\x06\0\0\0\0\xE0\x28").unwrap_err();
    assert_eq!(err.position(), 0);
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::ParseError(ParseError::Smpte(SmpteError::HeaderFrameTime(-32)))
    ));

    // the same header at 30 fps is fine
    let file = MidiFile::parse(b"MThd\0\0\0\x06\0\0\0\0\xE2\x28").unwrap();
    assert_eq!(
        file.header().timing(),
        Ok(Timing::Smpte {
            fps: SmpteFps::Thirty,
            ticks_per_frame: 40
        })
    );
}

#[test]
fn bad_track_reports_event_offset() {
    let mut bytes = framed(b"MThd", &[0, 0, 0, 1, 0, 96]);
    // a data byte with nothing to run on, after one good event
    bytes.extend(framed(b"MTrk", &[0x00, 0xFF, 0x2F, 0x00, 0x00, 0x3C, 0x40]));
    let err = MidiFile::parse(&bytes).unwrap_err();
    let ReaderErrorKind::ParseError(ParseError::Chunk(chunk_err)) = err.error_kind() else {
        panic!("expected a chunk error, got {err:?}");
    };
    assert_eq!(
        chunk_err.kind(),
        &ChunkErrorKind::Track {
            offset: 4,
            error: TrackError::MissingRunningStatus
        }
    );
}

#[test]
fn io_errors_pass_through() {
    struct Broken;
    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    let err = MidiFile::read(Broken).unwrap_err();
    let ReaderErrorKind::Io(io_err) = err.error_kind() else {
        panic!("expected an io error, got {err:?}");
    };
    assert_eq!(io_err.kind(), io::ErrorKind::Other);
}

#[test]
fn large_declared_length_does_not_preallocate() {
    // claims 4 GiB but only carries 3 bytes
    let bytes = b"XYZZ\xFF\xFF\xFF\xFFabc";
    let err = ChunkStream::from_byte_slice(bytes).read_chunk().unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::TruncatedFraming {
            section: FramingSection::Payload,
            expected: 0xFFFF_FFFF,
            found: 3
        }
    ));
}
