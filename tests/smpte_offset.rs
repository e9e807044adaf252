use midix_chunks::prelude::*;
use pretty_assertions::assert_eq;

/// A format 0 file on SMPTE timing whose only track opens with an offset event
fn file_with_offset(fps: SmpteFps, hour: u8, minute: u8, second: u8, frame: u8, subframe: u8) -> Vec<u8> {
    let header = HeaderMessage::new(
        FormatType::SingleMultiChannel,
        1,
        Timing::new_smpte(fps, 40).division(),
    );
    let offset = SmpteOffset {
        fps,
        hour,
        minute,
        second,
        frame,
        subframe,
    };
    let track: TrackEvents = [
        TrackEvent::new(
            0,
            TrackMessage::Meta(MetaMessage::new(0x54, offset.to_array()).unwrap()),
        ),
        TrackEvent::new(
            0,
            TrackMessage::ChannelVoice(ChannelVoiceMessage::new(
                Channel::One,
                VoiceEvent::NoteOn {
                    key: 60,
                    velocity: 100,
                },
            )),
        ),
        TrackEvent::new(
            96,
            TrackMessage::ChannelVoice(ChannelVoiceMessage::new(
                Channel::One,
                VoiceEvent::NoteOff {
                    key: 60,
                    velocity: 64,
                },
            )),
        ),
        TrackEvent::new(0, TrackMessage::Meta(MetaMessage::end_of_track())),
    ]
    .into_iter()
    .collect();

    MidiFile::new(header, vec![track]).unwrap().to_bytes().unwrap()
}

fn first_offset(track: &TrackEvents) -> SmpteOffset {
    track
        .events()
        .iter()
        .find_map(|event| match event.message() {
            TrackMessage::Meta(meta) => meta.smpte_offset(),
            _ => None,
        })
        .expect("track has no offset event")
        .expect("offset event is malformed")
}

#[test]
fn offset_at_24fps() {
    let bytes = file_with_offset(SmpteFps::TwentyFour, 12, 30, 15, 18, 50);
    // 0xE8 is -24
    assert_eq!(&bytes[12..14], &[0xE8, 40]);

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(
        file.header().timing(),
        Ok(Timing::Smpte {
            fps: SmpteFps::TwentyFour,
            ticks_per_frame: 40
        })
    );

    let offset = first_offset(&file.tracks()[0]);
    assert_eq!(
        offset,
        SmpteOffset {
            fps: SmpteFps::TwentyFour,
            hour: 12,
            minute: 30,
            second: 15,
            frame: 18,
            subframe: 50,
        }
    );

    let expected_micros = (12 * 3600 + 30 * 60 + 15) as f64 * 1_000_000.0
        + (18.0 / 24.0) * 1_000_000.0
        + (50.0 / 100.0 / 24.0) * 1_000_000.0;
    assert!((offset.as_micros() - expected_micros).abs() < 0.01);
}

#[test]
fn offset_at_each_rate_survives_parsing() {
    let cases = [
        (SmpteFps::TwentyFive, 0, 0, 1, 12, 75),
        (SmpteFps::TwentyNine, 23, 59, 59, 28, 99),
        (SmpteFps::Thirty, 1, 23, 45, 15, 0),
        (SmpteFps::TwentyFour, 23, 59, 59, 23, 99),
    ];
    for (fps, hour, minute, second, frame, subframe) in cases {
        let bytes = file_with_offset(fps, hour, minute, second, frame, subframe);
        let file = MidiFile::parse(&bytes).unwrap();
        let offset = first_offset(&file.tracks()[0]);
        assert_eq!(offset.fps, fps);
        assert_eq!(
            (offset.hour, offset.minute, offset.second, offset.frame, offset.subframe),
            (hour, minute, second, frame, subframe)
        );
        // writing the parsed file back gives the same bytes
        assert_eq!(file.to_bytes().unwrap(), bytes);
    }
}

#[test]
fn drop_frame_offset_is_just_before_midnight() {
    let bytes = file_with_offset(SmpteFps::TwentyNine, 23, 59, 59, 28, 99);
    let file = MidiFile::parse(&bytes).unwrap();
    let micros = first_offset(&file.tracks()[0]).as_micros();
    let expected = 86_399_000_000.0 + (28.0 * 1_000_000.0 / 29.97) + (99.0 * 10_000.0 / 29.97);
    assert!((micros - expected).abs() < 1.0);
}

#[test]
fn header_rate_overrides_offset_rate() {
    let bytes = file_with_offset(SmpteFps::TwentyFour, 10, 20, 30, 12, 50);
    let file = MidiFile::parse(&bytes).unwrap();
    let Ok(Timing::Smpte { fps: file_fps, .. }) = file.header().timing() else {
        panic!("expected SMPTE timing");
    };

    let offset = first_offset(&file.tracks()[0]);
    let own = offset.as_micros();
    assert!((own - offset.as_micros_with_override(file_fps)).abs() < 0.01);
    assert!((own - offset.as_micros_with_override(SmpteFps::Thirty)).abs() > 1.0);
}

#[test]
fn tracks_keep_their_own_offsets() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd\x00\x00\x00\x06");
    // format 1, 2 tracks, 25 fps with 40 ticks per frame
    bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x02, 0xE7, 40]);
    for minute_second in [[0x00, 0x0A], [0x01, 0x00]] {
        bytes.extend_from_slice(b"MTrk\x00\x00\x00\x0D");
        bytes.extend_from_slice(&[0x00, 0xFF, 0x54, 0x05, 0x20]);
        bytes.extend_from_slice(&minute_second);
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0xFF, 0x2F, 0x00]);
    }

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.format_type(), FormatType::Simultaneous);
    let offsets: Vec<_> = file.tracks().iter().map(first_offset).collect();
    assert_eq!(offsets.len(), 2);
    assert_eq!((offsets[0].minute, offsets[0].second), (0, 10));
    assert_eq!((offsets[1].minute, offsets[1].second), (1, 0));

    let diff = offsets[1].as_micros() - offsets[0].as_micros();
    assert!((diff - 50_000_000.0).abs() < 1.0);
}

#[test]
fn subframe_precision() {
    let one_subframe = file_with_offset(SmpteFps::TwentyFour, 0, 0, 0, 0, 1);
    let file = MidiFile::parse(&one_subframe).unwrap();
    let micros = first_offset(&file.tracks()[0]).as_micros();
    assert!((micros - 1_000_000.0 / 24.0 / 100.0).abs() < 0.001);

    let one_second = file_with_offset(SmpteFps::Thirty, 0, 0, 1, 0, 0);
    let file = MidiFile::parse(&one_second).unwrap();
    let micros = first_offset(&file.tracks()[0]).as_micros();
    assert!((micros - 1_000_000.0).abs() < 0.001);
}
