use midix_chunks::prelude::*;

/// A one track chord: C3 and C4 on channel 3, G4 on 2, E5 on 1, all released together.
const SIMPLE: &[u8] = &[
    b'M', b'T', b'h', b'd', 0x00, 0x00, 0x00, 0x06, //
    0x00, 0x00, 0x00, 0x01, 0x00, 0x60, //
    b'M', b'T', b'r', b'k', 0x00, 0x00, 0x00, 0x3D, //
    0x00, 0xFF, 0x03, 0x06, b'S', b'i', b'm', b'p', b'l', b'e', //
    0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08, //
    0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
    0x00, 0x92, 0x30, 0x7F, //
    0x00, 0x3C, 0x7F, // running status
    0x60, 0x91, 0x43, 0x50, //
    0x60, 0x90, 0x4C, 0x30, //
    0x81, 0x40, 0x82, 0x30, 0x40, //
    0x00, 0x92, 0x3C, 0x00, // note on with zero velocity
    0x00, 0x81, 0x43, 0x40, //
    0x00, 0x80, 0x4C, 0x40, //
    0x00, 0xFF, 0x2F, 0x00,
];

#[test]
fn test_parse() {
    let parsed = MidiFile::parse(SIMPLE).unwrap();

    assert_eq!(parsed.tracks().len(), 1);
    assert_eq!(parsed.header().timing(), Ok(Timing::TicksPerQuarterNote(96)));

    let track = &parsed.tracks()[0];
    assert!(track.has_end_of_track());

    let mut events = track.ticked().skip(3);

    use Channel::*;
    note_on(&events.next().unwrap(), 0, Three, 48, 127);
    note_on(&events.next().unwrap(), 0, Three, 60, 127);
    note_on(&events.next().unwrap(), 96, Two, 67, 80);
    note_on(&events.next().unwrap(), 192, One, 76, 48);
    note_off(&events.next().unwrap(), 384, Three, 48);
    note_off(&events.next().unwrap(), 384, Three, 60);
    note_off(&events.next().unwrap(), 384, Two, 67);
    note_off(&events.next().unwrap(), 384, One, 76);

    let end = events.next().unwrap();
    assert_eq!(end.accumulated_ticks(), 384);
    assert!(events.next().is_none());
}

#[test]
fn test_meta_events() {
    let parsed = MidiFile::parse(SIMPLE).unwrap();
    let meta: Vec<&MetaMessage> = parsed.tracks()[0]
        .events()
        .iter()
        .filter_map(|event| match event.message() {
            TrackMessage::Meta(meta) => Some(meta),
            _ => None,
        })
        .collect();

    assert_eq!(meta.len(), 4);
    assert_eq!(meta[0].text(), Some("Simple"));
    assert_eq!(meta[1].kind(), Some(MetaKind::TimeSignature));
    assert_eq!(meta[1].data(), &[0x04, 0x02, 0x18, 0x08]);
    assert_eq!(meta[2].tempo(), Some(500_000));
    assert!(meta[3].is_end_of_track());
}

#[test]
fn test_hex() {
    let parsed = MidiFile::parse(SIMPLE).unwrap();
    let track = &parsed.tracks()[0];
    assert_eq!(track.events()[3].to_hex(), "0092307f");
    // the running status event is written with its status byte
    assert_eq!(track.events()[4].to_hex(), "00923c7f");
}

fn note_on(e: &Ticked<&TrackEvent>, accumulated_ticks: i64, channel: Channel, key: u8, velocity: u8) {
    assert_eq!(e.accumulated_ticks(), accumulated_ticks);
    let TrackMessage::ChannelVoice(cv) = e.event().message() else {
        panic!("expected a channel voice message, got {:?}", e.event());
    };

    assert_eq!(cv.channel(), channel);
    assert_eq!(cv.event(), &VoiceEvent::NoteOn { key, velocity });
}

fn note_off(e: &Ticked<&TrackEvent>, accumulated_ticks: i64, channel: Channel, note: u8) {
    assert_eq!(e.accumulated_ticks(), accumulated_ticks);
    let TrackMessage::ChannelVoice(cv) = e.event().message() else {
        panic!("expected a channel voice message, got {:?}", e.event());
    };

    assert_eq!(cv.channel(), channel);
    match *cv.event() {
        VoiceEvent::NoteOn { key, velocity } => {
            assert_eq!(velocity, 0);
            assert_eq!(key, note);
        }
        VoiceEvent::NoteOff { key, .. } => assert_eq!(key, note),
        other => panic!("expected a note off, got {other:?}"),
    }
}
