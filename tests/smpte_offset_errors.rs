use midix_chunks::prelude::*;

/// The five payload bytes of an offset event
fn offset_bytes(rate_bits: u8, hour: u8, minute: u8, second: u8, frame: u8, subframe: u8) -> [u8; 5] {
    [(rate_bits << 5) | (hour & 0x1F), minute, second, frame, subframe]
}

/// Parse through the meta event, the way a track hands offsets out
fn parse_meta(data: &[u8]) -> Result<SmpteOffset, SmpteError> {
    MetaMessage::new(0x54, data)
        .unwrap()
        .smpte_offset()
        .expect("0x54 is an offset event")
}

#[test]
fn wrong_length() {
    for len in [0, 3, 4, 6, 10] {
        let data = vec![0; len];
        assert_eq!(parse_meta(&data), Err(SmpteError::Length(len)));
    }
}

#[test]
fn only_offset_events_have_an_offset() {
    let tempo = MetaMessage::tempo_event(500_000);
    assert!(tempo.smpte_offset().is_none());
    let offset = MetaMessage::new(0x54, offset_bytes(0, 0, 0, 0, 0, 0)).unwrap();
    assert!(offset.smpte_offset().is_some());
}

#[test]
fn invalid_rate_bits() {
    // bit 7 of the first byte sits above the two rate bits
    for bits in [0b100, 0b101, 0b111] {
        let data = offset_bytes(bits, 12, 30, 15, 10, 50);
        assert_eq!(parse_meta(&data), Err(SmpteError::TrackFrame(bits)));
    }
}

#[test]
fn out_of_range_fields() {
    assert_eq!(
        parse_meta(&offset_bytes(0, 24, 0, 0, 0, 0)),
        Err(SmpteError::HourOffset(24))
    );
    assert_eq!(
        parse_meta(&offset_bytes(0, 31, 0, 0, 0, 0)),
        Err(SmpteError::HourOffset(31))
    );
    for minute in [60, 99, 255] {
        assert_eq!(
            parse_meta(&offset_bytes(0, 12, minute, 30, 15, 50)),
            Err(SmpteError::MinuteOffset(minute))
        );
    }
    for second in [60, 255] {
        assert_eq!(
            parse_meta(&offset_bytes(1, 12, 30, second, 15, 50)),
            Err(SmpteError::SecondOffset(second))
        );
    }
    for subframe in [100, 150, 255] {
        assert_eq!(
            parse_meta(&offset_bytes(2, 12, 30, 45, 15, subframe)),
            Err(SmpteError::Subframe(subframe))
        );
    }
}

#[test]
fn first_bad_field_is_reported() {
    assert_eq!(
        parse_meta(&offset_bytes(0, 25, 61, 30, 15, 50)),
        Err(SmpteError::HourOffset(25))
    );
    assert_eq!(
        parse_meta(&offset_bytes(1, 23, 60, 60, 15, 50)),
        Err(SmpteError::MinuteOffset(60))
    );
}

#[test]
fn boundary_values_parse() {
    let cases = [
        (0, 0, 0, 0, 0, 0),
        (0, 23, 59, 59, 23, 99),
        (1, 23, 59, 59, 24, 99),
        (2, 23, 59, 59, 29, 99),
        (3, 23, 59, 59, 29, 99),
    ];
    for (bits, hour, minute, second, frame, subframe) in cases {
        let data = offset_bytes(bits, hour, minute, second, frame, subframe);
        let offset = parse_meta(&data).unwrap_or_else(|e| panic!("{data:?}: {e}"));
        assert_eq!(offset.fps, SmpteFps::from_offset_bits(bits).unwrap());
        assert_eq!(
            (offset.hour, offset.minute, offset.second, offset.frame, offset.subframe),
            (hour, minute, second, frame, subframe)
        );
        assert_eq!(offset.to_array(), data);
    }
}

#[test]
fn rate_bits_and_hour_do_not_overlap() {
    for bits in 0..=3 {
        for hour in 0..=23 {
            let offset = parse_meta(&offset_bytes(bits, hour, 30, 45, 15, 50)).unwrap();
            assert_eq!(offset.fps.offset_bits(), bits);
            assert_eq!(offset.hour, hour);
        }
    }
}

#[test]
fn frame_rate_override() {
    let offset = parse_meta(&offset_bytes(0, 1, 0, 0, 12, 0)).unwrap();
    let hour = 3_600_000_000.0;
    for (fps, rate) in [
        (SmpteFps::TwentyFour, 24.0),
        (SmpteFps::TwentyFive, 25.0),
        (SmpteFps::TwentyNine, 29.97),
        (SmpteFps::Thirty, 30.0),
    ] {
        let expected = hour + 12.0 / rate * 1_000_000.0;
        assert!((offset.as_micros_with_override(fps) - expected).abs() < 1.0);
    }
    assert_eq!(parse_meta(&offset_bytes(1, 0, 0, 0, 0, 0)).unwrap().as_micros(), 0.0);
}

#[test]
fn drop_frame_precision() {
    let offset = parse_meta(&offset_bytes(2, 0, 0, 0, 1, 0)).unwrap();
    // one frame lasts 1001/30000 of a second
    assert!((offset.as_micros() - 1_001_000.0 / 30.0).abs() < 0.001);
}
