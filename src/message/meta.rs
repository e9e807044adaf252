use crate::{SmpteError, TrackError, file::SmpteOffset, vlq};
use alloc::vec::Vec;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The meta event types this crate knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MetaKind {
    SequenceNumber = 0x00,
    Text = 0x01,
    Copyright = 0x02,
    TrackName = 0x03,
    InstrumentName = 0x04,
    Lyric = 0x05,
    Marker = 0x06,
    CuePoint = 0x07,
    ChannelPrefix = 0x20,
    Port = 0x21,
    EndOfTrack = 0x2F,
    Tempo = 0x51,
    SmpteOffset = 0x54,
    TimeSignature = 0x58,
    KeySignature = 0x59,
    SequencerSpecific = 0x7F,
}

impl MetaKind {
    /// True for the kinds whose data is text
    pub const fn is_text(&self) -> bool {
        (*self as u8) >= 0x01 && (*self as u8) <= 0x07
    }
}

#[doc = r#"
A meta event (`FF type length data`).

The type byte is kept raw so unknown meta events survive a round trip.

# Example
```rust
# use midix_chunks::prelude::*;
let tempo = MetaMessage::new(0x51, vec![0x07, 0xA1, 0x20]).unwrap();
assert_eq!(tempo.kind(), Some(MetaKind::Tempo));
assert_eq!(tempo.tempo(), Some(500_000));
assert_eq!(tempo.to_bytes(), vec![0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
```
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaMessage {
    type_byte: u8,
    data: Vec<u8>,
}

impl MetaMessage {
    /// Create a meta event from its type byte and data.
    ///
    /// Fails if the data is too long for its length prefix.
    pub fn new(type_byte: u8, data: impl Into<Vec<u8>>) -> Result<Self, TrackError> {
        let data = data.into();
        super::data_length(data.len())?;
        Ok(Self { type_byte, data })
    }

    /// The end of track marker, `FF 2F 00`
    pub fn end_of_track() -> Self {
        Self {
            type_byte: MetaKind::EndOfTrack.into(),
            data: Vec::new(),
        }
    }

    /// A set tempo event in microseconds per quarter note. Only the low 24 bits are kept.
    pub fn tempo_event(micros_per_quarter_note: u32) -> Self {
        let [_, hi, mid, lo] = micros_per_quarter_note.to_be_bytes();
        Self {
            type_byte: MetaKind::Tempo.into(),
            data: alloc::vec![hi, mid, lo],
        }
    }

    /// The raw type byte
    pub const fn type_byte(&self) -> u8 {
        self.type_byte
    }

    /// The type, if known
    pub fn kind(&self) -> Option<MetaKind> {
        MetaKind::try_from(self.type_byte).ok()
    }

    /// The event data, without type or length
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True for `FF 2F`
    pub fn is_end_of_track(&self) -> bool {
        self.kind() == Some(MetaKind::EndOfTrack)
    }

    /// The number of a sequence number event.
    ///
    /// `None` for other events, and for the empty form that means "use the track's position".
    pub fn sequence_number(&self) -> Option<u16> {
        match (self.kind(), self.data.as_slice()) {
            (Some(MetaKind::SequenceNumber), &[hi, lo]) => Some(u16::from_be_bytes([hi, lo])),
            _ => None,
        }
    }

    /// The text of a text-like event, if it is valid UTF-8
    pub fn text(&self) -> Option<&str> {
        match self.kind() {
            Some(kind) if kind.is_text() => core::str::from_utf8(&self.data).ok(),
            _ => None,
        }
    }

    /// Microseconds per quarter note of a set tempo event
    pub fn tempo(&self) -> Option<u32> {
        match (self.kind(), self.data.as_slice()) {
            (Some(MetaKind::Tempo), &[hi, mid, lo]) => Some(u32::from_be_bytes([0, hi, mid, lo])),
            _ => None,
        }
    }

    /// The offset of an SMPTE offset event
    pub fn smpte_offset(&self) -> Option<Result<SmpteOffset, SmpteError>> {
        (self.kind() == Some(MetaKind::SmpteOffset)).then(|| SmpteOffset::parse(&self.data))
    }

    /// `FF`, type, length, data
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() + 2 + vlq::MAX_LEN);
        bytes.push(0xFF);
        bytes.push(self.type_byte);
        // checked in `new`
        vlq::write_to(self.data.len() as u32, &mut bytes);
        bytes.extend_from_slice(&self.data);
        bytes
    }
}

#[test]
fn text_events_decode_as_str() {
    let name = MetaMessage::new(0x03, *b"Piano").unwrap();
    assert_eq!(name.kind(), Some(MetaKind::TrackName));
    assert_eq!(name.text(), Some("Piano"));

    let tempo = MetaMessage::tempo_event(500_000);
    assert_eq!(tempo.text(), None);
    assert_eq!(tempo.tempo(), Some(500_000));
}

#[test]
fn unknown_meta_survives() {
    use pretty_assertions::assert_eq;
    let odd = MetaMessage::new(0x60, [1, 2, 3]).unwrap();
    assert_eq!(odd.kind(), None);
    assert_eq!(odd.to_bytes(), alloc::vec![0xFF, 0x60, 0x03, 1, 2, 3]);
    assert!(MetaMessage::end_of_track().is_end_of_track());
    assert_eq!(MetaMessage::end_of_track().to_bytes(), alloc::vec![0xFF, 0x2F, 0x00]);
}

#[test]
fn sequence_number_is_big_endian() {
    let numbered = MetaMessage::new(0x00, [0x01, 0x02]).unwrap();
    assert_eq!(numbered.kind(), Some(MetaKind::SequenceNumber));
    assert_eq!(numbered.sequence_number(), Some(0x0102));
    assert_eq!(numbered.to_bytes(), alloc::vec![0xFF, 0x00, 0x02, 0x01, 0x02]);

    assert_eq!(MetaMessage::new(0x00, Vec::new()).unwrap().sequence_number(), None);
    assert_eq!(MetaMessage::tempo_event(500_000).sequence_number(), None);
}
