use crate::{HeaderError, SmpteError, message::Message, prelude::*};
use alloc::vec::Vec;

#[doc = r#"
The content of the `MThd` chunk: format type, track count and division.

Exactly six bytes, three big-endian words. This is only the payload;
the `MThd` tag and length belong to the chunk layer (see
[`ChunkHeader`](crate::file::builder::chunk::ChunkHeader)).

# Example
```rust
# use midix_chunks::prelude::*;
let header = HeaderMessage::new(FormatType::Simultaneous, 4, 480);
let bytes = header.to_bytes();
assert_eq!(bytes, vec![0x00, 0x01, 0x00, 0x04, 0x01, 0xE0]);
assert_eq!(HeaderMessage::parse(&bytes), Ok(header));
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderMessage {
    format_type: FormatType,
    track_count: u16,
    division: u16,
}

impl HeaderMessage {
    /// Length of the header payload
    pub const LEN: usize = 6;

    /// Create a header from its fields
    pub const fn new(format_type: FormatType, track_count: u16, division: u16) -> Self {
        Self {
            format_type,
            track_count,
            division,
        }
    }

    /// Create a header from raw words, checking the format type
    pub fn from_raw(format_type: u16, track_count: u16, division: u16) -> Result<Self, HeaderError> {
        let format_type =
            FormatType::try_from(format_type).map_err(|_| HeaderError::FormatType(format_type))?;
        Ok(Self::new(format_type, track_count, division))
    }

    /// Parse a six byte header payload
    pub fn parse(bytes: &[u8]) -> Result<Self, HeaderError> {
        let &[f0, f1, t0, t1, d0, d1] = bytes else {
            return Err(HeaderError::Length(bytes.len()));
        };
        Self::from_raw(
            u16::from_be_bytes([f0, f1]),
            u16::from_be_bytes([t0, t1]),
            u16::from_be_bytes([d0, d1]),
        )
    }

    /// The format type
    pub const fn format_type(&self) -> FormatType {
        self.format_type
    }

    /// The number of track chunks the file claims to hold
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// The raw division word. When [`Timing`] is ticks per quarter note this is
    /// the resolution.
    pub const fn division(&self) -> u16 {
        self.division
    }

    /// Interpret the division word
    pub fn timing(&self) -> Result<Timing, SmpteError> {
        Timing::from_division(self.division)
    }

    /// The six payload bytes
    pub const fn to_array(&self) -> [u8; Self::LEN] {
        let [f0, f1] = (self.format_type as u16).to_be_bytes();
        let [t0, t1] = self.track_count.to_be_bytes();
        let [d0, d1] = self.division.to_be_bytes();
        [f0, f1, t0, t1, d0, d1]
    }
}

impl Message for HeaderMessage {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_array().to_vec()
    }
}

#[test]
fn header_round_trip() {
    use pretty_assertions::assert_eq;
    let built = HeaderMessage::from_raw(1, 4, 480).unwrap();
    let parsed = HeaderMessage::parse(&built.to_bytes()).unwrap();
    assert_eq!(parsed, built);
    assert_eq!(parsed.format_type(), FormatType::Simultaneous);
    assert_eq!(parsed.track_count(), 4);
    assert_eq!(parsed.division(), 480);
    assert_eq!(parsed.timing(), Ok(Timing::TicksPerQuarterNote(480)));
}

#[test]
fn header_rejects_bad_payloads() {
    assert_eq!(HeaderMessage::parse(&[0; 5]), Err(HeaderError::Length(5)));
    assert_eq!(HeaderMessage::parse(&[0; 7]), Err(HeaderError::Length(7)));
    assert_eq!(
        HeaderMessage::parse(&[0, 3, 0, 1, 0, 96]),
        Err(HeaderError::FormatType(3))
    );
}
