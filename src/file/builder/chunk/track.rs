use super::{ChunkReader, ChunkTag};
use crate::{
    ChunkError, TrackError,
    message::{
        Message, MetaMessage, SystemCommonMessage, SystemExclusiveMessage, TrackEvent,
        TrackEvents, TrackMessage,
        channel::{ChannelVoiceMessage, VoiceEvent},
    },
    vlq,
};
use alloc::vec::Vec;

#[doc = r#"
The `MTrk` chunk: a run of delta-timed events.

Events are decoded lazily with [`TrackChunk::events`], or all at once with
[`ChunkReader::read_message`].

# Example
```rust
# use midix_chunks::prelude::*;
// note on, then a note on using running status 96 ticks later, then end of track
let chunk = TrackChunk::new(vec![
    0x00, 0x90, 60, 100,
    0x60, 64, 100,
    0x00, 0xFF, 0x2F, 0x00,
])
.unwrap();
let events = chunk.read_message().unwrap();
let ticks: Vec<i64> = events.ticked().map(|t| t.accumulated_ticks()).collect();
assert_eq!(ticks, vec![0, 96, 96]);
assert!(events.has_end_of_track());
```
"#]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackChunk {
    length: u32,
    payload: Vec<u8>,
}

impl TrackChunk {
    /// Wrap a track payload. Nothing is decoded until asked for.
    ///
    /// Fails if the payload is too long for the chunk framing.
    pub fn new(payload: Vec<u8>) -> Result<Self, ChunkError> {
        let length = super::payload_length(ChunkTag::TRACK, payload.len())?;
        Ok(Self { length, payload })
    }

    /// The chunk holding `events`, written with explicit status bytes
    pub fn from_events(events: &TrackEvents) -> Result<Self, ChunkError> {
        Self::new(events.to_bytes())
    }

    /// Decode events one at a time.
    ///
    /// The iterator stops after the first error.
    pub fn events(&self) -> TrackEventIter<'_> {
        TrackEventIter::new(&self.payload)
    }
}

impl ChunkReader for TrackChunk {
    type Message = TrackEvents;

    fn tag(&self) -> ChunkTag {
        ChunkTag::TRACK
    }

    fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn length(&self) -> u32 {
        self.length
    }

    fn read_message(&self) -> Result<TrackEvents, ChunkError> {
        self.events().collect()
    }
}

/// Iterator returned from [`TrackChunk::events`]
#[derive(Debug, Clone)]
pub struct TrackEventIter<'a> {
    bytes: &'a [u8],
    offset: usize,
    running_status: Option<u8>,
    failed: bool,
}

impl<'a> TrackEventIter<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            running_status: None,
            failed: false,
        }
    }

    /// Offset of the next event within the payload
    pub const fn offset(&self) -> usize {
        self.offset
    }

    fn peek_u8(&self) -> Result<u8, TrackError> {
        self.bytes
            .get(self.offset)
            .copied()
            .ok_or(TrackError::UnexpectedEnd)
    }

    fn read_u8(&mut self) -> Result<u8, TrackError> {
        let byte = self.peek_u8()?;
        self.offset += 1;
        Ok(byte)
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], TrackError> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or(TrackError::UnexpectedEnd)?;
        let slice = self
            .bytes
            .get(self.offset..end)
            .ok_or(TrackError::UnexpectedEnd)?;
        self.offset = end;
        Ok(slice)
    }

    fn read_vlq(&mut self) -> Result<u32, TrackError> {
        let (value, len) = vlq::decode_at(self.bytes, self.offset)?;
        self.offset += len;
        Ok(value)
    }

    fn read_length_prefixed(&mut self) -> Result<&'a [u8], TrackError> {
        let len = self.read_vlq()?;
        self.read_slice(len as usize)
    }

    fn read_event(&mut self) -> Result<TrackEvent, TrackError> {
        let delta_ticks = self.read_vlq()?;

        let status = match self.peek_u8()? {
            byte if byte & 0x80 != 0 => {
                self.offset += 1;
                byte
            }
            _ => self.running_status.ok_or(TrackError::MissingRunningStatus)?,
        };

        let message = match status {
            0x80..=0xEF => {
                self.running_status = Some(status);
                let data = self.read_slice(VoiceEvent::data_len(status))?;
                TrackMessage::ChannelVoice(ChannelVoiceMessage::from_status(status, data)?)
            }
            0xF0 => {
                self.running_status = None;
                let data = self.read_length_prefixed()?;
                TrackMessage::SystemExclusive(SystemExclusiveMessage::new(data)?)
            }
            0xF7 => {
                self.running_status = None;
                let data = self.read_length_prefixed()?;
                TrackMessage::Escape(SystemExclusiveMessage::new(data)?)
            }
            0xFF => {
                self.running_status = None;
                let type_byte = self.read_u8()?;
                let data = self.read_length_prefixed()?;
                TrackMessage::Meta(MetaMessage::new(type_byte, data)?)
            }
            _ => {
                self.running_status = None;
                let data = self.read_slice(SystemCommonMessage::data_len(status))?;
                TrackMessage::SystemCommon(SystemCommonMessage::from_status(status, data))
            }
        };
        Ok(TrackEvent::new(delta_ticks, message))
    }
}

impl Iterator for TrackEventIter<'_> {
    type Item = Result<TrackEvent, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        let start = self.offset;
        match self.read_event() {
            Ok(event) => Some(Ok(event)),
            Err(error) => {
                self.failed = true;
                Some(Err(ChunkError::track(start, error)))
            }
        }
    }
}

#[cfg(test)]
fn decode(bytes: &[u8]) -> Result<Vec<TrackEvent>, ChunkError> {
    TrackChunk::new(bytes.to_vec()).unwrap().events().collect()
}

#[test]
fn running_status_reuses_channel_status() {
    use crate::message::channel::Channel;
    use pretty_assertions::assert_eq;
    let events = decode(&[0x00, 0x91, 60, 100, 0x10, 62, 90]).unwrap();
    assert_eq!(events.len(), 2);
    let TrackMessage::ChannelVoice(second) = events[1].message() else {
        panic!("expected a channel message, got {:?}", events[1]);
    };
    assert_eq!(second.channel(), Channel::Two);
    assert_eq!(
        second.event(),
        &VoiceEvent::NoteOn {
            key: 62,
            velocity: 90
        }
    );
}

#[test]
fn meta_and_sysex_cancel_running_status() {
    let err = decode(&[0x00, 0x90, 60, 100, 0x00, 0xFF, 0x01, 0x00, 0x00, 62, 90]).unwrap_err();
    assert_eq!(err, ChunkError::track(8, TrackError::MissingRunningStatus));

    let err = decode(&[0x00, 0xF0, 0x01, 0xF7, 0x00, 62, 90]).unwrap_err();
    assert_eq!(err, ChunkError::track(4, TrackError::MissingRunningStatus));
}

#[test]
fn decodes_every_status_family() {
    use pretty_assertions::assert_eq;
    let bytes = [
        0x00, 0xC2, 0x05, // program change
        0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7, // sysex
        0x00, 0xF7, 0x01, 0xF7, // escape
        0x00, 0xF2, 0x10, 0x01, // song position
        0x00, 0xF8, // clock
        0x83, 0x60, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo after 480 ticks
    ];
    let events = decode(&bytes).unwrap();
    let messages: Vec<_> = events.iter().map(TrackEvent::message).cloned().collect();
    assert_eq!(
        messages,
        alloc::vec![
            TrackMessage::ChannelVoice(ChannelVoiceMessage::from_status(0xC2, &[5]).unwrap()),
            TrackMessage::SystemExclusive(SystemExclusiveMessage::new([0x43, 0x12, 0xF7]).unwrap()),
            TrackMessage::Escape(SystemExclusiveMessage::new([0xF7]).unwrap()),
            TrackMessage::SystemCommon(SystemCommonMessage::SongPositionPointer {
                lsb: 0x10,
                msb: 0x01
            }),
            TrackMessage::SystemCommon(SystemCommonMessage::Other(0xF8)),
            TrackMessage::Meta(MetaMessage::tempo_event(500_000)),
        ]
    );
    assert_eq!(crate::message::TimedMessage::delta_time(&events[5]), 480);
}

#[test]
fn truncated_events_fail_with_offset() {
    assert_eq!(
        decode(&[0x00, 0x90, 60]).unwrap_err(),
        ChunkError::track(0, TrackError::UnexpectedEnd)
    );
    assert_eq!(
        decode(&[0x00, 0xFF, 0x01, 0x05, b'a']).unwrap_err(),
        ChunkError::track(0, TrackError::UnexpectedEnd)
    );
    assert_eq!(
        decode(&[0x00, 0xF8, 0x81]).unwrap_err(),
        ChunkError::track(2, TrackError::Vlq(vlq::VlqError::Truncated(1)))
    );
}

#[test]
fn events_round_trip_through_chunk() {
    use pretty_assertions::assert_eq;
    // running status is written back out explicitly
    let chunk =
        TrackChunk::new(alloc::vec![0x00, 0x90, 60, 100, 0x60, 60, 0x00, 0x00, 0xFF, 0x2F, 0x00])
            .unwrap();
    let events = chunk.read_message().unwrap();
    let rewritten = TrackChunk::from_events(&events).unwrap();
    assert_eq!(
        rewritten.payload(),
        &[0x00, 0x90, 60, 100, 0x60, 0x90, 60, 0x00, 0x00, 0xFF, 0x2F, 0x00]
    );
    assert_eq!(rewritten.read_message().unwrap(), events);
}
