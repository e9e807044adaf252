use super::{Accumulate, Message, MetaMessage, TimedMessage, accumulate_all, channel::ChannelVoiceMessage};
use crate::{TrackError, vlq};
use alloc::vec::Vec;

/// The data of a sysex (`F0`) or escape (`F7`) event, without its length prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemExclusiveMessage {
    data: Vec<u8>,
}

impl SystemExclusiveMessage {
    /// Wrap event data, rejecting anything too long for its length prefix.
    pub fn new(data: impl Into<Vec<u8>>) -> Result<Self, TrackError> {
        let data = data.into();
        super::data_length(data.len())?;
        Ok(Self { data })
    }
    /// The data bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    /// Take the data bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    fn to_bytes(&self, status: u8) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() + 1 + vlq::MAX_LEN);
        bytes.push(status);
        // checked in `new`
        vlq::write_to(self.data.len() as u32, &mut bytes);
        bytes.extend_from_slice(&self.data);
        bytes
    }
}

/// System common messages. These rarely appear in files, but are legal in a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemCommonMessage {
    /// `F1`
    TimeCodeQuarterFrame(u8),
    /// `F2`, a 14-bit position in MIDI beats
    SongPositionPointer {
        /// Low 7 bits
        lsb: u8,
        /// High 7 bits
        msb: u8,
    },
    /// `F3`
    SongSelect(u8),
    /// A status with no data bytes (`F4`..`FE` other than `F7`)
    Other(u8),
}

impl SystemCommonMessage {
    /// Number of data bytes following a system status byte
    pub const fn data_len(status: u8) -> usize {
        match status {
            0xF1 | 0xF3 => 1,
            0xF2 => 2,
            _ => 0,
        }
    }

    pub(crate) fn from_status(status: u8, data: &[u8]) -> Self {
        match (status, data) {
            (0xF1, &[value, ..]) => Self::TimeCodeQuarterFrame(value),
            (0xF2, &[lsb, msb, ..]) => Self::SongPositionPointer { lsb, msb },
            (0xF3, &[song, ..]) => Self::SongSelect(song),
            (status, _) => Self::Other(status),
        }
    }

    /// Status byte followed by data bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            Self::TimeCodeQuarterFrame(value) => alloc::vec![0xF1, value],
            Self::SongPositionPointer { lsb, msb } => alloc::vec![0xF2, lsb, msb],
            Self::SongSelect(song) => alloc::vec![0xF3, song],
            Self::Other(status) => alloc::vec![status],
        }
    }
}

/// The body of a track event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage {
    /// `8n` through `En`
    ChannelVoice(ChannelVoiceMessage),
    /// `F0 length data`. The data includes the trailing `F7` if present.
    SystemExclusive(SystemExclusiveMessage),
    /// `F7 length data`, a sysex continuation or escaped bytes
    Escape(SystemExclusiveMessage),
    /// `F1` through `FE`, other than `F7`
    SystemCommon(SystemCommonMessage),
    /// `FF type length data`
    Meta(MetaMessage),
}

impl TrackMessage {
    /// Serialize with an explicit status byte
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::ChannelVoice(message) => message.to_bytes(),
            Self::SystemExclusive(message) => message.to_bytes(0xF0),
            Self::Escape(message) => message.to_bytes(0xF7),
            Self::SystemCommon(message) => message.to_bytes(),
            Self::Meta(message) => message.to_bytes(),
        }
    }
}

#[doc = r#"
An event in a track chunk: a delta time and a message.

# Example
```rust
# use midix_chunks::prelude::*;
let note = TrackEvent::new(
    96,
    TrackMessage::ChannelVoice(ChannelVoiceMessage::new(
        Channel::One,
        VoiceEvent::NoteOn { key: 60, velocity: 64 },
    )),
);
assert_eq!(note.to_bytes(), vec![0x60, 0x90, 60, 64]);
assert_eq!(note.accumulate(48), 144);
```
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta_ticks: u32,
    message: TrackMessage,
}

impl TrackEvent {
    /// Create a new track event
    pub const fn new(delta_ticks: u32, message: TrackMessage) -> Self {
        Self {
            delta_ticks,
            message,
        }
    }
    /// The message
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }
    /// Take the message
    pub fn into_message(self) -> TrackMessage {
        self.message
    }
}

impl Message for TrackEvent {
    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.delta_time_as_bytes().to_vec();
        bytes.extend(self.message.to_bytes());
        bytes
    }
}

impl TimedMessage for TrackEvent {
    fn delta_time(&self) -> u32 {
        self.delta_ticks
    }
}

/// The ordered events of one track chunk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvents {
    events: Vec<TrackEvent>,
}

impl TrackEvents {
    /// Wrap a list of events
    pub fn new(events: Vec<TrackEvent>) -> Self {
        Self { events }
    }
    /// The events, in file order
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }
    /// Take the events
    pub fn into_events(self) -> Vec<TrackEvent> {
        self.events
    }
    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }
    /// True if the track holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
    /// The events paired with their absolute tick, starting from zero.
    pub fn ticked(&self) -> Accumulate<core::slice::Iter<'_, TrackEvent>> {
        accumulate_all(&self.events, 0)
    }
    /// Absolute tick of the last event
    pub fn duration(&self) -> i64 {
        self.events.iter().fold(0, |time, event| event.accumulate(time))
    }
    /// True if the last event is an end of track meta event
    pub fn has_end_of_track(&self) -> bool {
        matches!(
            self.events.last().map(TrackEvent::message),
            Some(TrackMessage::Meta(meta)) if meta.is_end_of_track()
        )
    }
}

impl Message for TrackEvents {
    fn to_bytes(&self) -> Vec<u8> {
        self.events.iter().flat_map(|event| event.to_bytes()).collect()
    }
}

impl<'a> IntoIterator for &'a TrackEvents {
    type Item = &'a TrackEvent;
    type IntoIter = core::slice::Iter<'a, TrackEvent>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl IntoIterator for TrackEvents {
    type Item = TrackEvent;
    type IntoIter = alloc::vec::IntoIter<TrackEvent>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl FromIterator<TrackEvent> for TrackEvents {
    fn from_iter<T: IntoIterator<Item = TrackEvent>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[test]
fn system_messages_serialize_with_status() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        TrackMessage::SystemExclusive(SystemExclusiveMessage::new([0x43, 0x12, 0xF7]).unwrap())
            .to_bytes(),
        alloc::vec![0xF0, 0x03, 0x43, 0x12, 0xF7]
    );
    assert_eq!(
        TrackMessage::Escape(SystemExclusiveMessage::default()).to_bytes(),
        alloc::vec![0xF7, 0x00]
    );
    assert_eq!(
        SystemCommonMessage::from_status(0xF2, &[0x10, 0x01]).to_bytes(),
        alloc::vec![0xF2, 0x10, 0x01]
    );
    assert_eq!(SystemCommonMessage::from_status(0xF6, &[]), SystemCommonMessage::Other(0xF6));
}

#[test]
fn track_duration_and_end_marker() {
    let events: TrackEvents = [
        TrackEvent::new(0, TrackMessage::Meta(MetaMessage::tempo_event(500_000))),
        TrackEvent::new(96, TrackMessage::SystemCommon(SystemCommonMessage::Other(0xF8))),
        TrackEvent::new(48, TrackMessage::Meta(MetaMessage::end_of_track())),
    ]
    .into_iter()
    .collect();
    assert_eq!(events.duration(), 144);
    assert!(events.has_end_of_track());
    let ticks: Vec<i64> = events.ticked().map(|t| t.accumulated_ticks()).collect();
    assert_eq!(ticks, alloc::vec![0, 96, 144]);
}
