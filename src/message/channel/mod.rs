#![doc = r#"
Contains all Channel Message types

A channel message is a status byte (`0x80..=0xEF`) whose low nibble names one of
sixteen channels, followed by one or two 7-bit data bytes.

# Hierarchy
```text
                |-----------------------|
                | Channel Voice Message |
                |-----------------------|
                 /                     \
       |---------|              |------------|
       | Channel |              | VoiceEvent |
       |---------|              |------------|
```
"#]

use crate::TrackError;
use alloc::vec::Vec;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// One of the sixteen MIDI channels. `One` is encoded as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Channel {
    One = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    /// The channel named by the low nibble of `byte`.
    pub const fn from_nibble(byte: u8) -> Self {
        use Channel::*;
        match byte & 0x0F {
            0 => One,
            1 => Two,
            2 => Three,
            3 => Four,
            4 => Five,
            5 => Six,
            6 => Seven,
            7 => Eight,
            8 => Nine,
            9 => Ten,
            10 => Eleven,
            11 => Twelve,
            12 => Thirteen,
            13 => Fourteen,
            14 => Fifteen,
            _ => Sixteen,
        }
    }

    /// The low nibble of a status byte
    pub const fn to_nibble(self) -> u8 {
        self as u8
    }
}

#[doc = r#"
The event carried by a channel voice message.

All values are 7 bits.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceEvent {
    /// `0x8n`
    NoteOff {
        /// The key
        key: u8,
        /// Release velocity
        velocity: u8,
    },
    /// `0x9n`. A velocity of zero is conventionally a note off.
    NoteOn {
        /// The key
        key: u8,
        /// Strike velocity
        velocity: u8,
    },
    /// `0xAn`, polyphonic key pressure
    Aftertouch {
        /// The key
        key: u8,
        /// Pressure
        velocity: u8,
    },
    /// `0xBn`. Controllers 120 through 127 are channel mode messages.
    ControlChange {
        /// The controller number
        controller: u8,
        /// New value
        value: u8,
    },
    /// `0xCn`
    ProgramChange {
        /// The program number
        program: u8,
    },
    /// `0xDn`
    ChannelPressureAfterTouch {
        /// Pressure
        velocity: u8,
    },
    /// `0xEn`, least significant byte first on the wire
    PitchBend {
        /// Low 7 bits
        lsb: u8,
        /// High 7 bits
        msb: u8,
    },
}

impl VoiceEvent {
    /// Number of data bytes following a channel status byte
    pub const fn data_len(status: u8) -> usize {
        match status >> 4 {
            0xC | 0xD => 1,
            _ => 2,
        }
    }

    /// The high nibble of the status byte
    pub const fn status_nibble(&self) -> u8 {
        use VoiceEvent::*;
        match self {
            NoteOff { .. } => 0x8,
            NoteOn { .. } => 0x9,
            Aftertouch { .. } => 0xA,
            ControlChange { .. } => 0xB,
            ProgramChange { .. } => 0xC,
            ChannelPressureAfterTouch { .. } => 0xD,
            PitchBend { .. } => 0xE,
        }
    }

    /// The combined 14-bit value of a pitch bend. `0x2000` is centered.
    pub const fn pitch_bend(&self) -> Option<u16> {
        match self {
            Self::PitchBend { lsb, msb } => Some(((*msb as u16) << 7) | *lsb as u16),
            _ => None,
        }
    }

    /// True for control changes on controllers 120 and up
    pub const fn is_channel_mode(&self) -> bool {
        matches!(self, Self::ControlChange { controller, .. } if *controller >= 120)
    }
}

/// A channel voice message: a channel and the event sent on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelVoiceMessage {
    channel: Channel,
    event: VoiceEvent,
}

impl ChannelVoiceMessage {
    /// Create a new channel voice message
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// Decode from a status byte in `0x80..=0xEF` and its data bytes.
    ///
    /// `data` must hold [`VoiceEvent::data_len`] bytes.
    pub fn from_status(status: u8, data: &[u8]) -> Result<Self, TrackError> {
        if let Some(&bad) = data.iter().find(|b| **b & 0x80 != 0) {
            return Err(TrackError::InvalidDataByte(bad));
        }
        let first = data.first().copied().ok_or(TrackError::UnexpectedEnd)?;
        let second = || data.get(1).copied().ok_or(TrackError::UnexpectedEnd);

        use VoiceEvent::*;
        let event = match status >> 4 {
            0x8 => NoteOff {
                key: first,
                velocity: second()?,
            },
            0x9 => NoteOn {
                key: first,
                velocity: second()?,
            },
            0xA => Aftertouch {
                key: first,
                velocity: second()?,
            },
            0xB => ControlChange {
                controller: first,
                value: second()?,
            },
            0xC => ProgramChange { program: first },
            0xD => ChannelPressureAfterTouch { velocity: first },
            _ => PitchBend {
                lsb: first,
                msb: second()?,
            },
        };
        Ok(Self::new(Channel::from_nibble(status), event))
    }

    /// The channel
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The event
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }

    /// The status byte, event in the high nibble and channel in the low.
    pub const fn status(&self) -> u8 {
        (self.event.status_nibble() << 4) | self.channel.to_nibble()
    }

    /// Status byte followed by the data bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        use VoiceEvent::*;
        let status = self.status();
        match self.event {
            NoteOff { key, velocity } | NoteOn { key, velocity } | Aftertouch { key, velocity } => {
                alloc::vec![status, key, velocity]
            }
            ControlChange { controller, value } => alloc::vec![status, controller, value],
            ProgramChange { program } => alloc::vec![status, program],
            ChannelPressureAfterTouch { velocity } => alloc::vec![status, velocity],
            PitchBend { lsb, msb } => alloc::vec![status, lsb, msb],
        }
    }
}

#[test]
fn decodes_voice_messages() {
    use pretty_assertions::assert_eq;
    let on = ChannelVoiceMessage::from_status(0x93, &[60, 100]).unwrap();
    assert_eq!(on.channel(), Channel::Four);
    assert_eq!(
        on.event(),
        &VoiceEvent::NoteOn {
            key: 60,
            velocity: 100
        }
    );
    assert_eq!(on.to_bytes(), alloc::vec![0x93, 60, 100]);

    let program = ChannelVoiceMessage::from_status(0xCF, &[5]).unwrap();
    assert_eq!(program.channel(), Channel::Sixteen);
    assert_eq!(program.to_bytes(), alloc::vec![0xCF, 5]);

    let bend = ChannelVoiceMessage::from_status(0xE0, &[0x00, 0x40]).unwrap();
    assert_eq!(bend.event().pitch_bend(), Some(0x2000));
}

#[test]
fn rejects_status_bit_in_data() {
    assert_eq!(
        ChannelVoiceMessage::from_status(0x90, &[60, 0x80]),
        Err(TrackError::InvalidDataByte(0x80))
    );
    assert_eq!(
        ChannelVoiceMessage::from_status(0x90, &[60]),
        Err(TrackError::UnexpectedEnd)
    );
}

#[test]
fn channel_mode_controllers() {
    let reset = ChannelVoiceMessage::from_status(0xB0, &[121, 0]).unwrap();
    assert!(reset.event().is_channel_mode());
    let volume = ChannelVoiceMessage::from_status(0xB0, &[7, 100]).unwrap();
    assert!(!volume.event().is_channel_mode());
    assert_eq!(Channel::try_from(9u8).ok(), Some(Channel::Ten));
    assert!(Channel::try_from(16u8).is_err());
    assert_eq!(u8::from(Channel::Ten), 9);
}
