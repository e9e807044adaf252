mod smpte;
pub use smpte::*;

use crate::SmpteError;

/// The header timing type.
///
/// This is either the number of ticks per quarter note or
/// the alternative SMPTE format, selected by the top bit of the header's division word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// The file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(u16),

    /// The file's delta times are defined using SMPTE frames
    Smpte {
        /// Frames per second
        fps: SmpteFps,
        /// Subdivisions of a frame
        ticks_per_frame: u8,
    },
}

impl Timing {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// The leading bit of the u16 is disregarded, so 1-32767
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        Self::TicksPerQuarterNote(tpqn & 0x7FFF)
    }

    /// Define the timing in terms of fps and ticks per frame
    pub const fn new_smpte(fps: SmpteFps, ticks_per_frame: u8) -> Self {
        Self::Smpte {
            fps,
            ticks_per_frame,
        }
    }

    /// Interpret a division word from the header
    pub const fn from_division(division: u16) -> Result<Self, SmpteError> {
        let [hi, lo] = division.to_be_bytes();
        if hi >> 7 == 0 {
            return Ok(Self::TicksPerQuarterNote(division));
        }
        // the high byte is a negative frame rate in two's complement
        match SmpteFps::from_division_byte(hi as i8) {
            Ok(fps) => Ok(Self::new_smpte(fps, lo)),
            Err(e) => Err(e),
        }
    }

    /// The division word this timing is written as
    pub const fn division(&self) -> u16 {
        match self {
            Self::TicksPerQuarterNote(tpqn) => *tpqn & 0x7FFF,
            Self::Smpte {
                fps,
                ticks_per_frame,
            } => u16::from_be_bytes([fps.as_division_byte() as u8, *ticks_per_frame]),
        }
    }

    /// Returns Some if the timing is defined as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            _ => None,
        }
    }
}

#[test]
fn smpte_division() {
    // -25 fps, 40 ticks per frame
    let timing = Timing::from_division(0xE728).unwrap();
    assert_eq!(timing, Timing::new_smpte(SmpteFps::TwentyFive, 40));
    assert_eq!(timing.division(), 0xE728);
    assert_eq!(timing.ticks_per_quarter_note(), None);

    assert_eq!(
        Timing::from_division(0xE028),
        Err(SmpteError::HeaderFrameTime(-32))
    );
}

#[test]
fn tpqn_division() {
    let timing = Timing::from_division(96).unwrap();
    assert_eq!(timing.ticks_per_quarter_note(), Some(96));
    assert_eq!(Timing::new_ticks_per_quarter_note(0x81E0), Timing::TicksPerQuarterNote(480));
}
