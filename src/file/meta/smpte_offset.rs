#![doc = r#"
SMPTE Offset, the `FF 54 05` meta event

Gives the SMPTE time at which a track is supposed to start. The payload is
five bytes:

```text
0rrhhhhh  minutes  seconds  frames  subframes
```

where `rr` is the frame rate (see [`SmpteFps::from_offset_bits`]) and
`hhhhh` the hour.
"#]

use crate::{SmpteError, file::SmpteFps};

/// A track's starting position in SMPTE time code.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// The frame rate for this offset.
    ///
    /// When the file itself uses SMPTE timing, the file's rate takes precedence.
    pub fps: SmpteFps,
    /// Hour component of the time code (0-23).
    pub hour: u8,
    /// Minute component of the time code (0-59).
    pub minute: u8,
    /// Second component of the time code (0-59).
    pub second: u8,
    /// Frame number within the current second.
    pub frame: u8,
    /// Hundredths of a frame (0-99).
    pub subframe: u8,
}

impl SmpteOffset {
    /// Length of the meta event payload
    pub const LEN: usize = 5;

    /// The offset in microseconds, computing frames with `fps` instead of the offset's own rate.
    pub const fn as_micros_with_override(&self, fps: SmpteFps) -> f64 {
        ((((self.hour as u64 * 3600) + (self.minute as u64) * 60 + self.second as u64) * 1_000_000)
            as f64)
            + ((self.frame as u64) * 1_000_000) as f64 / fps.as_f64()
            + ((self.subframe as u32) * 10_000) as f64 / fps.as_f64()
    }

    /// The offset in microseconds
    pub const fn as_micros(&self) -> f64 {
        self.as_micros_with_override(self.fps)
    }

    /// Parse the five payload bytes of the meta event.
    ///
    /// # Errors
    /// - [`SmpteError::Length`] if data is not exactly 5 bytes
    /// - [`SmpteError::TrackFrame`] if the frame rate bits are invalid
    /// - [`SmpteError::HourOffset`], [`SmpteError::MinuteOffset`],
    ///   [`SmpteError::SecondOffset`], [`SmpteError::Subframe`] for out of range fields
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        let &[rate_hour, minute, second, frame, subframe] = data else {
            return Err(SmpteError::Length(data.len()));
        };

        let fps = match SmpteFps::from_offset_bits(rate_hour >> 5) {
            Ok(fps) => fps,
            Err(e) => return Err(e),
        };
        let hour = rate_hour & 0b0001_1111;
        if hour > 23 {
            return Err(SmpteError::HourOffset(hour));
        }
        if minute > 59 {
            return Err(SmpteError::MinuteOffset(minute));
        }
        if second > 59 {
            return Err(SmpteError::SecondOffset(second));
        }
        if subframe > 99 {
            return Err(SmpteError::Subframe(subframe));
        }
        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// The five payload bytes
    pub const fn to_array(&self) -> [u8; Self::LEN] {
        [
            (self.fps.offset_bits() << 5) | (self.hour & 0b0001_1111),
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ]
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    // the bytes after 00 FF 54 05
    let bytes = [0x41, 0x17, 0x2D, 0x0C, 0x22];
    let offset = SmpteOffset::parse(&bytes).unwrap();

    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.hour, 1);
    assert_eq!(offset.minute, 23);
    assert_eq!(offset.second, 45);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 34);
    assert_eq!(offset.to_array(), bytes);
}

#[test]
fn parse_invalid_smpte_offset() {
    use pretty_assertions::assert_eq;
    let bytes = [0x7F, 0x17, 0x2D, 0x0C, 0x22];
    let err = SmpteOffset::parse(&bytes).unwrap_err();
    assert_eq!(err, SmpteError::HourOffset(31));

    let bytes = [0x41, 0x50, 0x2D, 0x0C, 0x22];
    let err = SmpteOffset::parse(&bytes).unwrap_err();
    assert_eq!(err, SmpteError::MinuteOffset(80));
}
