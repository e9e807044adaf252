use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
How the tracks of a file relate to each other, the first word of the header.

Stored big-endian as `0`, `1` or `2`.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0: one track holding every channel
    SingleMultiChannel = 0,
    /// Format 1: tracks played together
    Simultaneous = 1,
    /// Format 2: independent sequences
    SequentiallyIndependent = 2,
}

#[test]
fn format_numbers() {
    assert_eq!(FormatType::try_from(1u16).ok(), Some(FormatType::Simultaneous));
    assert!(FormatType::try_from(3u16).is_err());
    assert_eq!(u16::from(FormatType::SequentiallyIndependent), 2);
}
