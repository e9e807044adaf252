#![doc = r#"
Variable length quantities

Delta times and event lengths in a MIDI file are stored as big-endian groups of
seven bits. Every byte but the last has its top bit set:

```text
        0x00 => 00
        0x7F => 7F
        0x80 => 81 00
      0x3FFF => FF 7F
      0x4000 => 81 80 00
 0x0FFF_FFFF => FF FF FF 7F
 0x1000_0000 => 81 80 80 80 00
```

The encoder always picks the minimal number of groups. The decoder accepts
padded (non-minimal) encodings as long as they fit in five bytes.
"#]

use alloc::vec::Vec;
use core::ops::Deref;
use thiserror::Error;

/// The longest encoding of a `u32`.
pub const MAX_LEN: usize = 5;

const CONTINUATION: u8 = 0x80;
const GROUP: u32 = 0x7F;

/// Errors that occur decoding a variable length quantity
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VlqError {
    /// The buffer ran out while the continuation bit was still set
    #[error("ran out after {0} bytes with the continuation bit set")]
    Truncated(usize),
    /// The continuation bit was still set on the fifth byte
    #[error("encoding is longer than 5 bytes")]
    TooLong,
    /// Five groups were decoded into a value wider than 32 bits
    #[error("encoded value does not fit in 32 bits")]
    Overflow,
}

#[doc = r#"
An encoded quantity, held on the stack.

Dereferences to the encoded bytes.

# Example
```rust
# use midix_chunks::vlq;
assert_eq!(vlq::encode(0).as_bytes(), &[0x00u8]);
assert_eq!(vlq::encode(480).as_bytes(), &[0x83u8, 0x60]);
assert_eq!(vlq::decode(&[0x83, 0x60]), Ok((480, 2)));
```
"#]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Vlq {
    buf: [u8; MAX_LEN],
    len: u8,
}

impl Vlq {
    /// Encode a value
    pub const fn new(value: u32) -> Self {
        encode(value)
    }

    /// The encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    /// Number of encoded bytes, 1 through 5
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false, an encoding holds at least one byte.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Deref for Vlq {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Vlq {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<u32> for Vlq {
    fn from(value: u32) -> Self {
        encode(value)
    }
}

/// The number of bytes `value` takes once encoded.
pub const fn encoded_len(value: u32) -> usize {
    match value {
        0..0x80 => 1,
        0x80..0x4000 => 2,
        0x4000..0x20_0000 => 3,
        0x20_0000..0x1000_0000 => 4,
        _ => 5,
    }
}

/// Encode `value` using the minimal number of groups.
pub const fn encode(value: u32) -> Vlq {
    let len = encoded_len(value);
    let mut buf = [0; MAX_LEN];
    let mut i = 0;
    while i < len {
        let shift = 7 * (len - 1 - i);
        let group = ((value >> shift) & GROUP) as u8;
        // the terminal byte is the only one without the continuation bit,
        // including in the five byte case
        buf[i] = if i + 1 == len {
            group
        } else {
            group | CONTINUATION
        };
        i += 1;
    }
    Vlq {
        buf,
        len: len as u8,
    }
}

/// Append the encoding of `value` to `out`.
pub fn write_to(value: u32, out: &mut Vec<u8>) {
    out.extend_from_slice(&encode(value));
}

/// Decode a quantity from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode(bytes: &[u8]) -> Result<(u32, usize), VlqError> {
    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().take(MAX_LEN).enumerate() {
        value = (value << 7) | u64::from(byte & GROUP as u8);
        if byte & CONTINUATION == 0 {
            let value = u32::try_from(value).map_err(|_| VlqError::Overflow)?;
            return Ok((value, i + 1));
        }
    }
    if bytes.len() >= MAX_LEN {
        Err(VlqError::TooLong)
    } else {
        Err(VlqError::Truncated(bytes.len()))
    }
}

/// Decode a quantity starting at `offset`.
///
/// An offset at or past the end behaves like an empty buffer.
pub fn decode_at(bytes: &[u8], offset: usize) -> Result<(u32, usize), VlqError> {
    decode(bytes.get(offset..).unwrap_or_default())
}

#[test]
fn encodes_standard_table() {
    use pretty_assertions::assert_eq;
    let table: [(u32, &[u8]); 12] = [
        (0x00, &[0x00]),
        (0x40, &[0x40]),
        (0x7F, &[0x7F]),
        (0x80, &[0x81, 0x00]),
        (0x2000, &[0xC0, 0x00]),
        (0x3FFF, &[0xFF, 0x7F]),
        (0x4000, &[0x81, 0x80, 0x00]),
        (0x10_0000, &[0xC0, 0x80, 0x00]),
        (0x1F_FFFF, &[0xFF, 0xFF, 0x7F]),
        (0x20_0000, &[0x81, 0x80, 0x80, 0x00]),
        (0x800_0000, &[0xC0, 0x80, 0x80, 0x00]),
        (0xFFF_FFFF, &[0xFF, 0xFF, 0xFF, 0x7F]),
    ];
    for (value, bytes) in table {
        assert_eq!(encode(value).as_bytes(), bytes, "encoding {value:#x}");
        assert_eq!(decode(bytes), Ok((value, bytes.len())), "decoding {value:#x}");
    }
}

#[test]
fn five_byte_terminal_has_clear_top_bit() {
    use pretty_assertions::assert_eq;
    assert_eq!(encode(0x1000_0000).as_bytes(), &[0x81, 0x80, 0x80, 0x80, 0x00]);
    assert_eq!(encode(u32::MAX).as_bytes(), &[0x8F, 0xFF, 0xFF, 0xFF, 0x7F]);
    assert_eq!(decode(&encode(0x1000_0000)), Ok((0x1000_0000, 5)));
    assert_eq!(decode(&encode(u32::MAX)), Ok((u32::MAX, 5)));
}

#[test]
fn decode_stops_at_terminal_byte() {
    assert_eq!(decode(&[0x81, 0x00, 0x55, 0x66]), Ok((0x80, 2)));
    assert_eq!(decode_at(&[0x99, 0x83, 0x60, 0x00], 1), Ok((480, 2)));
}

#[test]
fn decode_rejects_bad_input() {
    assert_eq!(decode(&[]), Err(VlqError::Truncated(0)));
    assert_eq!(decode(&[0x81, 0x80]), Err(VlqError::Truncated(2)));
    assert_eq!(decode_at(&[0x00], 4), Err(VlqError::Truncated(0)));
    assert_eq!(decode(&[0x80; 6]), Err(VlqError::TooLong));
    assert_eq!(decode(&[0x80, 0x80, 0x80, 0x80, 0x80]), Err(VlqError::TooLong));
    assert_eq!(decode(&[0x90, 0x80, 0x80, 0x80, 0x00]), Err(VlqError::Overflow));
}

#[test]
fn decode_accepts_padded_encoding() {
    assert_eq!(decode(&[0x80, 0x80, 0x00]), Ok((0, 3)));
    assert_eq!(decode(&[0x80, 0x81, 0x00]), Ok((0x80, 3)));
}
