#![doc = r#"
Messages decoded out of chunk payloads

Every chunk reader produces something implementing [`Message`]: a value that
can write itself back to canonical bytes. Payloads the crate does not
understand are kept as an [`OpaqueMessage`] and written back untouched.

# Hierarchy
```text
                 |---------|
                 | Message |
                 |---------|
                /     |     \
|---------------| |--------| |---------------|
| HeaderMessage | | Opaque | | TimedMessage  |
|---------------| |--------| |---------------|
                              /            \
                      |-----------|  |------------|
                      | DeltaTime |  | TrackEvent |
                      |-----------|  |------------|
```
"#]

pub mod channel;

mod meta;
pub use meta::*;

mod timed;
pub use timed::*;

mod track;
pub use track::*;

use crate::TrackError;
use alloc::{string::String, vec::Vec};

/// The length prefix for `len` bytes of event data
pub(crate) fn data_length(len: usize) -> Result<u32, TrackError> {
    u32::try_from(len).map_err(|_| TrackError::DataTooLong(len))
}

/// A decoded unit that can be serialized back to bytes.
///
/// The output is semantically equivalent to what was parsed, but not always
/// byte-identical: delta times are re-encoded minimally and running status
/// is expanded.
pub trait Message {
    /// The canonical serialized form
    fn to_bytes(&self) -> Vec<u8>;

    /// [`Message::to_bytes`] as lowercase hex, two digits per byte
    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl<T: Message + ?Sized> Message for &T {
    fn to_bytes(&self) -> Vec<u8> {
        (**self).to_bytes()
    }
}

/// A payload passed through without interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpaqueMessage {
    data: Vec<u8>,
}

impl OpaqueMessage {
    /// Wrap some bytes
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
    /// The wrapped bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    /// Take the wrapped bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl Message for OpaqueMessage {
    fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }
}

#[test]
fn opaque_passes_bytes_through() {
    use pretty_assertions::assert_eq;
    let message = OpaqueMessage::new([0xDE, 0xAD, 0x00, 0x7F]);
    assert_eq!(message.to_bytes(), alloc::vec![0xDE, 0xAD, 0x00, 0x7F]);
    assert_eq!(message.to_hex(), "dead007f");
}

#[test]
fn event_data_needs_a_u32_length() {
    assert_eq!(data_length(0), Ok(0));
    assert_eq!(data_length(u32::MAX as usize), Ok(u32::MAX));
    #[cfg(target_pointer_width = "64")]
    assert_eq!(
        data_length(u32::MAX as usize + 1),
        Err(TrackError::DataTooLong(u32::MAX as usize + 1))
    );
}
