#![doc = r#"
# midix-chunks

Read and write the chunk container of a Standard MIDI File.

A Standard MIDI File is a run of chunks. Each one is a four byte tag, a
big-endian `u32` length and that many payload bytes. This crate

- pulls chunks off any byte stream ([`ChunkStream`](crate::reader::ChunkStream)),
- picks a typed representation from the tag ([`Chunk`](crate::file::builder::chunk::Chunk)),
  keeping chunks it does not know about untouched,
- decodes payloads into [`Message`](crate::message::Message)s that serialize back to bytes,
- encodes and decodes the variable-length quantities used for delta times ([`vlq`]).

Delta times are relative. Absolute positions come from folding them with
[`accumulate_all`](crate::message::accumulate_all), never from the messages themselves.

## Example
```rust
use midix_chunks::prelude::*;

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 8,
    0x00, 0x90, 60, 100,
    0x60, 0xFF, 0x2F, 0x00,
];

let file = MidiFile::parse(&bytes).unwrap();
assert_eq!(file.header().timing().unwrap().ticks_per_quarter_note(), Some(96));

let ticks: Vec<i64> = file.tracks()[0]
    .ticked()
    .map(|event| event.accumulated_ticks())
    .collect();
assert_eq!(ticks, vec![0, 96]);

assert_eq!(file.to_bytes().unwrap(), bytes);
```

## Features
- `std` (default): stream reading through [`std::io::Read`]. Without it the crate is `no_std` + `alloc`.
- `serde`: `Serialize`/`Deserialize` for the data types.
- `tracing`: log skipped chunks and suspicious files.
"#]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod error;
pub use error::*;

pub mod vlq;

pub mod message;

pub mod file;

#[cfg(feature = "std")]
pub mod reader;

#[doc = r#"
Common re-exports
"#]
pub mod prelude {
    pub use crate::{
        error::*,
        file::{builder::chunk::*, builder::*, *},
        message::{channel::*, *},
        vlq::{self, Vlq, VlqError},
    };

    #[cfg(feature = "std")]
    pub use crate::reader::*;
}
