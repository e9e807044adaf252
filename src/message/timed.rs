use super::Message;
use crate::vlq::{self, Vlq};
use alloc::vec::Vec;

#[doc = r#"
A message positioned relative to the one before it.

Only the delta is stored. Absolute time depends on the position of the message
in its sequence, so it is computed by walking the sequence, see
[`accumulate_all`].
"#]
pub trait TimedMessage: Message {
    /// Ticks since the previous message in the sequence
    fn delta_time(&self) -> u32;

    /// The delta time as a variable length quantity
    fn delta_time_as_bytes(&self) -> Vlq {
        vlq::encode(self.delta_time())
    }

    /// The absolute time of this message, given the absolute time of the previous one.
    fn accumulate(&self, previous: i64) -> i64 {
        previous + i64::from(self.delta_time())
    }
}

impl<T: TimedMessage + ?Sized> TimedMessage for &T {
    fn delta_time(&self) -> u32 {
        (**self).delta_time()
    }
}

#[doc = r#"
A bare delta time with no event attached.

Serializes to the encoded delta alone.

# Example
```rust
# use midix_chunks::prelude::*;
let delta = DeltaTime::new(200);
assert_eq!(delta.to_bytes(), vec![0x81, 0x48]);
assert_eq!(delta.accumulate(1000), 1200);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeltaTime(u32);

impl DeltaTime {
    /// Create a delta of some ticks
    pub const fn new(ticks: u32) -> Self {
        Self(ticks)
    }
    /// Decode a delta from the front of `bytes`, returning it and the bytes consumed.
    pub fn parse(bytes: &[u8]) -> Result<(Self, usize), vlq::VlqError> {
        vlq::decode(bytes).map(|(ticks, len)| (Self(ticks), len))
    }
    /// The ticks
    pub const fn ticks(&self) -> u32 {
        self.0
    }
}

impl Message for DeltaTime {
    fn to_bytes(&self) -> Vec<u8> {
        self.delta_time_as_bytes().to_vec()
    }
}

impl TimedMessage for DeltaTime {
    fn delta_time(&self) -> u32 {
        self.0
    }
}

/// An event paired with its absolute time in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticked<T> {
    accumulated_ticks: i64,
    event: T,
}

impl<T> Ticked<T> {
    /// Pair an event with a time
    pub const fn new(accumulated_ticks: i64, event: T) -> Self {
        Self {
            accumulated_ticks,
            event,
        }
    }
    /// Absolute ticks from the start of the sequence
    pub const fn accumulated_ticks(&self) -> i64 {
        self.accumulated_ticks
    }
    /// The event
    pub const fn event(&self) -> &T {
        &self.event
    }
    /// Take the event
    pub fn into_event(self) -> T {
        self.event
    }
}

#[doc = r#"
Walk a sequence of timed messages, pairing each with its absolute time.

Each message's absolute time is the previous one's plus its delta; the first
is `start` plus its delta.

# Example
```rust
# use midix_chunks::prelude::*;
let deltas = [DeltaTime::new(0), DeltaTime::new(96), DeltaTime::new(48)];
let times: Vec<i64> = accumulate_all(&deltas, 0)
    .map(|t| t.accumulated_ticks())
    .collect();
assert_eq!(times, vec![0, 96, 144]);
```
"#]
pub fn accumulate_all<I>(messages: I, start: i64) -> Accumulate<I::IntoIter>
where
    I: IntoIterator,
    I::Item: TimedMessage,
{
    Accumulate {
        inner: messages.into_iter(),
        current: start,
    }
}

/// Iterator returned from [`accumulate_all`]
#[derive(Debug, Clone)]
pub struct Accumulate<I> {
    inner: I,
    current: i64,
}

impl<I> Accumulate<I> {
    /// The absolute time of the last message yielded
    pub const fn current(&self) -> i64 {
        self.current
    }
}

impl<I> Iterator for Accumulate<I>
where
    I: Iterator,
    I::Item: TimedMessage,
{
    type Item = Ticked<I::Item>;
    fn next(&mut self) -> Option<Self::Item> {
        let message = self.inner.next()?;
        self.current = message.accumulate(self.current);
        Some(Ticked::new(self.current, message))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[test]
fn accumulates_in_sequence_order() {
    use pretty_assertions::assert_eq;
    let deltas = [DeltaTime::new(0), DeltaTime::new(96), DeltaTime::new(48)];
    let ticked: Vec<_> = accumulate_all(deltas, 0).collect();
    assert_eq!(
        ticked,
        alloc::vec![
            Ticked::new(0, DeltaTime::new(0)),
            Ticked::new(96, DeltaTime::new(96)),
            Ticked::new(144, DeltaTime::new(48)),
        ]
    );
}

#[test]
fn accumulates_from_offset() {
    let mut iter = accumulate_all([DeltaTime::new(10), DeltaTime::new(5)], 1_000);
    assert_eq!(iter.next().map(|t| t.accumulated_ticks()), Some(1_010));
    assert_eq!(iter.current(), 1_010);
    assert_eq!(iter.next().map(|t| t.accumulated_ticks()), Some(1_015));
    assert_eq!(iter.next(), None);
}

#[test]
fn bare_delta_serializes_alone() {
    let delta = DeltaTime::new(0x1000_0000);
    assert_eq!(delta.to_bytes(), alloc::vec![0x81, 0x80, 0x80, 0x80, 0x00]);
    assert_eq!(DeltaTime::parse(&[0x00, 0x90]), Ok((DeltaTime::new(0), 1)));
}
