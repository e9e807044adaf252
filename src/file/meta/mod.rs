mod smpte_offset;
pub use smpte_offset::*;
