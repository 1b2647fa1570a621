//! Small, dependency-free traits for encoding/decoding values to/from in-memory buffers.

mod buf;
mod coding;

pub use buf::*;
pub use coding::*;
