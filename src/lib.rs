#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! A streaming WebM/Matroska container demuxer and muxer.
//!
//! [`demux::Demuxer`] incrementally parses an EBML/Matroska byte stream, handed in via
//! [`demux::Demuxer::push`], into top-level elements. [`mux::Muxer`] accepts timestamped coded
//! frames per track and assembles a complete WebM Segment.

/// Error types for this crate.
mod error;
mod functional;
pub use error::*;

/// I/O utilities.
pub mod io;

/// base types for Matroska elements. ie. `VInt64`, `Header`, etc.
mod base;
/// Bit-level element ID/size/kind lookup table used by the demuxer.
mod schema;
/// Enumerated leaf element values (`TrackType`, `CodecId`, `FlagInterlaced`, etc).
mod enums;
/// Leaf elements in Matroska.
mod leaf;
/// Concrete leaf elements declared with the `leaf_element!` macro.
mod leaf_elements;
/// Master elements in Matroska.
mod master;
/// The `SimpleBlock` element and its lacing rules.
mod block;
/// Codec-specific bitstream inspection (keyframe detection, Opus header construction).
mod codec;
/// Supplementary elements in Matroska. Void elements, CRC-32, etc.
///
/// These elements are not from the Matroska specification, but Matroska specifications inherit them from EBML specifications.
mod supplement;
// Element body definitions and traits.
mod element;

/// The incremental demuxer.
pub mod demux;
/// The batch muxer.
pub mod mux;

/// A prelude for common types and traits.
pub mod prelude {
    pub use crate::base::*;
    pub use crate::block::*;
    pub use crate::codec::*;
    pub use crate::demux::*;
    pub use crate::element::*;
    pub use crate::enums::*;
    pub use crate::leaf_elements::*;
    pub use crate::master::*;
    pub use crate::mux::*;
    pub use crate::supplement::*;
}
