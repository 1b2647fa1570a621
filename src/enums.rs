//! Enumerated leaf elements: element bodies whose wire form is a `uint` or `string` but whose
//! value is drawn from a closed (or semi-open) set of named constants.

use crate::base::VInt64;
use crate::element::Element;
use crate::functional::{Buf, BufMut};
use crate::leaf::{decode_uint_body, encode_uint_body};

/// The `TrackType` element: the kind of data carried by a `TrackEntry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrackType {
    /// Video track.
    Video,
    /// Audio track.
    Audio,
    /// Any value not recognized by this crate, preserved verbatim.
    Raw(u64),
}

impl Default for TrackType {
    fn default() -> Self {
        TrackType::Raw(0)
    }
}

impl From<TrackType> for u64 {
    fn from(t: TrackType) -> u64 {
        match t {
            TrackType::Video => 1,
            TrackType::Audio => 2,
            TrackType::Raw(v) => v,
        }
    }
}

impl From<u64> for TrackType {
    fn from(v: u64) -> Self {
        match v {
            1 => TrackType::Video,
            2 => TrackType::Audio,
            other => TrackType::Raw(other),
        }
    }
}

impl Element for TrackType {
    const ID: VInt64 = VInt64::from_encoded(0x83);
    fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
        Ok(decode_uint_body(buf)?.into())
    }
    fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        encode_uint_body((*self).into(), buf);
        Ok(())
    }
}

/// The `FlagInterlaced` element: whether the video is interlaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FlagInterlaced {
    /// Interlace status unknown.
    #[default]
    Undetermined,
    /// Content is interlaced.
    Interlaced,
    /// Content is progressive.
    Progressive,
}

impl Element for FlagInterlaced {
    const ID: VInt64 = VInt64::from_encoded(0x9A);
    const HAS_DEFAULT_VALUE: bool = true;
    fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
        Ok(match decode_uint_body(buf)? {
            1 => Self::Interlaced,
            2 => Self::Progressive,
            _ => Self::Undetermined,
        })
    }
    fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        let v: u64 = match self {
            Self::Undetermined => 0,
            Self::Interlaced => 1,
            Self::Progressive => 2,
        };
        encode_uint_body(v, buf);
        Ok(())
    }
}

/// The `DisplayUnit` element: the unit `DisplayWidth`/`DisplayHeight` are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DisplayUnit {
    /// Pixels.
    #[default]
    Pixels,
    /// Centimeters.
    Centimeters,
    /// Inches.
    Inches,
    /// Display aspect ratio.
    DisplayAspectRatio,
    /// Unknown unit.
    Unknown,
}

impl Element for DisplayUnit {
    const ID: VInt64 = VInt64::from_encoded(0x54B2);
    const HAS_DEFAULT_VALUE: bool = true;
    fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
        Ok(match decode_uint_body(buf)? {
            0 => Self::Pixels,
            1 => Self::Centimeters,
            2 => Self::Inches,
            3 => Self::DisplayAspectRatio,
            _ => Self::Unknown,
        })
    }
    fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        let v: u64 = match self {
            Self::Pixels => 0,
            Self::Centimeters => 1,
            Self::Inches => 2,
            Self::DisplayAspectRatio => 3,
            Self::Unknown => 4,
        };
        encode_uint_body(v, buf);
        Ok(())
    }
}

/// Horizontal or vertical chroma siting. Shared shape for `ChromaSitingHorz`/`ChromaSitingVert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ChromaSiting {
    /// Siting unspecified.
    #[default]
    Unspecified,
    /// Left collocated (horizontal) or top collocated (vertical).
    LeftOrTopCollocated,
    /// Half (midpoint).
    Half,
}

fn decode_chroma_siting(buf: &mut &[u8]) -> crate::Result<ChromaSiting> {
    Ok(match decode_uint_body(buf)? {
        1 => ChromaSiting::LeftOrTopCollocated,
        2 => ChromaSiting::Half,
        _ => ChromaSiting::Unspecified,
    })
}

fn encode_chroma_siting<B: BufMut>(v: ChromaSiting, buf: &mut B) {
    let n: u64 = match v {
        ChromaSiting::Unspecified => 0,
        ChromaSiting::LeftOrTopCollocated => 1,
        ChromaSiting::Half => 2,
    };
    encode_uint_body(n, buf);
}

/// The `ChromaSitingHorz` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ChromaSitingHorz(pub ChromaSiting);
impl Element for ChromaSitingHorz {
    const ID: VInt64 = VInt64::from_encoded(0x53B8);
    const HAS_DEFAULT_VALUE: bool = true;
    fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
        Ok(Self(decode_chroma_siting(buf)?))
    }
    fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        encode_chroma_siting(self.0, buf);
        Ok(())
    }
}

/// The `ChromaSitingVert` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ChromaSitingVert(pub ChromaSiting);
impl Element for ChromaSitingVert {
    const ID: VInt64 = VInt64::from_encoded(0x53B9);
    const HAS_DEFAULT_VALUE: bool = true;
    fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
        Ok(Self(decode_chroma_siting(buf)?))
    }
    fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        encode_chroma_siting(self.0, buf);
        Ok(())
    }
}

/// The `CodecID` element: identifies the codec used by a track.
///
/// Modeled as a closed enum for the three codecs this crate understands plus an `Other`
/// fallback so that files using unsupported codecs still round-trip through the demuxer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CodecId {
    /// `A_OPUS`
    Opus,
    /// `V_VP8`
    Vp8,
    /// `V_VP9`
    Vp9,
    /// Any other codec string, preserved verbatim.
    Other(String),
}

impl Default for CodecId {
    fn default() -> Self {
        CodecId::Other(String::new())
    }
}

impl CodecId {
    const OPUS: &'static str = "A_OPUS";
    const VP8: &'static str = "V_VP8";
    const VP9: &'static str = "V_VP9";

    /// The wire string for this codec ID.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Opus => Self::OPUS,
            Self::Vp8 => Self::VP8,
            Self::Vp9 => Self::VP9,
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for CodecId {
    fn from(s: &str) -> Self {
        match s {
            Self::OPUS => Self::Opus,
            Self::VP8 => Self::Vp8,
            Self::VP9 => Self::Vp9,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Element for CodecId {
    const ID: VInt64 = VInt64::from_encoded(0x86);
    fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
        let bytes = buf.slice(buf.remaining()).to_vec();
        buf.advance(bytes.len());
        let trimmed = bytes
            .iter()
            .position(|&b| b == 0)
            .map(|p| &bytes[..p])
            .unwrap_or(&bytes[..]);
        Ok(String::from_utf8_lossy(trimmed).as_ref().into())
    }
    fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        buf.append_slice(self.as_str().as_bytes());
        Ok(())
    }
}
