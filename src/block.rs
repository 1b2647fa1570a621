//! `SimpleBlock`: structural decode/encode of the binary frame format used by Matroska/WebM
//! blocks. Decode accepts any lacing mode (this crate never delaces individual frames, but
//! ingesting a laced block must not fail); the muxer only ever constructs `no_lacing` blocks,
//! so `Error::UnsupportedLacing` can only occur on encode.

use crate::base::VInt64;
use crate::element::Element;
use crate::error::Error;
use crate::functional::{Buf, BufMut, Decode, Encode};

/// The lacing mode carried in a block's flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lacing {
    /// No lacing: the block carries exactly one frame.
    None,
    /// Xiph lacing.
    Xiph,
    /// Fixed-size lacing.
    FixedSize,
    /// EBML lacing.
    Ebml,
}

impl Lacing {
    fn from_flags(flags: u8) -> Self {
        match (flags >> 1) & 0b11 {
            0b00 => Lacing::None,
            0b10 => Lacing::Xiph,
            0b11 => Lacing::FixedSize,
            _ => Lacing::Ebml,
        }
    }

    fn to_flag_bits(self) -> u8 {
        match self {
            Lacing::None => 0b00,
            Lacing::Xiph => 0b10,
            Lacing::FixedSize => 0b11,
            Lacing::Ebml => 0b01,
        }
    }
}

/// A `SimpleBlock`: a track number, a timecode relative to the enclosing Cluster, flags, and
/// the frame payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleBlock {
    /// The track this block belongs to.
    pub track_number: u64,
    /// Timecode relative to the Cluster's own timestamp, in the Segment's timestamp units.
    pub relative_timecode: i16,
    /// Whether this block contains a keyframe (meaningful for video tracks).
    pub keyframe: bool,
    /// Whether this block may be discarded during playback without visible glitching.
    pub discardable: bool,
    /// The lacing mode this block was decoded (or constructed) with. Blocks built by this
    /// crate's muxer are always [`Lacing::None`]; decode preserves whatever was on the wire.
    pub lacing: Lacing,
    /// Frame payload. For laced blocks this is the raw, still-laced lace data untouched.
    pub payload: Vec<u8>,
}

impl SimpleBlock {
    /// The lacing mode this block was decoded with.
    pub fn lacing(&self) -> Lacing {
        self.lacing
    }
}

impl Element for SimpleBlock {
    const ID: VInt64 = VInt64::from_encoded(0xA3);

    fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
        let track_number = *VInt64::decode(buf)?;
        let relative_timecode = i16::decode(buf)?;
        if !buf.has_remaining() {
            return Err(Error::ShortRead);
        }
        let flags = u8::decode(buf)?;
        let lacing = Lacing::from_flags(flags);
        if lacing != Lacing::None {
            log::warn!("SimpleBlock uses {lacing:?} lacing; frames are not split out");
        }
        let keyframe = flags & 0x80 != 0;
        let discardable = flags & 0x01 != 0;
        let payload = buf.slice(buf.remaining()).to_vec();
        buf.advance(payload.len());
        Ok(Self {
            track_number,
            relative_timecode,
            keyframe,
            discardable,
            lacing,
            payload,
        })
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        if self.lacing != Lacing::None {
            return Err(Error::UnsupportedLacing);
        }
        VInt64::new(self.track_number).encode(buf)?;
        self.relative_timecode.encode(buf)?;
        let mut flags = Lacing::None.to_flag_bits() << 1;
        if self.keyframe {
            flags |= 0x80;
        }
        if self.discardable {
            flags |= 0x01;
        }
        flags.encode(buf)?;
        buf.append_slice(&self.payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::Decode;

    fn sample(keyframe: bool) -> SimpleBlock {
        SimpleBlock {
            track_number: 1,
            relative_timecode: -5,
            keyframe,
            discardable: false,
            lacing: Lacing::None,
            payload: vec![1, 2, 3, 4],
        }
    }

    #[test]
    fn test_roundtrip() {
        for kf in [true, false] {
            let block = sample(kf);
            let mut out = vec![];
            block.encode_body(&mut out).unwrap();
            let decoded = SimpleBlock::decode_body(&mut &out[..]).unwrap();
            assert_eq!(decoded, block);
        }
    }

    #[test]
    fn test_decodes_laced_block_without_erroring() {
        let mut buf = vec![];
        VInt64::new(1).encode(&mut buf).unwrap();
        0i16.encode(&mut buf).unwrap();
        0b0000_0010u8.encode(&mut buf).unwrap(); // Xiph lacing
        buf.extend_from_slice(&[9, 9]);
        let decoded = SimpleBlock::decode_body(&mut &buf[..]).unwrap();
        assert_eq!(decoded.lacing(), Lacing::Xiph);
        assert_eq!(decoded.payload, vec![9, 9]);
    }

    #[test]
    fn test_encode_rejects_lacing() {
        let mut block = sample(false);
        block.lacing = Lacing::Xiph;
        let mut out = vec![];
        assert!(matches!(
            block.encode_body(&mut out),
            Err(Error::UnsupportedLacing)
        ));
    }
}
