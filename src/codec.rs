//! Bitstream-level inspection for the three codecs this crate understands: enough to tell a
//! keyframe from a delta frame (VP8/VP9) and to construct the Opus `CodecPrivate` ID header.
//! This crate never decodes the codec's actual picture or audio payload.

use crate::error::Error;

/// The codec carried by a track, as determined from its `CodecID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecKind {
    /// Opus audio (`A_OPUS`).
    Opus,
    /// VP8 video (`V_VP8`).
    Vp8,
    /// VP9 video (`V_VP9`).
    Vp9,
}

/// Inspect a VP8 frame's uncompressed tag (RFC 6386 §9.1) and report whether it's a keyframe.
///
/// A VP8 frame always has at least a 3-byte tag.
pub fn vp8_is_keyframe(frame: &[u8]) -> crate::Result<bool> {
    let &[b0, ..] = frame else {
        return Err(Error::UnderDecode(crate::base::VInt64::new(0)));
    };
    // Bit 0 of the first byte: 0 = key frame, 1 = interframe.
    Ok(b0 & 0x01 == 0)
}

/// Inspect a VP9 frame's uncompressed header and report whether it's a keyframe.
///
/// Layout (after the 2-bit frame marker `10`): `profile_low`, `profile_high`, optional
/// `show_existing_frame`, then `frame_type` (0 = key frame, 1 = non-key frame).
pub fn vp9_is_keyframe(frame: &[u8]) -> crate::Result<bool> {
    let &[b0, ..] = frame else {
        return Err(Error::UnderDecode(crate::base::VInt64::new(0)));
    };
    if b0 >> 6 != 0b10 {
        return Err(Error::UnderDecode(crate::base::VInt64::new(0)));
    }
    let profile_low = (b0 >> 5) & 0x1;
    let profile_high = (b0 >> 4) & 0x1;
    let profile = (profile_high << 1) | profile_low;

    let mut bit = 2usize; // consumed the 2-bit frame marker
    bit += 2; // profile_low_bit, profile_high_bit
    if profile == 3 {
        bit += 1; // reserved_zero
    }

    let show_existing_frame = bit_at(frame, bit)?;
    bit += 1;
    if show_existing_frame {
        return Ok(false);
    }

    let frame_type = bit_at(frame, bit)?;
    Ok(!frame_type)
}

fn bit_at(frame: &[u8], bit_index: usize) -> crate::Result<bool> {
    let byte_index = bit_index / 8;
    let byte = *frame
        .get(byte_index)
        .ok_or(Error::UnderDecode(crate::base::VInt64::new(0)))?;
    let bit_in_byte = 7 - (bit_index % 8);
    Ok((byte >> bit_in_byte) & 1 == 1)
}

/// Whether a coded video frame is a keyframe, dispatching on codec.
pub fn is_video_keyframe(codec: CodecKind, frame: &[u8]) -> crate::Result<bool> {
    match codec {
        CodecKind::Vp8 => vp8_is_keyframe(frame),
        CodecKind::Vp9 => vp9_is_keyframe(frame),
        CodecKind::Opus => Err(Error::UnsupportedCodec("Opus has no keyframes".to_string())),
    }
}

/// Build the 19-byte Opus identification header (`OpusHead`) used as a track's `CodecPrivate`.
///
/// See RFC 7845 §5.1. `pre_skip` and `output_gain` are left at 0; `channel_mapping_family` 0
/// implies mono/stereo only, matching this crate's 1-or-2-channel restriction.
pub fn opus_id_header(channels: u8, sample_rate: u32) -> crate::Result<Vec<u8>> {
    if channels == 0 || channels > 2 {
        return Err(Error::TooManyChannels(channels));
    }
    let mut out = Vec::with_capacity(19);
    out.extend_from_slice(b"OpusHead");
    out.push(1); // version
    out.push(channels);
    out.extend_from_slice(&0u16.to_le_bytes()); // pre-skip
    out.extend_from_slice(&sample_rate.to_le_bytes()); // input sample rate
    out.extend_from_slice(&0i16.to_le_bytes()); // output gain
    out.push(0); // channel mapping family
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vp8_keyframe_bit() {
        assert!(vp8_is_keyframe(&[0b0000_0000, 0, 0]).unwrap());
        assert!(!vp8_is_keyframe(&[0b0000_0001, 0, 0]).unwrap());
    }

    #[test]
    fn test_vp9_keyframe_profile0() {
        // frame marker 10, profile_low 0, profile_high 0, show_existing_frame 0, frame_type 0 (key)
        let byte0 = 0b1000_0000u8;
        assert!(vp9_is_keyframe(&[byte0, 0]).unwrap());

        let byte0_inter = 0b1000_0100u8; // frame_type bit set -> non-key
        assert!(!vp9_is_keyframe(&[byte0_inter, 0]).unwrap());
    }

    #[test]
    fn test_vp9_show_existing_frame_is_not_a_keyframe() {
        let byte0 = 0b1000_1000u8; // show_existing_frame = 1
        assert!(!vp9_is_keyframe(&[byte0, 0]).unwrap());
    }

    #[test]
    fn test_opus_header_shape() {
        let header = opus_id_header(2, 48000).unwrap();
        assert_eq!(header.len(), 19);
        assert_eq!(&header[0..8], b"OpusHead");
        assert_eq!(header[9], 2);
        assert_eq!(u32::from_le_bytes(header[12..16].try_into().unwrap()), 48000);
    }

    #[test]
    fn test_opus_rejects_too_many_channels() {
        assert!(matches!(
            opus_id_header(3, 48000),
            Err(Error::TooManyChannels(3))
        ));
    }
}
