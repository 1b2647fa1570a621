use crate::error::Error;
use crate::functional::*;
use crate::io::ReadExt;
use crate::io::ReadFrom;
use std::fmt::Debug;
use std::fmt::Display;
use std::io::Read;
use std::ops::Deref;

/// A variable-length integer, RFC 8794.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VInt64 {
    /// The decoded integer value.
    pub value: u64,
    /// Whether this VInt64 represents an unknown size.
    pub is_unknown: bool,
}

impl Display for VInt64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoded = self.as_encoded();
        if encoded <= 0xFF {
            write!(f, "0x{:02X}", encoded)
        } else if encoded <= 0xFFFF {
            write!(f, "0x{:04X}", encoded)
        } else if encoded <= 0xFFFFFF {
            write!(f, "0x{:06X}", encoded)
        } else if encoded <= 0xFFFFFFFF {
            write!(f, "0x{:08X}", encoded)
        } else if encoded <= 0xFFFFFFFFFF {
            write!(f, "0x{:010X}", encoded)
        } else if encoded <= 0xFFFFFFFFFFFF {
            write!(f, "0x{:012X}", encoded)
        } else if encoded <= 0xFFFFFFFFFFFFFF {
            write!(f, "0x{:014X}", encoded)
        } else {
            write!(f, "0x{:016X}", encoded)
        }
    }
}
impl Debug for VInt64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut t = f.debug_struct("VInt64");
        if !self.is_unknown {
            t.field("value", &self.value);
        } else {
            t.field("value", &"Unknown");
        }
        t.field("memory", &format!("{}", self));
        t.finish()
    }
}

impl Deref for VInt64 {
    type Target = u64;
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl VInt64 {
    /// Create a VInt64 from an already-encoded u64 value (raw, width marker included).
    pub const fn from_encoded(enc: u64) -> Self {
        if enc == 0xFF {
            Self {
                value: 127,
                is_unknown: true,
            }
        } else if enc == 0x407F {
            Self {
                value: 127,
                is_unknown: false,
            }
        } else {
            Self {
                value: enc & (u64::MAX >> (enc.leading_zeros() + 1)),
                is_unknown: false,
            }
        }
    }

    /// Create a VInt64 representing an unknown size.
    pub const fn new_unknown() -> Self {
        Self {
            value: 127,
            is_unknown: true,
        }
    }

    /// Create a VInt64 from a decoded (not raw) u64 value.
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            is_unknown: false,
        }
    }

    /// Get the raw (width-marker-included) encoded form as a big-endian-packed u64.
    pub fn as_encoded(&self) -> u64 {
        if self.is_unknown {
            return 0xFF;
        }
        if self.value == 127 {
            return 0x407F;
        }

        let size = VInt64::encode_size(self.value);
        let mut sbuf = [0u8; 8];
        let slice = &mut sbuf[8 - size..];
        slice.copy_from_slice(&self.value.to_be_bytes()[8 - size..]);
        slice[0] |= 1u8 << (8 - size);
        u64::from_be_bytes(sbuf)
    }

    /// The number of bytes needed to encode `value`.
    pub const fn encode_size(value: u64) -> usize {
        let leading_zeros = value.leading_zeros() as usize;
        let total_bits = 64 - leading_zeros;
        if total_bits == 0 {
            1
        } else {
            (total_bits + 6).div_euclid(7)
        }
    }

    /// Largest value representable in a width-N VINT (the all-ones pattern is reserved for
    /// "unknown size" and is therefore excluded).
    pub const fn max_value_for_width(width: usize) -> u64 {
        (1u64 << (7 * width)) - 2
    }

    /// Try to decode a VINT from the front of `buf` without requiring the whole buffer to be
    /// present ahead of time. Returns `Ok(None)` when `buf` doesn't yet hold a complete VINT,
    /// `Err` only for a genuinely malformed leading byte (all eight bits zero), and
    /// `Ok(Some((vint, consumed)))` on success. Unlike [`VInt64::decode`], `buf` is not advanced.
    pub fn try_decode(buf: &[u8]) -> crate::Result<Option<(Self, usize)>> {
        let Some(&first_byte) = buf.first() else {
            return Ok(None);
        };
        if first_byte == 0 {
            return Err(Error::InvalidVInt);
        }
        if first_byte == 0xFF {
            return Ok(Some((
                VInt64 {
                    value: 127,
                    is_unknown: true,
                },
                1,
            )));
        }

        let leading_zeros = first_byte.leading_zeros() as usize;
        let width = leading_zeros + 1;
        if buf.len() < width {
            return Ok(None);
        }

        if leading_zeros == 0 {
            return Ok(Some((
                VInt64 {
                    value: (first_byte & 0b0111_1111) as u64,
                    is_unknown: false,
                },
                1,
            )));
        }

        let mut bytes = [0u8; 8];
        bytes[8 - leading_zeros..].copy_from_slice(&buf[1..width]);
        if leading_zeros != 7 {
            bytes[8 - leading_zeros - 1] = first_byte & (0xFF >> (leading_zeros + 1));
        }
        let value = u64::from_be_bytes(bytes);
        if value == VInt64::max_value_for_width(width) + 1 {
            return Err(Error::InvalidVInt);
        }
        Ok(Some((
            VInt64 {
                value,
                is_unknown: false,
            },
            width,
        )))
    }

    /// Encode `self` using a fixed 8-byte width, for rewriting length slots after the fact
    /// (the Segment length placeholder, patched once end-of-stream is known).
    pub fn encode_fixed8<B: BufMut>(&self, buf: &mut B) {
        let mut sbuf = [0u8; 8];
        if self.is_unknown {
            sbuf.fill(0xFF);
        } else {
            sbuf.copy_from_slice(&self.value.to_be_bytes());
            sbuf[0] |= 0x01;
        }
        buf.append_slice(&sbuf);
    }
}

impl ReadFrom for VInt64 {
    fn read_from<R: std::io::Read>(r: &mut R) -> crate::Result<Self> {
        let first_byte = r.read_u8()?;
        if first_byte == 0xFF {
            return Ok(VInt64 {
                value: 127,
                is_unknown: true,
            });
        }

        let leading_zeros = first_byte.leading_zeros() as usize;
        if leading_zeros >= 8 {
            return Err(Error::InvalidVInt);
        }

        if leading_zeros == 0 {
            Ok(VInt64 {
                value: (first_byte & 0b0111_1111) as u64,
                is_unknown: false,
            })
        } else {
            let mut buf = [0u8; 8];
            let read_buf = &mut buf[8 - leading_zeros..];
            r.read_exact(read_buf)?;
            if leading_zeros != 7 {
                buf[8 - leading_zeros - 1] = first_byte & (0xFF >> (leading_zeros + 1));
            }
            let value = u64::from_be_bytes(buf);
            if value == VInt64::max_value_for_width(leading_zeros + 1) + 1 {
                return Err(Error::InvalidVInt);
            }
            Ok(VInt64 {
                value,
                is_unknown: false,
            })
        }
    }
}

impl Decode for VInt64 {
    fn decode(buf: &mut &[u8]) -> crate::Result<Self> {
        if !buf.has_remaining() {
            return Err(Error::OutOfBounds);
        }
        let first_byte = u8::decode(buf)?;
        if first_byte == 0 {
            return Err(Error::InvalidVInt);
        }
        if first_byte == 0xFF {
            return Ok(VInt64 {
                value: 127,
                is_unknown: true,
            });
        }
        let leading_zeros = first_byte.leading_zeros() as usize;

        if leading_zeros == 0 {
            Ok(VInt64 {
                value: (first_byte & 0b0111_1111) as u64,
                is_unknown: false,
            })
        } else {
            if buf.remaining() < leading_zeros {
                return Err(Error::OutOfBounds);
            }
            let mut bytes = [0u8; 8];
            let read_buf = &mut bytes[8 - leading_zeros..];
            read_buf.copy_from_slice(buf.slice(leading_zeros));

            if leading_zeros != 7 {
                bytes[8 - leading_zeros - 1] = first_byte & (0xFF >> (leading_zeros + 1));
            }
            let value = u64::from_be_bytes(bytes);
            if value == VInt64::max_value_for_width(leading_zeros + 1) + 1 {
                return Err(Error::InvalidVInt);
            }
            buf.advance(leading_zeros);
            Ok(VInt64 {
                value,
                is_unknown: false,
            })
        }
    }
}

impl Encode for VInt64 {
    fn encode<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        if self.is_unknown {
            buf.append_slice(&[0xFF]);
            return Ok(());
        }
        if self.value == 127 {
            buf.append_slice(&[0x40, 0x7F]);
            return Ok(());
        }

        let size = VInt64::encode_size(self.value);
        if size > 8 {
            return Err(Error::InvalidVInt);
        }
        if self.value == VInt64::max_value_for_width(size) + 1 {
            return Err(Error::InvalidVInt);
        }
        let mut sbuf = [0u8; 8];
        let slice = &mut sbuf[8 - size..];
        slice.copy_from_slice(&self.value.to_be_bytes()[8 - size..]);
        slice[0] |= 1u8 << (8 - size);
        buf.append_slice(slice);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::functional::{Decode, Encode};

    use super::*;
    use std::convert::TryInto;

    #[test]
    fn test_encode_size() {
        let test_pair = [
            (vec![0b1000_0000], 0),
            (vec![0b1000_0001], 1),
            (vec![0b0100_0000, 0xFF], 0xFF),
            (vec![0b0100_0001, 0xFF], 0b1_1111_1111),
            (vec![0b0111_1111, 0xFE], 0b11_1111_1111_1110),
            (vec![0b0010_0000, 0b0111_1111, 0xFF], 0b111_1111_1111_1111),
            (vec![0b0010_0000, 0xFF, 0xFF], 0xFFFF),
            (vec![0b0011_1111, 0xFF, 0xFE], 0b1_1111_1111_1111_1111_1110),
            (
                vec![1, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE],
                0xFF_FFFF_FFFF_FFFE,
            ),
        ];
        for (encoded, val) in test_pair {
            assert_eq!(VInt64::encode_size(val), encoded.len());
        }
    }

    #[test]
    fn test_encode() {
        let test_pair = [
            (vec![0b1000_0000], 0),
            (vec![0b1000_0001], 1),
            (vec![0b0100_0000, 0xFF], 0xFF),
            (vec![0b0100_0001, 0xFF], 0b1_1111_1111),
            (vec![0b0111_1111, 0xFE], 0b11_1111_1111_1110),
            (vec![0b0010_0000, 0b0111_1111, 0xFF], 0b111_1111_1111_1111),
            (vec![0b0010_0000, 0xFF, 0xFF], 0xFFFF),
            (vec![0b0011_1111, 0xFF, 0xFE], 0b1_1111_1111_1111_1111_1110),
            (
                vec![1, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE],
                0xFF_FFFF_FFFF_FFFE,
            ),
        ];
        for (encoded, val) in test_pair {
            let v = VInt64 {
                value: val,
                is_unknown: false,
            };
            let mut out = vec![];
            v.encode(&mut out).unwrap();
            assert_eq!(encoded, out);

            let encoded_num = v.as_encoded();
            let mut enc8 = vec![0u8; 8 - encoded.len()];
            enc8.extend_from_slice(&encoded);
            let encoded_from = u64::from_be_bytes(enc8.try_into().unwrap());
            assert_eq!(encoded_num, encoded_from);
        }
    }

    #[test]
    fn test_decode() {
        let test_pair = [
            (vec![0b1000_0000], 0),
            (vec![0b1000_0001], 1),
            (vec![0b0100_0000, 0xFF], 0xFF),
            (vec![0b0100_0001, 0xFF], 0b1_1111_1111),
            (vec![0b0111_1111, 0xFE], 0b11_1111_1111_1110),
            (vec![0b0010_0000, 0b0111_1111, 0xFF], 0b111_1111_1111_1111),
            (vec![0b0010_0000, 0xFF, 0xFF], 0xFFFF),
            (vec![0b0011_1111, 0xFF, 0xFE], 0b1_1111_1111_1111_1111_1110),
            (
                vec![1, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE],
                0xFF_FFFF_FFFF_FFFE,
            ),
        ];
        for (encoded, val) in test_pair {
            let mut c = std::io::Cursor::new(encoded.clone());
            let vint = VInt64::read_from(&mut c).unwrap();
            assert_eq!(*vint, val);

            let encoded2 = encoded.clone();
            let mut slice_encoded2 = &encoded2[..];
            let vint_decoded = VInt64::decode(&mut slice_encoded2).unwrap();
            assert_eq!(*vint_decoded, val);

            let mut enc8 = vec![0u8; 8 - encoded.len()];
            enc8.extend_from_slice(&encoded);
            let v = VInt64::from_encoded(u64::from_be_bytes(enc8.try_into().unwrap()));
            assert_eq!(*v, val);

            let (streamed, consumed) = VInt64::try_decode(&encoded).unwrap().unwrap();
            assert_eq!(*streamed, val);
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn test_unknown() {
        let v1 = VInt64::read_from(&mut std::io::Cursor::new(vec![0xFF])).unwrap();
        let vv1 = VInt64::from_encoded(0xFF);
        assert!(v1.is_unknown);
        assert!(vv1.is_unknown);

        let v2 = VInt64::read_from(&mut std::io::Cursor::new(vec![0x80])).unwrap();
        let vv2 = VInt64::from_encoded(0x80);

        assert!(!v2.is_unknown);
        assert!(!vv2.is_unknown);

        let v3 = VInt64::read_from(&mut std::io::Cursor::new(vec![0x40, 0x7F])).unwrap();
        let vv3 = VInt64::from_encoded(0x407F);
        assert_eq!(*v3, 127);
        assert_eq!(*vv3, 127);

        assert_ne!(VInt64::new(127), VInt64::new_unknown());
        assert_eq!(VInt64::new(127).as_encoded(), 0x407F);
    }

    #[test]
    fn test_try_decode_needs_more_bytes() {
        assert_eq!(VInt64::try_decode(&[0b0010_0000]).unwrap(), None);
        assert_eq!(VInt64::try_decode(&[0b0010_0000, 0xFF]).unwrap(), None);
        let (v, consumed) = VInt64::try_decode(&[0b0010_0000, 0xFF, 0xFF])
            .unwrap()
            .unwrap();
        assert_eq!(*v, 0xFFFF);
        assert_eq!(consumed, 3);
        assert_eq!(VInt64::try_decode(&[]).unwrap(), None);
        assert!(VInt64::try_decode(&[0x00, 0xFF]).is_err());
    }

    #[test]
    fn test_value_2_pow_56_minus_2_roundtrips_width_8() {
        let n = (1u64 << 56) - 2;
        let mut out = vec![];
        VInt64::new(n).encode(&mut out).unwrap();
        assert_eq!(out.len(), 8);
        let decoded = VInt64::decode(&mut &out[..]).unwrap();
        assert_eq!(*decoded, n);
    }

    #[test]
    fn test_encode_rejects_value_too_large_for_width_8() {
        let n = 1u64 << 56;
        let mut out = vec![];
        assert!(matches!(
            VInt64::new(n).encode(&mut out),
            Err(Error::InvalidVInt)
        ));
    }

    #[test]
    fn test_reserved_all_ones_pattern_rejected() {
        // 2^56 - 1: the width-8 all-ones VINT_DATA pattern, reserved rather than a valid size.
        let n = (1u64 << 56) - 1;
        let mut out = vec![];
        assert!(matches!(
            VInt64::new(n).encode(&mut out),
            Err(Error::InvalidVInt)
        ));

        let encoded = [1u8, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            VInt64::decode(&mut &encoded[..]),
            Err(Error::InvalidVInt)
        ));
        assert!(matches!(
            VInt64::try_decode(&encoded),
            Err(Error::InvalidVInt)
        ));
        assert!(matches!(
            VInt64::read_from(&mut std::io::Cursor::new(encoded.to_vec())),
            Err(Error::InvalidVInt)
        ));
    }
}

/// EBML element header, consisting of an ID and a size.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Header {
    /// EBML ID of the element, stored raw (width marker included, never masked).
    pub id: VInt64,
    /// Size of the element's data, excluding the header itself.
    pub size: VInt64,
}

impl Header {
    pub(crate) fn read_body<R: Read>(&self, r: &mut R) -> crate::Result<Vec<u8>> {
        let size = if self.size.is_unknown {
            return Err(Error::ElementBodySizeUnknown(self.id));
        } else {
            *self.size
        };
        let cap = size.min(4096) as usize;
        let mut buf = Vec::with_capacity(cap);
        let n = std::io::copy(&mut r.take(size), &mut buf)?;
        if size != n {
            return Err(Error::OutOfBounds);
        }
        Ok(buf)
    }

    /// Try to decode a header (Element ID VINT followed by a Size VINT) from the front of
    /// `buf`, returning `Ok(None)` when not enough bytes are buffered yet.
    pub fn try_decode(buf: &[u8]) -> crate::Result<Option<(Self, usize)>> {
        let Some((id, id_len)) = VInt64::try_decode(buf)? else {
            return Ok(None);
        };
        let Some((size, size_len)) = VInt64::try_decode(&buf[id_len..])? else {
            return Ok(None);
        };
        Ok(Some((Self { id, size }, id_len + size_len)))
    }
}

impl ReadFrom for Header {
    fn read_from<R: std::io::Read>(reader: &mut R) -> crate::Result<Self> {
        let id = VInt64::read_from(reader)?;
        let size = VInt64::read_from(reader)?;
        Ok(Self { id, size })
    }
}

impl Decode for Header {
    fn decode(buf: &mut &[u8]) -> crate::Result<Self> {
        let id = VInt64::decode(buf)?;
        let size = VInt64::decode(buf)?;
        Ok(Self { id, size })
    }
}

impl Encode for Header {
    fn encode<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        self.id.encode(buf)?;
        self.size.encode(buf)?;
        Ok(())
    }
}

impl Decode for Option<Header> {
    fn decode(buf: &mut &[u8]) -> crate::Result<Self> {
        if !buf.has_remaining() {
            return Ok(None);
        }
        Header::decode(buf).map(Some)
    }
}
