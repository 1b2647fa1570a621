//! Leaf element bottom types and the `leaf_element!` macro used to declare each concrete
//! leaf element in [`crate::leaf_elements`].
//!
//! The Matroska/EBML specification defines leaf elements purely in terms of five wire kinds
//! (unsigned integer, signed integer, float, string/date/binary). Rather than generating one
//! struct per element from the XML schema at build time, each concrete element here is declared
//! with a short macro invocation naming its kind, EBML ID, and (for integers) default value.

use crate::functional::{Buf, BufMut};

/// Decode a big-endian, variable-width unsigned integer body (0 to 8 bytes).
pub(crate) fn decode_uint_body(buf: &mut &[u8]) -> crate::Result<u64> {
    if buf.is_empty() {
        return Ok(0);
    }
    if buf.len() > 8 {
        return Err(crate::Error::ShortRead);
    }
    let len = buf.len();
    let mut value = [0u8; 8];
    value[8 - len..].copy_from_slice(&buf[..len]);
    buf.advance(len);
    Ok(u64::from_be_bytes(value))
}

/// Encode an unsigned integer using the minimum number of bytes (all-zero encodes as empty).
pub(crate) fn encode_uint_body<B: BufMut>(value: u64, buf: &mut B) {
    let bytes = value.to_be_bytes();
    let first_non_zero = bytes.iter().position(|&b| b != 0);
    match first_non_zero {
        Some(idx) => buf.append_slice(&bytes[idx..]),
        None => {}
    }
}

/// Decode a big-endian, variable-width signed integer body (0 to 8 bytes), sign-extended.
pub(crate) fn decode_sint_body(buf: &mut &[u8]) -> crate::Result<i64> {
    if buf.is_empty() {
        return Ok(0);
    }
    if buf.len() > 8 {
        return Err(crate::Error::ShortRead);
    }
    let len = buf.len();
    let negative = buf[0] & 0x80 != 0;
    let fill = if negative { 0xFF } else { 0x00 };
    let mut value = [fill; 8];
    value[8 - len..].copy_from_slice(&buf[..len]);
    buf.advance(len);
    Ok(i64::from_be_bytes(value))
}

/// Encode a signed integer using the minimum number of bytes that preserve its sign.
pub(crate) fn encode_sint_body<B: BufMut>(value: i64, buf: &mut B) {
    if value == 0 {
        return;
    }
    let bytes = value.to_be_bytes();
    let negative = value < 0;
    let mut start = 0;
    while start < 7 {
        let byte = bytes[start];
        let next_byte = bytes[start + 1];
        let sign_ok = if negative {
            byte == 0xFF && (next_byte & 0x80 != 0)
        } else {
            byte == 0x00 && (next_byte & 0x80 == 0)
        };
        if !sign_ok {
            break;
        }
        start += 1;
    }
    buf.append_slice(&bytes[start..]);
}

/// Declare a concrete leaf element type.
///
/// `leaf_element!(kind, Name, id [, default]);` where `kind` is one of `uint`, `sint`, `float`,
/// `string`, `date`, `binary`.
macro_rules! leaf_element {
    (uint, $name:ident, $id:expr) => {
        leaf_element!(@uint $name, $id, 0u64, false);
    };
    (uint, $name:ident, $id:expr, default = $default:expr) => {
        leaf_element!(@uint $name, $id, $default, true);
    };
    (@uint $name:ident, $id:expr, $default:expr, $has_default:expr) => {
        #[doc = concat!("The `", stringify!($name), "` element.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u64);

        impl std::ops::Deref for $name {
            type Target = u64;
            fn deref(&self) -> &u64 {
                &self.0
            }
        }
        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }
        impl $crate::element::Element for $name {
            const ID: $crate::base::VInt64 = $crate::base::VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = $has_default;
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                Ok(Self(crate::leaf::decode_uint_body(buf)?))
            }
            fn encode_body<B: crate::functional::BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                crate::leaf::encode_uint_body(self.0, buf);
                Ok(())
            }
        }
    };

    (sint, $name:ident, $id:expr) => {
        leaf_element!(@sint $name, $id, 0i64, false);
    };
    (sint, $name:ident, $id:expr, default = $default:expr) => {
        leaf_element!(@sint $name, $id, $default, true);
    };
    (@sint $name:ident, $id:expr, $default:expr, $has_default:expr) => {
        #[doc = concat!("The `", stringify!($name), "` element.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub i64);

        impl std::ops::Deref for $name {
            type Target = i64;
            fn deref(&self) -> &i64 {
                &self.0
            }
        }
        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }
        impl $crate::element::Element for $name {
            const ID: $crate::base::VInt64 = $crate::base::VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = $has_default;
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                Ok(Self(crate::leaf::decode_sint_body(buf)?))
            }
            fn encode_body<B: crate::functional::BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                crate::leaf::encode_sint_body(self.0, buf);
                Ok(())
            }
        }
    };

    (float, $name:ident, $id:expr) => {
        leaf_element!(@float $name, $id, 0.0f64, false);
    };
    (float, $name:ident, $id:expr, default = $default:expr) => {
        leaf_element!(@float $name, $id, $default, true);
    };
    (@float $name:ident, $id:expr, $default:expr, $has_default:expr) => {
        #[doc = concat!("The `", stringify!($name), "` element.")]
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
        pub struct $name(pub f64);

        impl std::ops::Deref for $name {
            type Target = f64;
            fn deref(&self) -> &f64 {
                &self.0
            }
        }
        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }
        impl $crate::element::Element for $name {
            const ID: $crate::base::VInt64 = $crate::base::VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = $has_default;
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                match $crate::functional::Buf::remaining(buf) {
                    4 => {
                        let bytes = $crate::functional::Decode::decode(buf)?;
                        Ok(Self(f32::from_be_bytes(bytes) as f64))
                    }
                    8 => {
                        let bytes = $crate::functional::Decode::decode(buf)?;
                        Ok(Self(f64::from_be_bytes(bytes)))
                    }
                    _ => Err(crate::Error::ShortRead),
                }
            }
            fn encode_body<B: crate::functional::BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                $crate::functional::BufMut::append_slice(buf, &self.0.to_be_bytes());
                Ok(())
            }
        }
    };

    (string, $name:ident, $id:expr) => {
        leaf_element!(@string $name, $id, String::new(), false);
    };
    (string, $name:ident, $id:expr, default = $default:expr) => {
        leaf_element!(@string $name, $id, $default, true);
    };
    (@string $name:ident, $id:expr, $default:expr, $has_default:expr) => {
        #[doc = concat!("The `", stringify!($name), "` element.")]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub String);

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }
        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }
        impl $crate::element::Element for $name {
            const ID: $crate::base::VInt64 = $crate::base::VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = $has_default;
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let bytes = $crate::functional::Buf::slice(buf, $crate::functional::Buf::remaining(buf)).to_vec();
                $crate::functional::Buf::advance(buf, bytes.len());
                let trimmed = bytes
                    .iter()
                    .position(|&b| b == 0)
                    .map(|p| &bytes[..p])
                    .unwrap_or(&bytes[..]);
                let s = String::from_utf8_lossy(trimmed).into_owned();
                Ok(Self(s))
            }
            fn encode_body<B: crate::functional::BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                $crate::functional::BufMut::append_slice(buf, self.0.as_bytes());
                Ok(())
            }
        }
    };

    (date, $name:ident, $id:expr) => {
        #[doc = concat!("The `", stringify!($name), "` element, nanoseconds since 2001-01-01T00:00:00.000000000 UTC.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub i64);

        impl std::ops::Deref for $name {
            type Target = i64;
            fn deref(&self) -> &i64 {
                &self.0
            }
        }
        impl $crate::element::Element for $name {
            const ID: $crate::base::VInt64 = $crate::base::VInt64::from_encoded($id);
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let bytes = $crate::functional::Decode::decode_exact(buf, 8)?;
                Ok(Self(i64::from_be_bytes(bytes)))
            }
            fn encode_body<B: crate::functional::BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                $crate::functional::BufMut::append_slice(buf, &self.0.to_be_bytes());
                Ok(())
            }
        }
    };

    (binary, $name:ident, $id:expr) => {
        #[doc = concat!("The `", stringify!($name), "` element.")]
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name(pub Vec<u8>);

        impl std::ops::Deref for $name {
            type Target = [u8];
            fn deref(&self) -> &[u8] {
                &self.0
            }
        }
        impl $crate::element::Element for $name {
            const ID: $crate::base::VInt64 = $crate::base::VInt64::from_encoded($id);
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let bytes = $crate::functional::Buf::slice(buf, $crate::functional::Buf::remaining(buf)).to_vec();
                $crate::functional::Buf::advance(buf, bytes.len());
                Ok(Self(bytes))
            }
            fn encode_body<B: crate::functional::BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                $crate::functional::BufMut::append_slice(buf, &self.0);
                Ok(())
            }
        }
    };
}

pub(crate) use leaf_element;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    leaf_element!(uint, TestUint, 0x12);
    leaf_element!(sint, TestSint, 0x13);

    #[test]
    fn test_uint_roundtrip() {
        let pairs: [(Vec<u8>, u64); 4] = [
            (vec![], 0),
            (vec![1], 1),
            (vec![0xFF, 0xFF], 0xFFFF),
            (vec![0xFF; 8], u64::MAX),
        ];
        for (encoded, decoded) in pairs {
            let v = TestUint::decode_body(&mut &*encoded).unwrap();
            assert_eq!(v.0, decoded);
            let mut out = vec![];
            TestUint(decoded).encode_body(&mut out).unwrap();
            assert_eq!(out, encoded);
        }
    }

    #[test]
    fn test_sint_roundtrip() {
        let mut out = vec![];
        TestSint(-1).encode_body(&mut out).unwrap();
        assert_eq!(out, vec![0xFF]);
        let v = TestSint::decode_body(&mut &out[..]).unwrap();
        assert_eq!(v.0, -1);

        let mut out = vec![];
        TestSint(0).encode_body(&mut out).unwrap();
        assert!(out.is_empty());
        let v = TestSint::decode_body(&mut &[][..]).unwrap();
        assert_eq!(v.0, 0);
    }
}
