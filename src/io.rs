//! I/O utilities.

use crate::{base::Header, element::Element, functional::Encode};
use std::io::{Read, Write};

/// Read from a reader.
pub trait ReadFrom: Sized {
    /// Read Self from a reader.
    fn read_from<R: Read>(r: &mut R) -> crate::Result<Self>;
}

/// Helper methods for reading primitive values directly off a reader, used while parsing
/// VINTs byte-by-byte before the full encoded width is known.
pub trait ReadExt: Read {
    /// Read a single byte.
    fn read_u8(&mut self) -> crate::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }
}
impl<R: Read + ?Sized> ReadExt for R {}

/// Read an element from a reader provided the header.
pub trait ReadElement: Sized + Element {
    /// Read an element from a reader provided the header.
    fn read_element<R: Read>(header: &Header, r: &mut R) -> crate::Result<Self> {
        let body = header.read_body(r)?;
        Self::decode_body(&mut &body[..])
    }
}
impl<T: Element> ReadElement for T {}

/// Write to a writer.
pub trait WriteTo {
    /// Write to a writer.
    fn write_to<W: Write>(&self, w: &mut W) -> crate::Result<()>;
}

impl<T: Encode> WriteTo for T {
    fn write_to<W: Write>(&self, w: &mut W) -> crate::Result<()> {
        let mut buf = vec![];
        self.encode(&mut buf)?;
        w.write_all(&buf)?;
        Ok(())
    }
}

/// Write an element to a writer provided the header.
pub trait WriteElement: Sized + Element {
    /// Write an element to a writer.
    fn write_element<W: Write>(&self, header: &Header, w: &mut W) -> crate::Result<()> {
        header.write_to(w)?;
        let mut buf = vec![];
        self.encode_body(&mut buf)?;
        w.write_all(&buf)?;
        Ok(())
    }
}
impl<T: Element> WriteElement for T {}
