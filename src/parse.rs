use crate::{Error, FontResult};
use core::convert::TryInto;

const SHORT_READ: Error = Error::io("Font: Unexpected end of font data");

/// A big-endian byte reader over the font data.
///
/// All multi-byte values in an sfnt container are big-endian. Reads past the
/// end of the data report an io error instead of panicking.
pub struct Stream<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Stream<'a> {
    pub const fn new(bytes: &'a [u8]) -> Stream<'a> {
        Stream {
            bytes,
            offset: 0,
        }
    }

    // UTILITY

    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    #[inline]
    pub fn skip(&mut self, count: usize) {
        self.offset = self.offset.saturating_add(count);
    }

    #[inline]
    fn take(&mut self, size: usize) -> FontResult<&'a [u8]> {
        let end = self.offset.checked_add(size).ok_or(SHORT_READ)?;
        let slice = self.bytes.get(self.offset..end).ok_or(SHORT_READ)?;
        self.offset = end;
        Ok(slice)
    }

    // UNSIGNED

    #[inline]
    pub fn read_u8(&mut self) -> FontResult<u8> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    pub fn read_u16(&mut self) -> FontResult<u16> {
        Ok(u16::from_be_bytes(self.take(2)?.try_into().unwrap()))
    }

    #[inline]
    pub fn read_u32(&mut self) -> FontResult<u32> {
        Ok(u32::from_be_bytes(self.take(4)?.try_into().unwrap()))
    }

    // SIGNED

    #[inline]
    pub fn read_i8(&mut self) -> FontResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    #[inline]
    pub fn read_i16(&mut self) -> FontResult<i16> {
        Ok(self.read_u16()? as i16)
    }

    // SLICES

    pub fn read_u16_vec(&mut self, len: usize) -> FontResult<Vec<u16>> {
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(self.read_u16()?);
        }
        Ok(values)
    }

    // FONT

    /// Reads a 2.14 fixed point value: the high two bits are a signed
    /// integer part, the low fourteen bits are the fraction over 16383.
    #[inline]
    pub fn read_f2dot14(&mut self) -> FontResult<f32> {
        let val = self.read_i16()?;
        let int = (val >> 14) as f32;
        let frac = (val & 0x3FFF) as f32 / 16383.0;
        Ok(int + frac)
    }

    #[inline]
    pub fn read_tag(&mut self) -> FontResult<[u8; 4]> {
        Ok(self.take(4)?.try_into().unwrap())
    }
}

// FLAGS

#[inline]
pub fn flag_u8(value: u8, flags: u8) -> bool {
    value & flags == flags
}

#[inline]
pub fn flag_u16(value: u16, flags: u16) -> bool {
    value & flags == flags
}
