use crate::parse::Stream;
use crate::{Error, FontResult};
use core::num::NonZeroU16;
use hashbrown::HashMap;
use log::warn;

// Apple: https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6cmap.html
// Microsoft: https://docs.microsoft.com/en-us/typography/opentype/spec/cmap

// Windows platform, Unicode BMP encoding. The only subtable kind supported
// here; everything else is skipped with a warning.
const PLATFORM_MICROSOFT: u16 = 3;
const ENCODING_UNICODE_BMP: u16 = 1;
const FORMAT_SEGMENT_DELTA: u16 = 4;

#[derive(Debug)]
pub struct TableCmap {
    /// Maps code points to glyph indices. Absent code points map to glyph 0,
    /// so the zero index is never stored.
    pub map: HashMap<u32, NonZeroU16>,
}

impl TableCmap {
    pub fn new(cmap: &[u8]) -> FontResult<TableCmap> {
        let mut stream = Stream::new(cmap);
        stream.skip(2); // version: u16
        let num_subtables = stream.read_u16()?;
        for i in 0..num_subtables as usize {
            // The cmap header is 4 bytes, each encoding record is 8 bytes.
            stream.seek(4 + i * 8);
            let platform_id = stream.read_u16()?;
            let encoding_id = stream.read_u16()?;
            let subtable_offset = stream.read_u32()? as usize;
            if platform_id != PLATFORM_MICROSOFT || encoding_id != ENCODING_UNICODE_BMP {
                continue;
            }
            stream.seek(subtable_offset);
            let format = stream.read_u16()?;
            if format != FORMAT_SEGMENT_DELTA {
                warn!("Font.cmap: Skipping unsupported subtable format {}", format);
                continue;
            }
            let map = Self::parse_format4(cmap, subtable_offset)?;
            return Ok(TableCmap {
                map,
            });
        }
        Err(Error::container("Font.cmap: No usable character mapping found"))
    }

    /// Format 4: segment mapping to delta values. Covers the BMP.
    fn parse_format4(cmap: &[u8], offset: usize) -> FontResult<HashMap<u32, NonZeroU16>> {
        let mut stream = Stream::new(cmap);
        stream.seek(offset);
        stream.skip(6); // format: u16, length: u16, language: u16
        let seg_count = stream.read_u16()? as usize >> 1;
        stream.skip(6); // searchRange: u16, entrySelector: u16, rangeShift: u16
        let end_code = stream.read_u16_vec(seg_count)?;
        stream.skip(2); // reservedPad: u16
        let start_code = stream.read_u16_vec(seg_count)?;
        let id_delta = stream.read_u16_vec(seg_count)?;
        let id_range_offset = stream.read_u16_vec(seg_count)?;

        let mut map = HashMap::new();
        // The final segment is the 0xFFFF sentinel and maps nothing.
        for i in 0..seg_count.saturating_sub(1) {
            for c in start_code[i]..=end_code[i] {
                let glyph_index = if id_range_offset[i] != 0 {
                    // The offset is relative to the location of the offset
                    // value itself inside the idRangeOffset array.
                    let mut glyph_offset = 16 + seg_count * 6;
                    glyph_offset += i * 2;
                    glyph_offset += id_range_offset[i] as usize;
                    glyph_offset += (c - start_code[i]) as usize * 2;
                    stream.seek(offset + glyph_offset);
                    // Segments pointing outside the table yield glyph 0.
                    let glyph_index = stream.read_u16().unwrap_or(0);
                    if glyph_index != 0 {
                        glyph_index.wrapping_add(id_delta[i])
                    } else {
                        glyph_index
                    }
                } else {
                    c.wrapping_add(id_delta[i])
                };
                if let Some(glyph_index) = NonZeroU16::new(glyph_index) {
                    map.insert(c as u32, glyph_index);
                }
            }
        }
        Ok(map)
    }
}
