use crate::parse::Stream;
use crate::{Error, FontResult};

// Apple: https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6loca.html
// Microsoft: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphLocation {
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, PartialEq)]
pub struct TableLoca {
    /// Indexed by glyph id. A zero-length location is an empty glyph.
    pub locations: Vec<GlyphLocation>,
}

impl TableLoca {
    pub fn new(loca: &[u8], index_to_loc_format: i16, num_glyphs: u16) -> FontResult<TableLoca> {
        if index_to_loc_format > 1 || index_to_loc_format < 0 {
            return Err(Error::container("Font.loca: Unknown index_to_loc_format"));
        }
        let mut stream = Stream::new(loca);
        let short_format = index_to_loc_format == 0;
        let read_offset = |stream: &mut Stream| -> FontResult<usize> {
            if short_format {
                // Short offsets are stored divided by two.
                Ok(stream.read_u16()? as usize * 2)
            } else {
                Ok(stream.read_u32()? as usize)
            }
        };
        let mut locations = Vec::with_capacity(num_glyphs as usize);
        let mut offset = read_offset(&mut stream)?;
        for _ in 0..num_glyphs {
            let next_offset = read_offset(&mut stream)?;
            let length = next_offset
                .checked_sub(offset)
                .ok_or(Error::container("Font.loca: Glyph offsets out of order"))?;
            locations.push(GlyphLocation {
                offset,
                length,
            });
            offset = next_offset;
        }
        Ok(TableLoca {
            locations,
        })
    }
}
