use crate::raw::RawFont;
use crate::shape::Shape;
use crate::table::GlyphPoint;
use crate::FontResult;
use core::num::NonZeroU16;
use hashbrown::HashMap;

/// Settings for controlling font behavior.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FontSettings {
    /// The default is 3. The number of line segments each quadratic curve
    /// piece is flattened into when exporting a glyph outline as a shape.
    /// Higher values follow the curve more closely at the cost of more
    /// geometry.
    pub interpolation_level: u32,
}

impl Default for FontSettings {
    fn default() -> FontSettings {
        FontSettings {
            interpolation_level: 3,
        }
    }
}

/// Metrics associated with line positioning, in em units.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LineMetrics {
    /// The highest point that any glyph in the font extends to above the
    /// baseline. Typically positive.
    pub ascent: f32,
    /// The lowest point that any glyph in the font extends to below the
    /// baseline. Typically negative.
    pub descent: f32,
    /// The gap to leave between the descent of one line and the ascent of
    /// the next.
    pub line_gap: f32,
    /// A precalculated value for the advance between two lines:
    /// ascent - descent + line_gap.
    pub new_line_size: f32,
}

impl LineMetrics {
    fn new(ascent: i16, descent: i16, line_gap: i16) -> LineMetrics {
        LineMetrics {
            ascent: ascent as f32,
            descent: descent as f32,
            line_gap: line_gap as f32,
            new_line_size: (ascent - descent + line_gap) as f32,
        }
    }

    #[inline(always)]
    fn scale(&self, scale: f32) -> LineMetrics {
        LineMetrics {
            ascent: self.ascent * scale,
            descent: self.descent * scale,
            line_gap: self.line_gap * scale,
            new_line_size: self.new_line_size * scale,
        }
    }
}

#[derive(Debug)]
struct Glyph {
    points: Vec<GlyphPoint>,
    /// Left side bearing in font units: the glyph's xmin minus the bearing
    /// stored in hmtx, or zero when the head flags promise a zero bearing.
    lsb: f32,
    advance_width: f32,
}

/// Represents a font. Fonts are immutable after creation.
#[derive(Debug)]
pub struct Font {
    units_per_em: f32,
    glyphs: Vec<Glyph>,
    char_to_glyph: HashMap<u32, NonZeroU16>,
    horizontal_line_metrics: LineMetrics,
    settings: FontSettings,
}

impl Font {
    /// Constructs a font from an array of bytes.
    pub fn from_bytes(data: &[u8], settings: FontSettings) -> FontResult<Font> {
        let raw = RawFont::new(data)?;
        let RawFont {
            head,
            cmap,
            glyf,
            hhea,
            hmtx,
            ..
        } = raw;

        let zero_lsb = head.zero_lsb();
        let mut glyphs = Vec::with_capacity(glyf.glyphs.len());
        for glyph in glyf.glyphs {
            let metric = hmtx.hmetrics[glyph.metrics];
            let lsb = if zero_lsb {
                0.0
            } else {
                glyph.xmin - metric.left_side_bearing as f32
            };
            glyphs.push(Glyph {
                points: glyph.points,
                lsb,
                advance_width: metric.advance_width as f32,
            });
        }

        Ok(Font {
            units_per_em: head.units_per_em as f32,
            glyphs,
            char_to_glyph: cmap.map,
            horizontal_line_metrics: LineMetrics::new(hhea.ascent, hhea.descent, hhea.line_gap),
            settings,
        })
    }

    /// The number of font units per em.
    pub fn units_per_em(&self) -> f32 {
        self.units_per_em
    }

    /// The number of glyphs in the font.
    pub fn glyph_count(&self) -> u16 {
        self.glyphs.len() as u16
    }

    /// Line positioning metrics in em units.
    pub fn horizontal_line_metrics(&self) -> LineMetrics {
        self.horizontal_line_metrics.scale(1.0 / self.units_per_em)
    }

    /// Finds the glyph index for the given character. Characters not present
    /// in the font map to glyph 0.
    #[inline]
    pub fn lookup_glyph_index(&self, character: char) -> u16 {
        self.char_to_glyph
            .get(&(character as u32))
            .map(|index| index.get())
            .unwrap_or(0)
    }

    /// The advance width of the given character in em units. Characters not
    /// present in the font use glyph 0's advance.
    pub fn char_width(&self, character: char) -> f32 {
        let index = self.lookup_glyph_index(character) as usize;
        match self.glyphs.get(index) {
            Some(glyph) => glyph.advance_width / self.units_per_em,
            None => 0.0,
        }
    }

    /// The advance width of a whole line of text in em units.
    pub fn line_width(&self, line: &str) -> f32 {
        line.chars().map(|c| self.char_width(c)).sum()
    }

    /// The interpolated outline of the given character as a shape, or `None`
    /// when the character is not in the character map.
    ///
    /// Coordinates are normalised so that x spans from the left side bearing
    /// and one em is one unit.
    pub fn char_shape(&self, character: char) -> Option<Shape> {
        let index = self.char_to_glyph.get(&(character as u32))?.get();
        self.glyph_shape(index)
    }

    /// The interpolated outline of the glyph at the given index, or `None`
    /// when the index is out of range. An empty glyph yields an empty shape.
    pub fn glyph_shape(&self, index: u16) -> Option<Shape> {
        let glyph = self.glyphs.get(index as usize)?;
        Some(Shape::from_outline(
            &glyph.points,
            glyph.lsb,
            self.units_per_em,
            self.settings.interpolation_level,
        ))
    }
}
