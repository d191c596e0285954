use crate::parse::{flag_u16, flag_u8, Stream};
use crate::table::loca::GlyphLocation;
use crate::{Error, FontResult};

// Apple: https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6glyf.html
// Microsoft: https://docs.microsoft.com/en-us/typography/opentype/spec/glyf

#[allow(non_snake_case)]
pub mod SimpleFlags {
    pub const ON_CURVE: u8 = 0x01;
    pub const X_SHORT: u8 = 0x02;
    pub const Y_SHORT: u8 = 0x04;
    pub const REPEAT: u8 = 0x08;
    pub const X_DUAL: u8 = 0x10;
    pub const Y_DUAL: u8 = 0x20;

    pub const X_SHORT_AND_DUAL: u8 = X_SHORT | X_DUAL;
    pub const Y_SHORT_AND_DUAL: u8 = Y_SHORT | Y_DUAL;
}

#[allow(non_snake_case)]
pub mod CompoundFlags {
    pub const ARGS_ARE_WORDS: u16 = 0x0001;
    pub const ARGS_ARE_XY_VALUES: u16 = 0x0002;
    pub const WE_HAVE_A_SCALE: u16 = 0x0008;
    pub const MORE_COMPONENTS: u16 = 0x0020;
    pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
    pub const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
    pub const USE_MY_METRICS: u16 = 0x0200;
    pub const SCALED_COMPONENT_OFFSET: u16 = 0x0800;
    pub const UNSCALED_COMPONENT_OFFSET: u16 = 0x1000;

    pub const ARGS_ARE_WORDS_AND_XY_VALUES: u16 = ARGS_ARE_WORDS | ARGS_ARE_XY_VALUES;
}

/// Composite glyphs may nest; a real font stays at one or two levels, so a
/// deeper chain is treated as corrupt rather than recursed into forever.
const MAX_COMPOSITE_DEPTH: usize = 8;

/// A decoded outline point in absolute font units.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct GlyphPoint {
    pub x: f32,
    pub y: f32,
    /// On-curve point, as opposed to a quadratic control point.
    pub on_curve: bool,
    /// Marks the last point of its contour.
    pub contour_end: bool,
}

impl GlyphPoint {
    /// Applies a 2x2 transform followed by an offset.
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, cx: f32, cy: f32) {
        let px = self.x;
        let py = self.y;
        self.x = a * px + c * py + cx;
        self.y = b * px + d * py + cy;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Glyph {
    /// The lowest x point, derived from the actual points in case the stored
    /// bounding box lies.
    pub xmin: f32,
    pub xmax: f32,
    pub ymin: f32,
    pub ymax: f32,
    /// The index of the metrics entry for this glyph. Differs from the glyph
    /// index when a composite sets USE_MY_METRICS.
    pub metrics: usize,
    /// Outline points with contour ends marked.
    pub points: Vec<GlyphPoint>,
}

pub struct TableGlyf {
    /// Indexed by glyph id.
    pub glyphs: Vec<Glyph>,
}

impl TableGlyf {
    pub fn new(glyf: &[u8], locations: &[GlyphLocation]) -> FontResult<TableGlyf> {
        let mut glyphs = Vec::with_capacity(locations.len());
        for index in 0..locations.len() {
            glyphs.push(parse_glyph(glyf, locations, index, 0)?);
        }
        Ok(TableGlyf {
            glyphs,
        })
    }
}

fn parse_glyph(
    glyf: &[u8],
    locations: &[GlyphLocation],
    index: usize,
    depth: usize,
) -> FontResult<Glyph> {
    let loc = &locations[index];
    let mut glyph = Glyph::default();
    glyph.metrics = index;

    // A zero length location is an empty glyph which still has metrics.
    if loc.length == 0 {
        return Ok(glyph);
    }

    let mut stream = Stream::new(glyf);
    stream.seek(loc.offset);
    let num_contours = stream.read_i16()?;
    glyph.xmin = stream.read_i16()? as f32;
    glyph.ymin = stream.read_i16()? as f32;
    glyph.xmax = stream.read_i16()? as f32;
    glyph.ymax = stream.read_i16()? as f32;
    if glyph.xmin > glyph.xmax || glyph.ymin > glyph.ymax {
        return Err(Error::glyph("Font.glyf: Bad glyph bounding box"));
    }

    if num_contours == 0 {
        // Empty glyph. Any trailing data is ignored.
    } else if num_contours > 0 {
        parse_simple(&mut stream, num_contours as usize, &mut glyph)?;
    } else {
        parse_compound(&mut stream, glyf, locations, depth, &mut glyph)?;
    }

    // Widen the bounding box to any point outside of it. A well meaning font
    // may put a control point outside the stored box; a malicious one may
    // use it to lie about the glyph extents.
    for point in &glyph.points {
        if point.x < glyph.xmin {
            glyph.xmin = point.x;
        } else if point.x > glyph.xmax {
            glyph.xmax = point.x;
        }
        if point.y < glyph.ymin {
            glyph.ymin = point.y;
        } else if point.y > glyph.ymax {
            glyph.ymax = point.y;
        }
    }

    Ok(glyph)
}

fn parse_simple(stream: &mut Stream, num_contours: usize, glyph: &mut Glyph) -> FontResult<()> {
    // Contours are stored as the point index their last point has. The last
    // contour therefore knows the total point count.
    let end_points = stream.read_u16_vec(num_contours)?;
    let num_points = match end_points.last() {
        Some(&last) => last as usize + 1,
        None => return Ok(()),
    };

    // Skip the hinting instructions; nothing here executes them.
    let instruction_length = stream.read_u16()?;
    stream.skip(instruction_length as usize);

    // Flags may carry a repeat count instead of being stored one per point.
    let mut flags = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let value = stream.read_u8()?;
        flags.push(value);
        if flag_u8(value, SimpleFlags::REPEAT) {
            let count = stream.read_u8()?;
            for _ in 0..count {
                flags.push(value);
            }
        }
    }
    if flags.len() != num_points {
        return Err(Error::glyph("Font.glyf: Flag repeats overrun the point count"));
    }

    // Coordinates are deltas from the previous point, with a short (u8) and
    // a repeat-last encoding selected per point by the flags.
    let mut xs = Vec::with_capacity(num_points);
    let mut last = 0i32;
    for &value in &flags {
        match value & (SimpleFlags::X_SHORT | SimpleFlags::X_DUAL) {
            SimpleFlags::X_SHORT_AND_DUAL => last += stream.read_u8()? as i32,
            SimpleFlags::X_SHORT => last -= stream.read_u8()? as i32,
            SimpleFlags::X_DUAL => {}
            _ => last += stream.read_i16()? as i32,
        }
        xs.push(last as f32);
    }
    let mut ys = Vec::with_capacity(num_points);
    last = 0;
    for &value in &flags {
        match value & (SimpleFlags::Y_SHORT | SimpleFlags::Y_DUAL) {
            SimpleFlags::Y_SHORT_AND_DUAL => last += stream.read_u8()? as i32,
            SimpleFlags::Y_SHORT => last -= stream.read_u8()? as i32,
            SimpleFlags::Y_DUAL => {}
            _ => last += stream.read_i16()? as i32,
        }
        ys.push(last as f32);
    }

    glyph.points = flags
        .iter()
        .zip(xs.iter().zip(ys.iter()))
        .map(|(&value, (&x, &y))| GlyphPoint {
            x,
            y,
            on_curve: flag_u8(value, SimpleFlags::ON_CURVE),
            contour_end: false,
        })
        .collect();
    for &end in &end_points {
        glyph
            .points
            .get_mut(end as usize)
            .ok_or(Error::glyph("Font.glyf: Contour end point out of range"))?
            .contour_end = true;
    }
    Ok(())
}

fn parse_compound(
    stream: &mut Stream,
    glyf: &[u8],
    locations: &[GlyphLocation],
    depth: usize,
    glyph: &mut Glyph,
) -> FontResult<()> {
    if depth >= MAX_COMPOSITE_DEPTH {
        return Err(Error::glyph("Font.glyf: Composite glyph nesting too deep"));
    }

    let mut flags = CompoundFlags::MORE_COMPONENTS;
    while flag_u16(flags, CompoundFlags::MORE_COMPONENTS) {
        flags = stream.read_u16()?;
        let component_index = stream.read_u16()? as usize;
        if component_index >= locations.len() {
            return Err(Error::not_found("Font.glyf: Composite component index out of range"));
        }
        if flag_u16(flags, CompoundFlags::USE_MY_METRICS) {
            glyph.metrics = component_index;
        }

        let (cx, cy) = match flags & CompoundFlags::ARGS_ARE_WORDS_AND_XY_VALUES {
            CompoundFlags::ARGS_ARE_WORDS_AND_XY_VALUES => {
                (stream.read_i16()? as f32, stream.read_i16()? as f32)
            }
            CompoundFlags::ARGS_ARE_XY_VALUES => {
                (stream.read_i8()? as f32, stream.read_i8()? as f32)
            }
            _ => {
                // The arguments are matched point numbers.
                return Err(Error::glyph("Font.glyf: Matched point anchoring is unsupported"));
            }
        };

        let mut a = 1.0;
        let mut b = 0.0;
        let mut c = 0.0;
        let mut d = 1.0;
        if flag_u16(flags, CompoundFlags::WE_HAVE_A_SCALE) {
            a = stream.read_f2dot14()?;
            d = a;
        } else if flag_u16(flags, CompoundFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            a = stream.read_f2dot14()?;
            d = stream.read_f2dot14()?;
        } else if flag_u16(flags, CompoundFlags::WE_HAVE_A_TWO_BY_TWO) {
            a = stream.read_f2dot14()?;
            b = stream.read_f2dot14()?;
            c = stream.read_f2dot14()?;
            d = stream.read_f2dot14()?;
        }

        if flag_u16(flags, CompoundFlags::SCALED_COMPONENT_OFFSET)
            && !flag_u16(flags, CompoundFlags::UNSCALED_COMPONENT_OFFSET)
        {
            return Err(Error::glyph("Font.glyf: Scaled component offsets are unsupported"));
        }

        let mut component = parse_glyph(glyf, locations, component_index, depth + 1)?;
        for point in &mut component.points {
            point.transform(a, b, c, d, cx, cy);
        }
        // Contour end markers travel with the points, so appended contours
        // stay disjoint.
        glyph.points.append(&mut component.points);
    }
    Ok(())
}
