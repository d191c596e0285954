use crate::math::Point;
use crate::table::GlyphPoint;
use crate::{Error, FontResult};
use std::io::{BufRead, Write};

const MALFORMED_VERTEX: Error = Error::container("Shape: Malformed vertex record");
const MALFORMED_SEGMENT: Error = Error::container("Shape: Malformed segment record");

/// A piecewise-linear drawing: a pool of vertices plus the segments that
/// connect them.
///
/// Segments may share endpoints and may cross; the planariser resolves both.
/// This is the handoff type between the font decoder and the triangulation
/// pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    pub vertices: Vec<Point>,
    /// Index pairs into `vertices`.
    pub segments: Vec<(usize, usize)>,
}

impl Shape {
    pub fn new() -> Shape {
        Shape::default()
    }

    pub fn add_vertex(&mut self, x: f32, y: f32) {
        self.vertices.push(Point::new(x, y));
    }

    /// Connects the vertices at `from` and `to`. The indices must refer to
    /// vertices that have already been added.
    pub fn add_segment(&mut self, from: usize, to: usize) {
        self.segments.push((from, to));
    }

    /// Builds the shape of a decoded glyph outline.
    ///
    /// Each contour alternates on-curve points and quadratic control points,
    /// with implied on-curve points at the midpoint of two consecutive
    /// control points. Curve pieces are flattened with `level` segments
    /// each; every contour closes back onto its first emitted vertex.
    /// Coordinates come out as `(x - lsb) / upem` and `y / upem`.
    pub(crate) fn from_outline(points: &[GlyphPoint], lsb: f32, upem: f32, level: u32) -> Shape {
        let mut shape = Shape::new();
        let scale = 1.0 / upem;
        let mut start = 0;
        for (i, point) in points.iter().enumerate() {
            if point.contour_end {
                shape.add_contour(&points[start..=i], lsb, scale, level);
                start = i + 1;
            }
        }
        shape
    }

    fn add_contour(&mut self, contour: &[GlyphPoint], lsb: f32, scale: f32, level: u32) {
        if contour.is_empty() {
            return;
        }
        let at = |p: &GlyphPoint| Point::new((p.x - lsb) * scale, p.y * scale);
        let first = self.vertices.len();
        let n = contour.len();
        for cur in 0..n {
            let point = &contour[cur];
            let prev = &contour[(cur + n - 1) % n];
            let next = &contour[(cur + 1) % n];
            if !point.on_curve {
                // A control point. The curve runs between the neighbouring
                // on-curve points, implied at midpoints when the neighbour
                // is another control point.
                let p0 = if prev.on_curve {
                    at(prev)
                } else {
                    Point::midpoint(at(prev), at(point))
                };
                let p2 = if next.on_curve {
                    at(next)
                } else {
                    Point::midpoint(at(point), at(next))
                };
                self.flatten_quad(p0, at(point), p2, level);
            } else if next.on_curve {
                // A straight run between two on-curve points.
                self.vertices.push(at(point));
            }
            // An on-curve point followed by a control point is emitted as
            // the start of the control point's curve piece.
        }
        let last = self.vertices.len();
        for v in first..last {
            if v + 1 < last {
                self.add_segment(v, v + 1);
            } else {
                self.add_segment(v, first);
            }
        }
    }

    /// Flattens one quadratic piece with forward differences, emitting
    /// `level` vertices starting at `p0`. The piece's far endpoint belongs
    /// to the next piece.
    fn flatten_quad(&mut self, p0: Point, ctrl: Point, p2: Point, level: u32) {
        let level = level.max(1);
        let m = 1.0 / level as f32;
        let mm = m * m;
        let oa = mm - 2.0 * m;
        let ob = 2.0 * m - 2.0 * mm;
        let oc = mm;
        let oo1 = 2.0 * mm;
        let oo2 = -4.0 * mm;
        let mut dx = p0.x * oa + ctrl.x * ob + p2.x * oc;
        let mut dy = p0.y * oa + ctrl.y * ob + p2.y * oc;
        let ddx = p0.x * oo1 + ctrl.x * oo2 + p2.x * oo1;
        let ddy = p0.y * oo1 + ctrl.y * oo2 + p2.y * oo1;
        let mut cx = p0.x;
        let mut cy = p0.y;
        for _ in 0..level {
            self.vertices.push(Point::new(cx, cy));
            cx += dx;
            cy += dy;
            dx += ddx;
            dy += ddy;
        }
    }

    /// Loads a shape from its plain text form.
    ///
    /// One record per line: `v: <x>, <y>` declares a vertex, `s: <i>, <j>`
    /// a segment between previously declared vertices. Any malformed record
    /// aborts the load.
    pub fn read<R: BufRead>(reader: R) -> FontResult<Shape> {
        let mut shape = Shape::new();
        for line in reader.lines() {
            let line = line.map_err(|_| Error::io("Shape: Read error"))?;
            if let Some(rest) = line.strip_prefix("v: ") {
                let (x, y) = split_record(rest).ok_or(MALFORMED_VERTEX)?;
                let x: f32 = x.parse().map_err(|_| MALFORMED_VERTEX)?;
                let y: f32 = y.parse().map_err(|_| MALFORMED_VERTEX)?;
                shape.add_vertex(x, y);
            } else if let Some(rest) = line.strip_prefix("s: ") {
                let (from, to) = split_record(rest).ok_or(MALFORMED_SEGMENT)?;
                let from: usize = from.parse().map_err(|_| MALFORMED_SEGMENT)?;
                let to: usize = to.parse().map_err(|_| MALFORMED_SEGMENT)?;
                if from >= shape.vertices.len() || to >= shape.vertices.len() {
                    return Err(MALFORMED_SEGMENT);
                }
                shape.add_segment(from, to);
            } else {
                return Err(Error::container("Shape: Unexpected record"));
            }
        }
        Ok(shape)
    }

    /// Writes the shape in its plain text form. Reading the output back
    /// reproduces the shape exactly.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for v in &self.vertices {
            writeln!(writer, "v: {}, {}", v.x, v.y)?;
        }
        for &(from, to) in &self.segments {
            writeln!(writer, "s: {}, {}", from, to)?;
        }
        Ok(())
    }
}

fn split_record(rest: &str) -> Option<(&str, &str)> {
    let mut parts = rest.splitn(2, ", ");
    let a = parts.next()?;
    let b = parts.next()?;
    Some((a.trim(), b.trim()))
}
