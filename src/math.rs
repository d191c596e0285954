//! Geometry primitives shared by the planariser, face builder, and
//! triangulator.

use core::cmp::Ordering;

/// Two events closer than this on both axes are merged into one.
pub(crate) const DIST_EPS: f32 = 1e-10;

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Point {
        Point {
            x,
            y,
        }
    }

    pub fn midpoint(a: Point, b: Point) -> Point {
        Point {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
        }
    }
}

/// Returns true if `a` is above `b`.
///
/// This is the total order used by every sweep in the pipeline: higher y
/// first, ties broken by smaller x.
#[inline]
pub fn above(a: Point, b: Point) -> bool {
    a.y > b.y || (a.y == b.y && a.x < b.x)
}

/// Comparator form of [`above`] for sorting top-down.
#[inline]
pub(crate) fn cmp_above(a: Point, b: Point) -> Ordering {
    if above(a, b) {
        Ordering::Less
    } else if a == b {
        Ordering::Equal
    } else {
        Ordering::Greater
    }
}

/// Returns true if `a` and `b` are within the merge tolerance on both axes.
#[inline]
pub(crate) fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < DIST_EPS && (a.y - b.y).abs() < DIST_EPS
}

/// The 2d cross product `u.x*v.y - u.y*v.x`.
#[inline]
pub fn cross2d(u: Point, v: Point) -> f32 {
    u.x * v.y - u.y * v.x
}

/// Proper intersection of the segments `p -> p2` and `q -> q2`.
///
/// Returns the interior intersection point, or `None` when the segments are
/// parallel or meet only at or beyond an endpoint. Endpoint contact is
/// excluded with strict inequalities on both parameters.
pub fn intersection(p: Point, p2: Point, q: Point, q2: Point) -> Option<Point> {
    let r = Point::new(p2.x - p.x, p2.y - p.y);
    let s = Point::new(q2.x - q.x, q2.y - q.y);
    let q_p = Point::new(q.x - p.x, q.y - p.y);

    let d = cross2d(r, s);
    if d == 0.0 {
        // Parallel.
        return None;
    }
    let t = cross2d(q_p, s) / d;
    let u = cross2d(q_p, r) / d;
    if t <= 0.0 || t >= 1.0 || u <= 0.0 || u >= 1.0 {
        return None;
    }
    Some(Point::new(p.x + t * r.x, p.y + t * r.y))
}

/// Angle of the vector `v1 -> v2`, normalised to `[0, 2pi)`.
///
/// `(1, 0) => 0`, `(0, 1) => pi/2`, `(-1, 0) => pi`, `(0, -1) => 3pi/2`.
pub(crate) fn angle(v1: Point, v2: Point) -> f64 {
    let phi = ((v2.y - v1.y) as f64).atan2((v2.x - v1.x) as f64);
    if phi >= 0.0 {
        phi
    } else {
        phi + 2.0 * core::f64::consts::PI
    }
}

/// Clockwise angle from `a1` to `a2`, in `[0, 2pi)`.
pub(crate) fn angle_between(a1: f64, a2: f64) -> f64 {
    if a2 >= a1 {
        a1 + 2.0 * core::f64::consts::PI - a2
    } else {
        a1 - a2
    }
}

/// Returns true if `p` is strictly left of the segment `s1 -> s2`, comparing
/// against the segment's x-coordinate at `p`'s height.
#[inline]
pub(crate) fn point_left_of_segment(p: Point, s1: Point, s2: Point) -> bool {
    let x = s1.x + (s2.x - s1.x) * (p.y - s1.y) / (s2.y - s1.y);
    p.x < x
}
