#![allow(dead_code)]

use glyphmesh::{EdgeList, FaceId, Point, Shape};

/// Checks the structural half-edge invariants: twins pair up, succ/pred are
/// inverses, consecutive edges share a vertex, and both sides of a succ link
/// agree on the face.
pub fn check_edge_invariants(el: &EdgeList) {
    for (i, e) in el.edges.iter().enumerate() {
        assert_eq!(el.edges[e.twin].twin, i, "twin of twin");
        assert_eq!(el.edges[e.succ].pred, i, "succ/pred inverse");
        assert_eq!(el.edges[e.pred].succ, i, "pred/succ inverse");
        assert_eq!(
            el.edges[e.succ].origin, el.edges[e.twin].origin,
            "succ starts where this edge ends"
        );
        assert_eq!(el.edges[e.succ].face, e.face, "face constant along cycle");
    }
}

/// The number of undirected edges (twin pairs counted once).
pub fn edge_pairs(el: &EdgeList) -> usize {
    assert_eq!(el.edges.len() % 2, 0);
    el.edges.len() / 2
}

/// Euler characteristic V - E + F with twin pairs counted once.
pub fn euler(el: &EdgeList) -> i64 {
    el.vertices.len() as i64 - edge_pairs(el) as i64 + el.faces.len() as i64
}

pub fn interior_faces(el: &EdgeList) -> Vec<FaceId> {
    (0..el.faces.len())
        .filter(|&f| el.faces[f].is_inside == Some(true))
        .collect()
}

/// The number of half-edges on the face's outer boundary.
pub fn boundary_len(el: &EdgeList, f: FaceId) -> usize {
    let outer = el.faces[f].outer_component.expect("bounded face");
    el.walk_cycle(outer).count()
}

/// The corner positions of a triangular face.
pub fn triangle_corners(el: &EdgeList, f: FaceId) -> [Point; 3] {
    let outer = el.faces[f].outer_component.expect("bounded face");
    let corners: Vec<Point> = el.walk_cycle(outer).map(|e| el.origin(e)).collect();
    assert_eq!(corners.len(), 3);
    [corners[0], corners[1], corners[2]]
}

/// Total area of all interior faces.
pub fn interior_area(el: &EdgeList) -> f32 {
    interior_faces(el)
        .into_iter()
        .map(|f| el.cycle_area(el.faces[f].outer_component.expect("bounded face")))
        .sum()
}

/// Strict point-in-triangle test via consistent orientation signs.
pub fn triangle_contains(tri: [Point; 3], p: Point) -> bool {
    let sign = |a: Point, b: Point| (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let d0 = sign(tri[0], tri[1]);
    let d1 = sign(tri[1], tri[2]);
    let d2 = sign(tri[2], tri[0]);
    let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
    let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
    !(has_neg && has_pos)
}

/// A closed polygon shape from a vertex loop.
pub fn polygon(points: &[(f32, f32)]) -> Shape {
    let mut shape = Shape::new();
    for &(x, y) in points {
        shape.add_vertex(x, y);
    }
    for i in 0..points.len() {
        shape.add_segment(i, (i + 1) % points.len());
    }
    shape
}
