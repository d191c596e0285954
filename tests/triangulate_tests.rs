mod common;

use common::*;
use glyphmesh::{connect_components, make_planar, triangulate, Point, Shape, VertexKind};

#[test]
fn triangle_passes_through() {
    let el = triangulate(&polygon(&[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0)]));
    check_edge_invariants(&el);
    assert_eq!(el.vertices.len(), 3);
    assert_eq!(edge_pairs(&el), 3);
    assert_eq!(el.faces.len(), 2);
    assert_eq!(euler(&el), 2);

    let interior = interior_faces(&el);
    assert_eq!(interior.len(), 1);
    assert_eq!(boundary_len(&el, interior[0]), 3);

    // One top vertex, one bottom, nothing split or merged.
    let starts = el.vertices.iter().filter(|v| v.kind == VertexKind::Start).count();
    let ends = el.vertices.iter().filter(|v| v.kind == VertexKind::End).count();
    let other = el
        .vertices
        .iter()
        .filter(|v| v.kind == VertexKind::Split || v.kind == VertexKind::Merge)
        .count();
    assert_eq!(starts, 1);
    assert_eq!(ends, 1);
    assert_eq!(other, 0);
}

#[test]
fn square_gets_one_diagonal() {
    let el = triangulate(&polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]));
    check_edge_invariants(&el);
    assert_eq!(el.vertices.len(), 4);
    // Four boundary pairs plus exactly one diagonal.
    assert_eq!(edge_pairs(&el), 5);
    assert_eq!(el.faces.len(), 3);
    assert_eq!(euler(&el), 2);

    let interior = interior_faces(&el);
    assert_eq!(interior.len(), 2);
    for f in &interior {
        assert_eq!(boundary_len(&el, *f), 3);
        assert!(el.cycle_area(el.faces[*f].outer_component.unwrap()) > 0.0);
    }
    let total: f32 = interior
        .iter()
        .map(|&f| el.cycle_area(el.faces[f].outer_component.unwrap()))
        .sum();
    assert!((total - 1.0).abs() < 1e-5);
}

#[test]
fn square_hole_cycles_and_labels() {
    // Faces and cycle orientation before triangulation.
    let mut shape = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let base = shape.vertices.len();
    for &(x, y) in &[(4.0, 4.0), (4.0, 6.0), (6.0, 6.0), (6.0, 4.0)] {
        shape.add_vertex(x, y);
    }
    for i in 0..4 {
        shape.add_segment(base + i, base + (i + 1) % 4);
    }

    let mut el = make_planar(&shape);
    connect_components(&mut el);
    check_edge_invariants(&el);

    // Annulus, hole, and the unbounded face.
    assert_eq!(el.faces.len(), 3);
    for e in &el.edges {
        assert!(e.face.is_some());
    }
    let unbounded: Vec<usize> = (0..el.faces.len())
        .filter(|&f| el.faces[f].outer_component.is_none())
        .collect();
    assert_eq!(unbounded.len(), 1);
    assert_eq!(el.faces[unbounded[0]].is_inside, Some(false));
    assert_eq!(interior_faces(&el).len(), 1);

    // Outer boundaries counter-clockwise, hole boundaries clockwise.
    for f in &el.faces {
        if let Some(outer) = f.outer_component {
            assert!(el.cycle_area(outer) > 0.0);
        }
        for &inner in &f.inner_components {
            assert!(el.cycle_area(inner) < 0.0);
        }
    }

    // Crossing any twin flips the interior label.
    for (i, e) in el.edges.iter().enumerate() {
        let f = e.face.unwrap();
        let g = el.edges[el.edges[i].twin].face.unwrap();
        if f != g {
            assert_ne!(el.faces[f].is_inside, el.faces[g].is_inside);
        }
    }
}

#[test]
fn square_hole_triangulates_to_a_ring() {
    let mut shape = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let base = shape.vertices.len();
    for &(x, y) in &[(4.0, 4.0), (4.0, 6.0), (6.0, 6.0), (6.0, 4.0)] {
        shape.add_vertex(x, y);
    }
    for i in 0..4 {
        shape.add_segment(base + i, base + (i + 1) % 4);
    }

    let el = triangulate(&shape);
    check_edge_invariants(&el);
    assert_eq!(el.vertices.len(), 8);
    assert_eq!(euler(&el), 2);

    let interior = interior_faces(&el);
    assert_eq!(interior.len(), 8);
    let mut total = 0.0;
    for &f in &interior {
        assert_eq!(boundary_len(&el, f), 3);
        total += el.cycle_area(el.faces[f].outer_component.unwrap());
    }
    assert!((total - 96.0).abs() < 1e-3);

    // No triangle may cover the hole.
    let centre = Point::new(5.0, 5.0);
    for &f in &interior {
        assert!(!triangle_contains(triangle_corners(&el, f), centre));
    }
}

#[test]
fn arch_splits_once_and_triangulates() {
    // An arch: a square with a notch cut upward from the bottom edge. The
    // notch ceiling's left corner is the lone split vertex.
    let el = triangulate(&polygon(&[
        (0.0, 0.0),
        (1.0, 0.0),
        (1.0, 2.0),
        (2.0, 2.0),
        (2.0, 0.0),
        (3.0, 0.0),
        (3.0, 3.0),
        (0.0, 3.0),
    ]));
    check_edge_invariants(&el);
    assert_eq!(el.vertices.len(), 8);
    // Eight boundary pairs, one partition diagonal, four fan diagonals.
    assert_eq!(edge_pairs(&el), 13);
    assert_eq!(euler(&el), 2);

    let interior = interior_faces(&el);
    assert_eq!(interior.len(), 6);
    let mut total = 0.0;
    for &f in &interior {
        assert_eq!(boundary_len(&el, f), 3);
        total += el.cycle_area(el.faces[f].outer_component.unwrap());
    }
    // 3x3 square minus the 1x2 notch.
    assert!((total - 7.0).abs() < 1e-5);
    // Nothing may creep into the notch.
    for &f in &interior {
        assert!(!triangle_contains(triangle_corners(&el, f), Point::new(1.5, 0.5)));
    }
}

#[test]
fn touching_triangles_share_a_vertex() {
    let mut shape = Shape::new();
    for &(x, y) in &[
        (0.0, 0.0),
        (2.0, 0.0),
        (1.0, 1.0),
        (1.0, 1.0),
        (0.0, 2.0),
        (2.0, 2.0),
    ] {
        shape.add_vertex(x, y);
    }
    for &(a, b) in &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)] {
        shape.add_segment(a, b);
    }

    let el = triangulate(&shape);
    check_edge_invariants(&el);
    assert_eq!(el.vertices.len(), 5);
    // Both lobes are already triangles: no diagonals at all.
    assert_eq!(edge_pairs(&el), 6);
    assert_eq!(euler(&el), 2);

    let interior = interior_faces(&el);
    assert_eq!(interior.len(), 2);
    for &f in &interior {
        assert_eq!(boundary_len(&el, f), 3);
    }
    let total: f32 = interior
        .iter()
        .map(|&f| el.cycle_area(el.faces[f].outer_component.unwrap()))
        .sum();
    assert!((total - 2.0).abs() < 1e-5);
}

#[test]
fn empty_input_yields_empty_edge_list() {
    let el = triangulate(&Shape::new());
    assert!(el.vertices.is_empty());
    assert!(el.faces.is_empty());
}
