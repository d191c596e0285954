//! Triangulation of the interior faces of a planar subdivision, after
//! Berg, Cheong, van Kreveld, Overmars, Computational Geometry: Algorithms
//! and Applications, third edition.
//!
//! Two passes of diagonal insertion: the first partitions every interior
//! face into y-monotone pieces at its split and merge vertices, the second
//! triangulates each monotone piece with the classical stack walk.

use crate::dcel::{
    EdgeId, EdgeList, FaceId, VertexId, VertexKind, NIL, VERTEX_DOWN, VERTEX_UP,
};
use crate::faces::{connect_components, edge_left_of_edge, vertex_left_of_edge};
use crate::math::{self, Point};
use crate::planar::make_planar;
use crate::shape::Shape;
use core::f64::consts::PI;
use log::warn;

/// Runs the full pipeline on a shape: planarise, build faces, then
/// triangulate every interior face. Every interior face of the returned
/// edge list is bounded by exactly three half-edges.
pub fn triangulate(shape: &Shape) -> EdgeList {
    let mut el = make_planar(shape);
    connect_components(&mut el);

    let mut order: Vec<VertexId> = (0..el.vertices.len()).collect();
    order.sort_by(|&a, &b| math::cmp_above(el.vertices[a].pos, el.vertices[b].pos));

    // Partition the interior faces present right now; faces created by the
    // partition itself are already monotone.
    let interior: Vec<FaceId> = (0..el.faces.len())
        .filter(|&f| el.faces[f].is_inside == Some(true))
        .collect();
    let mut status: Vec<EdgeId> = Vec::new();
    for f in interior {
        partition_face(&mut el, &mut status, &order, f);
    }

    // Triangulate every interior face, including the monotone pieces the
    // loop itself splits off the end of the face list.
    let mut f = 0;
    while f < el.faces.len() {
        if el.faces[f].is_inside == Some(true) {
            triangulate_face(&mut el, f);
        }
        f += 1;
    }
    el
}

// MONOTONE PARTITION

/// Classifies the vertices of one boundary cycle by the vertical relation
/// to their neighbours and the interior angle between the boundary edges.
fn classify_component(el: &mut EdgeList, component: EdgeId) {
    let mut e = component;
    loop {
        let v = el.origin(e);
        let v_in = el.origin(el.edges[e].pred);
        let v_out = el.origin(el.edges[e].succ);

        let phi = ((v_out.y - v.y) as f64).atan2((v_out.x - v.x) as f64);
        let theta = ((v_in.y - v.y) as f64).atan2((v_in.x - v.x) as f64);
        let angle = if phi < theta {
            2.0 * PI + phi - theta
        } else {
            phi - theta
        };

        let in_below = math::above(v, v_in);
        let out_below = math::above(v, v_out);
        let kind = if in_below && out_below {
            if angle > PI {
                VertexKind::Start
            } else {
                VertexKind::Split
            }
        } else if !in_below && !out_below {
            if angle > PI {
                VertexKind::End
            } else {
                VertexKind::Merge
            }
        } else {
            VertexKind::Regular
        };
        let origin = el.edges[e].origin;
        el.vertices[origin].kind = kind;

        e = el.edges[e].succ;
        if e == component {
            break;
        }
    }
}

fn classify_face(el: &mut EdgeList, f: FaceId) {
    if let Some(outer) = el.faces[f].outer_component {
        classify_component(el, outer);
    }
    for idx in 0..el.faces[f].inner_components.len() {
        let component = el.faces[f].inner_components[idx];
        classify_component(el, component);
    }
}

fn align_face_vertices(el: &mut EdgeList, f: FaceId) {
    if let Some(outer) = el.faces[f].outer_component {
        el.align_vertices(outer);
    }
    for idx in 0..el.faces[f].inner_components.len() {
        let component = el.faces[f].inner_components[idx];
        el.align_vertices(component);
    }
}

/// Splits one interior face into monotone pieces by sweeping its vertices
/// top-down and inserting a diagonal at every split and merge event.
fn partition_face(el: &mut EdgeList, status: &mut Vec<EdgeId>, order: &[VertexId], f: FaceId) {
    classify_face(el, f);
    align_face_vertices(el, f);

    let worklist: Vec<VertexId> = order
        .iter()
        .copied()
        .filter(|&v| {
            let e = el.vertices[v].incident_edge;
            e != NIL && el.edges[e].face == Some(f)
        })
        .collect();

    for v in worklist {
        match el.vertices[v].kind {
            VertexKind::Start => handle_start_vertex(el, status, v),
            VertexKind::End => handle_end_vertex(el, status, v),
            VertexKind::Split => handle_split_vertex(el, status, v),
            VertexKind::Merge => handle_merge_vertex(el, status, v),
            VertexKind::Regular => handle_regular_vertex(el, status, v),
            VertexKind::Unclassified => {
                warn!("unclassified vertex {} in partition input", el.vertices[v].id);
            }
        }
    }
}

fn helper_of(el: &EdgeList, e: EdgeId) -> Option<VertexId> {
    el.edges[e].helper
}

fn set_helper(el: &mut EdgeList, e: EdgeId, v: VertexId) {
    el.edges[e].helper = Some(v);
    let twin = el.edges[e].twin;
    el.edges[twin].helper = Some(v);
}

fn is_merge(el: &EdgeList, v: Option<VertexId>) -> bool {
    match v {
        Some(v) => el.vertices[v].kind == VertexKind::Merge,
        None => false,
    }
}

fn status_insert(el: &EdgeList, status: &mut Vec<EdgeId>, e: EdgeId) {
    let at = status
        .iter()
        .position(|&r| edge_left_of_edge(el, e, r))
        .unwrap_or(status.len());
    status.insert(at, e);
}

fn status_remove(status: &mut Vec<EdgeId>, e: EdgeId) {
    if let Some(at) = status.iter().position(|&r| r == e) {
        status.remove(at);
    }
}

/// The status edge immediately left of the vertex, if any.
fn status_find_left(el: &EdgeList, status: &[EdgeId], v: VertexId) -> Option<EdgeId> {
    status
        .iter()
        .rev()
        .copied()
        .find(|&e| !vertex_left_of_edge(el, v, e))
}

fn handle_start_vertex(el: &mut EdgeList, status: &mut Vec<EdgeId>, v: VertexId) {
    let e = el.vertices[v].incident_edge;
    status_insert(el, status, e);
    set_helper(el, e, v);
}

fn handle_end_vertex(el: &mut EdgeList, status: &mut Vec<EdgeId>, v: VertexId) {
    let e_1 = el.edges[el.vertices[v].incident_edge].pred;
    if let Some(h) = helper_of(el, e_1) {
        if el.vertices[h].kind == VertexKind::Merge {
            add_diagonal(el, h, v);
        }
    }
    status_remove(status, e_1);
}

fn handle_split_vertex(el: &mut EdgeList, status: &mut Vec<EdgeId>, v: VertexId) {
    let e = el.vertices[v].incident_edge;
    if let Some(e_j) = status_find_left(el, status, v) {
        if let Some(h) = helper_of(el, e_j) {
            add_diagonal(el, h, v);
        }
        set_helper(el, e_j, v);
    }
    status_insert(el, status, e);
    set_helper(el, e, v);
}

fn handle_merge_vertex(el: &mut EdgeList, status: &mut Vec<EdgeId>, v: VertexId) {
    let e_1 = el.edges[el.vertices[v].incident_edge].pred;
    if let Some(h) = helper_of(el, e_1) {
        if el.vertices[h].kind == VertexKind::Merge {
            add_diagonal(el, h, v);
        }
    }
    status_remove(status, e_1);

    if let Some(e_j) = status_find_left(el, status, v) {
        if is_merge(el, helper_of(el, e_j)) {
            if let Some(h) = helper_of(el, e_j) {
                add_diagonal(el, h, v);
            }
        }
        set_helper(el, e_j, v);
    }
}

fn handle_regular_vertex(el: &mut EdgeList, status: &mut Vec<EdgeId>, v: VertexId) {
    let e = el.vertices[v].incident_edge;
    if !math::above(el.end(e), el.vertices[v].pos) {
        // The interior of the polygon is to the right of v.
        let e_1 = el.edges[e].pred;
        if let Some(h) = helper_of(el, e_1) {
            if el.vertices[h].kind == VertexKind::Merge {
                add_diagonal(el, h, v);
            }
        }
        status_remove(status, e_1);
        status_insert(el, status, e);
        set_helper(el, e, v);
    } else {
        // The interior of the polygon is to the left of v.
        if let Some(e_j) = status_find_left(el, status, v) {
            if is_merge(el, helper_of(el, e_j)) {
                if let Some(h) = helper_of(el, e_j) {
                    add_diagonal(el, h, v);
                }
            }
            set_helper(el, e_j, v);
        }
    }
}

// DIAGONAL INSERTION

/// At `v`, finds the outgoing boundary edge with the smallest clockwise
/// angle from the direction `v -> target`, together with its incoming
/// predecessor. A zero angle means the diagonal would lie on an existing
/// edge; the caller refuses it.
fn min_clockwise_edge(el: &EdgeList, v: VertexId, target: Point) -> Option<(EdgeId, EdgeId)> {
    let vp = el.vertices[v].pos;
    let phi = ((target.y - vp.y) as f64).atan2((target.x - vp.x) as f64);

    let start = el.vertices[v].incident_edge;
    if start == NIL {
        return None;
    }
    let mut best: Option<(EdgeId, EdgeId)> = None;
    let mut amin = 2.0 * PI + 1.0;
    let mut p = start;
    loop {
        let vx = el.end(p);
        let theta = ((vx.y - vp.y) as f64).atan2((vx.x - vp.x) as f64);
        let angle = if phi < theta {
            2.0 * PI + phi - theta
        } else {
            phi - theta
        };
        if angle < amin {
            if angle == 0.0 {
                return None;
            }
            amin = angle;
            best = Some((el.edges[p].pred, p));
        }
        p = el.edges[el.edges[p].twin].succ;
        if p == start {
            break;
        }
    }
    best
}

/// Adds a diagonal between `v1` and `v2`, with `v1` above `v2`, splicing
/// the twin pair into the boundary at both ends. When both ends were on the
/// same cycle the splice closes a new face. Degenerate diagonals that would
/// duplicate an existing edge are silently refused.
pub(crate) fn add_diagonal(el: &mut EdgeList, v1: VertexId, v2: VertexId) {
    debug_assert!(math::above(el.vertices[v1].pos, el.vertices[v2].pos));

    let (v1_in, v1_out) = match min_clockwise_edge(el, v1, el.vertices[v2].pos) {
        Some(found) => found,
        None => return,
    };
    let (v2_in, v2_out) = match min_clockwise_edge(el, v2, el.vertices[v1].pos) {
        Some(found) => found,
        None => return,
    };

    // The face being split.
    let face = el.edges[v1_out].face;

    // If v2's chain is reachable from v1's, the diagonal closes a cycle.
    let mut closed = false;
    let mut p = v1_out;
    loop {
        if p == v2_out {
            closed = true;
            break;
        }
        p = el.edges[p].succ;
        if p == v1_out {
            break;
        }
    }

    let (down, up) = el.new_edge_pair();
    el.edges[up].origin = v2;
    el.edges[up].face = face;
    el.edges[up].pred = v2_in;
    el.edges[v2_in].succ = up;
    el.edges[up].succ = v1_out;
    el.edges[v1_out].pred = up;

    el.edges[down].origin = v1;
    el.edges[down].face = face;
    el.edges[down].pred = v1_in;
    el.edges[v1_in].succ = down;
    el.edges[down].succ = v2_out;
    el.edges[v2_out].pred = down;

    if closed {
        // The splice separated the boundary into two cycles; the upper side
        // becomes a new face.
        let nface = el.new_face();
        let inherited = face.and_then(|f| el.faces[f].is_inside);
        el.faces[nface].is_inside = inherited;
        el.faces[nface].outer_component = Some(up);
        el.set_left_face(up, Some(nface));
        if let Some(f) = face {
            el.faces[f].outer_component = Some(down);
        }
    } else {
        // Both chains already shared the face; just spread it over the
        // merged cycle.
        el.set_left_face(up, face);
    }
}

// MONOTONE TRIANGULATION

/// Triangulates one y-monotone face with the stack algorithm. Faces that
/// are already triangles are left alone.
pub fn triangulate_face(el: &mut EdgeList, f: FaceId) {
    let outer = match el.faces[f].outer_component {
        Some(outer) => outer,
        None => return,
    };

    // Count the boundary, align the vertices, and find the top of the
    // monotone piece. Only start, end, and regular vertices can appear on a
    // monotone boundary.
    let mut nvert = 0;
    let mut start = None;
    let mut p = outer;
    loop {
        let v = el.origin(p);
        let v_in = el.origin(el.edges[p].pred);
        let v_out = el.origin(el.edges[p].succ);
        let in_below = math::above(v, v_in);
        let out_below = math::above(v, v_out);
        nvert += 1;
        let origin = el.edges[p].origin;
        el.vertices[origin].incident_edge = p;
        el.vertices[origin].flags &= !(VERTEX_UP | VERTEX_DOWN);
        el.vertices[origin].kind = if in_below && out_below {
            start = Some(p);
            VertexKind::Start
        } else if !in_below && !out_below {
            VertexKind::End
        } else {
            VertexKind::Regular
        };
        p = el.edges[p].succ;
        if p == outer {
            break;
        }
    }

    // Already a triangle (or something degenerate).
    if nvert <= 3 {
        return;
    }
    let start = match start {
        Some(start) => start,
        None => {
            warn!("monotone face without a start vertex");
            return;
        }
    };

    // Collect the boundary from the top; everything before the bottom
    // vertex walks down one chain, everything after walks up the other.
    let mut verts: Vec<VertexId> = Vec::with_capacity(nvert);
    let mut chain = VERTEX_DOWN;
    let mut p = start;
    loop {
        let origin = el.edges[p].origin;
        verts.push(origin);
        if el.vertices[origin].kind == VertexKind::End {
            chain = VERTEX_UP;
        } else {
            el.vertices[origin].flags |= chain;
        }
        p = el.edges[p].succ;
        if p == start {
            break;
        }
    }
    verts.sort_by(|&a, &b| math::cmp_above(el.vertices[a].pos, el.vertices[b].pos));

    let chain_of = |el: &EdgeList, v: VertexId| el.vertices[v].flags & (VERTEX_UP | VERTEX_DOWN);

    let mut stack: Vec<VertexId> = vec![verts[0], verts[1]];
    for i in 2..nvert {
        let v = verts[i];
        let top = match stack.last() {
            Some(&top) => top,
            None => break,
        };
        if chain_of(el, v) != chain_of(el, top) {
            // Opposite chains: fan out diagonals to the whole stack. The
            // last one popped is adjacent to v along the boundary, as is
            // the stack top when v is the bottom vertex.
            if el.vertices[v].kind == VertexKind::End {
                stack.pop();
            }
            while stack.len() > 1 {
                if let Some(s) = stack.pop() {
                    add_diagonal(el, s, v);
                }
            }
            stack.pop();
            stack.push(verts[i - 1]);
            stack.push(v);
        } else {
            // Same chain: emit diagonals while they stay inside the piece,
            // testing the turn against the previous popped vertex.
            let up = el.vertices[v].flags & VERTEX_UP != 0;
            while let Some(prev) = stack.pop() {
                let peek = match stack.last() {
                    Some(&peek) => peek,
                    None => {
                        stack.push(prev);
                        break;
                    }
                };
                let vp = el.vertices[v].pos;
                let phi = math::angle_between(
                    math::angle(vp, el.vertices[peek].pos),
                    math::angle(vp, el.vertices[prev].pos),
                );
                if (up && phi < PI) || (!up && phi > PI) {
                    add_diagonal(el, peek, v);
                } else {
                    stack.push(prev);
                    break;
                }
            }
            stack.push(v);
        }
    }
}
