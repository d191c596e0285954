//! Face reconstruction: discovers the boundary cycles of the planar
//! subdivision, groups the cycles that bound the same face, and labels every
//! face interior or exterior.
//!
//! A cycle is an inner component (the boundary of a hole, clockwise) when
//! the interior angle at its leftmost vertex exceeds pi; otherwise it is the
//! counter-clockwise outer boundary of a region. A left-neighbour sweep
//! connects each inner component to whatever lies immediately left of its
//! leftmost vertex, and the connected groups become faces.

use crate::dcel::{EdgeId, EdgeList, VertexId, NIL, VERTEX_VISITED};
use crate::math;
use log::{debug, warn};

/// Builds faces for a planarised edge list and labels them inside/outside.
pub fn connect_components(el: &mut EdgeList) {
    if el.vertices.len() < 3 {
        return;
    }

    // Discover the boundary cycles: every half-edge belongs to exactly one.
    let mut pending: Vec<EdgeId> = Vec::new();
    let mut seen = vec![false; el.edges.len()];
    for e in 0..el.edges.len() {
        if seen[e] || el.edges[e].succ == NIL {
            continue;
        }
        let mut p = e;
        loop {
            seen[p] = true;
            p = el.edges[p].succ;
            if p == e {
                break;
            }
        }
        pending.push(e);
    }

    // Cycle repair: a cycle that revisits a vertex is split there so each
    // final cycle visits a vertex at most once. The severed chain goes back
    // on the queue for its own repair pass.
    let mut split_cycles: Vec<EdgeId> = Vec::new();
    while let Some(entry) = pending.pop() {
        let mut cycle = entry;
        set_not_visited(el, cycle);
        let mut p = cycle;
        loop {
            let origin = el.edges[p].origin;
            if el.vertices[origin].flags & VERTEX_VISITED != 0 {
                // Been here before: reroute the earlier visit's chain out of
                // this cycle.
                let earlier = el.vertices[origin].incident_edge;
                let earlier_pred = el.edges[earlier].pred;
                let p_pred = el.edges[p].pred;
                el.edges[p_pred].succ = earlier;
                el.edges[earlier].pred = p_pred;
                el.edges[earlier_pred].succ = p;
                el.edges[p].pred = earlier_pred;
                pending.push(earlier);
                cycle = p;
                set_not_visited(el, cycle);
            }
            let origin = el.edges[p].origin;
            el.vertices[origin].incident_edge = p;
            el.vertices[origin].flags |= VERTEX_VISITED;
            p = el.edges[p].succ;
            if p == cycle {
                break;
            }
        }
        split_cycles.push(cycle);
    }

    // Keep only real cycles; a pair of half-edges walking there and back is
    // a leftover segment, not a boundary.
    let mut cycles: Vec<EdgeId> = Vec::new();
    for cycle in split_cycles {
        if el.edges[el.edges[cycle].succ].succ == cycle {
            continue;
        }
        let id = cycles.len();
        let mut p = cycle;
        loop {
            el.edges[p].cycle = Some(id);
            p = el.edges[p].succ;
            if p == cycle {
                break;
            }
        }
        cycles.push(el.leftmost_edge(cycle));
    }
    let ncycle = cycles.len();
    debug!("face builder found {} cycles", ncycle);

    // Outgoing cycle edges per vertex, for the sweep below.
    let mut incident: Vec<Vec<EdgeId>> = vec![Vec::new(); el.vertices.len()];
    for &c in &cycles {
        let mut p = c;
        loop {
            incident[el.edges[p].origin].push(p);
            p = el.edges[p].succ;
            if p == c {
                break;
            }
        }
    }

    // Classify each cycle by the interior angle at its leftmost vertex.
    let mut is_inner = vec![false; ncycle];
    for (i, &c) in cycles.iter().enumerate() {
        let u = el.origin(c);
        let u1 = el.origin(el.edges[c].pred);
        let u2 = el.origin(el.edges[c].succ);
        let a1 = math::angle(u, u1);
        let a2 = math::angle(u, u2);
        is_inner[i] = math::angle_between(a1, a2) > core::f64::consts::PI;
    }

    // Left-neighbour sweep: for each inner cycle, record an arc to the cycle
    // owning the edge immediately left of its leftmost vertex, or to the
    // unbounded pseudo-component when nothing is there.
    let mut order: Vec<VertexId> = (0..el.vertices.len()).collect();
    order.sort_by(|&a, &b| math::cmp_above(el.vertices[a].pos, el.vertices[b].pos));

    let mut status: Vec<EdgeId> = Vec::new();
    let mut arcs: Vec<(usize, Option<usize>)> = Vec::new();
    for &v in &order {
        {
            let edges = &el.edges;
            status.retain(|&e| edges[edges[e].twin].origin != v);
        }
        let left_edge = status
            .iter()
            .rev()
            .copied()
            .find(|&e| !vertex_left_of_edge(el, v, e));

        for idx in 0..incident[v].len() {
            let e = incident[v][idx];
            if math::above(el.origin(e), el.end(e)) {
                let at = status
                    .iter()
                    .position(|&r| edge_left_of_edge(el, e, r))
                    .unwrap_or(status.len());
                status.insert(at, e);
            }
        }

        for i in 0..ncycle {
            if el.edges[cycles[i]].origin != v || !is_inner[i] {
                continue;
            }
            let left_cycle = left_edge.and_then(|e| el.edges[e].cycle);
            let left_is_outer = match left_cycle {
                None => true,
                Some(c) => !is_inner[c],
            };
            if left_is_outer && connected_to_outer(i, &arcs, &is_inner) {
                continue;
            }
            arcs.push((i, left_cycle));
        }
    }

    // The arcs define connectivity between cycles; cycles in one connected
    // group bound the same face. Member `ncycle` stands for the unbounded
    // face.
    let mut dsu = DisjointSet::new(ncycle + 1);
    let mut in_arcs = vec![false; ncycle + 1];
    for &(a, b) in &arcs {
        let b = b.unwrap_or(ncycle);
        dsu.union(a, b);
        in_arcs[a] = true;
        in_arcs[b] = true;
    }

    let mut face_of_root: Vec<Option<usize>> = vec![None; ncycle + 1];
    let mut unbounded_face = None;
    for m in 0..=ncycle {
        if !in_arcs[m] {
            continue;
        }
        let root = dsu.find(m);
        let face = match face_of_root[root] {
            Some(f) => f,
            None => {
                let f = el.new_face();
                face_of_root[root] = Some(f);
                f
            }
        };
        if m == ncycle {
            unbounded_face = Some(face);
        } else {
            let e = cycles[m];
            el.edges[e].face = Some(face);
            if is_inner[m] {
                el.faces[face].inner_components.push(e);
            } else {
                el.faces[face].outer_component = Some(e);
            }
        }
    }

    // Cycles not touched by any arc bound their own face. Also spread each
    // cycle's face over all of its edges.
    for i in 0..ncycle {
        let e = cycles[i];
        let face = match el.edges[e].face {
            Some(f) => f,
            None => {
                let f = el.new_face();
                el.faces[f].outer_component = Some(e);
                f
            }
        };
        el.set_left_face(e, Some(face));
    }

    // Interior labelling: the unbounded face is outside; crossing a twin
    // from a face's hole boundary flips the label. Unreached faces stay
    // outside.
    let unbounded_face = match unbounded_face {
        Some(f) => f,
        None => {
            warn!("face builder found no unbounded face");
            return;
        }
    };
    el.faces[unbounded_face].is_inside = Some(false);
    let mut worklist = vec![unbounded_face];
    while let Some(f) = worklist.pop() {
        let inside = match el.faces[f].is_inside {
            Some(inside) => inside,
            None => continue,
        };
        for idx in 0..el.faces[f].inner_components.len() {
            let component = el.faces[f].inner_components[idx];
            let mut e = component;
            loop {
                let across = el.edges[el.edges[e].twin].face;
                if let Some(g) = across {
                    if el.faces[g].is_inside.is_none() {
                        el.faces[g].is_inside = Some(!inside);
                        worklist.push(g);
                    }
                }
                e = el.edges[e].succ;
                if e == component {
                    break;
                }
            }
        }
    }
    for &c in &cycles {
        if let Some(f) = el.edges[c].face {
            if el.faces[f].is_inside.is_none() {
                el.faces[f].is_inside = Some(false);
            }
        }
    }
}

fn set_not_visited(el: &mut EdgeList, cycle: EdgeId) {
    let mut p = cycle;
    loop {
        let origin = el.edges[p].origin;
        el.vertices[origin].flags &= !VERTEX_VISITED;
        p = el.edges[p].succ;
        if p == cycle {
            break;
        }
    }
}

/// Is the vertex strictly left of the edge, comparing x at the vertex's
/// height?
pub(crate) fn vertex_left_of_edge(el: &EdgeList, v: VertexId, e: EdgeId) -> bool {
    math::point_left_of_segment(el.vertices[v].pos, el.origin(e), el.end(e))
}

/// Status order for downward edges, analogous to the planariser's segment
/// order.
pub(crate) fn edge_left_of_edge(el: &EdgeList, a: EdgeId, b: EdgeId) -> bool {
    let ao = el.edges[a].origin;
    let bo = el.edges[b].origin;
    if math::above(el.vertices[bo].pos, el.vertices[ao].pos) {
        vertex_left_of_edge(el, ao, b)
    } else {
        vertex_left_of_edge(el, el.edges[el.edges[a].twin].origin, b)
    }
}

/// Is this inner cycle already arc-connected to an outer cycle (or to the
/// unbounded component)?
fn connected_to_outer(cycle: usize, arcs: &[(usize, Option<usize>)], is_inner: &[bool]) -> bool {
    arcs.iter().any(|&(a, b)| {
        let b_outer = match b {
            None => true,
            Some(c) => !is_inner[c],
        };
        (a == cycle && b_outer) || (b == Some(cycle) && !is_inner[a])
    })
}

/// A disjoint-set forest with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> DisjointSet {
        DisjointSet {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            core::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}
