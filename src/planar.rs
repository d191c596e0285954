//! Planarisation: a sweep-line pass that turns a shape's raw segments into
//! the half-edges of a planar subdivision.
//!
//! Real glyph outlines carry artefacts that would break the sweep: duplicate
//! vertices where contours touch, dangling segment tails, and fans of
//! near-parallel segments radiating from one point. Those are cleaned off
//! the event set first; the sweep then inserts a vertex at every remaining
//! segment crossing while wiring up the edge list.

use crate::dcel::{EdgeId, EdgeList, NIL};
use crate::math::{self, Point};
use crate::shape::Shape;
use log::{debug, trace};

/// Per-component tolerance on normalised directions under which two
/// outgoing segments count as parallel. Best-effort on very short segments.
const FAN_EPS: f32 = 1e-4;

type EventId = usize;
type SegId = usize;

/// A sweep event: one distinct point of the arrangement with the segments
/// entering it from above and leaving it below.
struct Event {
    pos: Point,
    incoming: Vec<SegId>,
    outgoing: Vec<SegId>,
    alive: bool,
}

/// A shape segment oriented origin-above-end.
struct Segment {
    origin: EventId,
    end: EventId,
    /// The half-edge running origin to end, allocated during the sweep.
    down: EdgeId,
}

/// Builds the planar subdivision of a shape's segments.
///
/// The returned edge list has no faces yet; see `connect_components` for the
/// face structure and `triangulate` for the whole pipeline.
pub fn make_planar(shape: &Shape) -> EdgeList {
    let mut sweep = Sweep::new(shape);
    sweep.collapse_duplicate_events();
    sweep.remove_tails();
    let queue = sweep.clean_and_queue();
    sweep.run(queue)
}

fn remove_item(list: &mut Vec<usize>, item: usize) {
    if let Some(at) = list.iter().position(|&x| x == item) {
        list.remove(at);
    }
}

struct Sweep {
    events: Vec<Event>,
    segs: Vec<Segment>,
    /// Event ids sorted top-down.
    order: Vec<EventId>,
}

impl Sweep {
    fn new(shape: &Shape) -> Sweep {
        let mut events: Vec<Event> = shape
            .vertices
            .iter()
            .map(|&pos| Event {
                pos,
                incoming: Vec::new(),
                outgoing: Vec::new(),
                alive: true,
            })
            .collect();

        let mut segs = Vec::with_capacity(shape.segments.len());
        for &(i, j) in &shape.segments {
            if i >= events.len() || j >= events.len() {
                debug!("dropping segment ({}, {}) with out of range endpoints", i, j);
                continue;
            }
            let v1 = events[i].pos;
            let v2 = events[j].pos;
            if v1 == v2 {
                // Zero length segments contribute nothing to the subdivision.
                continue;
            }
            let (origin, end) = if math::above(v1, v2) {
                (i, j)
            } else {
                (j, i)
            };
            let s = segs.len();
            segs.push(Segment {
                origin,
                end,
                down: NIL,
            });
            events[origin].outgoing.push(s);
            events[end].incoming.push(s);
        }

        let mut order: Vec<EventId> = (0..events.len()).collect();
        order.sort_by(|&a, &b| math::cmp_above(events[a].pos, events[b].pos));

        Sweep {
            events,
            segs,
            order,
        }
    }

    // CLEANUP PASSES

    /// Merges runs of events that sit within the merge tolerance of each
    /// other into the topmost event of the run.
    fn collapse_duplicate_events(&mut self) {
        let mut k = 0;
        while k < self.order.len() {
            let head = self.order[k];
            let mut m = k + 1;
            while m < self.order.len()
                && math::close(self.events[head].pos, self.events[self.order[m]].pos)
            {
                self.merge_event(head, self.order[m]);
                m += 1;
            }
            k = m;
        }
        let events = &self.events;
        self.order.retain(|&e| events[e].alive);
    }

    /// Moves every segment of `dup` over to `survivor` and kills `dup`.
    /// Segments that collapse into self-loops are dropped.
    fn merge_event(&mut self, survivor: EventId, dup: EventId) {
        let incoming = core::mem::take(&mut self.events[dup].incoming);
        for s in incoming {
            self.segs[s].end = survivor;
            if self.segs[s].origin == survivor {
                remove_item(&mut self.events[survivor].outgoing, s);
            } else {
                self.events[survivor].incoming.push(s);
            }
        }
        let outgoing = core::mem::take(&mut self.events[dup].outgoing);
        for s in outgoing {
            self.segs[s].origin = survivor;
            if self.segs[s].end == survivor {
                remove_item(&mut self.events[survivor].incoming, s);
            } else {
                self.events[survivor].outgoing.push(s);
            }
        }
        self.events[dup].alive = false;
    }

    /// Peels off events with a single dangling segment, cascading into the
    /// neighbour the segment came from.
    fn remove_tails(&mut self) {
        for k in 0..self.order.len() {
            let mut e = self.order[k];
            loop {
                let ins = self.events[e].incoming.len();
                let outs = self.events[e].outgoing.len();
                if ins == 1 && outs == 0 {
                    if let Some(s) = self.events[e].incoming.pop() {
                        let origin = self.segs[s].origin;
                        remove_item(&mut self.events[origin].outgoing, s);
                        e = origin;
                        continue;
                    }
                } else if ins == 0 && outs == 1 {
                    if let Some(s) = self.events[e].outgoing.pop() {
                        let end = self.segs[s].end;
                        remove_item(&mut self.events[end].incoming, s);
                        e = end;
                        continue;
                    }
                }
                break;
            }
        }
    }

    /// Runs the fan cleanup over every event, prunes events left with no
    /// segments, and returns the surviving events in sweep order.
    fn clean_and_queue(&mut self) -> Vec<EventId> {
        let mut queue = Vec::with_capacity(self.order.len());
        for k in 0..self.order.len() {
            let e = self.order[k];
            self.remove_fans(e);
            if self.events[e].incoming.is_empty() {
                match self.events[e].outgoing.len() {
                    0 => {
                        self.events[e].alive = false;
                        continue;
                    }
                    1 => {
                        // A lone loop left over from the fan pass.
                        if let Some(s) = self.events[e].outgoing.pop() {
                            let end = self.segs[s].end;
                            remove_item(&mut self.events[end].incoming, s);
                        }
                        self.events[e].alive = false;
                        continue;
                    }
                    _ => {}
                }
            }
            queue.push(e);
        }
        queue
    }

    /// Collapses fans of near-parallel outgoing segments at one event.
    ///
    /// Out of two parallel neighbours the one with the higher endpoint wins;
    /// the other is restarted from that endpoint so the geometry below
    /// survives without the sliver in between.
    fn remove_fans(&mut self, e: EventId) {
        if self.events[e].outgoing.is_empty() {
            return;
        }
        // Sort the outgoing segments left to right.
        let mut sorted: Vec<SegId> = Vec::with_capacity(self.events[e].outgoing.len());
        for idx in 0..self.events[e].outgoing.len() {
            let s0 = self.events[e].outgoing[idx];
            let at = sorted
                .iter()
                .position(|&s| self.seg_left_of_seg(s0, s))
                .unwrap_or(sorted.len());
            sorted.insert(at, s0);
        }

        let mut p = 0;
        while p < sorted.len() {
            let s = sorted[p];
            let ds = self.unit_dir(s);
            let mut q = p + 1;
            while q < sorted.len() {
                let t = sorted[q];
                let dt = self.unit_dir(t);
                if (dt.x - ds.x).abs() >= FAN_EPS || (dt.y - ds.y).abs() >= FAN_EPS {
                    q += 1;
                    continue;
                }
                if self.segs[s].end == self.segs[t].end {
                    // Effectively identical; drop the right one.
                    let end = self.segs[t].end;
                    remove_item(&mut self.events[end].incoming, t);
                    remove_item(&mut self.events[e].outgoing, t);
                    sorted.remove(q);
                } else if math::above(self.end_pos(s), self.end_pos(t)) {
                    // Restart the longer segment from the shorter one's
                    // endpoint.
                    let s_end = self.segs[s].end;
                    remove_item(&mut self.events[e].outgoing, t);
                    self.segs[t].origin = s_end;
                    self.events[s_end].outgoing.push(t);
                    sorted.remove(q);
                } else {
                    let t_end = self.segs[t].end;
                    remove_item(&mut self.events[e].outgoing, s);
                    self.segs[s].origin = t_end;
                    self.events[t_end].outgoing.push(s);
                    sorted.remove(p);
                    // Carry on scanning from the survivor's position.
                    p = q - 1;
                    break;
                }
            }
            p += 1;
        }
    }

    // PREDICATES

    fn end_pos(&self, s: SegId) -> Point {
        self.events[self.segs[s].end].pos
    }

    fn unit_dir(&self, s: SegId) -> Point {
        let o = self.events[self.segs[s].origin].pos;
        let e = self.events[self.segs[s].end].pos;
        let dx = e.x - o.x;
        let dy = e.y - o.y;
        let len = (dx * dx + dy * dy).sqrt();
        Point::new(dx / len, dy / len)
    }

    fn event_left_of_seg(&self, e: EventId, s: SegId) -> bool {
        let s1 = self.events[self.segs[s].origin].pos;
        let s2 = self.events[self.segs[s].end].pos;
        math::point_left_of_segment(self.events[e].pos, s1, s2)
    }

    /// Status order: `a` left of `b` at the current sweep height. The test
    /// point is `a`'s origin when that lies within `b`'s span, `a`'s end
    /// otherwise.
    fn seg_left_of_seg(&self, a: SegId, b: SegId) -> bool {
        let ao = self.events[self.segs[a].origin].pos;
        let bo = self.events[self.segs[b].origin].pos;
        if math::above(bo, ao) {
            self.event_left_of_seg(self.segs[a].origin, b)
        } else {
            self.event_left_of_seg(self.segs[a].end, b)
        }
    }

    // SWEEP

    fn run(mut self, mut queue: Vec<EventId>) -> EdgeList {
        let mut el = EdgeList::new();
        let mut status: Vec<SegId> = Vec::new();
        let mut qi = 0;
        while qi < queue.len() {
            let e = queue[qi];
            trace!("event at ({}, {})", self.events[e].pos.x, self.events[e].pos.y);

            // Status segments ending here, in left-to-right order.
            let in_list: Vec<SegId> =
                status.iter().copied().filter(|&s| self.segs[s].end == e).collect();
            {
                let segs = &self.segs;
                status.retain(|&s| segs[s].end != e);
            }

            // The nearest remaining neighbours on either side.
            let outer_left =
                status.iter().rev().copied().find(|&s| !self.event_left_of_seg(e, s));
            let outer_right =
                status.iter().copied().find(|&s| self.event_left_of_seg(e, s));

            // Insert the outgoing segments, tracking the extremes of the
            // inserted set by endpoint x.
            let mut inner_left: Option<SegId> = None;
            let mut inner_right: Option<SegId> = None;
            for idx in 0..self.events[e].outgoing.len() {
                let s = self.events[e].outgoing[idx];
                let at = status
                    .iter()
                    .position(|&r| self.seg_left_of_seg(s, r))
                    .unwrap_or(status.len());
                status.insert(at, s);
                match (inner_left, inner_right) {
                    (Some(l), Some(r)) => {
                        if self.end_pos(s).x < self.end_pos(l).x {
                            inner_left = Some(s);
                        } else if self.end_pos(s).x > self.end_pos(r).x {
                            inner_right = Some(s);
                        }
                    }
                    _ => {
                        inner_left = Some(s);
                        inner_right = Some(s);
                    }
                }
            }

            // Status segments starting here, in left-to-right order.
            let out_list: Vec<SegId> =
                status.iter().copied().filter(|&s| self.segs[s].origin == e).collect();

            // One vertex per event; one twin pair per outgoing segment.
            let v = el.new_vertex(self.events[e].pos);
            for &s in &out_list {
                let (down, _) = el.new_edge_pair();
                self.segs[s].down = down;
            }

            // Wire the half-edges around v. The downward half-edge of a
            // segment is the one on its right hand side.
            match (
                in_list.first().copied(),
                in_list.last().copied(),
                out_list.first().copied(),
                out_list.last().copied(),
            ) {
                (Some(ul), Some(ur), Some(ll), Some(lr)) => {
                    let l_up = self.up(&el, ll);
                    let u_up = self.up(&el, ul);
                    let u_down = self.down(ur);
                    let l_down = self.down(lr);
                    el.link(v, l_up, u_up);
                    el.link(v, u_down, l_down);
                }
                (Some(ul), Some(ur), None, None) => {
                    let u_up = self.up(&el, ul);
                    let u_down = self.down(ur);
                    el.link(v, u_down, u_up);
                }
                (None, None, Some(ll), Some(lr)) => {
                    let l_up = self.up(&el, ll);
                    let l_down = self.down(lr);
                    el.link(v, l_up, l_down);
                }
                _ => {}
            }
            for w in in_list.windows(2) {
                let down = self.down(w[0]);
                let up = self.up(&el, w[1]);
                el.link(v, down, up);
            }
            for w in out_list.windows(2) {
                let down = self.down(w[0]);
                let up = self.up(&el, w[1]);
                el.link(v, up, down);
            }

            // A fresh neighbour pair may cross below the sweep line; if so,
            // split both segments at the crossing and queue the new event.
            self.try_split(&mut queue, qi, inner_left, outer_left);
            self.try_split(&mut queue, qi, inner_right, outer_right);

            qi += 1;
        }

        if !status.is_empty() {
            debug!("sweep finished with {} segments left in the status", status.len());
        }

        // Point every vertex at one of the half-edges leaving it.
        for idx in 0..el.edges.len() {
            let origin = el.edges[idx].origin;
            if origin != NIL {
                el.vertices[origin].incident_edge = idx;
            }
        }
        debug!(
            "planarised: {} vertices, {} half-edges",
            el.vertices.len(),
            el.edges.len()
        );
        el
    }

    fn down(&self, s: SegId) -> EdgeId {
        self.segs[s].down
    }

    fn up(&self, el: &EdgeList, s: SegId) -> EdgeId {
        el.edges[self.segs[s].down].twin
    }

    /// Tests a neighbour pair for a proper crossing; splices both segments
    /// at the crossing point and queues the new event just below the
    /// current one.
    fn try_split(
        &mut self,
        queue: &mut Vec<EventId>,
        qi: usize,
        inner: Option<SegId>,
        outer: Option<SegId>,
    ) {
        let (inner, outer) = match (inner, outer) {
            (Some(a), Some(b)) => (a, b),
            _ => return,
        };
        if self.segs[inner].end == self.segs[outer].end {
            return;
        }
        let x = match math::intersection(
            self.events[self.segs[inner].origin].pos,
            self.end_pos(inner),
            self.events[self.segs[outer].origin].pos,
            self.end_pos(outer),
        ) {
            Some(x) => x,
            None => return,
        };
        trace!("segments cross at ({}, {})", x.x, x.y);

        let ne = self.events.len();
        let inner_end = self.segs[inner].end;
        let outer_end = self.segs[outer].end;
        // Continuation segments from the crossing down to the old endpoints.
        let c1 = self.segs.len();
        self.segs.push(Segment {
            origin: ne,
            end: inner_end,
            down: NIL,
        });
        let c2 = self.segs.len();
        self.segs.push(Segment {
            origin: ne,
            end: outer_end,
            down: NIL,
        });
        remove_item(&mut self.events[inner_end].incoming, inner);
        remove_item(&mut self.events[outer_end].incoming, outer);
        self.events[inner_end].incoming.push(c1);
        self.events[outer_end].incoming.push(c2);
        self.segs[inner].end = ne;
        self.segs[outer].end = ne;
        self.events.push(Event {
            pos: x,
            incoming: vec![inner, outer],
            outgoing: vec![c1, c2],
            alive: true,
        });

        let at = queue[qi + 1..]
            .iter()
            .position(|&k| math::above(x, self.events[k].pos))
            .map(|i| qi + 1 + i)
            .unwrap_or(queue.len());
        queue.insert(at, ne);
    }
}
