//! Rectangular duals of 4-connected plane triangulations.
//!
//! Two stages: [`compute_ordering31`] peels the graph from the top of the
//! boundary into a regular (3,1)-canonical ordering (singletons and fans),
//! and [`compute_rect_dual`] sweeps the reversed ordering bottom-up into an
//! integer tiling.  The input's outer face must have four vertices
//! `outer_face[0..4]`, of which `[0]` and `[2]` become the left and right
//! walls, `[1]` the bottom row and `[3]` the top.

use anyhow::{Result, bail};
use cyclist::{NodeIx, RingIx, RingPool};

use crate::graph::{Coord, Graph, Rect, RectangularDual, Vertex};

/// One step of a (3,1)-canonical ordering: the vertices added in this step
/// and the boundary path that supports them from below.
#[derive(Clone, Debug, Default)]
pub struct PathSeg {
    pub contents: Vec<Vertex>,
    pub predecessors: Vec<Vertex>,
}

/// Sentinel stored in the boundary ring's end node; never a real vertex.
const NO_VERTEX: Vertex = usize::MAX;

/// Incremental state of the boundary peeling.
///
/// The boundary is a ring with one sentinel node acting as the `end`
/// position; `pos[v] == end` means `v` is not on the boundary.  `leg_free`
/// and `basic` are swap-remove sets with per-vertex position indices, so
/// membership updates are O(1).
struct Peeler<'a> {
    graph: &'a Graph,
    pool: RingPool<Vertex>,
    boundary: RingIx,
    end: NodeIx,
    pos: Vec<NodeIx>,
    /// Per vertex: boundary vertices adjacent to it, in discovery order.
    outer: Vec<Vec<Vertex>>,
    /// Per vertex: how many of its neighbors are currently 2-leg centers.
    two_leg_centers: Vec<usize>,
    /// Per vertex: how many of its boundary neighbors have degree 3.
    outer_deg_three: Vec<usize>,
    leg_free: Vec<Vertex>,
    leg_free_ix: Vec<usize>,
    basic: Vec<Vertex>,
    basic_ix: Vec<usize>,
    degree: Vec<usize>,
    picked: Vec<bool>,
    was_two_leg_center: Vec<bool>,
}

impl<'a> Peeler<'a> {
    fn new(graph: &'a Graph) -> Self {
        let n = graph.num_vertices();
        let mut pool = RingPool::with_capacity(1, n + 1);
        let boundary = pool.ring();
        let end = pool.push_back(boundary, NO_VERTEX);
        Self {
            graph,
            pool,
            boundary,
            end,
            pos: vec![end; n],
            outer: vec![Vec::new(); n],
            two_leg_centers: vec![0; n],
            outer_deg_three: vec![0; n],
            leg_free: Vec::new(),
            leg_free_ix: vec![0; n],
            basic: Vec::new(),
            basic_ix: vec![0; n],
            degree: (0..n).map(|v| graph.degree(v)).collect(),
            picked: vec![false; n],
            was_two_leg_center: vec![false; n],
        }
    }

    #[inline]
    fn is_on_boundary(&self, v: Vertex) -> bool {
        self.pos[v] != self.end
    }

    /// A 2-leg center is an inner vertex with at least two boundary
    /// neighbors that are not adjacent on the boundary (the adjacent case
    /// is a chord, which the peeling avoids by construction).
    fn is_two_leg_center(&self, v: Vertex) -> bool {
        if self.is_on_boundary(v) {
            return false;
        }
        if self.outer[v].len() > 2 {
            return true;
        }
        if self.outer[v].len() < 2 {
            return false;
        }
        let n1 = self.pos[self.outer[v][0]];
        let n2 = self.pos[self.outer[v][1]];
        !(self.pool.next(n1) == n2 || n1 == self.pool.next(n2))
    }

    fn check_basic_two_leg_center(&mut self, v: Vertex) {
        let was = self.basic_ix[v] < self.basic.len() && self.basic[self.basic_ix[v]] == v;
        if self.outer_deg_three[v] > 0
            && self.outer_deg_three[v] + 2 == self.outer[v].len()
            && self.is_two_leg_center(v)
        {
            if !was {
                self.basic_ix[v] = self.basic.len();
                self.basic.push(v);
            }
        } else if was {
            let last = *self.basic.last().unwrap();
            self.basic[self.basic_ix[v]] = last;
            self.basic_ix[last] = self.basic_ix[v];
            self.basic.pop();
        }
    }

    fn check_leg_free(&mut self, v: Vertex) {
        let was = self.leg_free_ix[v] < self.leg_free.len() && self.leg_free[self.leg_free_ix[v]] == v;
        if self.two_leg_centers[v] == 0 && self.is_on_boundary(v) {
            if !was {
                self.leg_free_ix[v] = self.leg_free.len();
                self.leg_free.push(v);
            }
        } else if was {
            let last = *self.leg_free.last().unwrap();
            self.leg_free[self.leg_free_ix[v]] = last;
            self.leg_free_ix[last] = self.leg_free_ix[v];
            self.leg_free.pop();
        }
    }

    fn check_two_leg_center(&mut self, v: Vertex) {
        if self.is_two_leg_center(v) {
            if self.was_two_leg_center[v] {
                // still a center; only its basic status may have changed
            } else {
                self.was_two_leg_center[v] = true;
                for i in 0..self.graph.degree(v) {
                    let n = self.graph.neighbor(v, i);
                    self.two_leg_centers[n] += 1;
                    if self.two_leg_centers[n] == 1 {
                        self.check_leg_free(n);
                    }
                }
            }
        } else if self.was_two_leg_center[v] {
            self.was_two_leg_center[v] = false;
            for i in 0..self.graph.degree(v) {
                let n = self.graph.neighbor(v, i);
                if !self.picked[n] {
                    self.two_leg_centers[n] -= 1;
                    if self.two_leg_centers[n] == 0 {
                        self.check_leg_free(n);
                    }
                }
            }
        } else {
            return;
        }
        self.check_basic_two_leg_center(v);
    }

    /// `v` is always on the boundary when this is called.
    fn decrease_degree(&mut self, v: Vertex, count: usize) {
        self.degree[v] -= count;
        if self.degree[v] == 3 {
            for i in 0..self.graph.degree(v) {
                let n = self.graph.neighbor(v, i);
                if self.picked[n] {
                    continue;
                }
                self.outer_deg_three[n] += 1;
                self.check_basic_two_leg_center(n);
            }
        }
    }
}

/// Compute a regular (3,1)-canonical ordering of `graph`.
///
/// Fails if the peeling gets stuck, i.e. the input is not an internally
/// 4-connected plane triangulation with the expected outer face.
pub fn compute_ordering31(graph: &Graph) -> Result<Vec<PathSeg>> {
    if graph.outer_face.len() != 4 {
        bail!("rectangular dual requires an outer face of degree 4");
    }
    let mut st = Peeler::new(graph);
    let mut out_ordering: Vec<PathSeg> = Vec::new();
    let mut num_not_picked = graph.num_vertices();

    let of = [
        graph.outer_face[0],
        graph.outer_face[1],
        graph.outer_face[2],
        graph.outer_face[3],
    ];

    // Keep the left and right outer vertices clear of degree 3 so they can
    // never be swallowed by a fan.
    st.degree[of[0]] += 2;
    st.degree[of[2]] += 2;
    // The face bounded by outer_face[0], [3], [2] starts as the boundary.
    for v in [of[0], of[3], of[2]] {
        let node = st.pool.insert_before(st.boundary, st.end, v);
        st.pos[v] = node;
    }
    st.leg_free.push(of[3]);
    st.degree[of[3]] += 1;
    st.decrease_degree(of[3], 1);
    for v in [of[0], of[3], of[2]] {
        for i in 0..graph.degree(v) {
            let n = graph.neighbor(v, i);
            if st.picked[n] {
                continue;
            }
            st.outer[n].push(v);
            st.check_two_leg_center(n);
        }
    }

    while num_not_picked > 3 {
        let path = if let Some(&v) = st.leg_free.last() {
            // Singleton: replace v on the boundary by the arc of its
            // not-yet-picked neighbors, read from the left boundary
            // neighbor around v's rotation.
            st.leg_free.pop();
            st.picked[v] = true;
            let mut path = PathSeg::default();
            path.contents.push(v);
            let it = st.pos[v];
            let vl = *st.pool.value(st.pool.prev(it));
            let vr = *st.pool.value(st.pool.next(it));
            let mut vl_ix = 0;
            while graph.neighbor(v, vl_ix) != vl {
                vl_ix += 1;
            }
            path.predecessors.push(vl);
            for i in 1..st.degree[v] - 1 {
                let n = graph.neighbor(v, (i + vl_ix) % graph.degree(v));
                path.predecessors.push(n);
                let node = st.pool.insert_before(st.boundary, it, n);
                st.pos[n] = node;
            }
            path.predecessors.push(vr);
            st.pool.remove(st.boundary, it);
            path
        } else if let Some(&c) = st.basic.last() {
            // Fan: walk the center's rotation to the leftmost admissible
            // boundary neighbor, then collect the run of degree-3 boundary
            // vertices to its right.
            st.basic.pop();
            let mut path = PathSeg::default();
            let mut vl;
            let mut vl_ix = 0;
            let mut one_to_the_right = graph.neighbor(c, graph.degree(c) - 1);
            loop {
                vl = graph.neighbor(c, vl_ix);
                if st.is_on_boundary(vl) {
                    if vl == of[0] {
                        break;
                    }
                    if st.degree[vl] > 3 && st.is_on_boundary(one_to_the_right) && vl != of[2] {
                        break;
                    }
                }
                one_to_the_right = vl;
                vl_ix += 1;
            }
            let mut it = st.pool.next(st.pos[vl]);
            while st.degree[*st.pool.value(it)] == 3 && it != st.pos[of[2]] {
                let v = *st.pool.value(it);
                st.picked[v] = true;
                path.contents.push(v);
                it = st.pool.next(it);
                st.pool.remove(st.boundary, st.pos[v]);
            }
            let vr = *st.pool.value(it);
            let c_node = st.pool.insert_before(st.boundary, it, c);
            st.pos[c] = c_node;
            path.predecessors.push(vl);
            path.predecessors.push(c);
            path.predecessors.push(vr);
            path
        } else {
            bail!("canonical ordering stuck: input is not an internally 4-connected triangulation");
        };

        num_not_picked -= path.contents.len();
        st.decrease_degree(path.predecessors[0], 1);
        st.decrease_degree(*path.predecessors.last().unwrap(), 1);
        for i in 1..path.predecessors.len() - 1 {
            let n = path.predecessors[i];
            st.decrease_degree(n, path.contents.len());
            st.check_two_leg_center(n);
            st.check_leg_free(n);
            if !st.picked[n] {
                for j in 0..graph.degree(n) {
                    let m = graph.neighbor(n, j);
                    st.outer[m].push(n);
                    st.check_two_leg_center(m);
                }
            }
        }

        out_ordering.push(path);
    }

    out_ordering.reverse();
    Ok(out_ordering)
}

/// Sweep the (3,1)-canonical ordering into a rectangular dual.
///
/// Horizontal coordinates are node positions in a growing list of
/// verticals, renumbered to `0, 1, 2, …` at the end; vertical coordinates
/// count partition steps, with the first step's contents at `y_min = 1`.
pub fn compute_rect_dual(graph: &Graph) -> Result<RectangularDual> {
    let ordering = compute_ordering31(graph)?;

    let n = graph.num_vertices();
    let mut out_rect_dual = vec![Rect::default(); n];
    let mut top: Coord = 0;
    let mut pool: RingPool<Coord> = RingPool::with_capacity(1, n + 4);
    let vertical = pool.ring();
    let end = pool.push_back(vertical, 0);
    let mut x_min = vec![end; n];
    let mut x_max = vec![end; n];

    let of = [
        graph.outer_face[0],
        graph.outer_face[1],
        graph.outer_face[2],
        graph.outer_face[3],
    ];

    // Four verticals for the three bottom-row tiles.
    pool.insert_before(vertical, end, 0);
    pool.insert_before(vertical, end, 0);
    x_min[of[0]] = pool.next(end);
    x_max[of[0]] = pool.prev(end);
    out_rect_dual[of[0]].y_min = top;
    pool.insert_before(vertical, end, 0);
    x_min[of[1]] = pool.next(x_min[of[0]]);
    x_max[of[1]] = pool.prev(end);
    out_rect_dual[of[1]].y_min = top;
    pool.insert_before(vertical, end, 0);
    x_min[of[2]] = pool.next(x_min[of[1]]);
    x_max[of[2]] = pool.prev(end);
    out_rect_dual[of[2]].y_min = top;

    for path in &ordering {
        top += 1;
        for &v in &path.contents {
            out_rect_dual[v].y_min = top;
        }
        for &u in &path.predecessors {
            out_rect_dual[u].y_max = top;
        }

        if path.contents.len() == 1 {
            let v_k = path.contents[0];
            let v_l = path.predecessors[0];
            let v_r = *path.predecessors.last().unwrap();
            x_min[v_k] = x_max[v_l];
            x_max[v_k] = x_min[v_r];
        } else {
            if path.contents.is_empty() {
                bail!("canonical ordering produced a fan with no contents");
            }
            let v_r = *path.predecessors.last().unwrap();
            let mut it = x_max[path.predecessors[0]];
            for i in 0..path.contents.len() - 1 {
                let v = path.contents[i];
                x_min[v] = it;
                it = pool.next(it);
                if it == x_min[v_r] {
                    pool.insert_before(vertical, it, 0);
                    it = pool.prev(it);
                }
                x_max[v] = it;
            }
            let v_last = *path.contents.last().unwrap();
            x_min[v_last] = it;
            x_max[v_last] = x_min[v_r];
        }
    }

    top += 1;
    out_rect_dual[of[2]].y_max = top;
    out_rect_dual[of[3]].y_max = top;
    out_rect_dual[of[0]].y_max = top;

    let mut x: Coord = 0;
    let nodes: Vec<NodeIx> = pool.iter_nodes(vertical).skip(1).collect();
    for node in nodes {
        *pool.value_mut(node) = x;
        x += 1;
    }
    for v in 0..n {
        out_rect_dual[v].x_min = *pool.value(x_min[v]);
        out_rect_dual[v].x_max = *pool.value(x_max[v]);
    }

    Ok(out_rect_dual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use smallvec::smallvec;

    /// Wheel on four outer vertices: outer square a,b,c,d (left, bottom,
    /// right, top) around a center hub adjacent to all four.
    fn wheel() -> Graph {
        let (a, b, c, d, v) = (0, 1, 2, 3, 4);
        let mut graph = Graph {
            edges: vec![
                Edge::new(a, b),
                Edge::new(b, c),
                Edge::new(c, d),
                Edge::new(d, a),
                Edge::new(a, v),
                Edge::new(b, v),
                Edge::new(c, v),
                Edge::new(d, v),
            ],
            rotations: vec![
                vec![0, 3, 4],
                vec![1, 0, 5],
                vec![2, 1, 6],
                vec![3, 2, 7],
                vec![4, 5, 6, 7],
            ],
            outer_face: smallvec![a, b, c, d],
            labels: ["a", "b", "c", "d", "v"].map(String::from).to_vec(),
        };
        graph.update_neighbor_index();
        graph
    }

    #[test]
    fn ordering31_of_wheel_peels_hub_last() {
        let ordering = compute_ordering31(&wheel()).unwrap();
        assert_eq!(ordering.len(), 2);
        // Reversed order: the hub (picked last) comes first.
        assert_eq!(ordering[0].contents, vec![4]);
        assert_eq!(ordering[0].predecessors, vec![0, 1, 2]);
        assert_eq!(ordering[1].contents, vec![3]);
        assert_eq!(ordering[1].predecessors, vec![0, 4, 2]);
    }

    #[test]
    fn rect_dual_of_wheel() {
        let dual = compute_rect_dual(&wheel()).unwrap();
        let rect = |x_min, y_min, x_max, y_max| Rect { x_min, y_min, x_max, y_max };
        assert_eq!(dual[0], rect(0, 0, 1, 3)); // left wall
        assert_eq!(dual[1], rect(1, 0, 2, 1)); // bottom row
        assert_eq!(dual[2], rect(2, 0, 3, 3)); // right wall
        assert_eq!(dual[3], rect(1, 2, 2, 3)); // top row
        assert_eq!(dual[4], rect(1, 1, 2, 2)); // hub
    }

    /// Every adjacent pair of tiles shares a wall of positive length;
    /// non-adjacent tiles overlap in at most a point.
    #[test]
    fn rect_dual_adjacency_matches_graph() {
        let graph = wheel();
        let dual = compute_rect_dual(&graph).unwrap();
        let adjacent = |u: usize, v: usize| {
            graph.edges.iter().any(|e| {
                (e.tail == u && e.head == v) || (e.tail == v && e.head == u)
            })
        };
        for u in 0..graph.num_vertices() {
            for v in u + 1..graph.num_vertices() {
                let (a, b) = (&dual[u], &dual[v]);
                let x_overlap = a.x_min.max(b.x_min) < a.x_max.min(b.x_max);
                let y_overlap = a.y_min.max(b.y_min) < a.y_max.min(b.y_max);
                let x_touch = a.x_max == b.x_min || b.x_max == a.x_min;
                let y_touch = a.y_max == b.y_min || b.y_max == a.y_min;
                let share_wall = (x_touch && y_overlap) || (y_touch && x_overlap);
                assert_eq!(share_wall, adjacent(u, v), "tiles {u} and {v}");
            }
        }
    }
}
