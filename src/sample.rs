//! Uniformly random rooted planar triangulations via the
//! Poulalhon–Schaeffer bijection.
//!
//! A random balanced bitstring of length `4n − 2` and weight `n − 1` is
//! cyclically shifted to its unique admissible conjugate, decoded into a
//! plane tree with two leaf stubs per inner vertex, and closed into a
//! triangulation by repeatedly completing local triangles; two extra
//! vertices absorb the remaining stubs.  A DFS then orients all edges
//! bimodally, and optionally each edge is doubled into a 2-cycle where the
//! rotation permits.
//!
//! Rotations are held in a [`RingPool`]; node indices stand in for the list
//! iterators the closure dances around.

use std::io::Write;

use anyhow::Result;
use cyclist::{NodeIx, RingIx, RingPool};
use rand::Rng;

use crate::graph::Vertex;

/// A sampled triangulation in its final, immutable form.
#[derive(Clone, Debug)]
pub struct SampledTriangulation {
    pub edges: Vec<(Vertex, Vertex)>,
    pub rotations: Vec<Vec<usize>>,
    /// First vertex of the outer face; the other two are the last two
    /// vertices.
    pub root: Vertex,
    /// The shifted Poulalhon–Schaeffer code the triangulation was decoded
    /// from.
    pub code: Vec<bool>,
}

impl SampledTriangulation {
    pub fn num_vertices(&self) -> usize {
        self.rotations.len()
    }

    /// Write in the pipeline's graph input format (1-based, outer face of
    /// degree 3).
    pub fn write(&self, writer: &mut impl Write) -> Result<()> {
        writeln!(writer, "{} {} 3", self.num_vertices(), self.edges.len())?;
        writeln!(
            writer,
            "{} {} {}",
            self.root + 1,
            self.num_vertices() - 1,
            self.num_vertices()
        )?;
        for v in 0..self.num_vertices() {
            writeln!(writer, "{}", v + 1)?;
        }
        for &(tail, head) in &self.edges {
            writeln!(writer, "{} {}", tail + 1, head + 1)?;
        }
        for rotation in &self.rotations {
            for e in rotation {
                write!(writer, "{} ", e + 1)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

/// An edge of the mutable sampler graph; `tail_it`/`head_it` are the ring
/// nodes holding this edge in its endpoints' rotations.  Leaf stubs are
/// recognizable by `tail_it == head_it`.
#[derive(Clone, Copy, Debug)]
struct StubEdge {
    tail: Vertex,
    head: Vertex,
    tail_it: NodeIx,
    head_it: NodeIx,
}

#[derive(Debug, Default)]
struct RotGraph {
    pool: RingPool<usize>,
    rings: Vec<RingIx>,
    edges: Vec<StubEdge>,
}

impl RotGraph {
    fn add_vertex(&mut self) -> Vertex {
        let v = self.rings.len();
        let ring = self.pool.ring();
        self.rings.push(ring);
        v
    }

    fn is_leaf_edge(&self, e: usize) -> bool {
        self.edges[e].tail_it == self.edges[e].head_it
    }

    /// Walk one step around the current face: step over `e` to its far
    /// endpoint, then take the next edge of that vertex's rotation.  A leaf
    /// stub bounces straight back.
    fn next_edge(&self, (e, reversed): (usize, bool), leaf: Vertex) -> (usize, bool) {
        let edge = &self.edges[e];
        let old_head = if reversed { edge.tail } else { edge.head };
        if old_head == leaf {
            (e, !reversed)
        } else {
            let it = if reversed { edge.tail_it } else { edge.head_it };
            let it = self.pool.next(it);
            let next_e = *self.pool.value(it);
            let next_reversed = old_head != self.edges[next_e].tail;
            (next_e, next_reversed)
        }
    }

    fn reverse_edge(&mut self, e: usize) {
        let edge = &mut self.edges[e];
        *edge = StubEdge {
            tail: edge.head,
            head: edge.tail,
            tail_it: edge.head_it,
            head_it: edge.tail_it,
        };
    }
}

/// A bitstring of `length` bits, exactly `weight` of them ones, uniformly
/// at random: draw the zero-run lengths between consecutive ones.
fn random_bitstring(length: usize, weight: usize, rng: &mut impl Rng) -> Vec<bool> {
    let mut buckets = weight + 1;
    let mut items = length - weight;
    let mut num_zeros_after_one = vec![0usize; weight + 1];

    while items > 0 {
        if rng.random::<f64>() < items as f64 / (buckets + items - 1) as f64 {
            num_zeros_after_one[buckets - 1] += 1;
            items -= 1;
        } else {
            buckets -= 1;
        }
    }

    let mut bitstring = Vec::with_capacity(length + 1);
    for &zeros in &num_zeros_after_one {
        for _ in 0..zeros {
            bitstring.push(false);
        }
        bitstring.push(true);
    }
    bitstring.pop();

    bitstring
}

/// Cyclic shift to the unique conjugate whose running sum of
/// `3·ones − zeros` attains its minimum at the end.
fn find_permutation(input: &[bool]) -> Vec<bool> {
    let mut ones3_zeros: i64 = 0;
    let mut value_of_minimum = 3 * input.len() as i64;
    let mut index_of_minimum = 0;
    for (i, &b) in input.iter().enumerate() {
        ones3_zeros += if b { 3 } else { -1 };
        if ones3_zeros < value_of_minimum {
            value_of_minimum = ones3_zeros;
            index_of_minimum = i;
        }
    }

    let mut out = Vec::with_capacity(input.len());
    out.extend_from_slice(&input[index_of_minimum + 1..]);
    out.extend_from_slice(&input[..=index_of_minimum]);
    out
}

/// Decode the shifted code into a plane tree where every inner vertex
/// carries two leaf stubs.  Stub edges point at the reserved `leaf` id.
fn code_to_tree(bitstring: &[bool]) -> RotGraph {
    let leaf = bitstring.len() / 4 + 1;
    let mut stack = Vec::new();
    let mut num_leaves: Vec<u8> = Vec::new();
    let mut graph = RotGraph::default();

    stack.push(graph.add_vertex());
    num_leaves.push(0);

    for &b in bitstring {
        if b {
            let old_top = *stack.last().unwrap();
            let new_top = graph.add_vertex();
            let new_edge = graph.edges.len();

            let tail_it = graph.pool.push_back(graph.rings[old_top], new_edge);
            let head_it = graph.pool.push_back(graph.rings[new_top], new_edge);
            graph.edges.push(StubEdge { tail: old_top, head: new_top, tail_it, head_it });

            num_leaves.push(0);
            stack.push(new_top);
        } else {
            let top = *stack.last().unwrap();
            if num_leaves[top] < 2 {
                let new_edge = graph.edges.len();
                let it = graph.pool.push_back(graph.rings[top], new_edge);
                graph.edges.push(StubEdge { tail: top, head: leaf, tail_it: it, head_it: it });
                num_leaves[top] += 1;
            } else {
                stack.pop();
            }
        }
    }

    graph
}

/// Perform the complete closure: repeatedly close local triangles over the
/// tree's contour, then add the two outer vertices `v1`, `v2` absorbing the
/// leftover stubs.  The outer face ends up as `(v0, v1, v2)`; returns `v0`.
fn complete_closure(graph: &mut RotGraph) -> Vertex {
    let leaf = graph.rings.len();
    let num_tree_vertices = graph.rings.len();

    let first_edge = *graph
        .pool
        .value(graph.pool.head(graph.rings[0]).expect("tree root has an edge"));
    let mut stack: Vec<(usize, bool)> = vec![(first_edge, false)];

    let top_is_admissible_triangle = |graph: &RotGraph, stack: &[(usize, bool)]| {
        stack.len() >= 3
            && !graph.is_leaf_edge(stack[stack.len() - 3].0)
            && !graph.is_leaf_edge(stack[stack.len() - 2].0)
            && graph.is_leaf_edge(stack[stack.len() - 1].0)
    };

    // 3n edges overall, so walking 12n steps sees every edge in both
    // directions at least twice around the contour.
    while stack.len() < 12 * num_tree_vertices {
        stack.push(graph.next_edge(*stack.last().unwrap(), leaf));
        while top_is_admissible_triangle(graph, &stack) {
            // local closure: re-point the stub at the base of the triangle
            let (e1, e1_reversed) = stack[stack.len() - 3];
            let (e3, e3_reversed) = stack[stack.len() - 1];
            let (e1_tail, e1_tail_it) = if e1_reversed {
                (graph.edges[e1].head, graph.edges[e1].head_it)
            } else {
                (graph.edges[e1].tail, graph.edges[e1].tail_it)
            };
            let new_it = graph.pool.insert_before(graph.rings[e1_tail], e1_tail_it, e3);
            if e3_reversed {
                graph.edges[e3].tail = e1_tail;
                graph.edges[e3].tail_it = new_it;
            } else {
                graph.edges[e3].head = e1_tail;
                graph.edges[e3].head_it = new_it;
            }

            stack.truncate(stack.len() - 3);
            stack.push((e3, !e3_reversed));
        }
    }

    // Four consecutive stubs mark v0 on the outer contour.
    let mut edge_on_outer_face = *stack.last().unwrap();
    let mut consecutive_leaf_edges = 0u8;
    while consecutive_leaf_edges < 4 {
        edge_on_outer_face = graph.next_edge(edge_on_outer_face, leaf);
        if graph.is_leaf_edge(edge_on_outer_face.0) {
            consecutive_leaf_edges += 1;
        } else {
            consecutive_leaf_edges = 0;
        }
    }
    let l1 = edge_on_outer_face.0;
    let v0 = graph.edges[l1].tail;

    let v1 = graph.add_vertex();
    let v2 = graph.add_vertex();

    loop {
        let e = edge_on_outer_face.0;
        let it = graph.pool.push_front(graph.rings[v1], e);
        graph.edges[e].head = v1;
        graph.edges[e].head_it = it;

        // continue as if we had just arrived from v1
        edge_on_outer_face.1 = true;
        edge_on_outer_face = graph.next_edge(edge_on_outer_face, leaf);
        if graph.is_leaf_edge(edge_on_outer_face.0) {
            break;
        }
        edge_on_outer_face = graph.next_edge(edge_on_outer_face, leaf);
    }
    loop {
        let e = edge_on_outer_face.0;
        let it = graph.pool.push_front(graph.rings[v2], e);
        graph.edges[e].head = v2;
        graph.edges[e].head_it = it;

        edge_on_outer_face.1 = true;
        edge_on_outer_face = graph.next_edge(edge_on_outer_face, leaf);
        if edge_on_outer_face.0 == l1 {
            break;
        }
        edge_on_outer_face = graph.next_edge(edge_on_outer_face, leaf);
    }

    let e = graph.edges.len();
    let tail_it = graph.pool.push_front(graph.rings[v1], e);
    let head_it = graph.pool.push_front(graph.rings[v2], e);
    graph.edges.push(StubEdge { tail: v1, head: v2, tail_it, head_it });

    v0
}

/// Orient every edge by a DFS from `v1`: back edges orient away from their
/// return vertex, and each forces the unoriented tree edges on the path
/// back up, cascading through back edges postponed on those tree edges.
fn make_bimodal(graph: &mut RotGraph) {
    let num_vertices = graph.rings.len();
    let num_edges = graph.edges.len();
    let s = num_vertices - 2;
    let mut visited = vec![false; num_vertices];
    let mut traversed = vec![false; num_edges];
    let mut oriented = vec![false; num_edges];
    let mut parent = vec![0 as Vertex; num_vertices];
    let mut edge_to_parent = vec![0usize; num_vertices];
    let mut active_child_edge = vec![0usize; num_vertices];
    let mut postponed_back_edges: Vec<Vec<usize>> = vec![Vec::new(); num_edges];
    // (vertex, rotation cursor, entries left to visit)
    let mut stack: Vec<(Vertex, NodeIx, usize)> = vec![(
        s,
        graph.pool.head(graph.rings[s]).unwrap(),
        graph.pool.len(graph.rings[s]),
    )];
    visited[s] = true;
    oriented[num_edges - 1] = true; // the (v1, v2) edge

    while let Some(top) = stack.last_mut() {
        let v = top.0;
        let e = *graph.pool.value(top.1);
        top.1 = graph.pool.next(top.1);
        top.2 -= 1;
        if top.2 == 0 {
            stack.pop();
        }
        let forward = v == graph.edges[e].tail;
        let w = if forward { graph.edges[e].head } else { graph.edges[e].tail };
        if !visited[w] {
            // tree edge
            parent[w] = v;
            active_child_edge[v] = e;
            edge_to_parent[w] = e;
            visited[w] = true;
            stack.push((
                w,
                graph.pool.head(graph.rings[w]).unwrap(),
                graph.pool.len(graph.rings[w]),
            ));
        } else if !traversed[e] {
            // back edge: orient it towards w, then force the tree path
            if !forward {
                graph.reverse_edge(e);
            }
            let e_wx = active_child_edge[w];
            postponed_back_edges[e_wx].push(e);
            let mut pending_tree_edges = Vec::new();
            if oriented[e_wx] {
                pending_tree_edges.push(e_wx);
            }
            let mut i = 0;
            while i < pending_tree_edges.len() {
                let e_wx = pending_tree_edges[i];
                i += 1;
                let batch = std::mem::take(&mut postponed_back_edges[e_wx]);
                let w = graph.edges[batch[0]].head;
                let away_from_w = w == graph.edges[e_wx].tail;
                for back_edge in batch {
                    if away_from_w {
                        graph.reverse_edge(back_edge);
                    }
                    oriented[back_edge] = true;
                    let mut u = if away_from_w {
                        graph.edges[back_edge].head
                    } else {
                        graph.edges[back_edge].tail
                    };
                    let mut parent_edge_of_u = edge_to_parent[u];
                    while !oriented[parent_edge_of_u] {
                        if (u == graph.edges[parent_edge_of_u].tail) ^ away_from_w {
                            graph.reverse_edge(parent_edge_of_u);
                        }
                        oriented[parent_edge_of_u] = true;
                        if !postponed_back_edges[parent_edge_of_u].is_empty() {
                            pending_tree_edges.push(parent_edge_of_u);
                        }
                        u = parent[u];
                        parent_edge_of_u = edge_to_parent[u];
                    }
                }
            }
        }
        traversed[e] = true;
    }
}

/// Duplicate edges into 2-cycles wherever the rotation leaves room on one
/// side, preferring a random side; 0-modal vertices accept any insertion.
fn insert_2_cycles(graph: &mut RotGraph, rng: &mut impl Rng) {
    let num_vertices = graph.rings.len();
    let mut has_outgoing = vec![false; num_vertices];
    let mut has_incoming = vec![false; num_vertices];
    for e in &graph.edges {
        has_outgoing[e.tail] = true;
        has_incoming[e.head] = true;
    }
    let mut is_0_modal: Vec<bool> = (0..num_vertices)
        .map(|v| !has_incoming[v] || !has_outgoing[v])
        .collect();

    const LEFT: bool = false;

    let num_edges = graph.edges.len();
    for i in 0..num_edges {
        let mut try_adding = |graph: &mut RotGraph, is_0_modal: &mut Vec<bool>, side: bool| -> bool {
            let e = graph.edges[i];
            if !is_0_modal[e.tail] {
                let tail_it = if side == LEFT {
                    graph.pool.next(e.tail_it)
                } else {
                    graph.pool.prev(e.tail_it)
                };
                if e.tail == graph.edges[*graph.pool.value(tail_it)].tail {
                    // next edge is also outgoing
                    return false;
                }
            }
            if !is_0_modal[e.head] {
                let head_it = if side == LEFT {
                    graph.pool.prev(e.head_it)
                } else {
                    graph.pool.next(e.head_it)
                };
                if e.head == graph.edges[*graph.pool.value(head_it)].head {
                    // next edge is also incoming
                    return false;
                }
            }

            is_0_modal[e.tail] = false;
            is_0_modal[e.head] = false;
            let new_edge = graph.edges.len();
            let tail_insertion_point =
                if side == LEFT { graph.pool.next(e.tail_it) } else { e.tail_it };
            let head_insertion_point =
                if side == LEFT { e.head_it } else { graph.pool.next(e.head_it) };
            let tail_node = graph.pool.insert_before(graph.rings[e.tail], tail_insertion_point, new_edge);
            let head_node = graph.pool.insert_before(graph.rings[e.head], head_insertion_point, new_edge);
            graph.edges.push(StubEdge {
                tail: e.head,
                head: e.tail,
                tail_it: head_node,
                head_it: tail_node,
            });

            true
        };
        let side = rng.random::<f64>() < 0.5;
        if !try_adding(graph, &mut is_0_modal, side) {
            try_adding(graph, &mut is_0_modal, !side);
        }
    }
}

/// Sample a uniformly random rooted planar triangulation with `n` internal
/// vertices (`n >= 2`).  `two_cycles` additionally doubles edges into
/// 2-cycles where the embedding permits, producing a bimodal multigraph.
pub fn sample_triangulation(
    n: usize,
    two_cycles: bool,
    rng: &mut impl Rng,
) -> SampledTriangulation {
    let bitstring = find_permutation(&random_bitstring(4 * n - 2, n - 1, rng));

    let mut graph = code_to_tree(&bitstring);
    let root = complete_closure(&mut graph);
    make_bimodal(&mut graph);
    if two_cycles {
        insert_2_cycles(&mut graph, rng);
    }

    let rotations = graph
        .rings
        .iter()
        .map(|&ring| graph.pool.iter(ring).copied().collect())
        .collect();
    SampledTriangulation {
        edges: graph.edges.iter().map(|e| (e.tail, e.head)).collect(),
        rotations,
        root,
        code: bitstring,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn bitstring_has_requested_weight() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 2..12 {
            let bits = random_bitstring(4 * n - 2, n - 1, &mut rng);
            assert_eq!(bits.len(), 4 * n - 2);
            assert_eq!(bits.iter().filter(|&&b| b).count(), n - 1);
        }
    }

    #[test]
    fn conjugate_shift_is_a_rotation_with_terminal_minimum() {
        let mut rng = StdRng::seed_from_u64(11);
        let bits = random_bitstring(4 * 5 - 2, 4, &mut rng);
        let shifted = find_permutation(&bits);
        assert_eq!(shifted.len(), bits.len());
        assert_eq!(
            shifted.iter().filter(|&&b| b).count(),
            bits.iter().filter(|&&b| b).count()
        );
        // The running sum never dips to its final value early.
        let total: i64 = shifted.iter().map(|&b| if b { 3 } else { -1 }).sum();
        let mut acc = 0i64;
        for &b in &shifted[..shifted.len() - 1] {
            acc += if b { 3 } else { -1 };
            assert!(acc > total);
        }
    }

    #[test]
    fn sampled_triangulation_has_consistent_counts() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in 2..10 {
            let sampled = sample_triangulation(n, false, &mut rng);
            // n inner vertices plus v0's tree plus the two absorbers:
            // a triangulation with v vertices has 3v - 6 edges.
            let v = sampled.num_vertices();
            assert_eq!(v, n + 2);
            assert_eq!(sampled.edges.len(), 3 * v - 6);
            // Rotation entries count each edge exactly twice.
            let slots: usize = sampled.rotations.iter().map(Vec::len).sum();
            assert_eq!(slots, 2 * sampled.edges.len());
        }
    }

    #[test]
    fn sampled_orientation_is_bimodal() {
        let mut rng = StdRng::seed_from_u64(5);
        let sampled = sample_triangulation(8, false, &mut rng);
        // In a bimodal orientation, each vertex's rotation splits into at
        // most two runs of outgoing and incoming edges.
        for (v, rotation) in sampled.rotations.iter().enumerate() {
            let outgoing: Vec<bool> = rotation.iter().map(|&e| sampled.edges[e].0 == v).collect();
            let switches = (0..outgoing.len())
                .filter(|&i| outgoing[i] != outgoing[(i + 1) % outgoing.len()])
                .count();
            assert!(switches <= 2, "vertex {v} has {switches} orientation switches");
        }
    }
}
