//! Four-block decomposition: find the separating triangles of an embedded
//! triangulation, order them so that nested triangles are split before the
//! triangles that enclose them, cut the embedding along each one, and
//! extract the resulting 4-connected components as a [`FourBlockTree`].
//!
//! The surgery works on a mutable copy of the rotation system held in a
//! [`RingPool`]: one ring per vertex, plus a side table mapping every edge
//! to its current endpoints and to its ring nodes at both ends.  Splitting a
//! triangle splices the arc of each corner's rotation that faces the inside
//! over to a fresh clone vertex; the donating-splice contract keeps the
//! boundary nodes valid on both sides of the cut.

use cyclist::{NodeIx, RingIx, RingPool};
use smallvec::smallvec;

use crate::graph::{Edge, FourBlockComponent, FourBlockTree, Graph, Vertex};

/// A separating triangle: three corners and the edge ids joining them.
#[derive(Clone, Copy, Debug)]
struct Triangle {
    u: Vertex,
    v: Vertex,
    w: Vertex,
    e_uv: usize,
    e_vw: usize,
    e_wu: usize,
}

/// List every separating triangle of `graph`.
///
/// Triangle enumeration is Chiba–Nishizeki: process vertices in descending
/// degree order, mark the current vertex's neighborhood, and scan each
/// unvisited neighbor's neighborhood for marked vertices.  A found triangle
/// `uvw` is separating iff its two edges at `u` are not adjacent in `u`'s
/// rotation, i.e. the triangle is not a face.
fn list_separating_triangles(graph: &Graph) -> Vec<Triangle> {
    let n = graph.num_vertices();
    let mut out_triangles = Vec::new();

    let mut buckets = vec![Vec::new(); n];
    for v in 0..n {
        buckets[graph.degree(v)].push(v);
    }
    let mut vertices_by_degree = Vec::with_capacity(n);
    for bucket in &buckets {
        vertices_by_degree.extend_from_slice(bucket);
    }

    let mut marked = vec![false; n];
    let mut visited = vec![false; n];
    let mut edge_to_center = vec![0usize; n];
    for i in (2..n).rev() {
        let v = vertices_by_degree[i];
        visited[v] = true;
        for ix in 0..graph.degree(v) {
            let e_vw = graph.rotations[v][ix];
            let w = graph.edges[e_vw].other(v);
            marked[w] = true;
            edge_to_center[w] = e_vw;
        }
        for ix in 0..graph.degree(v) {
            let e_uv = graph.rotations[v][ix];
            let u = graph.edges[e_uv].other(v);
            if !visited[u] {
                for jx in 0..graph.degree(u) {
                    let e_uw = graph.rotations[u][jx];
                    let w = graph.edges[e_uw].other(u);
                    if !visited[w] && marked[w] {
                        let ix_of_w_at_u = graph.neighbor_index(u, e_uw);
                        let ix_of_v_at_u = graph.neighbor_index(u, e_uv);
                        // Separating iff e_uv and e_uw are more than one
                        // rotation slot apart in both directions.
                        if (graph.degree(u) + ix_of_v_at_u + 1 - ix_of_w_at_u) % graph.degree(u) > 2
                        {
                            out_triangles.push(Triangle {
                                u,
                                v,
                                w,
                                e_uv,
                                e_vw: edge_to_center[w],
                                e_wu: e_uw,
                            });
                        }
                    }
                }
            }
            marked[u] = false;
        }
    }

    out_triangles
}

/// An edge of the mutable embedding: current endpoints plus the ring nodes
/// holding this edge id in each endpoint's rotation.
#[derive(Clone, Copy, Debug, Default)]
struct MutEdge {
    tail: Vertex,
    head: Vertex,
    tail_it: NodeIx,
    head_it: NodeIx,
}

impl MutEdge {
    #[inline]
    fn other(&self, v: Vertex) -> Vertex {
        if v == self.tail { self.head } else { self.tail }
    }
}

/// Decompose `graph` along its separating triangles.
///
/// The input must be a simple, 3-connected, triangulated plane embedding.
/// The returned tree lists the component of the original outer face first;
/// every component split off along a triangle follows its parent.
pub fn build_four_block_tree(graph: &Graph) -> FourBlockTree {
    let n = graph.num_vertices();
    let num_edges = graph.num_edges();
    let infinity = n;
    let root = graph.outer_face[0];

    let mut height = vec![0usize; n];
    let mut lowpoint = vec![0usize; num_edges];
    let mut distance_from_tree_edge = vec![0usize; num_edges];
    let mut parent = vec![0usize; num_edges];
    let mut parent_edge = vec![0usize; n];
    let mut back_edge = vec![false; num_edges];
    // 0b01 = right, 0b10 = left, 0b11 = both
    let mut return_side = vec![0u8; num_edges];
    let mut max_height = 0usize;
    let mut max_degree = graph.degree(root);

    {
        // First DFS: heights, lowpoints, and for every edge the distance and
        // side of its lowest return relative to the active child edge.
        let mut lowpoint_v = vec![infinity];
        let mut distance_v = vec![0usize];
        let mut side_v = vec![0u8];
        let mut active_child_edge = vec![0usize; n];
        let mut visited = vec![false; n];
        let mut traversed = vec![false; num_edges];
        let mut stack: Vec<(Vertex, usize)> = vec![(root, 0)];
        visited[root] = true;
        {
            let mut i = 0;
            while graph.neighbor(root, i) != graph.outer_face[1] {
                i += 1;
            }
            parent_edge[root] = graph.rotations[root][i];
        }

        while let Some(&(v, i)) = stack.last() {
            if i == graph.degree(v) {
                stack.pop();
                if !stack.is_empty() {
                    let pe = parent_edge[v];
                    lowpoint[pe] = lowpoint_v.pop().unwrap();
                    distance_from_tree_edge[pe] = distance_v.pop().unwrap();
                    return_side[pe] = side_v.pop().unwrap();

                    if lowpoint[pe] < *lowpoint_v.last().unwrap() {
                        *lowpoint_v.last_mut().unwrap() = lowpoint[pe];
                        *distance_v.last_mut().unwrap() = distance_from_tree_edge[pe];
                        *side_v.last_mut().unwrap() = return_side[pe];
                    } else if lowpoint[pe] == *lowpoint_v.last().unwrap() {
                        *side_v.last_mut().unwrap() |= return_side[pe];
                    }
                }
            } else {
                let e = graph.rotations[v][i];
                let w = graph.neighbor(v, i);
                stack.last_mut().unwrap().1 += 1;
                if !visited[w] {
                    // tree edge
                    height[w] = height[v] + 1;
                    max_height = max_height.max(height[w]);

                    visited[w] = true;
                    traversed[e] = true;
                    active_child_edge[v] = e;
                    parent[e] = v;
                    parent_edge[w] = e;
                    back_edge[e] = false;
                    stack.push((w, 0));
                    lowpoint_v.push(infinity);
                    distance_v.push(0);
                    side_v.push(0);
                    max_degree = max_degree.max(graph.degree(w));
                } else if !traversed[e] {
                    // back edge
                    traversed[e] = true;
                    lowpoint[e] = height[w];
                    parent[e] = v;
                    back_edge[e] = true;
                    {
                        let c = active_child_edge[w];
                        let p = parent_edge[w];
                        let deg_w = graph.degree(w);
                        let index_of_e = graph.edges[e].index_at(w);
                        let index_of_c = graph.edges[c].index_at(w);
                        let index_of_p = graph.edges[p].index_at(w);
                        let dist_e_c = (deg_w + index_of_e - index_of_c) % deg_w;
                        let dist_p_c = (deg_w + index_of_p - index_of_c) % deg_w;
                        if dist_e_c < dist_p_c {
                            return_side[e] = 0b01;
                            distance_from_tree_edge[e] = dist_e_c;
                        } else {
                            return_side[e] = 0b10;
                            distance_from_tree_edge[e] = deg_w - dist_e_c;
                        }
                    }
                    if lowpoint[e] < *lowpoint_v.last().unwrap() {
                        *lowpoint_v.last_mut().unwrap() = lowpoint[e];
                        *distance_v.last_mut().unwrap() = distance_from_tree_edge[e];
                        *side_v.last_mut().unwrap() = return_side[e];
                    } else if lowpoint[e] == *lowpoint_v.last().unwrap() {
                        *side_v.last_mut().unwrap() |= return_side[e];
                    }
                }
            }
        }
    }

    let mut edge_order = vec![Vec::new(); n];
    {
        // Canonical rotation order of each vertex's child edges: radix-sort
        // by distance then lowpoint, partition by return side, and merge
        // left against right by descending lowpoint with back edges first.
        let mut edges_by_dist = vec![Vec::new(); max_degree];
        for e in 0..num_edges {
            edges_by_dist[distance_from_tree_edge[e]].push(e);
        }

        let mut edges_by_lowpoint = vec![Vec::new(); max_height];
        for bucket in &edges_by_dist {
            for &e in bucket {
                edges_by_lowpoint[lowpoint[e]].push(e);
            }
        }

        let mut left_by_parent = vec![Vec::new(); n];
        let mut right_by_parent = vec![Vec::new(); n];
        let mut both_by_parent = vec![Vec::new(); n];
        for bucket in edges_by_lowpoint.iter().rev() {
            for &e in bucket {
                match return_side[e] {
                    0b10 => left_by_parent[parent[e]].push(e),
                    0b01 => right_by_parent[parent[e]].push(e),
                    0b11 => both_by_parent[parent[e]].push(e),
                    side => unreachable!("edge {e} has return side {side}"),
                }
            }
        }

        for v in 0..n {
            let left = &left_by_parent[v];
            let right = &right_by_parent[v];
            let (mut i_left, mut i_right) = (0, 0);
            while i_left < left.len() && i_right < right.len() {
                let left_edge = left[i_left];
                let right_edge = right[i_right];
                if lowpoint[left_edge] > lowpoint[right_edge]
                    || (lowpoint[left_edge] == lowpoint[right_edge] && back_edge[left_edge])
                {
                    edge_order[v].push(left_edge);
                    i_left += 1;
                } else {
                    edge_order[v].push(right_edge);
                    i_right += 1;
                }
            }
            edge_order[v].extend_from_slice(&left[i_left..]);
            edge_order[v].extend_from_slice(&right[i_right..]);
            edge_order[v].extend_from_slice(&both_by_parent[v]);
        }
    }

    let mut separating_triangles = list_separating_triangles(graph);

    let mut triangle_order = Vec::with_capacity(separating_triangles.len());
    {
        // Second DFS along the canonical child order.  A triangle is
        // complete once all three of its edges have been traversed;
        // triangles completing on the same edge are emitted by ascending
        // rotation distance from that edge at its far endpoint.
        let mut triangles_by_edge = vec![Vec::new(); num_edges];
        for (t, tri) in separating_triangles.iter().enumerate() {
            triangles_by_edge[tri.e_uv].push(t);
            triangles_by_edge[tri.e_vw].push(t);
            triangles_by_edge[tri.e_wu].push(t);
        }
        let mut edges_found = vec![0u8; separating_triangles.len()];
        let mut dfs2_stack: Vec<(Vertex, usize)> = vec![(root, 0)];
        while let Some(&(v, edge_ix)) = dfs2_stack.last() {
            if edge_ix == edge_order[v].len() {
                dfs2_stack.pop();
                continue;
            }
            let e = edge_order[v][edge_ix];
            dfs2_stack.last_mut().unwrap().1 += 1;

            let mut current_triangles = Vec::new();
            for &t in &triangles_by_edge[e] {
                edges_found[t] += 1;
                if edges_found[t] == 3 {
                    current_triangles.push(t);
                }
            }
            let w = graph.edges[e].other(v);
            if !current_triangles.is_empty() {
                let deg_w = graph.degree(w);
                let p = parent_edge[w];
                let index_of_p = graph.edges[p].index_at(w);
                let index_of_e = graph.edges[e].index_at(w);
                let mut dist_from_e = vec![0usize; current_triangles.len()];
                let mut max_dist = 0usize;
                for (i, &t) in current_triangles.iter().enumerate() {
                    let tri = &separating_triangles[t];
                    let u = tri.u + tri.v + tri.w - v - w;
                    let index_of_wu = [tri.e_uv, tri.e_vw, tri.e_wu]
                        .into_iter()
                        .find_map(|eid| {
                            let edge = &graph.edges[eid];
                            if edge.tail == w && edge.head == u {
                                Some(edge.index_at_tail)
                            } else if edge.head == w && edge.tail == u {
                                Some(edge.index_at_head)
                            } else {
                                None
                            }
                        })
                        .expect("triangle has an edge between w and its third corner");
                    dist_from_e[i] = (deg_w + index_of_wu - index_of_e) % deg_w;
                    let dist_p_e = (deg_w + index_of_p - index_of_e) % deg_w;
                    let left = dist_from_e[i] >= dist_p_e && dist_p_e != 0;
                    if left {
                        dist_from_e[i] = deg_w - dist_from_e[i];
                    }
                    max_dist = max_dist.max(dist_from_e[i]);
                }
                let mut triangles_by_dist = vec![Vec::new(); max_dist + 1];
                for (i, &t) in current_triangles.iter().enumerate() {
                    triangles_by_dist[dist_from_e[i]].push(t);
                }
                for bucket in &triangles_by_dist {
                    triangle_order.extend_from_slice(bucket);
                }
            }
            if !back_edge[e] {
                dfs2_stack.push((w, 0));
            }
        }
    }

    // Mutable copy of the rotation system: one ring per vertex, and a side
    // table holding each edge's current endpoints and ring nodes.
    let num_triangles = separating_triangles.len();
    let mut pool: RingPool<usize> = RingPool::with_capacity(
        n + 3 * num_triangles,
        2 * num_edges + 12 * num_triangles,
    );
    let mut rings: Vec<RingIx> = (0..n).map(|_| pool.ring()).collect();
    let mut mut_edges: Vec<MutEdge> = Vec::with_capacity(num_edges + 3 * num_triangles);
    let mut original_edge = vec![0usize; num_edges + 3 * num_triangles];
    let mut original_vertex: Vec<Vertex> = (0..n).collect();
    original_vertex.reserve(3 * num_triangles);
    // Reserved edge id marking a designated-face slot in a rotation.
    let virtual_edge = original_edge.len();

    {
        for edge in &graph.edges {
            mut_edges.push(MutEdge {
                tail: edge.tail,
                head: edge.head,
                tail_it: NodeIx::default(),
                head_it: NodeIx::default(),
            });
        }
        for v in 0..n {
            for &e in &graph.rotations[v] {
                let it = pool.push_back(rings[v], e);
                if v == mut_edges[e].tail {
                    mut_edges[e].tail_it = it;
                } else {
                    mut_edges[e].head_it = it;
                }
            }
        }
        for (e, slot) in original_edge.iter_mut().enumerate().take(num_edges) {
            *slot = e;
        }

        // Split along each triangle, innermost first, so the arc to donate
        // always still lives in the rings of the stored corner vertices.
        for &i in &triangle_order {
            let t = separating_triangles[i];

            let uv_reversed = t.u == mut_edges[t.e_uv].head;
            let vw_reversed = t.v == mut_edges[t.e_vw].head;
            let wu_reversed = t.w == mut_edges[t.e_wu].head;
            let (it_uv, it_vu) = if uv_reversed {
                (mut_edges[t.e_uv].head_it, mut_edges[t.e_uv].tail_it)
            } else {
                (mut_edges[t.e_uv].tail_it, mut_edges[t.e_uv].head_it)
            };
            let (it_vw, it_wv) = if vw_reversed {
                (mut_edges[t.e_vw].head_it, mut_edges[t.e_vw].tail_it)
            } else {
                (mut_edges[t.e_vw].tail_it, mut_edges[t.e_vw].head_it)
            };
            let (it_wu, it_uw) = if wu_reversed {
                (mut_edges[t.e_wu].head_it, mut_edges[t.e_wu].tail_it)
            } else {
                (mut_edges[t.e_wu].tail_it, mut_edges[t.e_wu].head_it)
            };

            let mut first_found = t.u;
            if height[t.v] < height[t.u] {
                first_found = t.v;
            }
            if height[t.w] < height[first_found] {
                first_found = t.w;
            }
            // True iff uvw read in stored order runs clockwise around the
            // side being cut away, judged at the corner the DFS found first
            // using its parent edge.
            let find_outside =
                |u: Vertex, e_uv: usize, e_wu: usize, uv_rev: bool, wu_rev: bool| -> bool {
                    let e_up = parent_edge[u];
                    let index_up = graph.edges[e_up].index_at(u);
                    let index_uv = if uv_rev {
                        graph.edges[e_uv].index_at_head
                    } else {
                        graph.edges[e_uv].index_at_tail
                    };
                    let index_uw = if wu_rev {
                        graph.edges[e_wu].index_at_tail
                    } else {
                        graph.edges[e_wu].index_at_head
                    };
                    let deg = graph.degree(u);
                    let dist_wp = (deg + index_up - index_uw) % deg;
                    let dist_wv = (deg + index_uv - index_uw) % deg;
                    dist_wv < dist_wp || dist_wp == 0
                };
            let uvw_reversed = if t.u == first_found {
                find_outside(t.u, t.e_uv, t.e_wu, uv_reversed, wu_reversed)
            } else if t.v == first_found {
                find_outside(t.v, t.e_vw, t.e_uv, vw_reversed, uv_reversed)
            } else {
                find_outside(t.w, t.e_wu, t.e_vw, wu_reversed, vw_reversed)
            };

            let u_ = rings.len();
            rings.push(pool.ring());
            let v_ = rings.len();
            rings.push(pool.ring());
            let w_ = rings.len();
            rings.push(pool.ring());
            let e_uv_ = mut_edges.len();
            mut_edges.push(MutEdge {
                tail: graph.edges[t.e_uv].tail,
                head: graph.edges[t.e_uv].head,
                tail_it: NodeIx::default(),
                head_it: NodeIx::default(),
            });
            let e_vw_ = mut_edges.len();
            mut_edges.push(MutEdge {
                tail: graph.edges[t.e_vw].tail,
                head: graph.edges[t.e_vw].head,
                tail_it: NodeIx::default(),
                head_it: NodeIx::default(),
            });
            let e_wu_ = mut_edges.len();
            mut_edges.push(MutEdge {
                tail: graph.edges[t.e_wu].tail,
                head: graph.edges[t.e_wu].head,
                tail_it: NodeIx::default(),
                head_it: NodeIx::default(),
            });

            original_edge[e_uv_] = t.e_uv;
            original_edge[e_vw_] = t.e_vw;
            original_edge[e_wu_] = t.e_wu;

            if !uvw_reversed {
                pool.splice(rings[u_], None, rings[t.u], it_uv, it_uw);
                pool.splice(rings[v_], None, rings[t.v], it_vw, it_vu);
                pool.splice(rings[w_], None, rings[t.w], it_wu, it_wv);
                let (head_u, back_u) = (pool.head(rings[u_]).unwrap(), pool.back(rings[u_]).unwrap());
                let (head_v, back_v) = (pool.head(rings[v_]).unwrap(), pool.back(rings[v_]).unwrap());
                let (head_w, back_w) = (pool.head(rings[w_]).unwrap(), pool.back(rings[w_]).unwrap());
                *pool.value_mut(head_u) = e_uv_;
                *pool.value_mut(back_u) = e_wu_;
                *pool.value_mut(head_v) = e_vw_;
                *pool.value_mut(back_v) = e_uv_;
                *pool.value_mut(head_w) = e_wu_;
                *pool.value_mut(back_w) = e_vw_;
                let (uv_t, uv_h) = if uv_reversed { (back_v, head_u) } else { (head_u, back_v) };
                let (vw_t, vw_h) = if vw_reversed { (back_w, head_v) } else { (head_v, back_w) };
                let (wu_t, wu_h) = if wu_reversed { (back_u, head_w) } else { (head_w, back_u) };
                mut_edges[e_uv_].tail_it = uv_t;
                mut_edges[e_uv_].head_it = uv_h;
                mut_edges[e_vw_].tail_it = vw_t;
                mut_edges[e_vw_].head_it = vw_h;
                mut_edges[e_wu_].tail_it = wu_t;
                mut_edges[e_wu_].head_it = wu_h;
            } else {
                pool.splice(rings[u_], None, rings[t.u], it_uw, it_uv);
                pool.splice(rings[v_], None, rings[t.v], it_vu, it_vw);
                pool.splice(rings[w_], None, rings[t.w], it_wv, it_wu);
                let (head_u, back_u) = (pool.head(rings[u_]).unwrap(), pool.back(rings[u_]).unwrap());
                let (head_v, back_v) = (pool.head(rings[v_]).unwrap(), pool.back(rings[v_]).unwrap());
                let (head_w, back_w) = (pool.head(rings[w_]).unwrap(), pool.back(rings[w_]).unwrap());
                *pool.value_mut(head_u) = e_wu_;
                *pool.value_mut(back_u) = e_uv_;
                *pool.value_mut(head_v) = e_uv_;
                *pool.value_mut(back_v) = e_vw_;
                *pool.value_mut(head_w) = e_vw_;
                *pool.value_mut(back_w) = e_wu_;
                let (uv_t, uv_h) = if uv_reversed { (head_v, back_u) } else { (back_u, head_v) };
                let (vw_t, vw_h) = if vw_reversed { (head_w, back_v) } else { (back_v, head_w) };
                let (wu_t, wu_h) = if wu_reversed { (head_u, back_w) } else { (back_w, head_u) };
                mut_edges[e_uv_].tail_it = uv_t;
                mut_edges[e_uv_].head_it = uv_h;
                mut_edges[e_vw_].tail_it = vw_t;
                mut_edges[e_vw_].head_it = vw_h;
                mut_edges[e_wu_].tail_it = wu_t;
                mut_edges[e_wu_].head_it = wu_h;
            }

            // Every edge now living in a clone's ring gets its endpoint at
            // the original corner renamed to the clone.
            for (x, x_) in [(t.u, u_), (t.v, v_), (t.w, w_)] {
                for node in pool.iter_nodes(rings[x_]) {
                    let e = *pool.value(node);
                    if e != virtual_edge {
                        if x == mut_edges[e].tail {
                            mut_edges[e].tail = x_;
                        } else {
                            mut_edges[e].head = x_;
                        }
                    }
                }
            }

            // Pincer test: if a clone's rotation starts and ends in the same
            // direction but flips somewhere in between, the original corner
            // keeps a designated-face marker at the cut.
            let is_pincer = |pool: &RingPool<usize>, x_: Vertex| -> bool {
                let ring = rings[x_];
                let first = *pool.value(pool.head(ring).unwrap());
                let last = *pool.value(pool.back(ring).unwrap());
                let first_outgoing = x_ == mut_edges[first].tail;
                let last_outgoing = x_ == mut_edges[last].tail;
                if first_outgoing != last_outgoing {
                    return false;
                }
                pool.iter(ring).any(|&e| {
                    e == virtual_edge || first_outgoing != (x_ == mut_edges[e].tail)
                })
            };
            if is_pincer(&pool, u_) {
                pool.insert_before(rings[t.u], if uvw_reversed { it_uv } else { it_uw }, virtual_edge);
            }
            if is_pincer(&pool, v_) {
                pool.insert_before(rings[t.v], if uvw_reversed { it_vw } else { it_vu }, virtual_edge);
            }
            if is_pincer(&pool, w_) {
                pool.insert_before(rings[t.w], if uvw_reversed { it_wu } else { it_wv }, virtual_edge);
            }

            original_vertex.push(t.u);
            original_vertex.push(t.v);
            original_vertex.push(t.w);

            separating_triangles[i].u = u_;
            separating_triangles[i].v = v_;
            separating_triangles[i].w = w_;
            if uvw_reversed {
                let t = &mut separating_triangles[i];
                std::mem::swap(&mut t.v, &mut t.w);
            }
        }
    }

    {
        // Anchor the root's outer face: rotate each outer vertex's ring so
        // the edge to the next outer vertex comes first.
        let mut permute_list = |u: Vertex, v: Vertex| {
            let ring = rings[u];
            let mut it = pool.head(ring).unwrap();
            loop {
                let e = *pool.value(it);
                if e != virtual_edge && mut_edges[e].tail + mut_edges[e].head == u + v {
                    break;
                }
                it = pool.next(it);
            }
            pool.set_head(ring, it);
        };
        permute_list(graph.outer_face[0], graph.outer_face[1]);
        permute_list(graph.outer_face[1], graph.outer_face[2]);
        permute_list(graph.outer_face[2], graph.outer_face[0]);
    }

    let mut result: FourBlockTree = Vec::with_capacity(triangle_order.len() + 1);
    {
        // Extract components: a sentinel triangle stands for the original
        // outer face, then each triangle in reverse split order seeds a BFS
        // over not-yet-traversed edges.
        triangle_order.push(separating_triangles.len());
        separating_triangles.push(Triangle {
            u: graph.outer_face[0],
            v: graph.outer_face[1],
            w: graph.outer_face[2],
            e_uv: 0,
            e_vw: 0,
            e_wu: 0,
        });

        let mut visited = vec![false; rings.len()];
        let mut traversed = vec![false; mut_edges.len()];
        let mut mapped_vertex = vec![0usize; rings.len()];
        let mut mapped_edge = vec![0usize; mut_edges.len()];
        for &i in triangle_order.iter().rev() {
            let tri = separating_triangles[i];
            let mut comp = FourBlockComponent::default();

            let bfs_root = tri.u;
            let mut bfs_queue = vec![bfs_root];
            let mut v_ = 0;
            while v_ < bfs_queue.len() {
                let v = bfs_queue[v_];
                for node in pool.iter_nodes(rings[v]) {
                    let e = *pool.value(node);
                    if e != virtual_edge && !traversed[e] {
                        traversed[e] = true;
                        mapped_edge[e] = comp.original_edge.len();
                        comp.original_edge.push(e);
                        let w = mut_edges[e].other(v);
                        if !visited[w] {
                            visited[w] = true;
                            mapped_vertex[w] = bfs_queue.len();
                            bfs_queue.push(w);
                        }
                    }
                }
                v_ += 1;
            }

            comp.graph.outer_face =
                smallvec![mapped_vertex[tri.u], mapped_vertex[tri.v], mapped_vertex[tri.w]];
            comp.graph.edges.reserve(comp.original_edge.len());
            comp.graph.rotations.reserve(bfs_queue.len());
            comp.designated_face = vec![0; bfs_queue.len()];

            for e in comp.original_edge.iter_mut() {
                comp.graph
                    .edges
                    .push(Edge::new(mapped_vertex[mut_edges[*e].tail], mapped_vertex[mut_edges[*e].head]));
                *e = original_edge[*e];
            }
            for (v_, &v) in bfs_queue.iter().enumerate() {
                comp.graph.labels.push(graph.labels[original_vertex[v]].clone());
                let mut rotation = Vec::new();
                for node in pool.iter_nodes(rings[v]) {
                    let e = *pool.value(node);
                    if e == virtual_edge {
                        comp.designated_face[v_] = rotation.len() + 1;
                    } else {
                        let e_ = mapped_edge[e];
                        let edge = &mut comp.graph.edges[e_];
                        if v_ == edge.tail {
                            edge.index_at_tail = rotation.len();
                        } else {
                            edge.index_at_head = rotation.len();
                        }
                        rotation.push(e_);
                    }
                }
                comp.graph.rotations.push(rotation);
            }

            result.push(comp);
        }
    }

    result
}
