//! L-drawing assembly over the four-block tree.
//!
//! Each component in turn gets a dummy outer vertex `x` (so its outer face
//! has four corners and a rectangular dual exists), its dual computed and
//! its corners nudged so the dummy tile degenerates away, leaf vertices for
//! its designated faces, and finally its port assignment.  Once every
//! original edge carries final ports, two DAGs orient the edges by their
//! horizontal and vertical port bits; the topological ranks are the drawing
//! coordinates.

use std::io::Write;

use anyhow::{Result, bail};
use smallvec::smallvec;

use crate::graph::{
    Coord, Edge, FourBlockComponent, FourBlockTree, Graph, LDrawing, PORT_ASSIGNED, Point,
    PortBits, RectangularDual,
};
use crate::ports::port_assignment;
use crate::rect_dual::compute_rect_dual;
use crate::timer::{Phase, Timer};

/// How a component's outer triangle is drawn, classified from the port
/// pattern of its three edges.
///
/// ```text
/// H_SHAPE: TTT   LONG_SINK: TXW   T_SHAPE: TXW   LONG_SOURCE: WXS
///          X W              T W            T W                W S
///          SSS              TSS            SSS                TTS
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OuterShape {
    HShape,
    LongSink,
    TShape,
    LongSource,
}

/// Seed the root component's outer-face edges with their fixed ports,
/// chosen from the orientation pattern of the outer triangle.
fn port_assignment_of_outer_face(comp: &FourBlockComponent, pa: &mut [PortBits]) {
    let graph = &comp.graph;
    let a = graph.outer_face[0];
    let b = graph.outer_face[1];
    let c = graph.outer_face[2];
    let e_ab = graph.rotations[a][0];
    let e_bc = graph.rotations[b][0];
    let e_ca = graph.rotations[c][0];
    let e_ab_reversed = a == graph.edges[e_ab].head;
    let e_bc_reversed = b == graph.edges[e_bc].head;
    let e_ca_reversed = c == graph.edges[e_ca].head;

    if e_ab_reversed && e_bc_reversed && e_ca_reversed {
        pa[comp.original_edge[e_ab]] = 0b100;
        pa[comp.original_edge[e_bc]] = 0b111;
        pa[comp.original_edge[e_ca]] = 0b111;
    } else if !e_ab_reversed && !e_bc_reversed && !e_ca_reversed {
        pa[comp.original_edge[e_ab]] = 0b101;
        pa[comp.original_edge[e_bc]] = 0b110;
        pa[comp.original_edge[e_ca]] = 0b110;
    } else if e_ab_reversed == e_ca_reversed {
        // a is the wall vertex
        if e_ab_reversed {
            // b is the source, c the sink
            pa[comp.original_edge[e_ab]] = 0b111;
            pa[comp.original_edge[e_bc]] = 0b101;
            pa[comp.original_edge[e_ca]] = 0b100;
        } else {
            pa[comp.original_edge[e_ab]] = 0b101;
            pa[comp.original_edge[e_bc]] = 0b100;
            pa[comp.original_edge[e_ca]] = 0b110;
        }
    } else if e_bc_reversed == e_ab_reversed {
        // b is the wall vertex
        if e_bc_reversed {
            pa[comp.original_edge[e_ab]] = 0b100;
            pa[comp.original_edge[e_bc]] = 0b111;
            pa[comp.original_edge[e_ca]] = 0b101;
        } else {
            pa[comp.original_edge[e_ab]] = 0b110;
            pa[comp.original_edge[e_bc]] = 0b101;
            pa[comp.original_edge[e_ca]] = 0b100;
        }
    } else {
        // c is the wall vertex
        if e_ca_reversed {
            pa[comp.original_edge[e_ab]] = 0b101;
            pa[comp.original_edge[e_bc]] = 0b100;
            pa[comp.original_edge[e_ca]] = 0b111;
        } else {
            pa[comp.original_edge[e_ab]] = 0b100;
            pa[comp.original_edge[e_bc]] = 0b110;
            pa[comp.original_edge[e_ca]] = 0b101;
        }
    }
}

/// Subdivide one outer edge with a dummy vertex `x`, add the dummy edge
/// into the adjacent interior face, and rotate the outer face so `x` lands
/// in the slot the ports dictate.  Returns the outer-face shape used later
/// to collapse the dummy tile.
fn add_x(comp: &mut FourBlockComponent, pa: &[PortBits], dummy_edge: usize) -> Result<OuterShape> {
    let a = comp.graph.outer_face[0];
    let b = comp.graph.outer_face[1];
    let c = comp.graph.outer_face[2];
    let e_ab = comp.graph.rotations[a][0];
    let e_bc = comp.graph.rotations[b][0];
    let e_ca = comp.graph.rotations[c][0];
    let e_ab_reversed = a == comp.graph.edges[e_ab].head;
    let e_bc_reversed = b == comp.graph.edges[e_bc].head;
    let e_ca_reversed = c == comp.graph.edges[e_ca].head;

    let target_edge: usize;
    let shape: OuterShape;

    if e_ab_reversed == e_bc_reversed && e_bc_reversed == e_ca_reversed {
        // The outer triangle is a directed cycle.
        let pa_ab = pa[comp.original_edge[e_ab]];
        let pa_bc = pa[comp.original_edge[e_bc]];
        let pa_ca = pa[comp.original_edge[e_ca]];

        if pa_ab == pa_bc {
            target_edge = e_ca;
            shape = OuterShape::HShape;
        } else if pa_ab == pa_ca {
            target_edge = e_bc;
            shape = OuterShape::HShape;
        } else if pa_bc == pa_ca {
            target_edge = e_ab;
            shape = OuterShape::HShape;
        } else if pa_ab ^ pa_bc == 0b11 {
            target_edge = if pa_ab == 0b100 || pa_ab == 0b111 { e_ab } else { e_bc };
            shape = OuterShape::LongSink;
        } else if pa_ca ^ pa_ab == 0b11 {
            target_edge = if pa_ca == 0b100 || pa_ca == 0b111 { e_ca } else { e_ab };
            shape = OuterShape::LongSink;
        } else {
            target_edge = if pa_bc == 0b100 || pa_bc == 0b111 { e_bc } else { e_ca };
            shape = OuterShape::LongSink;
        }
    } else {
        // Two edges meet at the wall vertex w; s is the source corner and
        // t the sink corner.
        let (e_st, e_wt, e_sw) = if e_ab_reversed == e_ca_reversed {
            if e_ab_reversed { (e_bc, e_ca, e_ab) } else { (e_bc, e_ab, e_ca) }
        } else if e_bc_reversed == e_ab_reversed {
            if e_bc_reversed { (e_ca, e_ab, e_bc) } else { (e_ca, e_bc, e_ab) }
        } else if e_ca_reversed {
            (e_ab, e_bc, e_ca)
        } else {
            (e_ab, e_ca, e_bc)
        };

        let pa_st = pa[comp.original_edge[e_st]];
        let pa_wt = pa[comp.original_edge[e_wt]];
        let pa_sw = pa[comp.original_edge[e_sw]];

        if pa_st == pa_wt && pa_wt == pa_sw {
            shape = OuterShape::HShape;
            target_edge = e_st;
        } else if (pa_st ^ pa_sw) & 0b10 != 0 && (pa_st ^ pa_wt) & 0b01 != 0 {
            shape = OuterShape::TShape;
            target_edge = e_st;
        } else if pa_st == pa_sw {
            if pa_st & 0b01 == pa_wt & 0b01 {
                shape = OuterShape::LongSource;
                target_edge = e_sw;
            } else if pa_st & 0b10 == pa_wt & 0b10 {
                shape = OuterShape::TShape;
                target_edge = e_wt;
            } else {
                shape = OuterShape::HShape;
                target_edge = e_sw;
            }
        } else if pa_st == pa_wt {
            if pa_st & 0b10 == pa_sw & 0b10 {
                shape = OuterShape::LongSink;
                target_edge = e_wt;
            } else if pa_st & 0b01 == pa_sw & 0b01 {
                shape = OuterShape::TShape;
                target_edge = e_sw;
            } else {
                shape = OuterShape::HShape;
                target_edge = e_wt;
            }
        } else {
            bail!("Unrecognized drawing of outer face.");
        }
    }

    // Subdivide target_edge with x, keeping the tail half as target_edge
    // and adding e_xt for the head half.
    let right_is_outside = comp.graph.edges[target_edge].index_at_tail == 0;
    let x = comp.graph.num_vertices();
    comp.graph.labels.push("dummy".to_string());
    comp.designated_face.push(0);
    let e_xt = comp.graph.num_edges();
    let old_head = comp.graph.edges[target_edge].head;
    let old_index_at_head = comp.graph.edges[target_edge].index_at_head;
    comp.graph.edges.push(Edge {
        tail: x,
        head: old_head,
        index_at_tail: 2 * (!right_is_outside as usize),
        index_at_head: old_index_at_head,
    });
    comp.graph.rotations[old_head][old_index_at_head] = e_xt;
    comp.graph.edges[target_edge].head = x;
    let e_xy = comp.graph.num_edges();

    // s: the vertex one after x on the outer face, clockwise.
    let s;
    if right_is_outside {
        comp.graph.rotations.push(vec![e_xt, e_xy, target_edge]);
        comp.graph.edges[target_edge].index_at_head = 2;
        s = comp.graph.edges[target_edge].tail;
    } else {
        comp.graph.rotations.push(vec![target_edge, e_xy, e_xt]);
        comp.graph.edges[target_edge].index_at_head = 0;
        s = comp.graph.edges[e_xt].head;
    }

    // The dummy edge goes to y, the far corner of the interior face at s.
    let e_sy = comp.graph.rotations[s][1];
    let y = comp.graph.edges[e_sy].tail + comp.graph.edges[e_sy].head - s;
    // index at y plus one: the sum of both indices minus the index at s (1)
    let index_of_xy_at_y = comp.graph.edges[e_sy].index_at_tail + comp.graph.edges[e_sy].index_at_head;
    let deg_y = comp.graph.degree(y);
    let e_xy_is_in_designated_face_of_y = comp.designated_face[y] != 0
        && (comp.designated_face[y] - 1) % deg_y == index_of_xy_at_y % deg_y;
    let e_xy_reversed = (y == comp.graph.edges[comp.graph.rotations[y][index_of_xy_at_y % deg_y]].tail)
        ^ e_xy_is_in_designated_face_of_y;
    comp.graph.rotations[y].insert(index_of_xy_at_y, e_xy);
    if e_xy_reversed {
        comp.graph.edges.push(Edge {
            tail: y,
            head: x,
            index_at_tail: index_of_xy_at_y,
            index_at_head: 1,
        });
    } else {
        comp.graph.edges.push(Edge {
            tail: x,
            head: y,
            index_at_tail: 1,
            index_at_head: index_of_xy_at_y,
        });
    }
    if e_xy_is_in_designated_face_of_y {
        comp.designated_face[y] = 0;
    }

    // Edges shifted right in y's rotation move their index at y.
    for i in index_of_xy_at_y + 1..comp.graph.degree(y) {
        let e = comp.graph.rotations[y][i];
        let edge = &mut comp.graph.edges[e];
        if y == edge.tail {
            edge.index_at_tail += 1;
        } else {
            edge.index_at_head += 1;
        }
    }
    if comp.designated_face[y] > index_of_xy_at_y {
        comp.designated_face[y] += 1;
    }

    comp.original_edge.push(comp.original_edge[target_edge]); // e_xt
    comp.original_edge.push(dummy_edge); // e_xy

    // Rotate the outer face so x sits in the slot its ports demand.
    let u = comp.graph.neighbor(x, 0);
    let v = comp.graph.neighbor(u, 0);
    let w = comp.graph.neighbor(v, 0);
    comp.graph.outer_face = match pa[comp.original_edge[target_edge]] {
        0b100 => smallvec![v, w, x, u],
        0b101 => smallvec![w, x, u, v],
        0b110 => smallvec![u, v, w, x],
        _ => smallvec![x, u, v, w],
    };

    Ok(shape)
}

/// Nudge the four outer tiles by one unit so the dummy tile collapses to an
/// edge or corner of the enclosing rectangle.
fn fix_rectangular_dual(graph: &Graph, dual: &mut RectangularDual, shape: OuterShape) {
    let dummy_vertex = graph.num_vertices() - 1;
    let of = [
        graph.outer_face[0],
        graph.outer_face[1],
        graph.outer_face[2],
        graph.outer_face[3],
    ];
    match shape {
        OuterShape::TShape => {
            if dummy_vertex == of[0] {
                // left side shorter, top and bottom wider
                dual[of[0]].y_min += 1;
                dual[of[0]].y_max -= 1;
                dual[of[1]].x_min -= 1;
                dual[of[3]].x_min -= 1;
            } else if dummy_vertex == of[1] {
                // top wider, sides shorter
                dual[of[0]].y_max -= 1;
                dual[of[2]].y_max -= 1;
                dual[of[3]].x_min -= 1;
                dual[of[3]].x_max += 1;
            } else if dummy_vertex == of[2] {
                // right side shorter, top and bottom wider
                dual[of[1]].x_max += 1;
                dual[of[2]].y_min += 1;
                dual[of[2]].y_max -= 1;
                dual[of[3]].x_max += 1;
            } else {
                // bottom wider, sides shorter
                dual[of[0]].y_min += 1;
                dual[of[1]].x_min -= 1;
                dual[of[1]].x_max += 1;
                dual[of[2]].y_min += 1;
            }
        }
        OuterShape::HShape => {
            if dummy_vertex == of[0] || dummy_vertex == of[2] {
                // top and bottom wider, sides shorter
                dual[of[0]].y_min += 1;
                dual[of[0]].y_max -= 1;
                dual[of[1]].x_min -= 1;
                dual[of[1]].x_max += 1;
                dual[of[2]].y_min += 1;
                dual[of[2]].y_max -= 1;
                dual[of[3]].x_min -= 1;
                dual[of[3]].x_max += 1;
            }
        }
        OuterShape::LongSink => {
            if dummy_vertex == of[0] {
                // dummy is left, sink is top
                dual[of[0]].y_min += 1;
                dual[of[0]].y_max -= 1;
                dual[of[1]].x_min -= 1;
                dual[of[2]].y_max -= 1;
                dual[of[3]].x_min -= 1;
                dual[of[3]].x_max += 1;
            } else if dummy_vertex == of[1] {
                // dummy is bottom, sink is right
                dual[of[0]].y_max -= 1;
                dual[of[3]].x_min -= 1;
            } else if dummy_vertex == of[2] {
                // dummy is right, sink is bottom
                dual[of[0]].y_min += 1;
                dual[of[1]].x_min -= 1;
                dual[of[1]].x_max += 1;
                dual[of[2]].y_min += 1;
                dual[of[2]].y_max -= 1;
                dual[of[3]].x_max += 1;
            } else {
                // dummy is top, sink is left
                dual[of[1]].x_max += 1;
                dual[of[2]].y_min += 1;
            }
        }
        OuterShape::LongSource => {
            if dummy_vertex == of[0] {
                // dummy is left, source is bottom
                dual[of[0]].y_min += 1;
                dual[of[0]].y_max -= 1;
                dual[of[1]].x_min -= 1;
                dual[of[1]].x_max += 1;
                dual[of[2]].y_min += 1;
                dual[of[3]].x_min -= 1;
            } else if dummy_vertex == of[1] {
                // dummy is bottom, source is left
                dual[of[2]].y_max -= 1;
                dual[of[3]].x_max += 1;
            } else if dummy_vertex == of[2] {
                // dummy is right, source is top
                dual[of[0]].y_max -= 1;
                dual[of[1]].x_max += 1;
                dual[of[2]].y_min += 1;
                dual[of[2]].y_max -= 1;
                dual[of[3]].x_min -= 1;
                dual[of[3]].x_max += 1;
            } else {
                // dummy is top, source is right
                dual[of[0]].y_min += 1;
                dual[of[1]].x_min -= 1;
            }
        }
    }
}

/// Realize every designated face as a leaf vertex with a zero-area tile
/// flush against the right wall of the incident neighbor's rectangle.
fn add_virtual_edges(comp: &mut FourBlockComponent, dual: &mut RectangularDual, dummy_edge: usize) {
    let mut v = 0;
    while v < comp.graph.num_vertices() {
        if comp.designated_face[v] == 0 {
            v += 1;
            continue;
        }
        let virtual_vertex = comp.graph.num_vertices();
        let virtual_edge = comp.graph.num_edges();
        let mut face = (comp.designated_face[v] - 1) % comp.graph.degree(v);
        let neighbor = comp.graph.neighbor(v, face);

        comp.graph.rotations.push(vec![virtual_edge]);
        comp.graph.labels.push("virtual_vertex".to_string());
        comp.designated_face.push(0);
        comp.original_edge.push(dummy_edge);

        let tile = if dual[v].x_max == dual[neighbor].x_min {
            // neighbor is right of v
            if dual[v].y_min <= dual[neighbor].y_min {
                rect(dual[neighbor].x_min, dual[neighbor].y_min, dual[neighbor].x_max, dual[neighbor].y_min)
            } else {
                rect(dual[neighbor].x_min, dual[neighbor].y_min, dual[neighbor].x_min, dual[v].y_min)
            }
        } else if dual[v].y_max == dual[neighbor].y_min {
            // neighbor is above v
            if dual[v].x_max >= dual[neighbor].x_max {
                rect(dual[neighbor].x_max, dual[neighbor].y_min, dual[neighbor].x_max, dual[neighbor].y_max)
            } else {
                rect(dual[v].x_max, dual[neighbor].y_min, dual[neighbor].x_max, dual[neighbor].y_min)
            }
        } else if dual[v].x_min == dual[neighbor].x_max {
            // neighbor is left of v
            if dual[v].y_max >= dual[neighbor].y_max {
                rect(dual[neighbor].x_min, dual[neighbor].y_max, dual[neighbor].x_max, dual[neighbor].y_max)
            } else {
                rect(dual[neighbor].x_max, dual[v].y_max, dual[neighbor].x_max, dual[neighbor].y_max)
            }
        } else {
            // neighbor is below v
            if dual[v].x_min <= dual[neighbor].x_min {
                rect(dual[neighbor].x_min, dual[neighbor].y_min, dual[neighbor].x_min, dual[neighbor].y_max)
            } else {
                rect(dual[neighbor].x_min, dual[neighbor].y_max, dual[v].x_min, dual[neighbor].y_max)
            }
        };
        dual.push(tile);

        let points_inward = v == comp.graph.edges[comp.graph.rotations[v][face]].head;
        if face == 0 {
            face = comp.graph.degree(v); // same slot, but appending is simpler
        }
        comp.graph.rotations[v].insert(face, virtual_edge);
        if points_inward {
            comp.graph.edges.push(Edge {
                tail: v,
                head: virtual_vertex,
                index_at_tail: face,
                index_at_head: 0,
            });
        } else {
            comp.graph.edges.push(Edge {
                tail: virtual_vertex,
                head: v,
                index_at_tail: 0,
                index_at_head: face,
            });
        }
        for i in face + 1..comp.graph.degree(v) {
            let e = comp.graph.rotations[v][i];
            let edge = &mut comp.graph.edges[e];
            if v == edge.tail {
                edge.index_at_tail += 1;
            } else {
                edge.index_at_head += 1;
            }
        }

        v += 1;
    }
}

#[inline]
fn rect(x_min: Coord, y_min: Coord, x_max: Coord, y_max: Coord) -> crate::graph::Rect {
    crate::graph::Rect { x_min, y_min, x_max, y_max }
}

/// Orient every edge of `graph` by one port bit (bit 0 for x, bit 1 for y).
fn construct_dag(graph: &Graph, pa: &[PortBits], y_coords: bool) -> Graph {
    let mask: PortBits = if y_coords { 0b10 } else { 0b01 };
    let mut out_dag = Graph::default();
    out_dag.rotations.resize(graph.num_vertices(), Vec::new());
    out_dag.edges.reserve(graph.num_edges());
    for (i, e) in graph.edges.iter().enumerate() {
        if pa[i] & mask != 0 {
            out_dag.edges.push(Edge::new(e.tail, e.head));
        } else {
            out_dag.edges.push(Edge::new(e.head, e.tail));
        }
        out_dag.rotations[e.tail].push(i);
        out_dag.rotations[e.head].push(i);
    }
    out_dag
}

/// Kahn's algorithm; ranks in pop order.
fn toposort(graph: &Graph) -> Result<Vec<Coord>> {
    let n = graph.num_vertices();
    let mut indeg = vec![0usize; n];
    let mut sources = Vec::new();
    for v in 0..n {
        for &e in &graph.rotations[v] {
            if v == graph.edges[e].head {
                indeg[v] += 1;
            }
        }
        if indeg[v] == 0 {
            sources.push(v);
        }
    }
    let mut out_order = vec![0 as Coord; n];
    let mut next_order: Coord = 0;
    while let Some(v) = sources.pop() {
        out_order[v] = next_order;
        next_order += 1;
        for &e in &graph.rotations[v] {
            let edge = graph.edges[e];
            // skip edges into already-ranked vertices
            if v == edge.tail && indeg[edge.head] != 0 {
                indeg[edge.head] -= 1;
                if indeg[edge.head] == 0 {
                    sources.push(edge.head);
                }
            }
        }
    }
    if next_order as usize != n {
        bail!("Cycle detected during topological sorting.");
    }
    Ok(out_order)
}

/// Run the per-component pipeline over the whole tree and assemble the
/// L-drawing of the original graph.
///
/// `duals_out`, when set, receives a TikZ picture of every component's
/// rectangular dual as it is produced.
pub fn construct_drawing(
    graph: &Graph,
    four_block_tree: &mut FourBlockTree,
    mut duals_out: Option<&mut dyn Write>,
    timer: &mut Timer,
) -> Result<LDrawing> {
    timer.start(Phase::PortAssignment);

    let mut pa = vec![0 as PortBits; graph.num_edges() + 1];

    port_assignment_of_outer_face(&four_block_tree[0], &mut pa);
    for component in four_block_tree.iter_mut() {
        let shape = add_x(component, &pa, graph.num_edges())?;

        timer.stop(Phase::PortAssignment);
        timer.start(Phase::RectDual);
        let mut rect_dual = compute_rect_dual(&component.graph)?;
        timer.stop(Phase::RectDual);
        timer.start(Phase::PortAssignment);

        fix_rectangular_dual(&component.graph, &mut rect_dual, shape);

        if let Some(out) = duals_out.as_mut() {
            timer.stop(Phase::PortAssignment);
            timer.start(Phase::Io);
            crate::io::write_tikz_dual(out, &component.graph, &rect_dual)?;
            timer.stop(Phase::Io);
            timer.start(Phase::PortAssignment);
        }

        add_virtual_edges(component, &mut rect_dual, graph.num_edges());
        port_assignment(component, &rect_dual, &mut pa);
    }

    debug_assert!(
        pa[..graph.num_edges()].iter().all(|&p| p & PORT_ASSIGNED != 0),
        "port assignment left an edge unassigned"
    );

    let x_dag = construct_dag(graph, &pa, false);
    let y_dag = construct_dag(graph, &pa, true);
    let x_coords = toposort(&x_dag)?;
    let y_coords = toposort(&y_dag)?;

    let out_drawing = (0..graph.num_vertices())
        .map(|v| Point { x: x_coords[v], y: y_coords[v] })
        .collect();

    timer.stop(Phase::PortAssignment);

    Ok(out_drawing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    /// A triangle with hand-made ports whose x orientations form a cycle.
    #[test]
    fn toposort_detects_cycle() {
        let mut graph = Graph {
            edges: vec![Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 0)],
            rotations: vec![vec![0, 2], vec![0, 1], vec![1, 2]],
            outer_face: smallvec![0, 1, 2],
            labels: vec!["a".into(), "b".into(), "c".into()],
        };
        graph.update_neighbor_index();
        // Bit 0 set everywhere: every edge keeps its tail→head direction,
        // and 0→1→2→0 is a cycle.
        let pa: Vec<PortBits> = vec![0b101, 0b101, 0b101];
        let x_dag = construct_dag(&graph, &pa, false);
        let err = toposort(&x_dag).unwrap_err();
        assert_eq!(err.to_string(), "Cycle detected during topological sorting.");
        // Flipping the last edge breaks the cycle.
        let pa: Vec<PortBits> = vec![0b101, 0b101, 0b100];
        let x_dag = construct_dag(&graph, &pa, false);
        assert!(toposort(&x_dag).is_ok());
    }

    #[test]
    fn toposort_ranks_are_a_permutation() {
        let mut graph = Graph {
            edges: vec![Edge::new(0, 1), Edge::new(0, 2), Edge::new(1, 2)],
            rotations: vec![vec![0, 1], vec![0, 2], vec![1, 2]],
            outer_face: smallvec![0, 1, 2],
            labels: vec!["a".into(), "b".into(), "c".into()],
        };
        graph.update_neighbor_index();
        let order = toposort(&graph).unwrap();
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
        // ranks respect every edge
        for e in &graph.edges {
            assert!(order[e.tail] < order[e.head]);
        }
    }
}
