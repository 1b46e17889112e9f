//! Port assignment: decide, for every edge of a 4-connected component, which
//! side of the tail tile its horizontal leg leaves through and which side of
//! the head tile its vertical leg enters through.
//!
//! Each vertex's incident edges fall into four contiguous rotation arcs, one
//! per side of its tile in the component's rectangular dual.  Every side is
//! classified by the orientation pattern of its arc (a bit string with a
//! sentinel high bit): mono-directed sides take the side's canonical port,
//! 3-directed sides flip one third of the arc, and bi-directed sides place a
//! single switch whose direction may depend on the neighboring sides — or,
//! in the "extra rule", on a master vertex whose choice binds two slave
//! neighbors through a postponement worklist.

use crate::graph::{Edge, FourBlockComponent, PORT_ASSIGNED, PortBits, Rect, Vertex};

pub const RIGHT: usize = 0;
pub const TOP: usize = 1;
pub const LEFT: usize = 2;
pub const BOTTOM: usize = 3;

/// Canonical port per side, indexed by direction.
const CANONICAL: [PortBits; 4] = [0b00, 0b10, 0b11, 0b01];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Switch {
    Any,
    Clockwise,
    CounterClockwise,
}

/// Which side of `vertex`'s tile faces `other`, plus the edge's orientation
/// seen from `vertex`.  Wall coincidence picks the axis; the strict
/// inequality on the far corner disambiguates tiles that only touch
/// diagonally.
pub(crate) fn edge_info(dual: &[Rect], edge: &Edge, vertex: Vertex) -> (Vertex, bool, usize) {
    let outgoing = edge.tail == vertex;
    let other = if outgoing { edge.head } else { edge.tail };
    let direction = if dual[vertex].x_max == dual[other].x_min && dual[vertex].x_max < dual[other].x_max
    {
        RIGHT
    } else if dual[vertex].y_max == dual[other].y_min && dual[vertex].y_max < dual[other].y_max {
        TOP
    } else if dual[vertex].x_min == dual[other].x_max && dual[vertex].x_min > dual[other].x_min {
        LEFT
    } else {
        BOTTOM
    };
    (other, outgoing, direction)
}

#[inline]
fn wrap(base: usize, offset: isize, modulus: usize) -> usize {
    (base as isize + offset).rem_euclid(modulus as isize) as usize
}

/// Degenerate tiles of two outside leaf vertices lie on one line, either
/// both collapsed in x at the same x, or both collapsed in y at the same y.
fn collinear(a: &Rect, b: &Rect) -> bool {
    (a.x_min == a.x_max && a.x_max == b.x_min && b.x_min == b.x_max)
        || (a.y_min == a.y_max && a.y_max == b.y_min && b.y_min == b.y_max)
}

/// Fill port bits for every edge of `comp` not yet marked assigned, then
/// stamp the assigned bit on all of the component's original edges.
pub(crate) fn port_assignment(comp: &FourBlockComponent, dual: &[Rect], out_pa: &mut [PortBits]) {
    let graph = &comp.graph;
    let mut postponed: Vec<(Vertex, Switch)> = Vec::new();
    let mut tentative_v = 0;
    while tentative_v < graph.num_vertices() {
        let (v, switch_direction) = match postponed.pop() {
            Some(entry) => entry,
            None => (tentative_v, Switch::Any),
        };

        assign_vertex(comp, dual, out_pa, &mut postponed, v, switch_direction);

        if postponed.is_empty() {
            tentative_v += 1;
        }
    }

    for e in 0..graph.num_edges() {
        out_pa[comp.original_edge[e]] |= PORT_ASSIGNED;
    }
}

/// Classify the four sides of `v` and assign ports for each; a mono-directed
/// side caught by the extra rule with an undetermined switch leaves `v` for
/// its master to re-enqueue.
fn assign_vertex(
    comp: &FourBlockComponent,
    dual: &[Rect],
    out_pa: &mut [PortBits],
    postponed: &mut Vec<(Vertex, Switch)>,
    v: Vertex,
    switch_direction: Switch,
) {
    let graph = &comp.graph;
    let num_neighbors = graph.degree(v);
    let mut orientations = vec![false; num_neighbors];

    // Find the contiguous rotation arc passing through each side, and the
    // arc's first edge in clockwise order: bottom-most on the right,
    // right-most on top, top-most on the left, left-most on the bottom.
    let mut first_edge = [num_neighbors; 4];
    let mut num_edges_in_direction = [0usize; 4];
    let mut first_right_y_min = 0;
    let mut first_top_x_max = 0;
    let mut first_left_y_max = 0;
    let mut first_bottom_x_min = 0;
    for edge_ix in 0..num_neighbors {
        let (other, outgoing, direction) =
            edge_info(dual, &graph.edges[graph.rotations[v][edge_ix]], v);
        orientations[edge_ix] = outgoing;
        num_edges_in_direction[direction] += 1;
        match direction {
            RIGHT => {
                if first_edge[RIGHT] != num_neighbors && first_right_y_min < dual[other].y_max {
                    continue;
                }
                first_edge[RIGHT] = edge_ix;
                first_right_y_min = dual[other].y_min;
            }
            TOP => {
                if first_edge[TOP] != num_neighbors && first_top_x_max > dual[other].x_min {
                    continue;
                }
                first_edge[TOP] = edge_ix;
                first_top_x_max = dual[other].x_max;
            }
            LEFT => {
                if first_edge[LEFT] != num_neighbors && first_left_y_max > dual[other].y_min {
                    continue;
                }
                first_edge[LEFT] = edge_ix;
                first_left_y_max = dual[other].y_max;
            }
            _ => {
                if first_edge[BOTTOM] != num_neighbors && first_bottom_x_min < dual[other].x_max {
                    continue;
                }
                first_edge[BOTTOM] = edge_ix;
                first_bottom_x_min = dual[other].x_min;
            }
        }
    }

    // Orientation pattern per side: starting from the sentinel bit 1, shift
    // in a bit whenever the arc's orientation flips; counter-clockwise order
    // runs from more to less significant.
    let mut directions = [0b1u8; 4];
    for current in [RIGHT, TOP, LEFT, BOTTOM] {
        for i in 0..num_edges_in_direction[current] {
            let edge_ix = (first_edge[current] + i) % num_neighbors;
            if directions[current] == 0b1
                || (directions[current] & 0b1 != 0) != orientations[edge_ix]
            {
                directions[current] <<= 1;
                if orientations[edge_ix] {
                    directions[current] |= 0b1;
                }
            }
        }
    }

    // Canonical ports for mono-directed sides; bail out to the worklist if
    // the extra rule applies and the switch direction is still unknown.
    for current in [RIGHT, TOP, LEFT, BOTTOM] {
        if !assign_mono_directed_side(
            comp,
            dual,
            out_pa,
            v,
            &orientations,
            &first_edge,
            &num_edges_in_direction,
            &directions,
            switch_direction,
            current,
        ) {
            return;
        }
    }

    for (current, pattern) in [(RIGHT, 0b1010), (TOP, 0b1101), (LEFT, 0b1010), (BOTTOM, 0b1101)] {
        assign_3_directed_side(
            comp,
            out_pa,
            v,
            &orientations,
            &first_edge,
            &num_edges_in_direction,
            &directions,
            current,
            pattern,
        );
    }

    // Bi-directed sides whose switch already matches the canonical port.
    for (current, pattern) in [(RIGHT, 0b110), (TOP, 0b101), (LEFT, 0b110), (BOTTOM, 0b101)] {
        if directions[current] == pattern {
            for i in 0..num_edges_in_direction[current] {
                let edge_ix = (first_edge[current] + i) % num_neighbors;
                write_port(comp, out_pa, v, edge_ix, CANONICAL[current], orientations[edge_ix]);
            }
        }
    }

    for (current, pattern) in [(RIGHT, 0b101), (TOP, 0b110), (LEFT, 0b101), (BOTTOM, 0b110)] {
        assign_unpleasant_side(
            comp,
            dual,
            out_pa,
            postponed,
            v,
            &orientations,
            &first_edge,
            &num_edges_in_direction,
            &directions,
            switch_direction,
            current,
            pattern,
        );
    }
}

/// OR the masked port bits onto the edge's slot unless already assigned.
#[inline]
fn write_port(
    comp: &FourBlockComponent,
    out_pa: &mut [PortBits],
    v: Vertex,
    edge_ix: usize,
    ports: PortBits,
    outgoing: bool,
) {
    let original = comp.original_edge[comp.graph.rotations[v][edge_ix]];
    if out_pa[original] & PORT_ASSIGNED == 0 {
        out_pa[original] |= ports & if outgoing { 0b10 } else { 0b01 };
    }
}

/// Returns false if `v` must be postponed (extra rule with unknown switch).
#[allow(clippy::too_many_arguments)]
fn assign_mono_directed_side(
    comp: &FourBlockComponent,
    dual: &[Rect],
    out_pa: &mut [PortBits],
    v: Vertex,
    orientations: &[bool],
    first_edge: &[usize; 4],
    num_edges_in_direction: &[usize; 4],
    directions: &[u8; 4],
    switch_direction: Switch,
    current: usize,
) -> bool {
    if directions[current] & 0b1100 != 0 {
        return true;
    }
    let graph = &comp.graph;
    let num_neighbors = graph.degree(v);

    // `v` is a slave of the extra rule at this side iff the arc endpoint
    // next to `index_of_master` is a degree-1 leaf whose tile is collinear
    // with the matching leaf across the adjacent neighbor.
    let check_for_extra_rule = |index_of_master: usize, dir: isize| -> bool {
        if (current % 2 == 0) ^ (dir > 0) ^ orientations[index_of_master] {
            // switch at master is canonical
            return false;
        }
        let virtual_vertex = graph.neighbor(v, wrap(index_of_master, dir, num_neighbors));
        if graph.degree(virtual_vertex) != 1 {
            return false;
        }
        let edge_to_neighbor =
            &graph.edges[graph.rotations[v][wrap(index_of_master, 2 * dir, num_neighbors)]];
        let (neighbor, index_at_neighbor) = if v == edge_to_neighbor.tail {
            (edge_to_neighbor.head, edge_to_neighbor.index_at_head)
        } else {
            (edge_to_neighbor.tail, edge_to_neighbor.index_at_tail)
        };
        let virtual_vertex_of_neighbor =
            graph.neighbor(neighbor, wrap(index_at_neighbor, -dir, graph.degree(neighbor)));
        graph.degree(virtual_vertex_of_neighbor) == 1
            && collinear(&dual[virtual_vertex], &dual[virtual_vertex_of_neighbor])
    };

    let mut mono_directed_switch: PortBits = 0b00;
    let last_in_arc =
        (num_neighbors + first_edge[current] + num_edges_in_direction[current] - 1) % num_neighbors;
    if check_for_extra_rule(last_in_arc, 1)
        || check_for_extra_rule(first_edge[current] % num_neighbors, -1)
    {
        if switch_direction == Switch::Any {
            return false;
        }
        if (current % 2 == 0)
            ^ (directions[current] & 0b1 != 0)
            ^ (switch_direction == Switch::CounterClockwise)
        {
            mono_directed_switch = 0b11;
        }
    }

    for i in 0..num_edges_in_direction[current] {
        let edge_ix = (first_edge[current] + i) % num_neighbors;
        write_port(
            comp,
            out_pa,
            v,
            edge_ix,
            CANONICAL[current] ^ mono_directed_switch,
            orientations[edge_ix],
        );
    }
    true
}

#[allow(clippy::too_many_arguments)]
fn assign_3_directed_side(
    comp: &FourBlockComponent,
    out_pa: &mut [PortBits],
    v: Vertex,
    orientations: &[bool],
    first_edge: &[usize; 4],
    num_edges_in_direction: &[usize; 4],
    directions: &[u8; 4],
    current: usize,
    pattern: u8,
) {
    let num_neighbors = comp.graph.degree(v);
    if directions[current] == pattern {
        // clockwise switch: the first third flips, the rest is canonical
        let mut first_third: PortBits = 0b11;
        for i in 0..num_edges_in_direction[current] {
            let edge_ix = (first_edge[current] + i) % num_neighbors;
            if orientations[edge_ix] == (pattern & 0b010 != 0) {
                first_third = 0b00;
            }
            write_port(
                comp,
                out_pa,
                v,
                edge_ix,
                CANONICAL[current] ^ first_third,
                orientations[edge_ix],
            );
        }
    } else if directions[current] == pattern ^ 0b0111 {
        // counter-clockwise switch: regions 0b000, then 0b100, then 0b011
        let mut last_third: PortBits = 0b000;
        for i in 0..num_edges_in_direction[current] {
            let edge_ix = (first_edge[current] + i) % num_neighbors;
            if orientations[edge_ix] == ((pattern ^ 0b0111) & 0b010 != 0) {
                last_third = 0b100;
            } else if last_third != 0 {
                last_third = 0b011;
            }
            write_port(
                comp,
                out_pa,
                v,
                edge_ix,
                CANONICAL[current] ^ last_third,
                orientations[edge_ix],
            );
        }
    }
}

/// Bi-directed side whose single switch runs against the canonical port.
/// The switch direction comes from the worklist entry, from an adjacent
/// side's pattern, or (extra rule) is chosen here with `v` as master,
/// binding the two slave neighbors pushed onto the worklist.
#[allow(clippy::too_many_arguments)]
fn assign_unpleasant_side(
    comp: &FourBlockComponent,
    dual: &[Rect],
    out_pa: &mut [PortBits],
    postponed: &mut Vec<(Vertex, Switch)>,
    v: Vertex,
    orientations: &[bool],
    first_edge: &[usize; 4],
    num_edges_in_direction: &[usize; 4],
    directions: &[u8; 4],
    switch_direction: Switch,
    current: usize,
    pattern: u8,
) {
    if directions[current] != pattern {
        return;
    }
    let graph = &comp.graph;
    let num_neighbors = graph.degree(v);
    let next = (current + 1) % 4;
    let prev = (current + 3) % 4;

    let counter_clockwise = match switch_direction {
        Switch::Clockwise => false,
        Switch::CounterClockwise => true,
        Switch::Any => {
            // Locate the switch: the last edge of the first run and the
            // first edge of the second.
            let mut ix_edge_to_left_neighbor = first_edge[current];
            let mut ix_edge_to_right_neighbor = ix_edge_to_left_neighbor;
            for i in 1..num_edges_in_direction[current] {
                ix_edge_to_right_neighbor = (first_edge[current] + i) % num_neighbors;
                if orientations[ix_edge_to_right_neighbor] == (directions[current] & 0b001 != 0) {
                    break;
                }
                ix_edge_to_left_neighbor = ix_edge_to_right_neighbor;
            }
            let edge_to_left = &graph.edges[graph.rotations[v][ix_edge_to_left_neighbor]];
            let edge_to_right = &graph.edges[graph.rotations[v][ix_edge_to_right_neighbor]];
            let (left_neighbor, index_at_left, right_neighbor, index_at_right) =
                if directions[current] & 0b001 != 0 {
                    // edge to the left neighbor is incoming, to the right outgoing
                    (
                        edge_to_left.tail,
                        edge_to_left.index_at_tail,
                        edge_to_right.head,
                        edge_to_right.index_at_head,
                    )
                } else {
                    (
                        edge_to_left.head,
                        edge_to_left.index_at_head,
                        edge_to_right.tail,
                        edge_to_right.index_at_tail,
                    )
                };
            let virtual_vertex_of_left =
                graph.neighbor(left_neighbor, (index_at_left + 1) % graph.degree(left_neighbor));
            let virtual_vertex_of_right = graph.neighbor(
                right_neighbor,
                wrap(index_at_right, -1, graph.degree(right_neighbor)),
            );
            let v_is_master_in_extra_rule = graph.degree(virtual_vertex_of_left) == 1
                && graph.degree(virtual_vertex_of_right) == 1
                && collinear(&dual[virtual_vertex_of_left], &dual[virtual_vertex_of_right]);
            if v_is_master_in_extra_rule {
                postponed.push((left_neighbor, Switch::Any));
                postponed.push((right_neighbor, Switch::Any));
            }

            // An adjacent unpleasant switch, or an adjacent mono-directed
            // side that needs no switch, forces counter-clockwise.
            let ccw = directions[next] == pattern ^ 0b011
                || directions[prev] == pattern ^ 0b011
                || directions[next] == 0b010 | (pattern & 0b001);
            if v_is_master_in_extra_rule {
                let chosen = if ccw { Switch::CounterClockwise } else { Switch::Clockwise };
                postponed[0].1 = chosen;
                postponed[1].1 = chosen;
            }
            ccw
        }
    };

    if counter_clockwise {
        let mut last_half: PortBits = 0b00;
        for i in 0..num_edges_in_direction[current] {
            let edge_ix = (first_edge[current] + i) % num_neighbors;
            if orientations[edge_ix] == (directions[current] & 0b001 != 0) {
                last_half = 0b11;
            }
            write_port(
                comp,
                out_pa,
                v,
                edge_ix,
                CANONICAL[current] ^ last_half,
                orientations[edge_ix],
            );
        }
    } else {
        let mut first_half: PortBits = 0b11;
        for i in 0..num_edges_in_direction[current] {
            let edge_ix = (first_edge[current] + i) % num_neighbors;
            if orientations[edge_ix] == (directions[current] & 0b001 != 0) {
                first_half = 0b00;
            }
            write_port(
                comp,
                out_pa,
                v,
                edge_ix,
                CANONICAL[current] ^ first_half,
                orientations[edge_ix],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use smallvec::smallvec;

    /// Four tiles in a 2×2 grid: every vertex has one edge per occupied
    /// side, so every side is mono-directed and no extra rule can fire.
    fn quad_component() -> (FourBlockComponent, Vec<Rect>) {
        let rect = |x_min, y_min, x_max, y_max| Rect { x_min, y_min, x_max, y_max };
        // 0 = NW, 1 = NE, 2 = SW, 3 = SE
        let dual = vec![rect(0, 1, 1, 2), rect(1, 1, 2, 2), rect(0, 0, 1, 1), rect(1, 0, 2, 1)];
        let mut graph = Graph {
            edges: vec![Edge::new(0, 1), Edge::new(2, 0), Edge::new(3, 1), Edge::new(2, 3)],
            rotations: vec![vec![0, 1], vec![0, 2], vec![1, 3], vec![2, 3]],
            outer_face: smallvec![0, 1, 3, 2],
            labels: ["nw", "ne", "sw", "se"].map(String::from).to_vec(),
        };
        graph.update_neighbor_index();
        let comp = FourBlockComponent {
            graph,
            original_edge: vec![0, 1, 2, 3],
            designated_face: vec![0; 4],
        };
        (comp, dual)
    }

    #[test]
    fn edge_info_reads_directions_off_the_dual() {
        let (comp, dual) = quad_component();
        // NW → NE: outgoing to the right...
        let (other, outgoing, direction) = edge_info(&dual, &comp.graph.edges[0], 0);
        assert_eq!((other, outgoing, direction), (1, true, RIGHT));
        // ...and from NE's side the same edge comes in from the left.
        let (other, outgoing, direction) = edge_info(&dual, &comp.graph.edges[0], 1);
        assert_eq!((other, outgoing, direction), (0, false, LEFT));
        let (_, _, direction) = edge_info(&dual, &comp.graph.edges[1], 2);
        assert_eq!(direction, TOP);
        let (_, _, direction) = edge_info(&dual, &comp.graph.edges[1], 0);
        assert_eq!(direction, BOTTOM);
    }

    #[test]
    fn mono_directed_sides_get_canonical_ports() {
        let (comp, dual) = quad_component();
        let mut pa = vec![0 as PortBits; 4];
        port_assignment(&comp, &dual, &mut pa);

        // Tail side writes bit 1 from its canonical port, head side bit 0.
        assert_eq!(pa[0], 0b101); // NW→NE: east out of NW, west into NE
        assert_eq!(pa[1], 0b111); // SW→NW: north out of SW, south into NW
        assert_eq!(pa[2], 0b111); // SE→NE
        assert_eq!(pa[3], 0b101); // SW→SE
    }
}
