//! Crossing check for L-drawings.
//!
//! Each edge contributes the horizontal segment at its head's y and the
//! vertical segment at its tail's x.  A drawing is accepted iff no
//! horizontal segment strictly crosses a vertical one; touching endpoints
//! are fine (that is how the L-shapes connect).

use crate::graph::{Coord, Graph, LDrawing};

struct HorizontalSegment {
    y: Coord,
    from: Coord,
    to: Coord,
}

struct VerticalSegment {
    x: Coord,
    from: Coord,
    to: Coord,
}

/// True iff no horizontal segment of `drawing` strictly crosses a vertical
/// segment.
pub fn crossing_free(graph: &Graph, drawing: &LDrawing) -> bool {
    let mut horizontal = Vec::with_capacity(graph.num_edges());
    let mut vertical = Vec::with_capacity(graph.num_edges());
    for e in &graph.edges {
        let tail = drawing[e.tail];
        let head = drawing[e.head];
        horizontal.push(HorizontalSegment {
            y: head.y,
            from: tail.x.min(head.x),
            to: tail.x.max(head.x),
        });
        vertical.push(VerticalSegment {
            x: tail.x,
            from: tail.y.min(head.y),
            to: tail.y.max(head.y),
        });
    }
    for h in &horizontal {
        for v in &vertical {
            if h.from < v.x && v.x < h.to && v.from < h.y && h.y < v.to {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Point};
    use smallvec::smallvec;

    fn two_edge_graph() -> Graph {
        let mut graph = Graph {
            edges: vec![Edge::new(0, 1), Edge::new(2, 3)],
            rotations: vec![vec![0], vec![0], vec![1], vec![1]],
            outer_face: smallvec![0, 1, 2],
            labels: ["a", "b", "c", "d"].map(String::from).to_vec(),
        };
        graph.update_neighbor_index();
        graph
    }

    #[test]
    fn strict_crossing_is_rejected() {
        let graph = two_edge_graph();
        // Edge 0: horizontal at y=1 from x=0 to x=2; edge 1: vertical at
        // x=1 from y=0 to y=2.  They cross at (1,1).
        let drawing = vec![
            Point { x: 0, y: 1 },
            Point { x: 2, y: 1 },
            Point { x: 1, y: 0 },
            Point { x: 1, y: 2 },
        ];
        assert!(!crossing_free(&graph, &drawing));
    }

    #[test]
    fn touching_endpoints_are_accepted() {
        let graph = two_edge_graph();
        // The vertical segment starts exactly on the horizontal one.
        let drawing = vec![
            Point { x: 0, y: 1 },
            Point { x: 2, y: 1 },
            Point { x: 2, y: 1 },
            Point { x: 2, y: 3 },
        ];
        assert!(crossing_free(&graph, &drawing));
    }
}
