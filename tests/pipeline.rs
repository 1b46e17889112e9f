use orthodraw::io::read_graph;
use orthodraw::planar::crossing_free;
use orthodraw::{Graph, Timer, build_four_block_tree, construct_drawing, sample_triangulation};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// K4 with outer face (1, 2, 3) and the fourth vertex inside.
const K4: &str = "\
4 6 3
1 2 3
a
b
c
d
1 2
2 3
3 1
1 4
2 4
3 4
1 4 3
1 2 5
2 3 6
4 5 6
";

/// K4 with one bounded face subdivided by a fifth vertex joined to all
/// three face corners, making that face a separating triangle.
const K4_SUBDIVIDED: &str = "\
5 9 3
1 2 3
a
b
c
d
e
1 2
2 3
3 1
1 4
2 4
3 4
2 5
4 5
3 5
1 4 3
1 2 7 5
2 3 6 9
4 5 8 6
8 7 9
";

/// The octahedron: 6 vertices, 12 edges, every face a triangle, and no
/// separating triangle at all.
const OCTAHEDRON: &str = "\
6 12 3
1 2 3
a
b
c
d
e
f
1 2
2 3
3 1
1 4
1 5
2 5
2 6
3 6
3 4
4 5
5 6
4 6
1 5 4 3
1 2 7 6
2 3 9 8
4 10 12 9
5 6 11 10
7 8 12 11
";

fn parse(text: &str) -> Graph {
    read_graph(&mut text.as_bytes()).unwrap()
}

fn assert_rotation_coherence(graph: &Graph) {
    for (e, edge) in graph.edges.iter().enumerate() {
        assert_eq!(graph.rotations[edge.tail][edge.index_at_tail], e, "edge {e} at tail");
        assert_eq!(graph.rotations[edge.head][edge.index_at_head], e, "edge {e} at head");
    }
}

/// Both coordinates of an n-vertex drawing are permutations of 0..n.
fn assert_grid(drawing: &[orthodraw::Point]) {
    let n = drawing.len();
    let mut xs: Vec<u32> = drawing.iter().map(|p| p.x).collect();
    let mut ys: Vec<u32> = drawing.iter().map(|p| p.y).collect();
    xs.sort_unstable();
    ys.sort_unstable();
    let expected: Vec<u32> = (0..n as u32).collect();
    assert_eq!(xs, expected, "x coordinates are not a permutation");
    assert_eq!(ys, expected, "y coordinates are not a permutation");
}

#[test]
fn k4_has_no_separating_triangles() {
    let graph = parse(K4);
    let tree = build_four_block_tree(&graph);
    assert_eq!(tree.len(), 1);
    let root = &tree[0];
    assert_eq!(root.graph.num_vertices(), 4);
    assert_eq!(root.graph.num_edges(), 6);
    assert_eq!(root.graph.outer_face.len(), 3);
    assert!(root.designated_face.iter().all(|&d| d == 0));
    assert_rotation_coherence(&root.graph);
}

#[test]
fn k4_draws_on_a_four_by_four_grid() {
    let graph = parse(K4);
    let mut tree = build_four_block_tree(&graph);
    let drawing = construct_drawing(&graph, &mut tree, None, &mut Timer::new()).unwrap();
    assert_eq!(drawing.len(), 4);
    assert_grid(&drawing);
    assert!(crossing_free(&graph, &drawing));
}

#[test]
fn subdivided_face_splits_into_two_components() {
    let graph = parse(K4_SUBDIVIDED);
    let tree = build_four_block_tree(&graph);
    assert_eq!(tree.len(), 2);

    // The root holds the original outer face; its vertices are the K4.
    assert_eq!(tree[0].graph.num_vertices(), 4);
    assert_eq!(tree[0].graph.num_edges(), 6);
    // The child is the subdivided triangle with its interior vertex.
    assert_eq!(tree[1].graph.num_vertices(), 4);
    assert_eq!(tree[1].graph.num_edges(), 6);

    for comp in &tree {
        assert_rotation_coherence(&comp.graph);
        assert_eq!(comp.graph.outer_face.len(), 3);
    }

    // Each split duplicates its triangle's three edges, so the per-component
    // edge counts satisfy sum(E_c - 3) = E - 3.
    let total: usize = tree.iter().map(|c| c.graph.num_edges() - 3).sum();
    assert_eq!(total, graph.num_edges() - 3);

    // Every original edge is represented; the separating triangle's edges
    // appear twice (once per side), all others once.
    let mut counts = vec![0usize; graph.num_edges()];
    for comp in &tree {
        for &original in &comp.original_edge {
            counts[original] += 1;
        }
    }
    let mut histogram = counts.clone();
    histogram.sort_unstable();
    assert_eq!(histogram, vec![1, 1, 1, 1, 1, 1, 2, 2, 2]);
    // The doubled edges are exactly the separating triangle (2, 4), (4, 3),
    // (3, 2), i.e. edge ids 4, 5, 1 in zero-based input order.
    assert_eq!(counts[1], 2);
    assert_eq!(counts[4], 2);
    assert_eq!(counts[5], 2);
}

#[test]
fn subdivided_face_draws_without_crossings() {
    let graph = parse(K4_SUBDIVIDED);
    let mut tree = build_four_block_tree(&graph);
    let drawing = construct_drawing(&graph, &mut tree, None, &mut Timer::new()).unwrap();
    assert_eq!(drawing.len(), 5);
    assert_grid(&drawing);
    assert!(crossing_free(&graph, &drawing));
}

#[test]
fn octahedron_is_four_connected() {
    let graph = parse(OCTAHEDRON);
    let tree = build_four_block_tree(&graph);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].graph.num_vertices(), 6);
    assert_eq!(tree[0].graph.num_edges(), 12);
    assert_rotation_coherence(&tree[0].graph);
}

#[test]
fn octahedron_draws_without_crossings() {
    let graph = parse(OCTAHEDRON);
    let mut tree = build_four_block_tree(&graph);
    let drawing = construct_drawing(&graph, &mut tree, None, &mut Timer::new()).unwrap();
    assert_eq!(drawing.len(), 6);
    assert_grid(&drawing);
    assert!(crossing_free(&graph, &drawing));
}

#[test]
fn print_duals_emits_one_picture_per_component() {
    let graph = parse(K4_SUBDIVIDED);
    let mut tree = build_four_block_tree(&graph);
    let mut duals = Vec::new();
    let drawing = construct_drawing(
        &graph,
        &mut tree,
        Some(&mut duals as &mut dyn std::io::Write),
        &mut Timer::new(),
    )
    .unwrap();
    assert!(crossing_free(&graph, &drawing));
    let tikz = String::from_utf8(duals).unwrap();
    assert_eq!(tikz.matches("\\begin{tikzpicture}").count(), 2);
    assert!(tikz.contains("rectangle node"));
}

/// Sampler output feeds straight back through the whole pipeline.
#[test]
fn sampled_triangulations_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x0d_d0);
    for n in 2..24 {
        let sampled = sample_triangulation(n, false, &mut rng);
        let mut text = Vec::new();
        sampled.write(&mut text).unwrap();
        let graph = read_graph(&mut text.as_slice()).unwrap();
        assert_rotation_coherence(&graph);

        let mut tree = build_four_block_tree(&graph);
        let drawing = construct_drawing(&graph, &mut tree, None, &mut Timer::new())
            .unwrap_or_else(|e| panic!("pipeline failed for n = {n}: {e}"));
        assert_grid(&drawing);
        assert!(crossing_free(&graph, &drawing), "crossing in drawing for n = {n}");
    }
}
