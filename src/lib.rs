#![doc = "Rectangular duals and L-drawings of embedded planar graphs"]

//! Pipeline: parse an embedding ([`io::read_graph`]), split it along its
//! separating triangles ([`decompose::build_four_block_tree`]), then realize
//! each 4-connected component geometrically and assemble the final drawing
//! ([`draw::construct_drawing`]).  [`rect_dual::compute_rect_dual`] is also
//! usable on its own for inputs that already have a 4-corner outer face.

pub mod decompose;
pub mod draw;
pub mod graph;
pub mod io;
pub mod planar;
pub mod rect_dual;
pub mod sample;
pub mod timer;

mod ports;

#[doc(inline)]
pub use decompose::build_four_block_tree;

#[doc(inline)]
pub use draw::construct_drawing;

#[doc(inline)]
pub use graph::{FourBlockComponent, FourBlockTree, Graph, LDrawing, Point, Rect, RectangularDual};

#[doc(inline)]
pub use rect_dual::{compute_ordering31, compute_rect_dual};

#[doc(inline)]
pub use sample::{SampledTriangulation, sample_triangulation};

#[doc(inline)]
pub use timer::{Phase, Timer};
