//! Plain-text readers and writers for graphs and drawings.
//!
//! The graph format is line-oriented with 1-based ids on the wire:
//! a `num_vertices num_edges outer_face_degree` header, the outer face,
//! one label per vertex, one `tail head` pair per edge, and one clockwise
//! rotation (edge ids) per vertex.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use smallvec::SmallVec;

use crate::graph::{Edge, Graph, LDrawing, Point, RectangularDual};

/// Parse a graph from `reader`.  Any malformed line fails with the line
/// number of the offense.
pub fn read_graph(reader: &mut impl BufRead) -> Result<Graph> {
    let mut out_graph = Graph::default();
    let mut line_num = 0usize;
    let mut line = String::new();
    let mut next_line = |line: &mut String, line_num: &mut usize| -> Result<()> {
        line.clear();
        *line_num += 1;
        if reader.read_line(line).unwrap_or(0) == 0 {
            bail!("Error reading input on line {line_num}");
        }
        Ok(())
    };

    next_line(&mut line, &mut line_num)?;
    let header: Vec<usize> = line.split_whitespace().map_while(|t| t.parse().ok()).collect();
    if header.len() < 3 {
        bail!("Error reading input on line {line_num}");
    }
    let (num_vertices, num_edges, outer_face_degree) = (header[0], header[1], header[2]);
    out_graph.rotations.resize(num_vertices, Vec::new());
    out_graph.edges.reserve(num_edges);
    out_graph.labels.reserve(num_vertices);

    next_line(&mut line, &mut line_num)?;
    out_graph.outer_face = line
        .split_whitespace()
        .map(|t| t.parse::<usize>().map(|v| v - 1))
        .collect::<Result<SmallVec<[usize; 4]>, _>>()
        .with_context(|| format!("Error reading input on line {line_num}"))?;
    if out_graph.outer_face.len() != outer_face_degree {
        bail!("Error reading input on line {line_num}");
    }

    for _ in 0..num_vertices {
        next_line(&mut line, &mut line_num)?;
        out_graph.labels.push(line.trim_end_matches(['\r', '\n']).to_string());
    }

    for _ in 0..num_edges {
        next_line(&mut line, &mut line_num)?;
        let mut tokens = line.split_whitespace().map_while(|t| t.parse::<usize>().ok());
        let (Some(tail), Some(head)) = (tokens.next(), tokens.next()) else {
            bail!("Error reading input on line {line_num}");
        };
        out_graph.edges.push(Edge::new(tail - 1, head - 1));
    }

    for v in 0..num_vertices {
        next_line(&mut line, &mut line_num)?;
        for token in line.split_whitespace() {
            let e: usize = token
                .parse()
                .with_context(|| format!("Error reading input on line {line_num}"))?;
            out_graph.rotations[v].push(e - 1);
        }
    }

    out_graph.update_neighbor_index();

    Ok(out_graph)
}

/// Parse an L-drawing: `x y` pairs until end of input.
pub fn read_drawing(reader: &mut impl BufRead) -> Result<LDrawing> {
    let mut drawing = LDrawing::new();
    for line in reader.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace().map_while(|t| t.parse().ok());
        if let (Some(x), Some(y)) = (tokens.next(), tokens.next()) {
            drawing.push(Point { x, y });
        }
    }
    Ok(drawing)
}

pub fn write_raw_drawing(writer: &mut impl Write, drawing: &LDrawing) -> Result<()> {
    for v in drawing {
        writeln!(writer, "{} {}", v.x, v.y)?;
    }
    Ok(())
}

pub fn write_raw_dual(writer: &mut impl Write, dual: &RectangularDual) -> Result<()> {
    for v in dual {
        writeln!(writer, "{} {} {} {}", v.x_min, v.y_min, v.x_max, v.y_max)?;
    }
    Ok(())
}

pub fn write_latex_header(writer: &mut impl Write) -> Result<()> {
    writeln!(writer, "\\documentclass{{article}}")?;
    writeln!(writer, "\\usepackage{{tikz}}")?;
    writeln!(writer, "\\begin{{document}}")?;
    Ok(())
}

/// One TikZ picture per drawing: vertex nodes at their grid points and an
/// L-shaped `|-` path per edge.
pub fn write_tikz_drawing(writer: &mut impl Write, graph: &Graph, drawing: &LDrawing) -> Result<()> {
    writeln!(writer, "\\resizebox{{\\textwidth}}{{!}}{{\\begin{{tikzpicture}}")?;
    for v in 0..graph.num_vertices() {
        writeln!(
            writer,
            "\\node ({}) at ({},{}) {{{}}};",
            v + 1,
            drawing[v].x,
            drawing[v].y,
            graph.labels[v]
        )?;
    }
    for e in &graph.edges {
        writeln!(writer, "\\draw[rounded corners] ({}) |- ({});", e.tail + 1, e.head + 1)?;
    }
    writeln!(writer, "\\end{{tikzpicture}}}}")?;
    Ok(())
}

pub fn write_tikz_dual(writer: &mut impl Write, graph: &Graph, dual: &RectangularDual) -> Result<()> {
    writeln!(writer, "\\resizebox{{\\textwidth}}{{!}}{{\\begin{{tikzpicture}}")?;
    for (v, rect) in dual.iter().enumerate() {
        writeln!(
            writer,
            "\\draw[rounded corners] ({},{}) rectangle node {{{}}} ({},{});",
            rect.x_min, rect.y_min, graph.labels[v], rect.x_max, rect.y_max
        )?;
    }
    writeln!(writer, "\\end{{tikzpicture}}}}")?;
    Ok(())
}

pub fn write_latex_footer(writer: &mut impl Write) -> Result<()> {
    writeln!(writer, "\\end{{document}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const K4: &str = "4 6 3\n1 2 3\na\nb\nc\nd\n1 2\n2 3\n3 1\n1 4\n2 4\n3 4\n1 4 3\n1 2 5\n2 3 6\n4 5 6\n";

    #[test]
    fn read_graph_parses_k4() {
        let graph = read_graph(&mut K4.as_bytes()).unwrap();
        assert_eq!(graph.num_vertices(), 4);
        assert_eq!(graph.num_edges(), 6);
        assert_eq!(graph.outer_face.as_slice(), &[0, 1, 2]);
        assert_eq!(graph.labels, vec!["a", "b", "c", "d"]);
        assert_eq!(graph.edges[0].tail, 0);
        assert_eq!(graph.edges[0].head, 1);
        // 1-based rotation "1 4 3" becomes edge ids 0, 3, 2.
        assert_eq!(graph.rotations[0], vec![0, 3, 2]);
        for (e, edge) in graph.edges.iter().enumerate() {
            assert_eq!(graph.rotations[edge.tail][edge.index_at_tail], e);
            assert_eq!(graph.rotations[edge.head][edge.index_at_head], e);
        }
    }

    #[test]
    fn read_graph_reports_offending_line() {
        let bad = "4 6 3\n1 2 3\na\nb\nc\nd\n1 2\n2 x\n";
        let err = read_graph(&mut bad.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 8"), "got: {err:#}");
    }

    #[test]
    fn drawing_round_trips_through_raw_format() {
        let drawing = vec![Point { x: 0, y: 2 }, Point { x: 3, y: 1 }];
        let mut buf = Vec::new();
        write_raw_drawing(&mut buf, &drawing).unwrap();
        let back = read_drawing(&mut buf.as_slice()).unwrap();
        assert_eq!(back, drawing);
    }
}
