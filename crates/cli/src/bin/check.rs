use anyhow::Result;
use clap::Parser;

use orthodraw::io::{read_drawing, read_graph};
use orthodraw::planar::crossing_free;

/// Check an L-drawing for crossings: reads a graph followed by a drawing on
/// stdin and exits 0 iff no horizontal segment strictly crosses a vertical
/// one
#[derive(clap::Parser, Debug)]
#[command(name = "orthodraw-check", version, about)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();

    let mut stdin = std::io::stdin().lock();
    let graph = read_graph(&mut stdin)?;
    let drawing = read_drawing(&mut stdin)?;

    if !crossing_free(&graph, &drawing) {
        std::process::exit(1);
    }
    Ok(())
}
