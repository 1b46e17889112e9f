use std::io::Write;

use anyhow::Result;
use clap::Parser;

use orthodraw::io::{
    read_graph, write_latex_footer, write_latex_header, write_raw_drawing, write_raw_dual,
    write_tikz_drawing, write_tikz_dual,
};
use orthodraw::{Phase, Timer, build_four_block_tree, compute_rect_dual, construct_drawing};

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let mut timer = Timer::new();
    timer.start(Phase::Io);
    let graph = read_graph(&mut std::io::stdin().lock())?;
    timer.stop(Phase::Io);
    if cli.verbose > 0 {
        eprintln!(
            "[orthodraw] read {} vertices, {} edges, outer face of degree {}",
            graph.num_vertices(),
            graph.num_edges(),
            graph.outer_face.len()
        );
    }

    let mut out = std::io::BufWriter::new(std::io::stdout().lock());

    if cli.rect_dual {
        timer.start(Phase::RectDual);
        let drawing = compute_rect_dual(&graph)?;
        timer.stop(Phase::RectDual);

        timer.start(Phase::Io);
        if cli.tikz {
            write_latex_header(&mut out)?;
            write_tikz_dual(&mut out, &graph, &drawing)?;
            write_latex_footer(&mut out)?;
        } else {
            write_raw_dual(&mut out, &drawing)?;
        }
        timer.stop(Phase::Io);
    } else {
        timer.start(Phase::Decompose);
        let mut four_block_tree = build_four_block_tree(&graph);
        timer.stop(Phase::Decompose);
        if cli.verbose > 0 {
            eprintln!("[orthodraw] four-block tree has {} components", four_block_tree.len());
        }

        if cli.tikz {
            timer.start(Phase::Io);
            write_latex_header(&mut out)?;
            timer.stop(Phase::Io);
        }

        let duals_out: Option<&mut dyn Write> = if cli.tikz && cli.print_duals {
            Some(&mut out)
        } else {
            None
        };
        let drawing = construct_drawing(&graph, &mut four_block_tree, duals_out, &mut timer)?;

        timer.start(Phase::Io);
        if cli.tikz {
            write_tikz_drawing(&mut out, &graph, &drawing)?;
            write_latex_footer(&mut out)?;
        } else {
            write_raw_drawing(&mut out, &drawing)?;
        }
        timer.stop(Phase::Io);
    }

    out.flush()?;

    if cli.time {
        timer.write_times(&mut std::io::stderr())?;
    }

    Ok(())
}
