use anyhow::{Result, bail};
use clap::Parser;

use orthodraw::sample_triangulation;

/// Sample a uniformly random rooted planar triangulation
#[derive(clap::Parser, Debug)]
#[command(name = "orthodraw-sample", version, about)]
struct Cli {
    /// Also duplicate edges into 2-cycles where the embedding permits
    #[arg(long = "2-cycles")]
    two_cycles: bool,

    /// Number of internal vertices (at least 2)
    n: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.n < 2 {
        bail!("n must be at least 2");
    }

    let sampled = sample_triangulation(cli.n, cli.two_cycles, &mut rand::rng());
    let code: String = sampled.code.iter().map(|&b| if b { '1' } else { '0' }).collect();
    eprintln!("generated bitstring: {code}");

    let mut out = std::io::BufWriter::new(std::io::stdout().lock());
    sampled.write(&mut out)?;
    Ok(())
}
