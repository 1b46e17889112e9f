/// L-drawing CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "orthodraw", version, about)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit the rectangular dual of the input instead of an L-drawing
    /// (requires an outer face of degree 4)
    #[arg(long)]
    pub rect_dual: bool,

    /// Emit TikZ instead of raw coordinates
    #[arg(long)]
    pub tikz: bool,

    /// With --tikz: also emit each component's rectangular dual
    #[arg(long)]
    pub print_duals: bool,

    /// Print the four phase timings (io, decompose, rect-dual, port-assign)
    /// in seconds to stderr on exit
    #[arg(long)]
    pub time: bool,
}
