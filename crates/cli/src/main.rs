mod args;
mod commands;
pub mod defaults;
mod printing;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use args::{InitArgs, ReconstructArgs, RunArgs};
use commands::{init, reconstruct, run};

/// Cellevo: A Cell Lineage Simulator
///
/// This tool grows a binary tree of dividing cells whose chromosomes change
/// through insertions, deletions, translocations and point mutations, then
/// reconstructs the DNA of any cell on demand.
#[derive(Parser, Debug)]
#[command(name = "cellevo")]
#[command(author, version, about = "Simulates chromosome evolution along a cell lineage", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Show debug diagnostics (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new simulation configuration.
    ///
    /// Writes the parameters of an experiment (tree depth, event model,
    /// founder genome) to a JSON file but does not run it yet.
    Init(Box<InitArgs>),

    /// Grow the lineage tree and report chromosome length statistics.
    Run(RunArgs),

    /// Reconstruct the DNA of one cell or a whole generation as FASTA.
    ///
    /// The lineage is grown again from the configured seed, so the same
    /// configuration always yields the same cells.
    Reconstruct(ReconstructArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to size thread pool")?;
    }

    match cli.command {
        Commands::Init(args) => init::init_simulation(&args)?,
        Commands::Run(args) => run::run_simulation(&args)?,
        Commands::Reconstruct(args) => reconstruct::reconstruct(&args)?,
    }

    Ok(())
}
