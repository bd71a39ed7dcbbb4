use std::path::PathBuf;

use cellevo_sim::base::Nucleotide;
use clap::{ArgGroup, Args, ValueEnum};

use crate::defaults;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output configuration path
    #[arg(short, long, default_value = defaults::CONFIG_PATH)]
    pub output: PathBuf,

    /// Number of divisions from the founder to the leaves
    #[arg(short = 'g', long, default_value_t = defaults::GENERATIONS)]
    pub generations: usize,

    /// Average number of events per daughter cell
    #[arg(short = 'e', long, default_value_t = defaults::AVERAGE_EVENTS)]
    pub average_events: f64,

    /// Apply exactly the rounded average instead of a Poisson draw
    #[arg(long)]
    pub fixed_events: bool,

    /// Relative weights of the eight event kinds, comma separated
    ///
    /// Order: deletion, insertion, translocation, reciprocal translocation,
    /// duplication, point insertion, point deletion, point replacement.
    /// Defaults to equal weights.
    #[arg(long, value_delimiter = ',')]
    pub event_weights: Option<Vec<f64>>,

    /// Run length distribution for multi-base events
    #[arg(long, value_enum, default_value_t = LengthKind::Exponential)]
    pub length_distribution: LengthKind,

    /// Rate of the truncated exponential run length distribution
    #[arg(long, default_value_t = defaults::LENGTH_RATE)]
    pub length_rate: f64,

    /// Number of chromosomes in the founder
    #[arg(long, default_value_t = defaults::CHROMOSOMES)]
    pub chromosomes: usize,

    /// Length of every founder chromosome
    #[arg(long, default_value_t = defaults::CHROMOSOME_LENGTH)]
    pub chromosome_length: usize,

    /// Explicit per-chromosome lengths, comma separated (overrides
    /// --chromosomes and --chromosome-length)
    #[arg(long, value_delimiter = ',')]
    pub lengths: Option<Vec<usize>>,

    /// How founder bases are chosen
    #[arg(long, value_enum, default_value_t = ReferenceKind::Uniform)]
    pub reference: ReferenceKind,

    /// Base used by a uniform reference
    #[arg(long, default_value = "A", value_parser = parse_base)]
    pub base: Nucleotide,

    /// Read the founder from a FASTA file instead
    #[arg(long, conflicts_with_all = ["lengths", "reference", "base"])]
    pub fasta: Option<PathBuf>,

    /// Track per-base overlap counts
    #[arg(long)]
    pub track_overlaps: bool,

    /// Divisions above this generation run concurrently
    #[arg(long, default_value_t = defaults::PARALLEL_DEPTH)]
    pub parallel_depth: usize,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Configuration path
    #[arg(short, long, default_value = defaults::CONFIG_PATH)]
    pub config: PathBuf,

    /// Override random seed (default: use configured seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Hide the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["path", "leaf", "generation"])))]
pub struct ReconstructArgs {
    /// Configuration path
    #[arg(short, long, default_value = defaults::CONFIG_PATH)]
    pub config: PathBuf,

    /// Override random seed (default: use configured seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Root-to-cell path, e.g. LRRL (or 0110)
    #[arg(long)]
    pub path: Option<String>,

    /// Leaf index, 0-based from the left
    #[arg(long)]
    pub leaf: Option<usize>,

    /// Reconstruct every cell of this generation
    #[arg(long)]
    pub generation: Option<usize>,

    /// FASTA output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write overlap counts as TSV
    #[arg(long)]
    pub overlaps: Option<PathBuf>,

    /// Salt for bases drawn during replay
    #[arg(long, default_value_t = 0)]
    pub salt: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LengthKind {
    Uniform,
    Exponential,
    LogUniform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReferenceKind {
    Uniform,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

fn parse_base(s: &str) -> Result<Nucleotide, String> {
    match s.as_bytes() {
        [b] => Nucleotide::try_from(*b).map_err(|e| e.to_string()),
        _ => Err(format!("expected a single base, got '{s}'")),
    }
}
