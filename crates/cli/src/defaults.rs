//! Shared default values for the command line.
//! Simulation defaults come from the library so `init` and the builder agree.

use cellevo_sim::simulation;

pub const CONFIG_PATH: &str = "cellevo.json";

pub const GENERATIONS: usize = simulation::DEFAULT_GENERATIONS;
pub const AVERAGE_EVENTS: f64 = simulation::DEFAULT_AVERAGE_EVENTS;
pub const CHROMOSOMES: usize = simulation::DEFAULT_CHROMOSOME_COUNT;
pub const CHROMOSOME_LENGTH: usize = simulation::DEFAULT_CHROMOSOME_LENGTH;
pub const PARALLEL_DEPTH: usize = simulation::DEFAULT_PARALLEL_DEPTH;

pub const LENGTH_RATE: f64 = 1.0;

/// Bases per FASTA line.
pub const FASTA_WIDTH: usize = 60;
