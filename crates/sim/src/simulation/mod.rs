//! Lineage growth, reconstruction and run orchestration.
//!
//! - `Growth`: builds the lineage tree on abstract genomes.
//! - `Reconstructor`: replays events onto a reference to materialize
//!   sequences for one path or one generation.
//! - `Simulation` / `SimulationBuilder`: configuration-driven entry points.

mod builder;
mod cancel;
mod configs;
mod engine;
mod growth;
mod lineage;
mod reconstruction;
mod reference;
mod statistics;

pub use builder::SimulationBuilder;
pub use cancel::CancellationToken;
pub use configs::{
    Configuration, EvolutionConfig, ExecutionConfig, ReferenceConfig, DEFAULT_AVERAGE_EVENTS,
    DEFAULT_CHROMOSOME_COUNT, DEFAULT_CHROMOSOME_LENGTH, DEFAULT_GENERATIONS,
    DEFAULT_PARALLEL_DEPTH, MAX_GENERATIONS,
};
pub use engine::{Simulation, SimulationOutcome};
pub use growth::Growth;
pub use lineage::{Direction, Leaves, LineagePath, LineageTree, Node};
pub use reconstruction::{MaterializedChromosome, MaterializedGenome, Reconstructor};
pub use reference::{parse_fasta, ReferenceTable};
pub use statistics::LengthStatistics;
