//! Simulation engine: wires configuration, reference, growth and
//! reconstruction together.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{
    CancellationToken, Configuration, Growth, LengthStatistics, LineageTree, Reconstructor,
    ReferenceTable,
};
use crate::errors::Result;
use crate::genome::Cell;

/// Result of a full growth run.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub tree: LineageTree,
    pub statistics: LengthStatistics,
}

/// Main simulation engine.
///
/// All randomness derives from one master seed: the founder's seed is drawn
/// first, then a `Random` reference table draws its bases. Growing twice
/// from the same `Simulation` builds the same tree.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: Configuration,
    reference: ReferenceTable,
    founder_seed: u64,
    cancel: CancellationToken,
}

impl Simulation {
    /// Validate `config` and build its reference table.
    pub fn from_config(config: Configuration) -> Result<Self> {
        config.validate()?;
        let (mut rng, founder_seed) = Self::master_rng(&config);
        let reference = config.reference.build(&mut rng)?;
        Ok(Self::assemble(config, reference, founder_seed))
    }

    /// Use an explicit reference table instead of `config.reference`.
    pub fn with_reference(config: Configuration, reference: ReferenceTable) -> Result<Self> {
        config.validate_run()?;
        let (_, founder_seed) = Self::master_rng(&config);
        Ok(Self::assemble(config, reference, founder_seed))
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    fn master_rng(config: &Configuration) -> (Xoshiro256PlusPlus, u64) {
        let seed = config
            .execution
            .seed
            .unwrap_or_else(|| rand::rng().random());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let founder_seed = rng.random();
        (rng, founder_seed)
    }

    fn assemble(config: Configuration, reference: ReferenceTable, founder_seed: u64) -> Self {
        log::info!(
            "simulation ready: {} chromosomes, {} bases, {} generations",
            reference.len(),
            reference.lengths().iter().sum::<usize>(),
            config.execution.generations
        );
        Self {
            config,
            reference,
            founder_seed,
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    pub fn founder_seed(&self) -> u64 {
        self.founder_seed
    }

    /// The founder cell, with overlap tracks started if configured.
    pub fn founder(&self) -> Result<Cell> {
        let mut dna = self.reference.abstract_dna()?;
        if self.config.execution.track_overlaps {
            dna.enable_overlaps();
        }
        Ok(Cell::founder(dna, self.founder_seed))
    }

    /// Grow the lineage tree on abstract genomes.
    pub fn grow(&self) -> Result<LineageTree> {
        let execution = &self.config.execution;
        Growth::new(&self.config.evolution, execution.generations)
            .parallel_depth(execution.parallel_depth)
            .cancellation(self.cancel.clone())
            .grow(self.founder()?)
    }

    /// Grow the tree and aggregate leaf statistics.
    pub fn run(&self) -> Result<SimulationOutcome> {
        let tree = self.grow()?;
        let statistics = LengthStatistics::from_tree(&tree);
        log::info!(
            "mean genome length over {} leaves: {:.1}",
            statistics.leaf_count,
            statistics.mean_genome_length
        );
        Ok(SimulationOutcome { tree, statistics })
    }

    /// A reconstructor over this simulation's reference, sharing its
    /// overlap, parallelism and cancellation settings.
    pub fn reconstructor(&self) -> Reconstructor<'_> {
        Reconstructor::new(&self.reference)
            .with_overlaps(self.config.execution.track_overlaps)
            .with_parallel_depth(self.config.execution.parallel_depth)
            .with_cancellation(self.cancel.clone())
    }
}
