//! Builder pattern for creating simulations.
//!
//! Provides a fluent API over [`Configuration`] with the tool's defaults
//! and validation at `build()`.

use std::path::PathBuf;

use super::{
    CancellationToken, Configuration, ReferenceConfig, ReferenceTable, Simulation,
};
use crate::base::Nucleotide;
use crate::errors::Result;
use crate::evolution::{EventCountDistribution, EventTable, LengthDistribution, LengthSamplers};

/// Builder for constructing [`Simulation`] instances with a fluent API.
///
/// # Examples
///
/// ```
/// use cellevo_sim::simulation::SimulationBuilder;
/// use cellevo_sim::base::Nucleotide;
///
/// let sim = SimulationBuilder::new()
///     .generations(3)
///     .average_events(2.0)
///     .uniform_reference(Nucleotide::A, vec![1000, 800])
///     .seed(42)
///     .build()
///     .unwrap();
/// let outcome = sim.run().unwrap();
/// assert_eq!(outcome.statistics.leaf_count, 8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    config: Configuration,
    reference: Option<ReferenceTable>,
    cancel: Option<CancellationToken>,
}

impl SimulationBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the number of divisions (default: 7).
    pub fn generations(mut self, generations: usize) -> Self {
        self.config.execution.generations = generations;
        self
    }

    /// Set the random seed for reproducibility (default: None = random).
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.execution.seed = Some(seed);
        self
    }

    pub fn track_overlaps(mut self, track: bool) -> Self {
        self.config.execution.track_overlaps = track;
        self
    }

    /// Generation above which subtrees are processed concurrently.
    pub fn parallel_depth(mut self, depth: usize) -> Self {
        self.config.execution.parallel_depth = depth;
        self
    }

    /// Set the mean number of events per daughter (default: 10).
    pub fn average_events(mut self, average: f64) -> Self {
        self.config.evolution.average_events = average;
        self
    }

    pub fn event_count(mut self, distribution: EventCountDistribution) -> Self {
        self.config.evolution.event_count = distribution;
        self
    }

    pub fn event_table(mut self, table: EventTable) -> Self {
        self.config.evolution.event_table = table;
        self
    }

    pub fn length_samplers(mut self, lengths: LengthSamplers) -> Self {
        self.config.evolution.lengths = lengths;
        self
    }

    /// Use one run-length distribution for every multi-base kind.
    pub fn length_distribution(mut self, distribution: LengthDistribution) -> Self {
        self.config.evolution.lengths = LengthSamplers::all(distribution);
        self
    }

    pub fn uniform_reference(mut self, base: Nucleotide, lengths: Vec<usize>) -> Self {
        self.config.reference = ReferenceConfig::Uniform { base, lengths };
        self
    }

    pub fn random_reference(mut self, lengths: Vec<usize>) -> Self {
        self.config.reference = ReferenceConfig::Random { lengths };
        self
    }

    pub fn fasta_reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.reference = ReferenceConfig::Fasta { path: path.into() };
        self
    }

    /// Use an already built table; overrides the configured reference source.
    pub fn reference(mut self, table: ReferenceTable) -> Self {
        self.reference = Some(table);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The validated configuration this builder describes.
    pub fn configuration(&self) -> Result<Configuration> {
        if self.reference.is_some() {
            self.config.validate_run()?;
        } else {
            self.config.validate()?;
        }
        Ok(self.config.clone())
    }

    /// Build and validate the simulation.
    pub fn build(self) -> Result<Simulation> {
        let sim = match self.reference {
            Some(table) => Simulation::with_reference(self.config, table)?,
            None => Simulation::from_config(self.config)?,
        };
        Ok(match self.cancel {
            Some(token) => sim.with_cancellation(token),
            None => sim,
        })
    }
}
