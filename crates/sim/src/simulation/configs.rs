//! Simulation parameters and configuration.
//!
//! A [`Configuration`] fully describes a run: tree depth and seed, the event
//! model, and where the founder's reference sequences come from. It
//! round-trips through JSON so a run can be reproduced from a file.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ReferenceTable;
use crate::base::Nucleotide;
use crate::errors::{Result, SimulationError};
use crate::evolution::{EventCountDistribution, EventTable, LengthSamplers};

/// Hard cap on tree depth; a tree has `2^generations` leaves.
pub const MAX_GENERATIONS: usize = 30;

pub const DEFAULT_GENERATIONS: usize = 7;
pub const DEFAULT_AVERAGE_EVENTS: f64 = 10.0;
pub const DEFAULT_CHROMOSOME_COUNT: usize = 16;
pub const DEFAULT_CHROMOSOME_LENGTH: usize = 500_000;
/// Nodes above this generation grow their two subtrees concurrently.
pub const DEFAULT_PARALLEL_DEPTH: usize = 4;

/// The master configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub execution: ExecutionConfig,
    pub evolution: EvolutionConfig,
    pub reference: ReferenceConfig,
}

/// Tree shape and run-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Number of divisions from the founder to the leaves.
    pub generations: usize,
    /// Optional RNG seed for reproducibility
    pub seed: Option<u64>,
    /// Track per-base overlap counts.
    pub track_overlaps: bool,
    pub parallel_depth: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            generations: DEFAULT_GENERATIONS,
            seed: None,
            track_overlaps: false,
            parallel_depth: DEFAULT_PARALLEL_DEPTH,
        }
    }
}

/// The event model applied at every division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Mean number of events per daughter.
    pub average_events: f64,
    pub event_count: EventCountDistribution,
    pub event_table: EventTable,
    pub lengths: LengthSamplers,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            average_events: DEFAULT_AVERAGE_EVENTS,
            event_count: EventCountDistribution::default(),
            event_table: EventTable::default(),
            lengths: LengthSamplers::default(),
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.average_events.is_finite() || self.average_events < 0.0 {
            return Err(SimulationError::config(format!(
                "average events per division must be non-negative and finite, got {}",
                self.average_events
            )));
        }
        self.lengths.validate()
    }
}

/// Source of the founder's chromosome sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ReferenceConfig {
    /// Every base set to `base`.
    Uniform { base: Nucleotide, lengths: Vec<usize> },
    /// Bases drawn uniformly from the run's master RNG.
    Random { lengths: Vec<usize> },
    /// One FASTA record per chromosome, in id order.
    Fasta { path: PathBuf },
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self::Uniform {
            base: Nucleotide::A,
            lengths: vec![DEFAULT_CHROMOSOME_LENGTH; DEFAULT_CHROMOSOME_COUNT],
        }
    }
}

impl ReferenceConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Uniform { lengths, .. } | Self::Random { lengths } => {
                if lengths.is_empty() {
                    return Err(SimulationError::config("reference has no chromosomes"));
                }
                if let Some(i) = lengths.iter().position(|&len| len == 0) {
                    return Err(SimulationError::config(format!(
                        "reference chromosome {} has length 0",
                        i + 1
                    )));
                }
                Ok(())
            }
            Self::Fasta { path } if path.as_os_str().is_empty() => {
                Err(SimulationError::config("reference FASTA path is empty"))
            }
            Self::Fasta { .. } => Ok(()),
        }
    }

    /// Build the reference table. Only `Random` draws from `rng`.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ReferenceTable> {
        match self {
            Self::Uniform { base, lengths } => ReferenceTable::uniform(*base, lengths),
            Self::Random { lengths } => ReferenceTable::random(lengths, rng),
            Self::Fasta { path } => ReferenceTable::from_fasta_path(path),
        }
    }
}

impl Configuration {
    /// Check every parameter before a run starts.
    pub fn validate(&self) -> Result<()> {
        self.validate_run()?;
        self.reference.validate()
    }

    /// Check everything except the reference source.
    pub fn validate_run(&self) -> Result<()> {
        let generations = self.execution.generations;
        if generations == 0 || generations > MAX_GENERATIONS {
            return Err(SimulationError::config(format!(
                "generations must be in 1..={MAX_GENERATIONS}, got {generations}"
            )));
        }
        self.evolution.validate()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
