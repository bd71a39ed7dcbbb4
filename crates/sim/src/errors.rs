use std::error;
use std::fmt;

use thiserror::Error;

use crate::genome::ChromosomeId;

/// Error returned when attempting to convert an invalid byte/character into
/// a `Nucleotide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidNucleotide(pub u8);

impl fmt::Display for InvalidNucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid nucleotide byte: {} ('{}')", self.0, self.0 as char)
    }
}

impl error::Error for InvalidNucleotide {}

/// Error type for failures when constructing a `Sequence`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSequence {
    /// A character was not recognized as a valid nucleotide.
    InvalidChar(char),

    /// The sequence was empty when a non-empty sequence was required.
    EmptySequence,
}

impl fmt::Display for InvalidSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChar(c) => write!(f, "Invalid character in sequence: '{c}'"),
            Self::EmptySequence => write!(f, "Empty sequence not allowed"),
        }
    }
}

impl error::Error for InvalidSequence {}

/// Error returned when a position or span falls outside a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    /// The first offending index
    pub index: usize,

    /// The current length of the sequence (upper bound)
    pub len: usize,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds (len = {})", self.index, self.len)
    }
}

impl error::Error for OutOfBounds {}

/// Crate-wide error type.
///
/// Configuration problems and invariant violations are fatal; degenerate
/// event parameters never surface here because generators recover from them
/// locally.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Invalid simulation parameter.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Chromosome id outside `1..=count`.
    #[error("Invalid chromosome id {id} (genome has {count} chromosomes)")]
    InvalidChromosomeId { id: ChromosomeId, count: usize },

    /// An event could not be applied to the abstract genome.
    #[error("Invalid event at generation {generation}: {reason}")]
    InvalidEvent { generation: usize, reason: String },

    /// Replaying events produced a sequence whose length disagrees with the
    /// tracked chromosome length.
    #[error(
        "Chromosome {chromosome} at generation {generation}: tracked length {expected} \
         does not match reconstructed sequence length {actual}"
    )]
    LengthMismatch {
        generation: usize,
        chromosome: ChromosomeId,
        expected: usize,
        actual: usize,
    },

    /// A chromosome sequence was required but has not been materialized.
    #[error("Chromosome {chromosome} at generation {generation} has no materialized sequence")]
    MissingSequence {
        generation: usize,
        chromosome: ChromosomeId,
    },

    /// Reconstruction path longer than the simulated tree.
    #[error("Path length ({requested}) larger than number of generations ({available})")]
    PathTooLong { requested: usize, available: usize },

    /// Reconstruction requested past the last simulated generation.
    #[error("Generation {requested} out of range (simulated generations: {available})")]
    GenerationOutOfRange { requested: usize, available: usize },

    /// The reference genome table is malformed.
    #[error("Invalid reference table: {0}")]
    Reference(String),

    /// Growth or reconstruction was cancelled or exceeded its deadline.
    #[error("Operation cancelled at generation {generation}")]
    Cancelled { generation: usize },

    #[error(transparent)]
    Sequence(#[from] InvalidSequence),

    #[error(transparent)]
    Nucleotide(#[from] InvalidNucleotide),

    #[error(transparent)]
    Bounds(#[from] OutOfBounds),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimulationError {
    /// Shorthand for a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Return true for errors that stem from user-provided parameters.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::InvalidChromosomeId { .. } | Self::Reference(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = SimulationError> = std::result::Result<T, E>;
