//! Genome structures: chromosomes, genomes and the cells that carry them.

mod cell;
mod chromosome;
mod dna;
mod overlap;

pub use cell::{Cell, CellKind};
pub use chromosome::Chromosome;
pub use dna::Dna;
pub use overlap::OverlapTrack;

/// 1-based chromosome identifier.
pub type ChromosomeId = usize;
