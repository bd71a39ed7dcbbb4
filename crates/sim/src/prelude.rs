//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use cellevo_sim::prelude::*;
//!
//! let sim = SimulationBuilder::new()
//!     .generations(2)
//!     .uniform_reference(Nucleotide::T, vec![100])
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! let tree = sim.grow().unwrap();
//! let path: LineagePath = "LR".parse().unwrap();
//! let genome = sim.reconstructor().materialize_path(&tree, &path).unwrap();
//! assert_eq!(genome.generation, 2);
//! ```

pub use crate::base::{Nucleotide, Sequence};
pub use crate::errors::{Result, SimulationError};
pub use crate::evolution::{Event, EventKind, EventTable, LengthDistribution, LengthSamplers};
pub use crate::genome::{Cell, Chromosome, ChromosomeId, Dna};
pub use crate::simulation::{
    CancellationToken, Configuration, LengthStatistics, LineagePath, LineageTree,
    MaterializedGenome, Reconstructor, ReferenceTable, Simulation, SimulationBuilder,
};
