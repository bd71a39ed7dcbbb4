//! # Simulation Crate
//!
//! The `sim` crate provides the core logic for the cell lineage simulation.
//! It grows a binary tree of dividing cells whose genomes are tracked as
//! chromosome lengths plus recorded events, and reconstructs concrete
//! sequences on demand by replaying those events onto a reference.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod genome;
pub mod prelude;
pub mod simulation;

pub use base::{Nucleotide, Sequence};
pub use errors::{Result, SimulationError};
