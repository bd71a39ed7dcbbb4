//! Evolutionary events: the catalog of mutations and rearrangements, their
//! random generators, and the distributions that drive them.

mod event;
pub mod generate;
pub mod sampling;
mod table;

pub use event::{Event, EventKind};
pub use generate::{random_event, Generator};
pub use sampling::{EventCountDistribution, LengthDistribution, LengthSamplers};
pub use table::EventTable;
