use std::fmt;

use serde::{Deserialize, Serialize};

use super::Dna;
use crate::errors::Result;
use crate::evolution::Event;

/// Whether a cell is the lineage founder or one of its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Founder,
    Descendant,
}

/// A genome snapshot in the lineage.
///
/// A founder holds the reference genome at generation 0 and no events. A
/// descendant holds the abstract genome reached after applying `events`, in
/// order, to its parent.
///
/// `seed` drives everything random below this cell: the draws that build its
/// daughters, and the bases chosen when its own events are replayed.
#[derive(Debug, Clone)]
pub struct Cell {
    kind: CellKind,
    generation: usize,
    seed: u64,
    dna: Dna,
    events: Vec<Event>,
}

impl Cell {
    pub fn founder(dna: Dna, seed: u64) -> Self {
        Self {
            kind: CellKind::Founder,
            generation: 0,
            seed,
            dna,
            events: Vec::new(),
        }
    }

    /// Spawn a daughter of `parent`: one generation later, sharing the
    /// parent's abstract genome and no events yet.
    pub fn descendant(parent: &Cell, seed: u64) -> Self {
        Self {
            kind: CellKind::Descendant,
            generation: parent.generation + 1,
            seed,
            dna: parent.dna.abstract_copy(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    #[inline]
    pub fn is_founder(&self) -> bool {
        self.kind == CellKind::Founder
    }

    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn dna(&self) -> &Dna {
        &self.dna
    }

    pub(crate) fn dna_mut(&mut self) -> &mut Dna {
        &mut self.dna
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Apply `event` to the abstract genome and record it.
    ///
    /// The event is validated against the current state first; an event that
    /// does not fit leaves the cell untouched.
    pub fn push_event(&mut self, event: Event) -> Result<()> {
        event.apply_abstract(&mut self.dna, self.generation)?;
        self.events.push(event);
        Ok(())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            CellKind::Founder => "Founder",
            CellKind::Descendant => "Descendant",
        };
        write!(
            f,
            "{kind} cell (generation {}, {} events, genome length {})",
            self.generation,
            self.events.len(),
            self.dna.total_length()
        )
    }
}
