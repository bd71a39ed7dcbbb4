use std::collections::BTreeSet;

use super::{Chromosome, ChromosomeId};
use crate::errors::{Result, SimulationError};

/// A genome: chromosomes `1..=N` plus the set of ids still active.
///
/// A chromosome whose length reaches zero is retired from the active set
/// exactly once and never comes back; its slot stays in place so ids remain
/// stable across the lineage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dna {
    chromosomes: Vec<Chromosome>,
    active: BTreeSet<ChromosomeId>,
}

impl Dna {
    /// Build an abstract genome from chromosome lengths; chromosome `i + 1`
    /// gets `lengths[i]`.
    pub fn from_lengths(lengths: &[usize]) -> Result<Self> {
        let chromosomes = lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| Chromosome::new(i + 1, len))
            .collect::<Result<Vec<_>>>()?;
        Self::from_chromosomes(chromosomes)
    }

    /// Build a genome from chromosomes that must carry ids `1..=N` in order.
    pub fn from_chromosomes(chromosomes: Vec<Chromosome>) -> Result<Self> {
        if chromosomes.is_empty() {
            return Err(SimulationError::config("genome needs at least one chromosome"));
        }
        for (i, chr) in chromosomes.iter().enumerate() {
            if chr.id() != i + 1 {
                return Err(SimulationError::InvalidChromosomeId {
                    id: chr.id(),
                    count: chromosomes.len(),
                });
            }
        }
        let active = chromosomes
            .iter()
            .filter(|c| !c.is_empty())
            .map(Chromosome::id)
            .collect();
        Ok(Self {
            chromosomes,
            active,
        })
    }

    /// Number of chromosome slots, retired ones included.
    #[inline]
    pub fn chromosome_count(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    /// Lengths must stay in step with the active set; see `retire_if_empty`.
    pub(crate) fn chromosomes_mut(&mut self) -> &mut [Chromosome] {
        &mut self.chromosomes
    }

    pub fn into_chromosomes(self) -> Vec<Chromosome> {
        self.chromosomes
    }

    pub fn chromosome(&self, id: ChromosomeId) -> Result<&Chromosome> {
        let count = self.chromosomes.len();
        id.checked_sub(1)
            .and_then(|i| self.chromosomes.get(i))
            .ok_or(SimulationError::InvalidChromosomeId { id, count })
    }

    pub fn chromosome_mut(&mut self, id: ChromosomeId) -> Result<&mut Chromosome> {
        let count = self.chromosomes.len();
        id.checked_sub(1)
            .and_then(|i| self.chromosomes.get_mut(i))
            .ok_or(SimulationError::InvalidChromosomeId { id, count })
    }

    /// Mutable access to two distinct chromosomes at once.
    pub fn pair_mut(
        &mut self,
        first: ChromosomeId,
        second: ChromosomeId,
    ) -> Result<(&mut Chromosome, &mut Chromosome)> {
        let count = self.chromosomes.len();
        let check = |id: ChromosomeId| {
            if (1..=count).contains(&id) {
                Ok(id - 1)
            } else {
                Err(SimulationError::InvalidChromosomeId { id, count })
            }
        };
        let (a, b) = (check(first)?, check(second)?);
        if a == b {
            return Err(SimulationError::config(format!(
                "chromosome {first} cannot pair with itself"
            )));
        }
        if a < b {
            let (lo, hi) = self.chromosomes.split_at_mut(b);
            Ok((&mut lo[a], &mut hi[0]))
        } else {
            let (lo, hi) = self.chromosomes.split_at_mut(a);
            Ok((&mut hi[0], &mut lo[b]))
        }
    }

    /// Ids of chromosomes with positive length, ascending.
    pub fn active_ids(&self) -> &BTreeSet<ChromosomeId> {
        &self.active
    }

    #[inline]
    pub fn is_active(&self, id: ChromosomeId) -> bool {
        self.active.contains(&id)
    }

    /// The `index`-th active id in ascending order.
    pub fn nth_active(&self, index: usize) -> Option<ChromosomeId> {
        self.active.iter().nth(index).copied()
    }

    /// Retire `id` if its length has reached zero. Returns true on the
    /// retiring call only.
    pub(crate) fn retire_if_empty(&mut self, id: ChromosomeId) -> bool {
        let empty = self.chromosome(id).map(Chromosome::is_empty).unwrap_or(false);
        empty && self.active.remove(&id)
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.chromosomes.iter().map(Chromosome::length).collect()
    }

    pub fn total_length(&self) -> usize {
        self.chromosomes.iter().map(Chromosome::length).sum()
    }

    /// Copy lengths, active ids and overlap tracks; sequences are left
    /// behind.
    pub fn abstract_copy(&self) -> Self {
        Self {
            chromosomes: self
                .chromosomes
                .iter()
                .map(Chromosome::abstract_copy)
                .collect(),
            active: self.active.clone(),
        }
    }

    /// Start zeroed overlap tracks on every chromosome.
    pub fn enable_overlaps(&mut self) {
        self.chromosomes
            .iter_mut()
            .for_each(Chromosome::enable_overlaps);
    }

    pub fn clear_overlaps(&mut self) {
        for chr in &mut self.chromosomes {
            chr.set_overlaps(None);
        }
    }

    pub fn clear_sequences(&mut self) {
        for chr in &mut self.chromosomes {
            chr.take_sequence();
        }
    }

    /// True if every chromosome carries a sequence.
    pub fn is_materialized(&self) -> bool {
        self.chromosomes.iter().all(|c| c.sequence().is_some())
    }

    /// Check the invariant that active ids are exactly the non-empty
    /// chromosomes.
    pub fn is_consistent(&self) -> bool {
        self.chromosomes
            .iter()
            .all(|c| self.active.contains(&c.id()) == !c.is_empty())
    }
}
