//! Event-sourced reconstruction of concrete sequences.
//!
//! Sequences are materialized only along the current root-to-node walk: a
//! child starts from a copy of its parent's sequences, replays its own
//! events, and the parent copy is released once both children have
//! returned. Memory therefore grows with depth times genome size, not with
//! the number of cells.

use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{CancellationToken, Direction, LineagePath, LineageTree, Node, ReferenceTable};
use crate::base::Sequence;
use crate::errors::{Result, SimulationError};
use crate::genome::{Cell, ChromosomeId, Dna, OverlapTrack};

/// Keeps replay draws apart from the stream a cell uses to grow its
/// daughters.
const REPLAY_STREAM: u64 = 0xD1B5_4A32_D192_ED03;

/// A materialized chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedChromosome {
    pub id: ChromosomeId,
    pub sequence: Sequence,
    pub overlaps: Option<OverlapTrack>,
}

/// The concrete genome of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedGenome {
    pub generation: usize,
    pub path: LineagePath,
    /// Every chromosome slot in id order; retired chromosomes are empty.
    pub chromosomes: Vec<MaterializedChromosome>,
}

impl MaterializedGenome {
    fn new(generation: usize, path: LineagePath, dna: Dna) -> Self {
        let chromosomes = dna
            .into_chromosomes()
            .into_iter()
            .map(|mut chr| MaterializedChromosome {
                id: chr.id(),
                sequence: chr.take_sequence().unwrap_or_default(),
                overlaps: chr.take_overlaps(),
            })
            .collect();
        Self {
            generation,
            path,
            chromosomes,
        }
    }

    pub fn chromosome(&self, id: ChromosomeId) -> Option<&MaterializedChromosome> {
        id.checked_sub(1).and_then(|i| self.chromosomes.get(i))
    }

    pub fn sequence(&self, id: ChromosomeId) -> Option<&Sequence> {
        self.chromosome(id).map(|c| &c.sequence)
    }

    pub fn total_length(&self) -> usize {
        self.chromosomes.iter().map(|c| c.sequence.len()).sum()
    }
}

/// Replays lineage events onto a reference table.
///
/// Bases drawn during replay (inserted runs, point insertions without a
/// fixed base, replacements) come from an RNG seeded by the replayed cell's
/// seed and the reconstructor's `salt`. The same salt reproduces the same
/// sequences, whichever entry point is used; a different salt changes only
/// those drawn bases.
#[derive(Debug, Clone)]
pub struct Reconstructor<'a> {
    reference: &'a ReferenceTable,
    salt: u64,
    track_overlaps: bool,
    parallel_depth: usize,
    cancel: CancellationToken,
}

impl<'a> Reconstructor<'a> {
    pub fn new(reference: &'a ReferenceTable) -> Self {
        Self {
            reference,
            salt: 0,
            track_overlaps: false,
            parallel_depth: 0,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_salt(mut self, salt: u64) -> Self {
        self.salt = salt;
        self
    }

    /// Recompute overlap tracks from zero at the founder.
    pub fn with_overlaps(mut self, track: bool) -> Self {
        self.track_overlaps = track;
        self
    }

    pub fn with_parallel_depth(mut self, depth: usize) -> Self {
        self.parallel_depth = depth;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Materialize every cell at `generation`, left to right.
    pub fn materialize(
        &self,
        tree: &LineageTree,
        generation: usize,
    ) -> Result<Vec<MaterializedGenome>> {
        let collected = Mutex::new(Vec::new());
        self.for_each_at_generation(tree, generation, |genome| {
            collected
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(genome);
            Ok(())
        })?;
        let mut genomes = collected.into_inner().unwrap_or_else(PoisonError::into_inner);
        genomes.sort_by_key(|g| g.path.leaf_index());
        Ok(genomes)
    }

    /// Stream every cell at `generation` to `visit` as soon as it is
    /// materialized. Below the parallel depth `visit` may run on several
    /// threads at once; the order is unspecified.
    pub fn for_each_at_generation<F>(
        &self,
        tree: &LineageTree,
        generation: usize,
        visit: F,
    ) -> Result<()>
    where
        F: Fn(MaterializedGenome) -> Result<()> + Sync,
    {
        if generation > tree.generations() {
            return Err(SimulationError::GenerationOutOfRange {
                requested: generation,
                available: tree.generations(),
            });
        }
        if generation < tree.generations() {
            log::warn!(
                "materializing generation {generation} of {}; later generations are not visited",
                tree.generations()
            );
        }
        let root = self.founder_genome(tree.root().cell())?;
        self.visit(tree.root(), root, LineagePath::root(), generation, &visit)
    }

    /// Materialize the single cell at the end of `path`.
    pub fn materialize_path(
        &self,
        tree: &LineageTree,
        path: &LineagePath,
    ) -> Result<MaterializedGenome> {
        if path.len() > tree.generations() {
            return Err(SimulationError::PathTooLong {
                requested: path.len(),
                available: tree.generations(),
            });
        }
        if path.len() < tree.generations() {
            log::warn!(
                "path {path} stops at generation {} of {}",
                path.len(),
                tree.generations()
            );
        }

        let mut node = tree.root();
        let mut working = self.founder_genome(node.cell())?;
        for &direction in path.directions() {
            self.cancel.check(node.generation())?;
            let child = node.child(direction).ok_or(SimulationError::PathTooLong {
                requested: path.len(),
                available: node.generation(),
            })?;
            // The ancestor's copy is released as soon as the child exists
            working = self.descend(&working, child.cell())?;
            node = child;
        }
        Ok(MaterializedGenome::new(
            node.generation(),
            path.clone(),
            working,
        ))
    }

    fn visit<F>(
        &self,
        node: &Node,
        working: Dna,
        path: LineagePath,
        target: usize,
        sink: &F,
    ) -> Result<()>
    where
        F: Fn(MaterializedGenome) -> Result<()> + Sync,
    {
        self.cancel.check(node.generation())?;
        if node.generation() == target {
            return sink(MaterializedGenome::new(target, path, working));
        }
        let Some((left, right)) = node.children() else {
            return Err(SimulationError::GenerationOutOfRange {
                requested: target,
                available: node.generation(),
            });
        };

        let branch = |child: &Node, direction: Direction| -> Result<()> {
            let next = self.descend(&working, child.cell())?;
            self.visit(child, next, path.child(direction), target, sink)
        };
        if node.generation() < self.parallel_depth {
            let (l, r) = rayon::join(
                || branch(left, Direction::Left),
                || branch(right, Direction::Right),
            );
            l.and(r)
        } else {
            branch(left, Direction::Left)?;
            branch(right, Direction::Right)
        }
    }

    /// The founder's genome materialized from the reference table.
    fn founder_genome(&self, founder: &Cell) -> Result<Dna> {
        let dna = founder.dna();
        if self.reference.len() != dna.chromosome_count() {
            return Err(SimulationError::Reference(format!(
                "reference has {} chromosomes, founder has {}",
                self.reference.len(),
                dna.chromosome_count()
            )));
        }
        let mut working = dna.abstract_copy();
        for (chr, seq) in working
            .chromosomes_mut()
            .iter_mut()
            .zip(self.reference.sequences())
        {
            if chr.length() != seq.len() {
                return Err(SimulationError::LengthMismatch {
                    generation: 0,
                    chromosome: chr.id(),
                    expected: chr.length(),
                    actual: seq.len(),
                });
            }
            chr.set_sequence(seq.clone());
        }
        if self.track_overlaps {
            working.enable_overlaps();
        } else {
            working.clear_overlaps();
        }
        Ok(working)
    }

    /// Copy the parent's genome and replay `cell`'s events onto it.
    fn descend(&self, parent: &Dna, cell: &Cell) -> Result<Dna> {
        let generation = cell.generation();
        let mut working = parent.clone();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.replay_seed(cell.seed()));
        for event in cell.events() {
            event.replay(&mut working, &mut rng, generation)?;
        }

        for (chr, tracked) in working.chromosomes().iter().zip(cell.dna().chromosomes()) {
            let actual = chr
                .sequence()
                .map(Sequence::len)
                .ok_or(SimulationError::MissingSequence {
                    generation,
                    chromosome: chr.id(),
                })?;
            if actual != tracked.length() {
                return Err(SimulationError::LengthMismatch {
                    generation,
                    chromosome: chr.id(),
                    expected: tracked.length(),
                    actual,
                });
            }
        }
        Ok(working)
    }

    fn replay_seed(&self, seed: u64) -> u64 {
        (seed ^ REPLAY_STREAM).wrapping_add(self.salt.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}
