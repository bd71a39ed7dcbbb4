//! Growth of the lineage tree on abstract genomes.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{CancellationToken, EvolutionConfig, LineageTree, Node};
use crate::errors::Result;
use crate::evolution::random_event;
use crate::genome::Cell;

/// Builds a lineage tree to a fixed depth.
///
/// Each division spawns two daughters that copy the parent's abstract
/// genome, draw an event count, and apply that many random events. Sequences
/// are never touched.
///
/// All randomness at a node comes from an RNG seeded with that node's cell
/// seed, so the tree depends only on the founder seed: growing serially or
/// with any `parallel_depth` yields the same tree.
#[derive(Debug, Clone)]
pub struct Growth<'a> {
    evolution: &'a EvolutionConfig,
    generations: usize,
    parallel_depth: usize,
    cancel: CancellationToken,
}

impl<'a> Growth<'a> {
    pub fn new(evolution: &'a EvolutionConfig, generations: usize) -> Self {
        Self {
            evolution,
            generations,
            parallel_depth: 0,
            cancel: CancellationToken::new(),
        }
    }

    /// Grow both daughter subtrees concurrently for nodes above this
    /// generation.
    pub fn parallel_depth(mut self, depth: usize) -> Self {
        self.parallel_depth = depth;
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Grow the full tree below `founder`.
    pub fn grow(&self, founder: Cell) -> Result<LineageTree> {
        log::info!(
            "growing lineage: {} generations, {} leaves",
            self.generations,
            1usize << self.generations
        );
        let root = self.grow_node(founder)?;
        let tree = LineageTree::new(root)?;
        log::info!("lineage complete: {} events recorded", tree.event_count());
        Ok(tree)
    }

    fn grow_node(&self, mut cell: Cell) -> Result<Node> {
        self.cancel.check(cell.generation())?;
        if cell.generation() >= self.generations {
            return Ok(Node::leaf(cell));
        }

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(cell.seed());
        let left = self.spawn(&cell, &mut rng)?;
        let right = self.spawn(&cell, &mut rng)?;
        // Only leaves keep their overlap tracks
        cell.dna_mut().clear_overlaps();

        let (left, right) = if cell.generation() < self.parallel_depth {
            let (l, r) = rayon::join(|| self.grow_node(left), || self.grow_node(right));
            (l?, r?)
        } else {
            (self.grow_node(left)?, self.grow_node(right)?)
        };
        Node::with_children(cell, left, right)
    }

    /// Create one daughter of `parent` and apply its events.
    fn spawn(&self, parent: &Cell, rng: &mut Xoshiro256PlusPlus) -> Result<Cell> {
        let mut daughter = Cell::descendant(parent, rng.random());
        let count = self
            .evolution
            .event_count
            .sample(self.evolution.average_events, rng)?;
        for _ in 0..count {
            let event = random_event(
                daughter.dna(),
                &self.evolution.event_table,
                &self.evolution.lengths,
                rng,
            )?;
            if let Some(event) = event {
                daughter.push_event(event)?;
            }
        }
        Ok(daughter)
    }
}
