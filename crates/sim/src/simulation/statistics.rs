//! Length statistics over the final generation.

use serde::{Deserialize, Serialize};

use super::LineageTree;
use crate::genome::Cell;

/// Mean and population standard deviation of chromosome lengths across
/// leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthStatistics {
    pub leaf_count: usize,
    /// Mean of the summed chromosome lengths per leaf.
    pub mean_genome_length: f64,
    /// Indexed by chromosome id - 1.
    pub mean_chromosome_length: Vec<f64>,
    /// Population standard deviation (divides by the leaf count).
    pub stddev_chromosome_length: Vec<f64>,
}

impl LengthStatistics {
    /// Aggregate over the leaves of `tree`.
    pub fn from_tree(tree: &LineageTree) -> Self {
        // A tree always has at least one leaf
        Self::from_cells(tree.leaves()).unwrap_or_else(|| Self::empty(0))
    }

    /// Aggregate over `cells`, or `None` if there are none.
    pub fn from_cells<'a, I>(cells: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Cell>,
        I::IntoIter: Clone,
    {
        let cells = cells.into_iter();
        let chromosomes = cells.clone().next()?.dna().chromosome_count();

        let mut stats = Self::empty(chromosomes);
        let mut genome_sum = 0.0;
        for cell in cells.clone() {
            stats.leaf_count += 1;
            genome_sum += cell.dna().total_length() as f64;
            for (sum, len) in stats.mean_chromosome_length.iter_mut().zip(cell.dna().lengths()) {
                *sum += len as f64;
            }
        }
        let n = stats.leaf_count as f64;
        stats.mean_genome_length = genome_sum / n;
        for mean in &mut stats.mean_chromosome_length {
            *mean /= n;
        }

        for cell in cells {
            let lengths = cell.dna().lengths();
            for ((acc, mean), len) in stats
                .stddev_chromosome_length
                .iter_mut()
                .zip(&stats.mean_chromosome_length)
                .zip(lengths)
            {
                let d = len as f64 - mean;
                *acc += d * d;
            }
        }
        for acc in &mut stats.stddev_chromosome_length {
            *acc = (*acc / n).sqrt();
        }
        Some(stats)
    }

    fn empty(chromosomes: usize) -> Self {
        Self {
            leaf_count: 0,
            mean_genome_length: 0.0,
            mean_chromosome_length: vec![0.0; chromosomes],
            stddev_chromosome_length: vec![0.0; chromosomes],
        }
    }
}
