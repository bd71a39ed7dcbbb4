use std::fmt;

use super::{ChromosomeId, OverlapTrack};
use crate::base::Sequence;
use crate::errors::{Result, SimulationError};

/// A single linear chromosome.
///
/// The abstract state is the `length`; the concrete `sequence` and the
/// overlap track are optional and, when present, are expected to have the
/// same length.
///
/// # Examples
///
/// ```rust
/// # use cellevo_sim::genome::Chromosome;
/// # use cellevo_sim::base::Sequence;
/// let chr = Chromosome::with_sequence(1, "ACGT".parse::<Sequence>().unwrap()).unwrap();
/// assert_eq!(chr.length(), 4);
/// assert!(chr.is_consistent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chromosome {
    /// 1-based identifier, unique within a genome
    id: ChromosomeId,
    /// Tracked length
    length: usize,
    sequence: Option<Sequence>,
    overlaps: Option<OverlapTrack>,
}

impl Chromosome {
    /// Create an abstract chromosome of `length` bases with no sequence.
    pub fn new(id: ChromosomeId, length: usize) -> Result<Self> {
        if id == 0 {
            return Err(SimulationError::config("chromosome ids are 1-based"));
        }
        Ok(Self {
            id,
            length,
            sequence: None,
            overlaps: None,
        })
    }

    /// Create a chromosome whose length is taken from `sequence`.
    pub fn with_sequence(id: ChromosomeId, sequence: Sequence) -> Result<Self> {
        let mut chr = Self::new(id, sequence.len())?;
        chr.sequence = Some(sequence);
        Ok(chr)
    }

    #[inline]
    pub fn id(&self) -> ChromosomeId {
        self.id
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn sequence(&self) -> Option<&Sequence> {
        self.sequence.as_ref()
    }

    pub fn sequence_mut(&mut self) -> Option<&mut Sequence> {
        self.sequence.as_mut()
    }

    pub fn set_sequence(&mut self, sequence: Sequence) {
        self.sequence = Some(sequence);
    }

    pub fn take_sequence(&mut self) -> Option<Sequence> {
        self.sequence.take()
    }

    pub fn overlaps(&self) -> Option<&OverlapTrack> {
        self.overlaps.as_ref()
    }

    pub fn set_overlaps(&mut self, overlaps: Option<OverlapTrack>) {
        self.overlaps = overlaps;
    }

    pub fn take_overlaps(&mut self) -> Option<OverlapTrack> {
        self.overlaps.take()
    }

    /// Start a zeroed overlap track matching the current length.
    pub fn enable_overlaps(&mut self) {
        self.overlaps = Some(OverlapTrack::zeros(self.length));
    }

    /// Apply `update` to the overlap track, if one is kept. A failed update
    /// or a track that ends up out of step with `length` is discarded.
    pub(crate) fn update_overlaps<F>(&mut self, update: F)
    where
        F: FnOnce(&mut OverlapTrack) -> Option<()>,
    {
        let Some(track) = self.overlaps.as_mut() else {
            return;
        };
        if update(&mut *track).is_none() || track.len() != self.length {
            log::debug!(
                "dropping overlap track of chromosome {} (track length {}, chromosome length {})",
                self.id,
                track.len(),
                self.length
            );
            self.overlaps = None;
        }
    }

    pub(crate) fn grow(&mut self, by: usize) {
        self.length += by;
    }

    /// Shrink the tracked length. Fails rather than wrapping below zero.
    pub(crate) fn shrink(&mut self, by: usize) -> Option<()> {
        self.length = self.length.checked_sub(by)?;
        Some(())
    }

    /// A copy of the abstract state: id, length and overlap track, without
    /// the sequence.
    pub fn abstract_copy(&self) -> Self {
        Self {
            id: self.id,
            length: self.length,
            sequence: None,
            overlaps: self.overlaps.clone(),
        }
    }

    /// True if every materialized track agrees with `length`.
    pub fn is_consistent(&self) -> bool {
        self.sequence.as_ref().is_none_or(|s| s.len() == self.length)
            && self.overlaps.as_ref().is_none_or(|o| o.len() == self.length)
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chr{} (length {})", self.id, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_chromosome_rejects_zero_id() {
        let err = Chromosome::new(0, 10).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_abstract_copy_drops_sequence_only() {
        let mut chr = Chromosome::with_sequence(2, Sequence::from_str("ACGT").unwrap()).unwrap();
        chr.enable_overlaps();
        let copy = chr.abstract_copy();
        assert_eq!(copy.id(), 2);
        assert_eq!(copy.length(), 4);
        assert!(copy.sequence().is_none());
        assert_eq!(copy.overlaps().map(|o| o.len()), Some(4));
    }

    #[test]
    fn test_shrink_never_wraps() {
        let mut chr = Chromosome::new(1, 3).unwrap();
        assert!(chr.shrink(4).is_none());
        assert_eq!(chr.length(), 3);
        chr.shrink(3).unwrap();
        assert!(chr.is_empty());
    }

    #[test]
    fn test_update_overlaps_drops_inconsistent_track() {
        let mut chr = Chromosome::new(1, 3).unwrap();
        chr.enable_overlaps();
        chr.grow(1);
        // Track was not extended alongside the length
        chr.update_overlaps(|track| track.mark(0));
        assert!(chr.overlaps().is_none());
    }

    #[test]
    fn test_consistency_check() {
        let mut chr = Chromosome::with_sequence(1, Sequence::from_str("AC").unwrap()).unwrap();
        assert!(chr.is_consistent());
        chr.grow(1);
        assert!(!chr.is_consistent());
    }
}
