use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use rand::Rng;

use super::Nucleotide;
use crate::errors::{InvalidSequence, OutOfBounds};

/// Mutable DNA sequence backed by a vector of Nucleotides.
///
/// This is the concrete representation of a chromosome. All positional
/// edits are 0-indexed over half-open ranges and bounds-checked: a splice
/// that would reach outside the sequence returns `OutOfBounds` and leaves the
/// sequence untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sequence(Vec<Nucleotide>);

impl Sequence {
    /// Create a new, empty `Sequence`.
    ///
    /// ```rust
    /// # use cellevo_sim::base::Sequence;
    /// let seq = Sequence::new();
    /// assert_eq!(seq.len(), 0);
    /// ```
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a `Sequence` with reserved capacity for `capacity` bases.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Create a `Sequence` from a vector of `Nucleotide`s.
    pub fn from_nucleotides(nucleotides: Vec<Nucleotide>) -> Self {
        Self(nucleotides)
    }

    /// A sequence of `len` copies of `base`.
    pub fn uniform(base: Nucleotide, len: usize) -> Self {
        Self(vec![base; len])
    }

    /// A sequence of `len` bases drawn uniformly over ACGT.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self((0..len).map(|_| Nucleotide::random(rng)).collect())
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the `Nucleotide` at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Nucleotide> {
        self.0.get(index).copied()
    }

    /// Set the base at `index` to `base`.
    #[inline]
    pub fn set(&mut self, index: usize, base: Nucleotide) -> Result<(), OutOfBounds> {
        let len = self.len();
        self.0
            .get_mut(index)
            .map(|slot| *slot = base)
            .ok_or(OutOfBounds { index, len })
    }

    #[inline]
    pub fn as_slice(&self) -> &[Nucleotide] {
        &self.0
    }

    #[inline]
    pub fn push(&mut self, base: Nucleotide) {
        self.0.push(base);
    }

    /// Insert `base` before position `index` (`index == len` appends).
    pub fn insert(&mut self, index: usize, base: Nucleotide) -> Result<(), OutOfBounds> {
        self.check_insertion_point(index)?;
        self.0.insert(index, base);
        Ok(())
    }

    /// Insert `bases` so that the first of them lands at `index`.
    pub fn insert_slice(&mut self, index: usize, bases: &[Nucleotide]) -> Result<(), OutOfBounds> {
        self.check_insertion_point(index)?;
        self.0.splice(index..index, bases.iter().copied());
        Ok(())
    }

    /// Remove and return the base at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Nucleotide, OutOfBounds> {
        if index >= self.len() {
            return Err(OutOfBounds {
                index,
                len: self.len(),
            });
        }
        Ok(self.0.remove(index))
    }

    /// Copy the bases in `[start, start + len)`.
    pub fn copy_range(&self, start: usize, len: usize) -> Result<Vec<Nucleotide>, OutOfBounds> {
        let range = self.checked_range(start, len)?;
        Ok(self.0[range].to_vec())
    }

    /// Excise `[start, start + len)` and return the removed bases.
    pub fn excise(&mut self, start: usize, len: usize) -> Result<Vec<Nucleotide>, OutOfBounds> {
        let range = self.checked_range(start, len)?;
        Ok(self.0.drain(range).collect())
    }

    fn check_insertion_point(&self, index: usize) -> Result<(), OutOfBounds> {
        if index > self.len() {
            return Err(OutOfBounds {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }

    fn checked_range(&self, start: usize, len: usize) -> Result<Range<usize>, OutOfBounds> {
        let end = start.checked_add(len).ok_or(OutOfBounds {
            index: usize::MAX,
            len: self.len(),
        })?;
        if end > self.len() {
            return Err(OutOfBounds {
                index: end.saturating_sub(1).max(start),
                len: self.len(),
            });
        }
        Ok(start..end)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &nuc in &self.0 {
            write!(f, "{}", nuc.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Sequence {
    type Err = InvalidSequence;

    /// Parse a textual representation (e.g. "ACGT"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data: Result<Vec<Nucleotide>, _> = s
            .chars()
            .map(|c| {
                u8::try_from(c)
                    .ok()
                    .and_then(Nucleotide::from_ascii)
                    .ok_or(InvalidSequence::InvalidChar(c))
            })
            .collect();

        Ok(Self(data?))
    }
}

impl From<Vec<Nucleotide>> for Sequence {
    fn from(nucleotides: Vec<Nucleotide>) -> Self {
        Self(nucleotides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn seq(s: &str) -> Sequence {
        Sequence::from_str(s).unwrap()
    }

    #[test]
    fn test_sequence_from_str_valid_and_lowercase() {
        assert_eq!(seq("ACGT").to_string(), "ACGT");
        assert_eq!(seq("acgt").to_string(), "ACGT");
    }

    #[test]
    fn test_sequence_from_str_invalid() {
        match Sequence::from_str("ACGN").unwrap_err() {
            InvalidSequence::InvalidChar(c) => assert_eq!(c, 'N'),
            other => panic!("Expected InvalidChar error, got {other:?}"),
        }
        // Multi-byte characters are rejected rather than truncated
        assert!(Sequence::from_str("AĀ").is_err());
    }

    #[test]
    fn test_sequence_set_out_of_bounds() {
        let mut s = seq("ACGT");
        s.set(1, Nucleotide::T).unwrap();
        assert_eq!(s.to_string(), "ATGT");
        let err = s.set(10, Nucleotide::A).unwrap_err();
        assert_eq!(err.index, 10);
        assert_eq!(err.len, 4);
    }

    #[test]
    fn test_insert_at_ends_and_middle() {
        let mut s = seq("CG");
        s.insert(0, Nucleotide::A).unwrap();
        s.insert(3, Nucleotide::T).unwrap();
        assert_eq!(s.to_string(), "ACGT");
        assert!(s.insert(6, Nucleotide::A).is_err());
        assert_eq!(s.to_string(), "ACGT");
    }

    #[test]
    fn test_insert_slice() {
        let mut s = seq("AAAA");
        s.insert_slice(2, &[Nucleotide::G, Nucleotide::C]).unwrap();
        assert_eq!(s.to_string(), "AAGCAA");
    }

    #[test]
    fn test_remove() {
        let mut s = seq("ACGT");
        assert_eq!(s.remove(1), Ok(Nucleotide::C));
        assert_eq!(s.to_string(), "AGT");
        assert!(s.remove(3).is_err());
    }

    #[test]
    fn test_excise_and_copy_range() {
        let mut s = seq("ACGTACGT");
        assert_eq!(Sequence::from(s.copy_range(2, 3).unwrap()).to_string(), "GTA");
        let removed = s.excise(2, 3).unwrap();
        assert_eq!(Sequence::from(removed).to_string(), "GTA");
        assert_eq!(s.to_string(), "ACCGT");
    }

    #[test]
    fn test_range_checks_leave_sequence_untouched() {
        let mut s = seq("ACGT");
        assert!(s.excise(3, 2).is_err());
        assert!(s.copy_range(0, 5).is_err());
        assert!(s.excise(usize::MAX, 2).is_err());
        assert_eq!(s.to_string(), "ACGT");
        // Empty range at the end is allowed
        assert!(s.excise(4, 0).unwrap().is_empty());
    }

    #[test]
    fn test_uniform_and_random() {
        assert_eq!(Sequence::uniform(Nucleotide::A, 3).to_string(), "AAA");
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        assert_eq!(Sequence::random(50, &mut rng).len(), 50);
    }
}
