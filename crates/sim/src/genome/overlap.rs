use std::fmt;

/// Per-base counters recording how often each position was touched by an
/// event boundary, a moved span or an inserted base.
///
/// The track is advisory: every operation returns `None` instead of failing
/// when the requested span does not fit, and callers drop the track at that
/// point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlapTrack(Vec<u32>);

impl OverlapTrack {
    /// A track of `len` zero counters.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    pub fn from_counts(counts: Vec<u32>) -> Self {
        Self(counts)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Highest count on the track (0 for an empty track).
    pub fn max(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Increment the counters either side of a cut made before `position`:
    /// `position - 1` and `position`, whichever exist.
    pub fn mark_boundary(&mut self, position: usize) {
        if let Some(prev) = position.checked_sub(1).and_then(|p| self.0.get_mut(p)) {
            *prev = prev.saturating_add(1);
        }
        if let Some(at) = self.0.get_mut(position) {
            *at = at.saturating_add(1);
        }
    }

    /// Increment a single counter.
    pub fn mark(&mut self, position: usize) -> Option<()> {
        let slot = self.0.get_mut(position)?;
        *slot = slot.saturating_add(1);
        Some(())
    }

    /// Insert `len` fresh counters set to 1 at `position`.
    pub fn insert_marked(&mut self, position: usize, len: usize) -> Option<()> {
        if position > self.len() {
            return None;
        }
        self.0.splice(position..position, std::iter::repeat_n(1, len));
        Some(())
    }

    /// Insert `counts` at `position`.
    pub fn insert_counts(&mut self, position: usize, counts: &[u32]) -> Option<()> {
        if position > self.len() {
            return None;
        }
        self.0.splice(position..position, counts.iter().copied());
        Some(())
    }

    /// Remove `[start, start + len)` and return the removed counters, each
    /// incremented once for being moved.
    pub fn excise_marked(&mut self, start: usize, len: usize) -> Option<Vec<u32>> {
        let end = start.checked_add(len)?;
        if end > self.len() {
            return None;
        }
        Some(self.0.drain(start..end).map(|c| c.saturating_add(1)).collect())
    }

    /// Copy `[start, start + len)`, each counter incremented once.
    pub fn copy_marked(&self, start: usize, len: usize) -> Option<Vec<u32>> {
        let end = start.checked_add(len)?;
        self.0
            .get(start..end)
            .map(|span| span.iter().map(|c| c.saturating_add(1)).collect())
    }

    /// Remove `[start, start + len)` without keeping the counters.
    pub fn remove(&mut self, start: usize, len: usize) -> Option<()> {
        let end = start.checked_add(len)?;
        if end > self.len() {
            return None;
        }
        self.0.drain(start..end);
        Some(())
    }
}

impl fmt::Display for OverlapTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, count) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "\t")?;
            }
            write!(f, "{count}")?;
        }
        Ok(())
    }
}
