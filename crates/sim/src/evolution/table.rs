use rand::Rng;
use serde::{Deserialize, Serialize};

use super::EventKind;
use crate::errors::{Result, SimulationError};

/// Tolerance used when checking that the table ends at 1.
const END_TOLERANCE: f64 = 1e-9;

/// Cumulative probability table selecting the kind of each event.
///
/// Holds one threshold per kind in `EventKind::ALL` order. A draw
/// `r ~ U(0, 1)` selects the first kind whose threshold exceeds `r`, so a
/// draw equal to a threshold falls into the next bucket up. Thresholds are
/// non-decreasing and the last one is exactly 1; a repeated threshold gives
/// its kind zero probability.
///
/// # Examples
///
/// ```rust
/// # use cellevo_sim::evolution::{EventKind, EventTable};
/// let table = EventTable::only(EventKind::Duplication);
/// assert_eq!(table.select(0.3), EventKind::Duplication);
/// assert_eq!(table.probability(EventKind::Deletion), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct EventTable {
    cumulative: [f64; EventKind::COUNT],
}

impl EventTable {
    /// Build a table from cumulative thresholds.
    pub fn from_cumulative(thresholds: &[f64]) -> Result<Self> {
        let cumulative: [f64; EventKind::COUNT] = thresholds.try_into().map_err(|_| {
            SimulationError::config(format!(
                "event table needs {} thresholds, got {}",
                EventKind::COUNT,
                thresholds.len()
            ))
        })?;

        let mut previous = 0.0;
        for (kind, &c) in EventKind::ALL.iter().zip(&cumulative) {
            if !c.is_finite() || !(0.0..=1.0 + END_TOLERANCE).contains(&c) {
                return Err(SimulationError::config(format!(
                    "threshold for {kind} must lie in [0, 1], got {c}"
                )));
            }
            if c < previous {
                return Err(SimulationError::config(format!(
                    "event table must be non-decreasing ({kind}: {c} < {previous})"
                )));
            }
            previous = c;
        }
        if (previous - 1.0).abs() > END_TOLERANCE {
            return Err(SimulationError::config(format!(
                "event table must end at 1.0, got {previous}"
            )));
        }

        let mut cumulative = cumulative;
        cumulative[EventKind::COUNT - 1] = 1.0;
        Ok(Self { cumulative })
    }

    /// Build a table from relative weights, one per kind.
    pub fn from_weights(weights: &[f64]) -> Result<Self> {
        if weights.len() != EventKind::COUNT {
            return Err(SimulationError::config(format!(
                "event table needs {} weights, got {}",
                EventKind::COUNT,
                weights.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SimulationError::config("event weights must be non-negative"));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(SimulationError::config("event weights sum to zero"));
        }

        let mut running = 0.0;
        let thresholds: Vec<f64> = weights
            .iter()
            .map(|w| {
                running += w / total;
                running.min(1.0)
            })
            .collect();
        let mut table = Self::from_cumulative(&thresholds)?;
        // Kinds after the last positive weight share the final threshold.
        if let Some(last) = weights.iter().rposition(|w| *w > 0.0) {
            for c in &mut table.cumulative[last..] {
                *c = 1.0;
            }
        }
        Ok(table)
    }

    /// Every kind with probability 1/8.
    pub fn uniform() -> Self {
        let mut cumulative = [0.0; EventKind::COUNT];
        for (i, c) in cumulative.iter_mut().enumerate() {
            *c = (i + 1) as f64 / EventKind::COUNT as f64;
        }
        Self { cumulative }
    }

    /// A table that always selects `kind`.
    pub fn only(kind: EventKind) -> Self {
        let mut cumulative = [0.0; EventKind::COUNT];
        for c in &mut cumulative[kind.index()..] {
            *c = 1.0;
        }
        Self { cumulative }
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Probability mass assigned to `kind`.
    pub fn probability(&self, kind: EventKind) -> f64 {
        let i = kind.index();
        let lower = if i == 0 { 0.0 } else { self.cumulative[i - 1] };
        self.cumulative[i] - lower
    }

    /// Map a draw in `[0, 1)` to a kind.
    pub fn select(&self, r: f64) -> EventKind {
        let index = self
            .cumulative
            .iter()
            .position(|&c| r < c)
            .unwrap_or(EventKind::COUNT - 1);
        EventKind::ALL[index]
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> EventKind {
        self.select(rng.random::<f64>())
    }
}

impl Default for EventTable {
    fn default() -> Self {
        Self::uniform()
    }
}

impl TryFrom<Vec<f64>> for EventTable {
    type Error = SimulationError;

    fn try_from(thresholds: Vec<f64>) -> Result<Self> {
        Self::from_cumulative(&thresholds)
    }
}

impl From<EventTable> for Vec<f64> {
    fn from(table: EventTable) -> Self {
        table.cumulative.to_vec()
    }
}
