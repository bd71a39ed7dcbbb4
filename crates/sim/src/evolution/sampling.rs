//! Run-length and event-count samplers.

use rand::Rng;
use rand_distr::{Distribution, Poisson};
use serde::{Deserialize, Serialize};

use super::EventKind;
use crate::errors::{Result, SimulationError};

/// Distribution of multi-base run lengths over `[1, max_run]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LengthDistribution {
    /// Every length in `[1, max_run]` equally likely.
    Uniform,
    /// Exponential with the given rate, truncated to `[1, max_run]`.
    TruncatedExponential { rate: f64 },
    /// `floor(max_run^u)` for `u ~ U(0, 1)`, uniform on a log scale.
    LogUniform,
}

impl Default for LengthDistribution {
    fn default() -> Self {
        Self::TruncatedExponential { rate: 1.0 }
    }
}

impl LengthDistribution {
    pub fn validate(&self) -> Result<()> {
        if let Self::TruncatedExponential { rate } = *self {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(SimulationError::config(format!(
                    "exponential length rate must be positive and finite, got {rate}"
                )));
            }
        }
        Ok(())
    }

    /// Draw a length in `[1, max_run]`.
    ///
    /// # Errors
    /// A `max_run` of zero is an empty domain and reported as a
    /// configuration error.
    pub fn sample<R: Rng + ?Sized>(&self, max_run: usize, rng: &mut R) -> Result<usize> {
        if max_run == 0 {
            return Err(SimulationError::config(
                "run length domain upper bound must be positive",
            ));
        }
        let drawn = match *self {
            Self::Uniform => rng.random_range(1..=max_run),
            Self::TruncatedExponential { rate } => {
                self.validate()?;
                // Inverse CDF of Exp(rate) conditioned on [1, max_run + 1); the
                // floor maps it onto the integers 1..=max_run.
                let span = max_run as f64;
                let u: f64 = rng.random();
                let mass = -(-rate * span).exp_m1();
                let x = 1.0 - (-u * mass).ln_1p() / rate;
                x.floor() as usize
            }
            Self::LogUniform => {
                let u: f64 = rng.random();
                (max_run as f64).powf(u).floor() as usize
            }
        };
        Ok(drawn.clamp(1, max_run))
    }
}

/// Draw a run length for a span of at most `max_run` bases. Spans shorter
/// than 2 force a run of 1 without consulting the distribution.
pub fn run_length<R: Rng + ?Sized>(
    distribution: &LengthDistribution,
    max_run: usize,
    rng: &mut R,
) -> Result<usize> {
    if max_run < 2 {
        return Ok(1);
    }
    distribution.sample(max_run, rng)
}

/// One run-length distribution per multi-base event kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthSamplers {
    pub insertion: LengthDistribution,
    pub deletion: LengthDistribution,
    pub translocation: LengthDistribution,
    pub reciprocal_translocation: LengthDistribution,
    pub duplication: LengthDistribution,
}

impl LengthSamplers {
    /// The same distribution for every kind.
    pub fn all(distribution: LengthDistribution) -> Self {
        Self {
            insertion: distribution,
            deletion: distribution,
            translocation: distribution,
            reciprocal_translocation: distribution,
            duplication: distribution,
        }
    }

    /// Distribution used for `kind`, or `None` for single-base mutations.
    pub fn for_kind(&self, kind: EventKind) -> Option<&LengthDistribution> {
        match kind {
            EventKind::Insertion => Some(&self.insertion),
            EventKind::Deletion => Some(&self.deletion),
            EventKind::Translocation => Some(&self.translocation),
            EventKind::ReciprocalTranslocation => Some(&self.reciprocal_translocation),
            EventKind::Duplication => Some(&self.duplication),
            EventKind::PointInsertion | EventKind::PointDeletion | EventKind::PointReplacement => {
                None
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.insertion.validate()?;
        self.deletion.validate()?;
        self.translocation.validate()?;
        self.reciprocal_translocation.validate()?;
        self.duplication.validate()
    }
}

/// Distribution of the number of events a daughter receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCountDistribution {
    /// Poisson with mean equal to the average.
    #[default]
    Poisson,
    /// Exactly the rounded average.
    Fixed,
}

impl EventCountDistribution {
    pub fn sample<R: Rng + ?Sized>(&self, average: f64, rng: &mut R) -> Result<usize> {
        if !average.is_finite() || average < 0.0 {
            return Err(SimulationError::config(format!(
                "average events per division must be non-negative, got {average}"
            )));
        }
        match self {
            Self::Fixed => Ok(average.round() as usize),
            Self::Poisson if average == 0.0 => Ok(0),
            Self::Poisson => {
                let poisson = Poisson::new(average)
                    .map_err(|e| SimulationError::config(format!("poisson({average}): {e}")))?;
                Ok(poisson.sample(rng) as usize)
            }
        }
    }
}
