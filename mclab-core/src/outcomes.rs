//! Validated historical trade outcomes.
//!
//! An [`OutcomeSet`] is the immutable input to the whole engine: an ordered
//! sequence of per-trade results in a consistent unit (R-multiples or
//! percentage returns). Validation happens here, at the construction
//! boundary — a non-finite value is rejected, never filtered, because
//! dropping rows would change the sample size and bias every resample
//! drawn from it.
//!
//! The bootstrap treats these outcomes as exchangeable draws: any serial
//! correlation or regime-dependence in the real trade sequence is
//! deliberately ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::{mean_f64, std_dev};

/// Errors raised while constructing an [`OutcomeSet`].
#[derive(Debug, Error)]
pub enum OutcomeError {
    #[error("empty outcome set: at least one historical trade is required")]
    Empty,
    #[error("non-finite outcome at index {index}: {value}")]
    NonFinite { index: usize, value: f64 },
}

/// Validated, immutable ordered sequence of historical trade outcomes.
///
/// Size M >= 1, every value finite. Owned by the caller; the engine only
/// ever reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeSet {
    values: Vec<f64>,
}

impl OutcomeSet {
    /// Validate and take ownership of a sequence of trade outcomes.
    pub fn new(values: Vec<f64>) -> Result<Self, OutcomeError> {
        if values.is_empty() {
            return Err(OutcomeError::Empty);
        }
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(OutcomeError::NonFinite { index, value });
            }
        }
        Ok(Self { values })
    }

    /// Number of historical trades (M).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The outcomes in their original order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Descriptive statistics of the historical sample.
    pub fn summary(&self) -> SampleSummary {
        let wins = self.values.iter().filter(|&&v| v > 0.0).count();
        let min = self
            .values
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        let max = self
            .values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        SampleSummary {
            count: self.values.len(),
            mean: mean_f64(&self.values),
            std_dev: std_dev(&self.values),
            min,
            max,
            sum: self.values.iter().sum(),
            win_rate: wins as f64 / self.values.len() as f64,
        }
    }
}

/// Descriptive statistics of the historical outcome sample.
///
/// Echoed into the final report so a consumer can see what the resamples
/// were drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    /// Fraction of historical outcomes that are strictly positive.
    pub win_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert!(matches!(OutcomeSet::new(vec![]), Err(OutcomeError::Empty)));
    }

    #[test]
    fn rejects_nan() {
        let err = OutcomeSet::new(vec![1.0, f64::NAN, 2.0]).unwrap_err();
        match err {
            OutcomeError::NonFinite { index, .. } => assert_eq!(index, 1),
            other => panic!("expected NonFinite, got {other:?}"),
        }
    }

    #[test]
    fn rejects_infinity() {
        let err = OutcomeSet::new(vec![f64::INFINITY]).unwrap_err();
        assert!(matches!(err, OutcomeError::NonFinite { index: 0, .. }));

        let err = OutcomeSet::new(vec![0.5, f64::NEG_INFINITY]).unwrap_err();
        assert!(matches!(err, OutcomeError::NonFinite { index: 1, .. }));
    }

    #[test]
    fn preserves_order() {
        let set = OutcomeSet::new(vec![3.0, -1.0, 2.0]).unwrap();
        assert_eq!(set.values(), &[3.0, -1.0, 2.0]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn summary_known_values() {
        let set = OutcomeSet::new(vec![1.0, -1.0, 2.0, -1.0, 3.0]).unwrap();
        let s = set.summary();
        assert_eq!(s.count, 5);
        assert!((s.mean - 0.8).abs() < 1e-12);
        assert!((s.sum - 4.0).abs() < 1e-12);
        assert_eq!(s.min, -1.0);
        assert_eq!(s.max, 3.0);
        assert!((s.win_rate - 0.6).abs() < 1e-12);
    }

    #[test]
    fn summary_zero_is_not_a_win() {
        let set = OutcomeSet::new(vec![0.0, 1.0]).unwrap();
        assert!((set.summary().win_rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn summary_single_outcome() {
        let set = OutcomeSet::new(vec![2.0]).unwrap();
        let s = set.summary();
        assert_eq!(s.count, 1);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 2.0);
    }
}
