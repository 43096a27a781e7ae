//! Rolling averages over the daily weight series.
//!
//! Three parallel series are produced for every day index:
//!
//! - **cumulative**: mean of every recorded weight up to and including the day.
//!   Gaps are skipped, never counted as zero.
//! - **avg3 / avg5**: trailing window means. A window that contains a single
//!   missing day has no value at all.
//!
//! Each value is rounded to one decimal place when it is computed, and the rule
//! machine compares the rounded values.

use serde::{Deserialize, Serialize};

pub const SHORT_WINDOW: usize = 3;
pub const LONG_WINDOW: usize = 5;

/// Round to one decimal place, ties to even on the exact binary value.
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Average columns for the whole series, index-aligned with the weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingAverages {
    pub cumulative: Vec<Option<f64>>,
    pub avg3: Vec<Option<f64>>,
    pub avg5: Vec<Option<f64>>,
}

impl RollingAverages {
    /// Compute all three columns in one chronological pass.
    pub fn compute(weights: &[Option<f64>]) -> Self {
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut sum = 0.0;
        let mut count = 0usize;

        for w in weights {
            if let Some(w) = w {
                sum += w;
                count += 1;
            }
            cumulative.push((count > 0).then(|| round1(sum / count as f64)));
        }

        Self {
            cumulative,
            avg3: trailing_window(weights, SHORT_WINDOW),
            avg5: trailing_window(weights, LONG_WINDOW),
        }
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }
}

/// Strict trailing mean: defined only when all `window` days are recorded.
pub fn trailing_window(weights: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..weights.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                return None;
            }
            let slice = &weights[i + 1 - window..=i];
            // Summed newest first.
            let total = slice.iter().rev().try_fold(0.0, |acc, w| w.map(|w| acc + w))?;
            Some(round1(total / window as f64))
        })
        .collect()
}
