//! Feeding-count rule machine.
//!
//! The machine walks the day series in order and decides when the number of
//! daily assist-feedings drops (3 → 2 → 1 → 0), or jumps back to the maximum
//! when the bird's weight falls under the configured floor.
//!
//! ## State Transitions
//!
//! ```text
//! 3 --(3 qualifying days)--> 2 --(5 days)--> 1 --(7 days)--> 0
//! 2, 1, 0 --(weight below floor)--> 3
//! ```
//!
//! Every transition decided on day `i` takes effect on day `i + 1`.

mod machine;
mod outcome;
mod state;

pub use machine::{DayInput, Evaluation, RuleMachine};
pub use outcome::{DayOutcome, Judgment};
pub use state::{SessionState, StreakHistory, MAX_FEEDINGS};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Thresholds and streak lengths driving the rule machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Day index whose note carries the reduction-judgment start marker.
    #[serde(default = "default_judgment_start_day")]
    pub judgment_start_day: usize,
    /// First day index allowed to qualify for 3 → 2.
    #[serde(default = "default_min_day_3to2")]
    pub min_day_3to2: usize,
    /// Grams a value may sit below the cumulative average and still qualify.
    #[serde(default = "default_tolerance_g")]
    pub tolerance_g: f64,
    #[serde(default = "default_streak_3to2")]
    pub streak_3to2: usize,
    #[serde(default = "default_streak_2to1")]
    pub streak_2to1: usize,
    #[serde(default = "default_streak_1to0")]
    pub streak_1to0: usize,
    /// Scatter-feed ration as a fraction of body weight.
    #[serde(default = "default_pellet_ratio")]
    pub pellet_ratio: f64,
    #[serde(default = "default_initial_feedings")]
    pub initial_feedings: u8,
}

fn default_judgment_start_day() -> usize {
    40
}
fn default_min_day_3to2() -> usize {
    41
}
fn default_tolerance_g() -> f64 {
    2.0
}
fn default_streak_3to2() -> usize {
    3
}
fn default_streak_2to1() -> usize {
    5
}
fn default_streak_1to0() -> usize {
    7
}
fn default_pellet_ratio() -> f64 {
    0.1
}
fn default_initial_feedings() -> u8 {
    MAX_FEEDINGS
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            judgment_start_day: default_judgment_start_day(),
            min_day_3to2: default_min_day_3to2(),
            tolerance_g: default_tolerance_g(),
            streak_3to2: default_streak_3to2(),
            streak_2to1: default_streak_2to1(),
            streak_1to0: default_streak_1to0(),
            pellet_ratio: default_pellet_ratio(),
            initial_feedings: default_initial_feedings(),
        }
    }
}

impl RuleConfig {
    /// Reject settings the machine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: format!("rules.{key}"),
            message: message.to_string(),
        };

        for (key, len) in [
            ("streak_3to2", self.streak_3to2),
            ("streak_2to1", self.streak_2to1),
            ("streak_1to0", self.streak_1to0),
        ] {
            if len == 0 {
                return Err(invalid(key, "streak length must be at least 1"));
            }
        }
        if !self.tolerance_g.is_finite() || self.tolerance_g < 0.0 {
            return Err(invalid("tolerance_g", "must be a non-negative number of grams"));
        }
        if !(self.pellet_ratio > 0.0 && self.pellet_ratio <= 1.0) {
            return Err(invalid("pellet_ratio", "must be in (0, 1]"));
        }
        if !(1..=MAX_FEEDINGS).contains(&self.initial_feedings) {
            return Err(invalid("initial_feedings", "must be 1, 2 or 3"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RuleConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.min_day_3to2, 41);
        assert_eq!(cfg.streak_2to1, 5);
    }

    #[test]
    fn zero_streak_is_rejected() {
        let cfg = RuleConfig {
            streak_1to0: 0,
            ..RuleConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("rules.streak_1to0"));
    }

    #[test]
    fn pellet_ratio_must_be_a_fraction() {
        let cfg = RuleConfig {
            pellet_ratio: 1.5,
            ..RuleConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn initial_feedings_within_range() {
        let cfg = RuleConfig {
            initial_feedings: 4,
            ..RuleConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
