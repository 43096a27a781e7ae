//! Per-day evaluation and the fold over the whole series.

use serde::{Deserialize, Serialize};

use super::outcome::{DayOutcome, Judgment};
use super::state::{SessionState, MAX_FEEDINGS};
use super::RuleConfig;
use crate::averages::{round1, RollingAverages};

/// Everything the machine reads for one day. The 5-day mean is rendered but
/// never judged on, so it is not part of the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayInput {
    pub index: usize,
    pub weight: Option<f64>,
    pub cumulative: Option<f64>,
    pub avg3: Option<f64>,
}

impl DayInput {
    /// Zip the weights with their averages, one input per day.
    pub fn series(weights: &[Option<f64>], averages: &RollingAverages) -> Vec<DayInput> {
        weights
            .iter()
            .enumerate()
            .map(|(index, &weight)| DayInput {
                index,
                weight,
                cumulative: averages.cumulative.get(index).copied().flatten(),
                avg3: averages.avg3.get(index).copied().flatten(),
            })
            .collect()
    }
}

/// Result of running the machine over a full series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub outcomes: Vec<DayOutcome>,
    pub final_state: SessionState,
}

/// Stateless rule set; all mutable state lives in [`SessionState`].
#[derive(Debug, Clone, Default)]
pub struct RuleMachine {
    config: RuleConfig,
    lower_bound: Option<f64>,
}

impl RuleMachine {
    pub fn new(config: RuleConfig, lower_bound: Option<f64>) -> Self {
        Self {
            config,
            lower_bound,
        }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn lower_bound(&self) -> Option<f64> {
        self.lower_bound
    }

    pub fn initial_state(&self) -> SessionState {
        SessionState::new(self.config.initial_feedings)
    }

    /// Evaluate every day in chronological order.
    pub fn evaluate(&self, days: &[DayInput]) -> Evaluation {
        let (final_state, outcomes) = days.iter().fold(
            (self.initial_state(), Vec::with_capacity(days.len())),
            |(state, mut outcomes), day| {
                let (next, outcome) = self.step(state, day);
                outcomes.push(outcome);
                (next, outcomes)
            },
        );
        Evaluation {
            outcomes,
            final_state,
        }
    }

    /// Evaluate a single day, returning the state to carry into the next one.
    pub fn step(&self, mut state: SessionState, day: &DayInput) -> (SessionState, DayOutcome) {
        state.apply_pending();

        let marker = day.index == self.config.judgment_start_day;
        let mut outcome = DayOutcome::quiet(day.index, state.feeding_count, marker);

        let Some(weight) = day.weight else {
            state.break_streaks();
            return (state, outcome);
        };

        if self.below_floor(state.feeding_count, weight) {
            state.break_streaks();
            state.pending_override = Some(MAX_FEEDINGS);
            outcome.judgment = Some(Judgment::Revert);
            outcome.note = Some(self.note_for(Judgment::Revert, weight));
            outcome.flagged = true;
            return (state, outcome);
        }

        let meets3to2 = self.meets_3to2(day, weight);
        let meets2to1 = state.feeding_count == 2 && self.holds_average(day, weight);
        let meets1to0 = state.feeding_count == 1 && self.holds_average(day, weight);
        state.push_streaks(meets3to2, meets2to1, meets1to0);

        let fired = if state.feeding_count == 2
            && state.streak2.trailing_all(self.config.streak_2to1)
        {
            Some(Judgment::TwoToOne)
        } else if state.feeding_count == 1
            && state.streak1.trailing_all(self.config.streak_1to0)
        {
            Some(Judgment::OneToZero)
        } else if state.feeding_count >= MAX_FEEDINGS
            && state.streak3.trailing_all(self.config.streak_3to2)
        {
            Some(Judgment::ThreeToTwo)
        } else {
            None
        };

        if let Some(judgment) = fired {
            state.pending_override = Some(judgment.target());
            outcome.judgment = Some(judgment);
            outcome.note = Some(self.note_for(judgment, weight));
        }
        (state, outcome)
    }

    /// Emergency condition: reduced feedings and a weight under the floor.
    fn below_floor(&self, feeding_count: u8, weight: f64) -> bool {
        matches!(self.lower_bound, Some(low) if feeding_count < MAX_FEEDINGS && weight < low)
    }

    fn meets_3to2(&self, day: &DayInput, weight: f64) -> bool {
        if day.index < self.config.min_day_3to2 {
            return false;
        }
        let (Some(avg3), Some(cumulative)) = (day.avg3, day.cumulative) else {
            return false;
        };
        // No floor configured: the weight clause is disabled.
        let above_floor = self.lower_bound.map_or(true, |low| weight >= low);
        avg3 >= cumulative - self.config.tolerance_g && above_floor
    }

    fn holds_average(&self, day: &DayInput, weight: f64) -> bool {
        day.cumulative
            .is_some_and(|cumulative| weight >= cumulative - self.config.tolerance_g)
    }

    fn pellet(&self, weight: f64) -> String {
        format!("{:.1}g", round1(weight * self.config.pellet_ratio))
    }

    fn note_for(&self, judgment: Judgment, weight: f64) -> String {
        match judgment {
            Judgment::Revert => "weight drop → increase feedings by one starting tomorrow".into(),
            Judgment::ThreeToTwo => format!(
                "from tomorrow: 2 assist-feedings / scatter-feed {}",
                self.pellet(weight)
            ),
            Judgment::TwoToOne => format!(
                "from tomorrow: 1 assist-feeding / scatter-feed {}",
                self.pellet(weight)
            ),
            Judgment::OneToZero => "from tomorrow: no assist-feeding (fully independent)".into(),
        }
    }
}
