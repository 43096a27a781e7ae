use serde::{Deserialize, Serialize};

/// Highest number of daily assist-feedings; also the emergency target.
pub const MAX_FEEDINGS: u8 = 3;

/// Append-only record of whether each day met one transition's condition.
///
/// Only the trailing window is ever inspected, so the history is never reset.
/// A `false` entry breaks any run of qualifying days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakHistory {
    entries: Vec<bool>,
}

impl StreakHistory {
    pub fn push(&mut self, qualified: bool) {
        self.entries.push(qualified);
    }

    /// True when at least `k` days are recorded and the last `k` all qualified.
    pub fn trailing_all(&self, k: usize) -> bool {
        self.entries.len() >= k && self.entries[self.entries.len() - k..].iter().all(|&q| q)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[bool] {
        &self.entries
    }
}

/// Mutable state threaded through the per-day fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Assist-feedings currently prescribed.
    pub feeding_count: u8,
    /// Count decided today, applied at the start of tomorrow.
    pub pending_override: Option<u8>,
    pub streak3: StreakHistory,
    pub streak2: StreakHistory,
    pub streak1: StreakHistory,
}

impl SessionState {
    pub fn new(feeding_count: u8) -> Self {
        Self {
            feeding_count,
            pending_override: None,
            streak3: StreakHistory::default(),
            streak2: StreakHistory::default(),
            streak1: StreakHistory::default(),
        }
    }

    /// Move yesterday's decision into effect.
    pub(crate) fn apply_pending(&mut self) {
        if let Some(next) = self.pending_override.take() {
            self.feeding_count = next;
        }
    }

    pub(crate) fn push_streaks(&mut self, meets3to2: bool, meets2to1: bool, meets1to0: bool) {
        self.streak3.push(meets3to2);
        self.streak2.push(meets2to1);
        self.streak1.push(meets1to0);
    }

    pub(crate) fn break_streaks(&mut self) {
        self.push_streaks(false, false, false);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(MAX_FEEDINGS)
    }
}
