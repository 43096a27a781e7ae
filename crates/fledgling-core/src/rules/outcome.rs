use serde::{Deserialize, Serialize};

/// Label the rule machine writes into the judgment column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    /// Weight fell below the floor; back to the maximum feeding count.
    Revert,
    ThreeToTwo,
    TwoToOne,
    OneToZero,
}

impl Judgment {
    pub fn label(&self) -> &'static str {
        match self {
            Judgment::Revert => "revert",
            Judgment::ThreeToTwo => "3→2 candidate",
            Judgment::TwoToOne => "2→1 candidate",
            Judgment::OneToZero => "1→0 candidate",
        }
    }

    /// Feeding count this judgment schedules for the following day.
    pub fn target(&self) -> u8 {
        match self {
            Judgment::Revert => super::MAX_FEEDINGS,
            Judgment::ThreeToTwo => 2,
            Judgment::TwoToOne => 1,
            Judgment::OneToZero => 0,
        }
    }
}

impl std::fmt::Display for Judgment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured result of evaluating one day. Carries no rendering concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOutcome {
    pub index: usize,
    /// Feeding count in effect while this day was evaluated.
    pub feedings: u8,
    pub judgment: Option<Judgment>,
    pub note: Option<String>,
    pub flagged: bool,
    /// Whether the reduction-judgment start marker belongs on this day's note.
    pub judgment_start_marker: bool,
}

impl DayOutcome {
    pub(crate) fn quiet(index: usize, feedings: u8, judgment_start_marker: bool) -> Self {
        Self {
            index,
            feedings,
            judgment: None,
            note: None,
            flagged: false,
            judgment_start_marker,
        }
    }

    /// Feeding count scheduled for tomorrow, if this day fired a transition.
    pub fn scheduled(&self) -> Option<u8> {
        self.judgment.map(|j| j.target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_targets() {
        assert_eq!(Judgment::Revert.label(), "revert");
        assert_eq!(Judgment::Revert.target(), 3);
        assert_eq!(Judgment::ThreeToTwo.to_string(), "3→2 candidate");
        assert_eq!(Judgment::OneToZero.target(), 0);
    }
}
