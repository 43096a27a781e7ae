//! Row model of the tracking sheet and the rendering step.
//!
//! The rule machine produces [`DayOutcome`]s; this module turns them into cell
//! text. Empty judgments and notes never overwrite what is already in a cell,
//! so hand-written annotations survive every run.

use serde::{Deserialize, Serialize};

use crate::averages::RollingAverages;
use crate::rules::DayOutcome;
use crate::series::RawCell;

/// Note marker for the first day on which reductions are judged.
pub const JUDGMENT_START_MARKER: &str = "reduction-judgment start";

/// One stored row of the sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayRow {
    pub index: usize,
    pub date: Option<String>,
    pub weight: RawCell,
    pub cumulative_avg: Option<String>,
    pub avg3: Option<String>,
    pub avg5: Option<String>,
    pub judgment: Option<String>,
    pub note: Option<String>,
    pub flagged: bool,
}

impl DayRow {
    pub fn blank(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }
}

/// Cell values one run writes for one day.
///
/// `judgment` and `note` are `None` when the cell must be left as it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDay {
    pub index: usize,
    pub cumulative_avg: Option<String>,
    pub avg3: Option<String>,
    pub avg5: Option<String>,
    pub judgment: Option<String>,
    pub note: Option<String>,
    pub flagged: bool,
}

/// Fixed one-decimal text, or blank.
pub fn render_average(value: Option<f64>) -> Option<String> {
    value.map(|v| format!("{v:.1}"))
}

/// Note text after ensuring the judgment-start marker leads it.
pub fn with_marker(existing: Option<&str>) -> String {
    match existing.filter(|s| !s.trim().is_empty()) {
        None => JUDGMENT_START_MARKER.to_string(),
        Some(text) if text.contains(JUDGMENT_START_MARKER) => text.to_string(),
        Some(text) => format!("{JUDGMENT_START_MARKER} / {text}"),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// Render one day against the row currently stored for it.
pub fn render_day(
    row: &DayRow,
    averages: &RollingAverages,
    outcome: &DayOutcome,
) -> RenderedDay {
    let i = outcome.index;
    let mut note = None;
    if outcome.judgment_start_marker {
        note = Some(with_marker(row.note.as_deref()));
    }
    if let Some(text) = non_empty(outcome.note.clone()) {
        note = Some(text);
    }

    RenderedDay {
        index: i,
        cumulative_avg: render_average(averages.cumulative.get(i).copied().flatten()),
        avg3: render_average(averages.avg3.get(i).copied().flatten()),
        avg5: render_average(averages.avg5.get(i).copied().flatten()),
        judgment: outcome.judgment.map(|j| j.label().to_string()),
        note,
        flagged: outcome.flagged,
    }
}

/// Render the whole sheet. `rows` and `outcomes` are index-aligned.
pub fn render(
    rows: &[DayRow],
    averages: &RollingAverages,
    outcomes: &[DayOutcome],
) -> Vec<RenderedDay> {
    outcomes
        .iter()
        .map(|outcome| {
            let blank = DayRow::blank(outcome.index);
            let row = rows.get(outcome.index).unwrap_or(&blank);
            render_day(row, averages, outcome)
        })
        .collect()
}

/// Apply rendered cells onto rows, leaving untouched cells alone.
pub fn apply(rows: &mut [DayRow], rendered: &[RenderedDay]) {
    for day in rendered {
        let Some(row) = rows.get_mut(day.index) else {
            continue;
        };
        row.cumulative_avg = day.cumulative_avg.clone();
        row.avg3 = day.avg3.clone();
        row.avg5 = day.avg5.clone();
        if let Some(judgment) = &day.judgment {
            row.judgment = Some(judgment.clone());
        }
        if let Some(note) = &day.note {
            row.note = Some(note.clone());
        }
        row.flagged = day.flagged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Judgment;

    fn outcome(index: usize) -> DayOutcome {
        DayOutcome {
            index,
            feedings: 3,
            judgment: None,
            note: None,
            flagged: false,
            judgment_start_marker: false,
        }
    }

    #[test]
    fn averages_render_with_one_decimal() {
        assert_eq!(render_average(Some(81.0)).as_deref(), Some("81.0"));
        assert_eq!(render_average(Some(0.0)).as_deref(), Some("0.0"));
        assert_eq!(render_average(None), None);
    }

    #[test]
    fn marker_is_prepended_once() {
        assert_eq!(with_marker(None), JUDGMENT_START_MARKER);
        assert_eq!(with_marker(Some("  ")), JUDGMENT_START_MARKER);
        let once = with_marker(Some("vet visit"));
        assert_eq!(once, format!("{JUDGMENT_START_MARKER} / vet visit"));
        assert_eq!(with_marker(Some(&once)), once);
    }

    #[test]
    fn quiet_day_leaves_text_cells_alone() {
        let mut rows = vec![DayRow {
            judgment: Some("hand-written".into()),
            note: Some("keep me".into()),
            flagged: true,
            ..DayRow::blank(0)
        }];
        let averages = RollingAverages::compute(&[Some(10.0)]);
        let rendered = render(&rows, &averages, &[outcome(0)]);
        assert_eq!(rendered[0].judgment, None);
        assert_eq!(rendered[0].note, None);

        apply(&mut rows, &rendered);
        assert_eq!(rows[0].judgment.as_deref(), Some("hand-written"));
        assert_eq!(rows[0].note.as_deref(), Some("keep me"));
        assert_eq!(rows[0].cumulative_avg.as_deref(), Some("10.0"));
        assert!(!rows[0].flagged);
    }

    #[test]
    fn judgment_note_replaces_marker() {
        let rows = vec![DayRow::blank(0)];
        let averages = RollingAverages::compute(&[Some(50.0)]);
        let mut o = outcome(0);
        o.judgment_start_marker = true;
        o.judgment = Some(Judgment::Revert);
        o.note = Some("weight drop".into());
        o.flagged = true;
        let rendered = render(&rows, &averages, &[o]);
        assert_eq!(rendered[0].judgment.as_deref(), Some("revert"));
        assert_eq!(rendered[0].note.as_deref(), Some("weight drop"));
        assert!(rendered[0].flagged);
    }
}
