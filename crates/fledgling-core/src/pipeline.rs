//! One full recomputation of the sheet.
//!
//! Every run rebuilds all averages and judgments from the current snapshot of
//! weights. Nothing is written unless the whole computation succeeds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::averages::RollingAverages;
use crate::calendar::{needs_regeneration, Calendar};
use crate::error::{ConfigError, Result};
use crate::rules::{DayInput, Judgment, RuleMachine};
use crate::series::{parse_date, parse_weight, RawCell};
use crate::sheet::{self, RenderedDay};
use crate::storage::{Config, Ledger, LedgerKey};

/// A transition fired during the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub day: usize,
    pub judgment: Judgment,
    /// Feeding count that applies from the following day.
    pub scheduled: u8,
}

/// Where the bird stands after the last tracked day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub birth_date: NaiveDate,
    pub calendar_regenerated: bool,
    pub lower_bound: Option<f64>,
    pub days_recorded: usize,
    pub feeding_count: u8,
    pub pending_override: Option<u8>,
    pub transitions: Vec<Transition>,
}

/// Everything one run writes back to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub calendar: Option<Calendar>,
    pub days: Vec<RenderedDay>,
    pub summary: RunSummary,
}

/// Settings read from the ledger at the start of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct BirdSettings {
    pub birth_date: NaiveDate,
    pub previous_birth_date: Option<NaiveDate>,
    /// Last date of the axis written by the previous run.
    pub previous_end_date: Option<NaiveDate>,
    pub lower_bound: Option<f64>,
}

impl BirdSettings {
    /// Read and validate the birth date, sentinels and lower bound.
    ///
    /// # Errors
    /// Returns a configuration error if the birth date is missing or unreadable.
    pub fn load(ledger: &Ledger) -> Result<Self> {
        let raw = ledger
            .kv_get(LedgerKey::BirthDate)?
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingBirthDate)?;
        let birth_date =
            parse_date(&RawCell::from_input(&raw)).ok_or(ConfigError::InvalidBirthDate(raw))?;

        let previous_birth_date = ledger
            .kv_get(LedgerKey::PreviousBirthDate)?
            .and_then(|s| parse_date(&RawCell::from_input(&s)));
        let previous_end_date = ledger
            .kv_get(LedgerKey::EndDate)?
            .and_then(|s| parse_date(&RawCell::from_input(&s)));

        let lower_bound = match ledger.kv_get(LedgerKey::LowerBound)? {
            Some(raw) => {
                let cell = RawCell::from_input(&raw);
                let parsed = parse_weight(&cell);
                if parsed.is_none() && !cell.is_empty() {
                    warn!(raw = %raw, "lower bound is not a weight; floor checks disabled");
                }
                parsed
            }
            None => None,
        };

        Ok(Self {
            birth_date,
            previous_birth_date,
            previous_end_date,
            lower_bound,
        })
    }
}

/// Compute a run without touching the ledger.
pub fn compute(ledger: &Ledger, config: &Config) -> Result<RunOutput> {
    config.validate()?;
    let settings = BirdSettings::load(ledger)?;
    let span = config.calendar.span_days;

    let axis = Calendar::for_birth_date(settings.birth_date, span);
    let calendar = needs_regeneration(
        &axis,
        settings.previous_birth_date,
        settings.previous_end_date,
    )
    .then_some(axis);

    let rows = ledger.load_rows(span)?;
    let weights: Vec<Option<f64>> = rows
        .iter()
        .map(|row| {
            let parsed = parse_weight(&row.weight);
            if parsed.is_none() && !row.weight.is_empty() {
                warn!(day = row.index, raw = %row.weight.display(), "unreadable weight treated as a gap");
            }
            parsed
        })
        .collect();

    let averages = RollingAverages::compute(&weights);
    let machine = RuleMachine::new(config.rules.clone(), settings.lower_bound);
    let evaluation = machine.evaluate(&DayInput::series(&weights, &averages));

    let transitions: Vec<Transition> = evaluation
        .outcomes
        .iter()
        .filter_map(|o| {
            let judgment = o.judgment?;
            debug!(day = o.index, judgment = %judgment, scheduled = judgment.target(), "transition");
            Some(Transition {
                day: o.index,
                judgment,
                scheduled: judgment.target(),
            })
        })
        .collect();

    let days = sheet::render(&rows, &averages, &evaluation.outcomes);

    let summary = RunSummary {
        birth_date: settings.birth_date,
        calendar_regenerated: calendar.is_some(),
        lower_bound: settings.lower_bound,
        days_recorded: weights.iter().flatten().count(),
        feeding_count: evaluation.final_state.feeding_count,
        pending_override: evaluation.final_state.pending_override,
        transitions,
    };

    Ok(RunOutput {
        calendar,
        days,
        summary,
    })
}

/// Recompute the sheet and write the result back in one transaction.
///
/// # Errors
/// Fails without writing anything if the birth date is missing or invalid,
/// the configuration is invalid, or the ledger cannot be read or written.
pub fn recompute(ledger: &mut Ledger, config: &Config) -> Result<RunOutput> {
    let output = compute(ledger, config)?;
    ledger.apply(output.calendar.as_ref(), &output.days)?;
    info!(
        birth_date = %output.summary.birth_date,
        regenerated = output.summary.calendar_regenerated,
        feeding_count = output.summary.feeding_count,
        transitions = output.summary.transitions.len(),
        "sheet recomputed"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn missing_birth_date_is_fatal() {
        let mut ledger = Ledger::open_memory().unwrap();
        let err = recompute(&mut ledger, &Config::default()).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::MissingBirthDate)));
    }

    #[test]
    fn invalid_birth_date_writes_nothing() {
        let mut ledger = Ledger::open_memory().unwrap();
        ledger.kv_set(LedgerKey::BirthDate, "someday").unwrap();
        ledger.record_weight(0, 90, &RawCell::Number(10.0)).unwrap();
        let err = recompute(&mut ledger, &Config::default()).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::InvalidBirthDate(_))));
        let rows = ledger.load_rows(90).unwrap();
        assert!(rows.iter().all(|r| r.cumulative_avg.is_none() && r.date.is_none()));
        assert!(ledger.kv_get(LedgerKey::PreviousBirthDate).unwrap().is_none());
    }

    #[test]
    fn serial_birth_date_is_accepted() {
        let ledger = Ledger::open_memory().unwrap();
        ledger.kv_set(LedgerKey::BirthDate, "45292").unwrap();
        let settings = BirdSettings::load(&ledger).unwrap();
        assert_eq!(settings.birth_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn unreadable_lower_bound_disables_floor() {
        let ledger = Ledger::open_memory().unwrap();
        ledger.kv_set(LedgerKey::BirthDate, "2024-01-01").unwrap();
        ledger.kv_set(LedgerKey::LowerBound, "n/a").unwrap();
        assert_eq!(BirdSettings::load(&ledger).unwrap().lower_bound, None);
        ledger.kv_set(LedgerKey::LowerBound, "７０ｇ").unwrap();
        assert_eq!(BirdSettings::load(&ledger).unwrap().lower_bound, Some(70.0));
    }

    #[test]
    fn calendar_regenerates_only_on_change() {
        let mut ledger = Ledger::open_memory().unwrap();
        ledger.kv_set(LedgerKey::BirthDate, "2024-01-01").unwrap();
        let first = recompute(&mut ledger, &Config::default()).unwrap();
        assert!(first.summary.calendar_regenerated);
        let second = recompute(&mut ledger, &Config::default()).unwrap();
        assert!(!second.summary.calendar_regenerated);

        ledger.kv_set(LedgerKey::BirthDate, "2024/01/05").unwrap();
        let third = recompute(&mut ledger, &Config::default()).unwrap();
        assert!(third.summary.calendar_regenerated);
        let rows = ledger.load_rows(90).unwrap();
        assert_eq!(rows[0].date.as_deref(), Some("2024/01/05"));
    }

    #[test]
    fn longer_span_extends_the_date_column() {
        let mut ledger = Ledger::open_memory().unwrap();
        ledger.kv_set(LedgerKey::BirthDate, "2024-01-01").unwrap();
        let mut cfg = Config::default();
        recompute(&mut ledger, &cfg).unwrap();

        cfg.set("calendar.span_days", "120").unwrap();
        let rerun = recompute(&mut ledger, &cfg).unwrap();
        assert!(rerun.summary.calendar_regenerated);
        let rows = ledger.load_rows(120).unwrap();
        assert_eq!(rows[90].date.as_deref(), Some("2024/03/31"));
        assert_eq!(rows[100].date.as_deref(), Some("2024/04/10"));
        assert_eq!(
            ledger.kv_get(LedgerKey::EndDate).unwrap().as_deref(),
            Some("2024/04/30")
        );
        assert!(!recompute(&mut ledger, &cfg).unwrap().summary.calendar_regenerated);
    }

    #[test]
    fn shorter_span_clears_dates_past_the_end() {
        let mut ledger = Ledger::open_memory().unwrap();
        ledger.kv_set(LedgerKey::BirthDate, "2024-01-01").unwrap();
        let mut cfg = Config::default();
        recompute(&mut ledger, &cfg).unwrap();

        cfg.set("calendar.span_days", "60").unwrap();
        ledger.kv_set(LedgerKey::BirthDate, "2024-02-01").unwrap();
        recompute(&mut ledger, &cfg).unwrap();

        let rows = ledger.load_rows(90).unwrap();
        assert_eq!(rows[60].date.as_deref(), Some("2024/04/01"));
        assert_eq!(rows[61].date, None);
        assert_eq!(rows[90].date, None);
    }
}
