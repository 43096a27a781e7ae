//! Day-axis generation for the tracked period.
//!
//! The date column is derived from the birth date and the tracked span. It is
//! rebuilt when either differs from what the previous run recorded.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default number of days tracked after the day of birth (day indices 0..=90).
pub const SPAN_DAYS: u32 = 90;

/// Longest span the ledger will track.
pub const MAX_SPAN_DAYS: u32 = 3650;

/// Rendering format for the date column.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Format used to persist the birth-date sentinel.
pub const SENTINEL_FORMAT: &str = "%Y-%m-%d";

fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Spreadsheet serial number for a date (days since 1899-12-30).
pub fn to_serial(date: NaiveDate) -> i64 {
    (date - serial_epoch()).num_days()
}

/// Date for a spreadsheet serial number.
pub fn from_serial(serial: i64) -> Option<NaiveDate> {
    serial_epoch().checked_add_signed(Duration::try_days(serial)?)
}

/// Whether `calendar` differs from the axis recorded by the previous run.
pub fn needs_regeneration(
    calendar: &Calendar,
    previous_birth_date: Option<NaiveDate>,
    previous_end_date: Option<NaiveDate>,
) -> bool {
    previous_birth_date != Some(calendar.birth_date) || previous_end_date != Some(calendar.end_date())
}

/// The generated date axis for one birth date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub birth_date: NaiveDate,
    pub dates: Vec<NaiveDate>,
}

impl Calendar {
    /// Build `span + 1` consecutive dates starting at the birth date.
    pub fn for_birth_date(birth_date: NaiveDate, span: u32) -> Self {
        let dates = birth_date
            .iter_days()
            .take(span as usize + 1)
            .collect();
        Self { birth_date, dates }
    }

    /// Last tracked date.
    pub fn end_date(&self) -> NaiveDate {
        self.dates.last().copied().unwrap_or(self.birth_date)
    }

    pub fn rendered_dates(&self) -> Vec<String> {
        self.dates
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect()
    }

    pub fn sentinel(&self) -> String {
        self.birth_date.format(SENTINEL_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn calendar_covers_ninety_one_days() {
        let cal = Calendar::for_birth_date(ymd(2024, 1, 1), SPAN_DAYS);
        assert_eq!(cal.dates.len(), 91);
        assert_eq!(cal.dates[0], ymd(2024, 1, 1));
        assert_eq!(cal.dates[40], ymd(2024, 2, 10));
        assert_eq!(cal.end_date(), ymd(2024, 3, 31));
    }

    #[test]
    fn dates_render_with_slashes() {
        let cal = Calendar::for_birth_date(ymd(2024, 12, 30), 3);
        assert_eq!(
            cal.rendered_dates(),
            vec!["2024/12/30", "2024/12/31", "2025/01/01", "2025/01/02"]
        );
        assert_eq!(cal.sentinel(), "2024-12-30");
    }

    #[test]
    fn regeneration_when_birth_date_changes() {
        let bd = ymd(2024, 1, 1);
        let cal = Calendar::for_birth_date(bd, SPAN_DAYS);
        let end = Some(ymd(2024, 3, 31));
        assert!(needs_regeneration(&cal, None, None));
        assert!(needs_regeneration(&cal, Some(ymd(2023, 12, 31)), end));
        assert!(!needs_regeneration(&cal, Some(bd), end));
    }

    #[test]
    fn regeneration_when_span_changes() {
        let bd = ymd(2024, 1, 1);
        let longer = Calendar::for_birth_date(bd, 120);
        assert!(needs_regeneration(&longer, Some(bd), Some(ymd(2024, 3, 31))));
        assert!(!needs_regeneration(&longer, Some(bd), Some(longer.end_date())));

        let shorter = Calendar::for_birth_date(bd, 60);
        assert!(needs_regeneration(&shorter, Some(bd), Some(ymd(2024, 3, 31))));
    }

    #[test]
    fn serial_conversion_matches_spreadsheet_epoch() {
        assert_eq!(to_serial(ymd(2024, 1, 1)), 45292);
        assert_eq!(from_serial(45292), Some(ymd(2024, 1, 1)));
        assert_eq!(from_serial(0), Some(ymd(1899, 12, 30)));
    }
}
