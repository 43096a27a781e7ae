//! Raw cell parsing for the weight series and the date fields.
//!
//! Cells arrive from the ledger as plain numbers or as text typed by hand,
//! which may carry full-width digits and a unit glyph (`"８１．０ｇ"`).
//! Anything that cannot be read becomes `None` and is treated as a gap.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::calendar::from_serial;

/// The value of one stored cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawCell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    /// Classify free-form user input: blank stays empty, plain numbers are
    /// stored as numbers, everything else is kept verbatim as text.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            RawCell::Empty
        } else if let Ok(n) = trimmed.parse::<f64>() {
            RawCell::Number(n)
        } else {
            RawCell::Text(input.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(_) => false,
        }
    }

    /// Text shown when the cell is printed back to the user.
    pub fn display(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Number(n) => n.to_string(),
            RawCell::Text(s) => s.clone(),
        }
    }
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("number pattern is a valid regex")
    })
}

/// Map full-width digits and separators onto their ASCII forms.
fn normalize_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '．' | '，' | ',' => '.',
            other => other,
        })
        .collect()
}

/// Read a weight in grams from a cell.
///
/// Text cells yield the first decimal number they contain; the unit glyph and
/// any surrounding decoration are ignored.
pub fn parse_weight(cell: &RawCell) -> Option<f64> {
    match cell {
        RawCell::Empty => None,
        RawCell::Number(n) if n.is_finite() => Some(*n),
        RawCell::Number(_) => None,
        RawCell::Text(s) => {
            let normalized = normalize_digits(s);
            number_pattern()
                .find(&normalized)
                .and_then(|m| m.as_str().parse::<f64>().ok())
        }
    }
}

/// Parse a whole column, keeping index alignment.
pub fn parse_weights(cells: &[RawCell]) -> Vec<Option<f64>> {
    cells.iter().map(parse_weight).collect()
}

/// Read a calendar date from a cell.
///
/// Numbers are spreadsheet serial dates. Text accepts `YYYY-MM-DD`,
/// `YYYY/MM/DD`, and ISO datetimes (the time part is dropped).
pub fn parse_date(cell: &RawCell) -> Option<NaiveDate> {
    match cell {
        RawCell::Empty => None,
        RawCell::Number(n) if n.is_finite() => from_serial(n.trunc() as i64),
        RawCell::Number(_) => None,
        RawCell::Text(s) => {
            let s = s.trim().replace('/', "-");
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S")
                        .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S"))
                        .ok()
                        .map(|dt| dt.date())
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn plain_numbers_pass_through() {
        assert_eq!(parse_weight(&RawCell::Number(81.5)), Some(81.5));
        assert_eq!(parse_weight(&RawCell::Empty), None);
    }

    #[test]
    fn decorated_text_is_parsed() {
        assert_eq!(parse_weight(&text("80g")), Some(80.0));
        assert_eq!(parse_weight(&text("８１．０ｇ")), Some(81.0));
        assert_eq!(parse_weight(&text("79,5 g")), Some(79.5));
        assert_eq!(parse_weight(&text("  about 77.25g ")), Some(77.25));
    }

    #[test]
    fn unparsable_text_is_a_gap() {
        assert_eq!(parse_weight(&text("didn't weigh")), None);
        assert_eq!(parse_weight(&text("")), None);
        assert_eq!(parse_weight(&RawCell::Number(f64::NAN)), None);
    }

    #[test]
    fn column_keeps_alignment() {
        let cells = vec![RawCell::Number(10.0), text("?"), RawCell::Empty, text("12g")];
        assert_eq!(parse_weights(&cells), vec![Some(10.0), None, None, Some(12.0)]);
    }

    #[test]
    fn dates_accept_common_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(parse_date(&text("2024-01-01")), Some(expected));
        assert_eq!(parse_date(&text("2024/01/01")), Some(expected));
        assert_eq!(parse_date(&text("2024-01-01T08:30:00")), Some(expected));
        assert_eq!(parse_date(&RawCell::Number(45292.0)), Some(expected));
    }

    #[test]
    fn bad_dates_are_none() {
        assert_eq!(parse_date(&text("next tuesday")), None);
        assert_eq!(parse_date(&text("2024-02-30")), None);
        assert_eq!(parse_date(&text("45292")), None);
        assert_eq!(parse_date(&RawCell::Empty), None);
    }

    #[test]
    fn input_classification() {
        assert_eq!(RawCell::from_input("  "), RawCell::Empty);
        assert_eq!(RawCell::from_input("81.5"), RawCell::Number(81.5));
        assert_eq!(RawCell::from_input("81g"), text("81g"));
    }
}
