//! SQLite ledger holding the tracking sheet.
//!
//! Provides persistent storage for:
//! - The per-day rows (date, raw weight, averages, judgment, note, red flag)
//! - Key-value settings for the bird (birth date, lower bound, sentinel)
//!
//! The `weight` column has no declared type so each cell keeps whatever it was
//! written as: a number, decorated text, or nothing.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension};

use crate::calendar::Calendar;
use crate::error::{DatabaseError, Result, ValidationError};
use crate::series::RawCell;
use crate::sheet::{DayRow, RenderedDay};

/// Keys stored in the `kv` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKey {
    BirthDate,
    /// Birth date the date column was last generated for.
    PreviousBirthDate,
    LowerBound,
    EndDate,
}

impl LedgerKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKey::BirthDate => "birth_date",
            LedgerKey::PreviousBirthDate => "previous_birth_date",
            LedgerKey::LowerBound => "lower_bound",
            LedgerKey::EndDate => "end_date",
        }
    }
}

/// SQLite database for the tracking sheet.
pub struct Ledger {
    conn: Connection,
}

impl Ledger {
    /// Open the ledger at `path`, creating file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the ledger cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let ledger = Self { conn };
        ledger.migrate()?;
        Ok(ledger)
    }

    /// Open an in-memory ledger.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let ledger = Self { conn };
        ledger.migrate()?;
        Ok(ledger)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS days (
                day_index       INTEGER PRIMARY KEY,
                date            TEXT,
                weight,
                cumulative_avg  TEXT,
                avg3            TEXT,
                avg5            TEXT,
                judgment        TEXT,
                note            TEXT,
                flagged         INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: LedgerKey) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: LedgerKey, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key.as_str(), value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: LedgerKey) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key.as_str()])?;
        Ok(())
    }

    fn check_day(day: usize, span: u32) -> Result<()> {
        if day > span as usize {
            return Err(ValidationError::DayOutOfRange {
                day: day as i64,
                span,
            }
            .into());
        }
        Ok(())
    }

    /// Store the raw weight cell for a day.
    pub fn record_weight(&self, day: usize, span: u32, cell: &RawCell) -> Result<()> {
        Self::check_day(day, span)?;
        self.conn.execute(
            "INSERT INTO days (day_index, weight) VALUES (?1, ?2)
             ON CONFLICT(day_index) DO UPDATE SET weight = excluded.weight",
            params![day as i64, cell_to_value(cell)],
        )?;
        Ok(())
    }

    /// Store a hand-written note for a day.
    pub fn set_note(&self, day: usize, span: u32, note: &str) -> Result<()> {
        Self::check_day(day, span)?;
        let note = (!note.is_empty()).then_some(note);
        self.conn.execute(
            "INSERT INTO days (day_index, note) VALUES (?1, ?2)
             ON CONFLICT(day_index) DO UPDATE SET note = excluded.note",
            params![day as i64, note],
        )?;
        Ok(())
    }

    /// Load rows `0..=span`; days never written come back blank.
    pub fn load_rows(&self, span: u32) -> Result<Vec<DayRow>> {
        let mut rows: Vec<DayRow> = (0..=span as usize).map(DayRow::blank).collect();
        let mut stmt = self.conn.prepare(
            "SELECT day_index, date, weight, cumulative_avg, avg3, avg5, judgment, note, flagged
             FROM days
             WHERE day_index BETWEEN 0 AND ?1
             ORDER BY day_index",
        )?;
        let stored = stmt.query_map(params![span as i64], |row| {
            Ok(DayRow {
                index: row.get::<_, i64>(0)? as usize,
                date: row.get(1)?,
                weight: value_to_cell(row.get::<_, Value>(2)?),
                cumulative_avg: row.get(3)?,
                avg3: row.get(4)?,
                avg5: row.get(5)?,
                judgment: row.get(6)?,
                note: row.get(7)?,
                flagged: row.get::<_, i64>(8)? != 0,
            })
        })?;
        for row in stored {
            let row = row?;
            let index = row.index;
            if let Some(slot) = rows.get_mut(index) {
                *slot = row;
            }
        }
        Ok(rows)
    }

    /// Write one run's output in a single transaction.
    ///
    /// Averages and red flags are always written. Judgment and note cells are
    /// written only when the run produced text for them.
    pub fn apply(
        &mut self,
        calendar: Option<&Calendar>,
        rendered: &[RenderedDay],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;

        if let Some(calendar) = calendar {
            let mut stmt = tx.prepare(
                "INSERT INTO days (day_index, date) VALUES (?1, ?2)
                 ON CONFLICT(day_index) DO UPDATE SET date = excluded.date",
            )?;
            for (index, date) in calendar.rendered_dates().iter().enumerate() {
                stmt.execute(params![index as i64, date])?;
            }
            drop(stmt);
            tx.execute(
                "UPDATE days SET date = NULL WHERE day_index >= ?1",
                params![calendar.dates.len() as i64],
            )?;
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![
                    LedgerKey::EndDate.as_str(),
                    calendar.end_date().format(crate::calendar::DATE_FORMAT).to_string()
                ],
            )?;
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![LedgerKey::PreviousBirthDate.as_str(), calendar.sentinel()],
            )?;
        }

        {
            let mut columns = tx.prepare(
                "INSERT INTO days (day_index, cumulative_avg, avg3, avg5, flagged)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(day_index) DO UPDATE SET
                    cumulative_avg = excluded.cumulative_avg,
                    avg3 = excluded.avg3,
                    avg5 = excluded.avg5,
                    flagged = excluded.flagged",
            )?;
            let mut judgment = tx.prepare("UPDATE days SET judgment = ?2 WHERE day_index = ?1")?;
            let mut note = tx.prepare("UPDATE days SET note = ?2 WHERE day_index = ?1")?;

            for day in rendered {
                let index = day.index as i64;
                columns.execute(params![
                    index,
                    day.cumulative_avg,
                    day.avg3,
                    day.avg5,
                    day.flagged as i64
                ])?;
                if let Some(text) = day.judgment.as_deref().filter(|s| !s.is_empty()) {
                    judgment.execute(params![index, text])?;
                }
                if let Some(text) = day.note.as_deref().filter(|s| !s.is_empty()) {
                    note.execute(params![index, text])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }
}

fn cell_to_value(cell: &RawCell) -> Value {
    match cell {
        RawCell::Empty => Value::Null,
        RawCell::Number(n) => Value::Real(*n),
        RawCell::Text(s) => Value::Text(s.clone()),
    }
}

fn value_to_cell(value: Value) -> RawCell {
    match value {
        Value::Null => RawCell::Empty,
        Value::Integer(i) => RawCell::Number(i as f64),
        Value::Real(r) => RawCell::Number(r),
        Value::Text(s) => RawCell::Text(s),
        Value::Blob(b) => RawCell::Text(String::from_utf8_lossy(&b).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn kv_store() {
        let ledger = Ledger::open_memory().unwrap();
        assert!(ledger.kv_get(LedgerKey::BirthDate).unwrap().is_none());
        ledger.kv_set(LedgerKey::BirthDate, "2024-01-01").unwrap();
        assert_eq!(
            ledger.kv_get(LedgerKey::BirthDate).unwrap().as_deref(),
            Some("2024-01-01")
        );
        ledger.kv_delete(LedgerKey::BirthDate).unwrap();
        assert!(ledger.kv_get(LedgerKey::BirthDate).unwrap().is_none());
    }

    #[test]
    fn weight_cells_keep_their_type() {
        let ledger = Ledger::open_memory().unwrap();
        ledger.record_weight(0, 90, &RawCell::Number(12.5)).unwrap();
        ledger
            .record_weight(1, 90, &RawCell::Text("１３ｇ".into()))
            .unwrap();
        let rows = ledger.load_rows(90).unwrap();
        assert_eq!(rows.len(), 91);
        assert_eq!(rows[0].weight, RawCell::Number(12.5));
        assert_eq!(rows[1].weight, RawCell::Text("１３ｇ".into()));
        assert_eq!(rows[2].weight, RawCell::Empty);
    }

    #[test]
    fn day_outside_span_is_rejected() {
        let ledger = Ledger::open_memory().unwrap();
        assert!(ledger.record_weight(91, 90, &RawCell::Number(1.0)).is_err());
        assert!(ledger.set_note(91, 90, "late").is_err());
    }

    #[test]
    fn apply_leaves_empty_text_cells_untouched() {
        let mut ledger = Ledger::open_memory().unwrap();
        ledger.set_note(3, 90, "hand-written").unwrap();
        let rendered = vec![RenderedDay {
            index: 3,
            cumulative_avg: Some("10.0".into()),
            avg3: None,
            avg5: None,
            judgment: None,
            note: None,
            flagged: true,
        }];
        ledger.apply(None, &rendered).unwrap();
        let rows = ledger.load_rows(90).unwrap();
        assert_eq!(rows[3].note.as_deref(), Some("hand-written"));
        assert_eq!(rows[3].cumulative_avg.as_deref(), Some("10.0"));
        assert!(rows[3].flagged);
    }

    #[test]
    fn apply_writes_calendar_and_sentinel() {
        let mut ledger = Ledger::open_memory().unwrap();
        let calendar = Calendar::for_birth_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 90);
        ledger.apply(Some(&calendar), &[]).unwrap();
        let rows = ledger.load_rows(90).unwrap();
        assert_eq!(rows[0].date.as_deref(), Some("2024/01/01"));
        assert_eq!(rows[90].date.as_deref(), Some("2024/03/31"));
        assert_eq!(
            ledger.kv_get(LedgerKey::PreviousBirthDate).unwrap().as_deref(),
            Some("2024-01-01")
        );
        assert_eq!(
            ledger.kv_get(LedgerKey::EndDate).unwrap().as_deref(),
            Some("2024/03/31")
        );
    }

    #[test]
    fn open_creates_file_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("bird.db");
        let ledger = Ledger::open(&path).unwrap();
        ledger.kv_set(LedgerKey::LowerBound, "70g").unwrap();
        drop(ledger);
        let reopened = Ledger::open(&path).unwrap();
        assert_eq!(
            reopened.kv_get(LedgerKey::LowerBound).unwrap().as_deref(),
            Some("70g")
        );
    }
}
