//! # Fledgling Core Library
//!
//! Tracks the assist-feeding regimen of a juvenile bird over its first 90 days
//! and decides, from daily weights, when the number of daily feedings can drop
//! (3 → 2 → 1 → 0) or must go back up.
//!
//! ## Architecture
//!
//! - **Series**: raw cell parsing (decorated weights, dates)
//! - **Averages**: cumulative and strict trailing 3/5-day means
//! - **Rules**: the feeding-count state machine, folded over the days
//! - **Sheet**: pure rendering of decisions into cell text
//! - **Storage**: SQLite ledger and TOML configuration
//! - **Pipeline**: one all-or-nothing recomputation per invocation
//!
//! ## Key Components
//!
//! - [`RuleMachine`]: per-day decisions over explicit [`SessionState`]
//! - [`RollingAverages`]: the three average columns
//! - [`Ledger`]: sheet persistence
//! - [`Config`]: application configuration management

pub mod averages;
pub mod calendar;
pub mod error;
pub mod pipeline;
pub mod rules;
pub mod series;
pub mod sheet;
pub mod storage;

pub use averages::RollingAverages;
pub use calendar::Calendar;
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use pipeline::{compute, recompute, BirdSettings, RunOutput, RunSummary, Transition};
pub use rules::{DayInput, DayOutcome, Evaluation, Judgment, RuleConfig, RuleMachine, SessionState};
pub use series::RawCell;
pub use sheet::{DayRow, RenderedDay};
pub use storage::{Config, Ledger, LedgerKey};
