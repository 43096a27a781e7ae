mod config;
pub mod ledger;

pub use config::{CalendarConfig, Config, LedgerConfig};
pub use ledger::{Ledger, LedgerKey};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/fledgling[-dev]/` based on FLEDGLING_ENV.
///
/// Set FLEDGLING_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FLEDGLING_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("fledgling-dev")
    } else {
        base_dir.join("fledgling")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
