pub mod bird;
pub mod config;
pub mod note;
pub mod run;
pub mod show;
pub mod weight;

use std::path::PathBuf;

use fledgling_core::{Config, Ledger};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Paths given on the command line.
pub struct Context {
    pub ledger: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl Context {
    pub fn load_config(&self) -> fledgling_core::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    pub fn save_config(&self, config: &Config) -> fledgling_core::Result<()> {
        match &self.config {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
    }

    pub fn open_ledger(&self, config: &Config) -> fledgling_core::Result<Ledger> {
        let path = match &self.ledger {
            Some(path) => path.clone(),
            None => config.ledger_path()?,
        };
        tracing::debug!(path = %path.display(), "opening ledger");
        Ledger::open(&path)
    }
}
