use clap::Subcommand;
use fledgling_core::series::{parse_date, parse_weight};
use fledgling_core::{BirdSettings, ConfigError, LedgerKey, RawCell};

use super::{CommandResult, Context};

#[derive(Subcommand)]
pub enum BirdAction {
    /// Set the birth date (YYYY-MM-DD, YYYY/MM/DD or a serial number)
    SetBirthDate {
        date: String,
    },
    /// Set the weight floor that triggers a revert (e.g. "70" or "70g")
    SetLowerBound {
        weight: String,
    },
    /// Remove the weight floor
    ClearLowerBound,
    /// Show the stored settings
    Show,
}

pub fn run(ctx: &Context, action: BirdAction) -> CommandResult {
    let config = ctx.load_config()?;
    let ledger = ctx.open_ledger(&config)?;

    match action {
        BirdAction::SetBirthDate { date } => {
            let parsed = parse_date(&RawCell::from_input(&date))
                .ok_or_else(|| ConfigError::InvalidBirthDate(date.clone()))?;
            ledger.kv_set(LedgerKey::BirthDate, date.trim())?;
            println!("birth date set to {parsed}");
        }
        BirdAction::SetLowerBound { weight } => {
            let grams = parse_weight(&RawCell::from_input(&weight)).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: "lower_bound".into(),
                    message: format!("'{weight}' is not a weight"),
                }
            })?;
            ledger.kv_set(LedgerKey::LowerBound, weight.trim())?;
            println!("lower bound set to {grams:.1}g");
        }
        BirdAction::ClearLowerBound => {
            ledger.kv_delete(LedgerKey::LowerBound)?;
            println!("lower bound cleared");
        }
        BirdAction::Show => {
            let settings = BirdSettings::load(&ledger)?;
            println!("birth date:  {}", settings.birth_date);
            match settings.previous_birth_date {
                Some(d) => println!("calendar for: {d}"),
                None => println!("calendar for: (not generated)"),
            }
            match settings.lower_bound {
                Some(low) => println!("lower bound: {low:.1}g"),
                None => println!("lower bound: (none)"),
            }
        }
    }
    Ok(())
}
