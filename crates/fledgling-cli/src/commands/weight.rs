use clap::Subcommand;
use fledgling_core::RawCell;

use super::{CommandResult, Context};

#[derive(Subcommand)]
pub enum WeightAction {
    /// Record the weight for a day (0 = day of birth)
    Record {
        day: usize,
        /// Grams, as typed (e.g. "81.5", "81g", "８１．５ｇ")
        value: String,
    },
    /// Clear the weight for a day
    Clear {
        day: usize,
    },
}

pub fn run(ctx: &Context, action: WeightAction) -> CommandResult {
    let config = ctx.load_config()?;
    let ledger = ctx.open_ledger(&config)?;
    let span = config.calendar.span_days;

    match action {
        WeightAction::Record { day, value } => {
            let cell = RawCell::from_input(&value);
            if fledgling_core::series::parse_weight(&cell).is_none() {
                tracing::warn!(day, value = %value, "value does not read as a weight; stored as a gap");
            }
            ledger.record_weight(day, span, &cell)?;
            println!("day {day}: {}", cell.display());
        }
        WeightAction::Clear { day } => {
            ledger.record_weight(day, span, &RawCell::Empty)?;
            println!("day {day}: cleared");
        }
    }
    Ok(())
}
