use clap::Subcommand;

use super::{CommandResult, Context};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Write a note for a day (an empty string clears it)
    Set { day: usize, text: String },
}

pub fn run(ctx: &Context, action: NoteAction) -> CommandResult {
    let config = ctx.load_config()?;
    let ledger = ctx.open_ledger(&config)?;

    match action {
        NoteAction::Set { day, text } => {
            ledger.set_note(day, config.calendar.span_days, &text)?;
            println!("ok");
        }
    }
    Ok(())
}
