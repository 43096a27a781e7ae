use super::{CommandResult, Context};

#[derive(clap::Args)]
pub struct ShowArgs {
    /// Print rows as JSON.
    #[arg(long)]
    pub json: bool,

    /// Include days without any recorded weight or text.
    #[arg(long)]
    pub all: bool,
}

pub fn run(ctx: &Context, args: ShowArgs) -> CommandResult {
    let config = ctx.load_config()?;
    let ledger = ctx.open_ledger(&config)?;
    let rows: Vec<_> = ledger
        .load_rows(config.calendar.span_days)?
        .into_iter()
        .filter(|r| {
            args.all
                || !r.weight.is_empty()
                || r.judgment.is_some()
                || r.note.is_some()
                || r.flagged
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:>3}  {:<10}  {:>8}  {:>6}  {:>6}  {:>6}  {:<14}  note",
        "day", "date", "weight", "avg", "avg3", "avg5", "judgment"
    );
    for r in rows {
        let flag = if r.flagged { "!" } else { "" };
        println!(
            "{:>3}  {:<10}  {:>8}  {:>6}  {:>6}  {:>6}  {:<14}  {}{}",
            r.index,
            r.date.as_deref().unwrap_or(""),
            r.weight.display(),
            r.cumulative_avg.as_deref().unwrap_or(""),
            r.avg3.as_deref().unwrap_or(""),
            r.avg5.as_deref().unwrap_or(""),
            r.judgment.as_deref().unwrap_or(""),
            flag,
            r.note.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}
