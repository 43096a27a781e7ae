use fledgling_core::{recompute, RunOutput};

use super::{CommandResult, Context};

#[derive(clap::Args)]
pub struct RunArgs {
    /// Print the full run output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(ctx: &Context, args: RunArgs) -> CommandResult {
    let config = ctx.load_config()?;
    let mut ledger = ctx.open_ledger(&config)?;
    let output = recompute(&mut ledger, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&output);
    }
    Ok(())
}

fn print_summary(output: &RunOutput) {
    let summary = &output.summary;
    println!("birth date:     {}", summary.birth_date);
    if summary.calendar_regenerated {
        println!("calendar:       regenerated");
    }
    println!("days recorded:  {}", summary.days_recorded);
    for t in &summary.transitions {
        println!(
            "day {:>2}: {} (from day {}: {} feedings)",
            t.day,
            t.judgment,
            t.day + 1,
            t.scheduled
        );
    }
    match summary.pending_override {
        Some(next) => println!(
            "feedings:       {} (changes to {next} tomorrow)",
            summary.feeding_count
        ),
        None => println!("feedings:       {}", summary.feeding_count),
    }
}
