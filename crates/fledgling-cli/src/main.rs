use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "fledgling", version, about = "Assist-feeding tracker for a juvenile bird")]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Ledger database to use instead of the configured one.
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// Config file to use instead of ~/.config/fledgling/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Birth date and weight floor
    Bird {
        #[command(subcommand)]
        action: commands::bird::BirdAction,
    },
    /// Daily weight entries
    Weight {
        #[command(subcommand)]
        action: commands::weight::WeightAction,
    },
    /// Hand-written notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Recompute averages and judgments
    Run(commands::run::RunArgs),
    /// Print the tracking sheet
    Show(commands::show::ShowArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = commands::Context {
        ledger: cli.ledger,
        config: cli.config,
    };
    let result = match cli.command {
        Commands::Bird { action } => commands::bird::run(&ctx, action),
        Commands::Weight { action } => commands::weight::run(&ctx, action),
        Commands::Note { action } => commands::note::run(&ctx, action),
        Commands::Run(args) => commands::run::run(&ctx, args),
        Commands::Show(args) => commands::show::run(&ctx, args),
        Commands::Config { action } => commands::config::run(&ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
