//! Windatlas CLI - command-line interface
//!
//! Runs single stages or whole merge plans over wind-turbine record files.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::dedupe::DedupeArgs;
use commands::match_types::MatchArgs;
use commands::merge::MergeArgs;
use commands::resolve::ResolveArgs;
use commands::run::RunArgs;
use commands::subset::SubsetArgs;
use commands::windfarms::WindfarmArgs;
use runner::GlobalArgs;

#[derive(Parser)]
#[command(name = "windatlas")]
#[command(version, about = "Merge, tag and type-match wind-turbine location datasets", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.windatlas/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to a file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag records with a country code and an offshore flag
    Resolve(ResolveArgs),

    /// Collapse near-coincident records within one source
    Dedupe(DedupeArgs),

    /// Merge a secondary record set into a primary one
    Merge(MergeArgs),

    /// Distribute wind-farm aggregates onto turbine positions
    #[command(name = "map-windfarms")]
    MapWindfarms(WindfarmArgs),

    /// Keep records inside a bounding box or country list, in service on a date
    Subset(SubsetArgs),

    /// Assign catalog specifications to untyped records
    Match(MatchArgs),

    /// Run a full plan: tag, dedupe, merge, subset and match
    Run(RunArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs {
        config: cli.config,
        log_dir: cli.log_dir,
    };

    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::run(&global, args),
        Commands::Dedupe(args) => commands::dedupe::run(&global, args),
        Commands::Merge(args) => commands::merge::run(&global, args),
        Commands::MapWindfarms(args) => commands::windfarms::run(&global, args),
        Commands::Subset(args) => commands::subset::run(&global, args),
        Commands::Match(args) => commands::match_types::run(&global, args),
        Commands::Run(args) => commands::run::run(&global, args),
        Commands::Config { command } => commands::config::run(&global, command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
