//! Dedupe command - collapse near-coincident records of one source.

use std::path::PathBuf;

use clap::Args;
use windatlas::dedupe::Deduplicator;

use super::common::{OutputArgs, Session};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Arguments for the dedupe command.
#[derive(Debug, Args)]
pub struct DedupeArgs {
    /// Input record file
    pub input: PathBuf,

    /// Source tag for records without one
    #[arg(long)]
    pub source: Option<String>,

    /// Duplicate radius in degrees, overrides [dedupe] min_distance
    #[arg(long)]
    pub min_distance: Option<f64>,

    /// Source priority for survivor tie-breaks (comma list)
    #[arg(long, value_delimiter = ',')]
    pub priority: Option<Vec<String>>,

    /// Fill the survivor's missing attributes from dropped duplicates
    #[arg(long)]
    pub enrich: bool,

    #[command(flatten)]
    pub out: OutputArgs,
}

pub fn run(global: &GlobalArgs, args: DedupeArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("dedupe");

    let mut options = runner.config().dedupe_options();
    if let Some(d) = args.min_distance {
        if !d.is_finite() || d < 0.0 {
            return Err(CliError::Config(format!(
                "--min-distance must be a non-negative number, got {}",
                d
            )));
        }
        options.min_distance = d;
    }
    if let Some(priority) = args.priority {
        options.source_priority = priority;
    }
    options.enrich_survivor |= args.enrich;

    let mut session = Session::new();
    let records = session.read(&args.input, args.source.as_deref())?;
    let label = args.source.as_deref().unwrap_or("input");
    let records = session.absorb(Deduplicator::new(options).dedupe(label, records));
    session.finish(&args.out, &records)
}
