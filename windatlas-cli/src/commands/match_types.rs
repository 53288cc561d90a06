//! Match command - assign catalog specifications to untyped records.

use std::path::PathBuf;

use clap::Args;
use windatlas::catalog::{RegionDefaults, SpecCatalog};
use windatlas::matcher::TurbineSpecMatcher;
use windatlas::pipeline::PipelineError;

use super::common::{print_summary, OutputArgs, Session};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Arguments for the match command.
#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Input record file
    pub input: PathBuf,

    /// Source tag for records without one
    #[arg(long)]
    pub source: Option<String>,

    /// Specification catalog (JSON), overrides [catalog] path
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Acceptance threshold, overrides [matcher] acceptance_threshold
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Score values outside the catalog range
    #[arg(long)]
    pub allow_extrapolation: bool,

    #[command(flatten)]
    pub out: OutputArgs,
}

pub fn run(global: &GlobalArgs, args: MatchArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("match");
    let config = runner.config();

    let catalog_path = args
        .catalog
        .clone()
        .or_else(|| config.catalog.path.clone())
        .ok_or(CliError::Pipeline(PipelineError::MissingCatalog))?;
    let catalog = SpecCatalog::from_path(&catalog_path)?;
    let defaults = RegionDefaults::new(config.defaults.iter().cloned(), &catalog)?;

    let mut options = config.matcher_options();
    if let Some(threshold) = args.threshold {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(CliError::Config(format!(
                "--threshold must be a positive number, got {}",
                threshold
            )));
        }
        options.acceptance_threshold = threshold;
    }
    options.allow_extrapolation |= args.allow_extrapolation;

    let mut session = Session::new();
    let records = session.read(&args.input, args.source.as_deref())?;
    let label = args.source.as_deref().unwrap_or("input");
    let (output, summary) = TurbineSpecMatcher::new(&catalog, &defaults, options).assign(label, records);
    let records = session.absorb(output);
    session.finish(&args.out, &records)?;
    print_summary(&summary);
    Ok(())
}
