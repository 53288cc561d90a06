//! Run command - execute a whole plan: tag, dedupe, merge, match.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use windatlas::io::write_output;
use windatlas::pipeline::{Pipeline, RunPlan};

use super::common::{print_summary, OutputArgs, Session};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Plan file: {"sources": {name: path}, "steps": [...], "result"?}
    pub plan: PathBuf,

    /// Specification catalog (JSON), overrides [catalog] path
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Write the run report (JSON) to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub out: OutputArgs,
}

pub fn run(global: &GlobalArgs, args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("run");

    let mut config = runner.config().clone();
    if args.catalog.is_some() {
        config.catalog.path = args.catalog.clone();
    }
    let pipeline = Pipeline::from_config(&config)?;
    let plan = RunPlan::from_path(&args.plan)?;

    let mut session = Session::new();
    let mut sources = BTreeMap::new();
    for (name, output) in plan.load_sources()? {
        sources.insert(name, session.absorb(output));
    }

    let outcome = pipeline.run(&plan.plan, sources)?;
    session.reports.extend(outcome.reports.iter().cloned());
    session.review.extend(outcome.review.iter().cloned());
    session.finish(&args.out, &outcome.inventory)?;
    print_summary(&outcome.summary);

    if let Some(path) = &args.report {
        let mut bytes = serde_json::to_vec_pretty(&outcome.run_report()?)?;
        bytes.push(b'\n');
        write_output(path, &bytes).map_err(|source| CliError::Output {
            path: path.clone(),
            source,
        })?;
        println!("Run report: {}", path.display());
    }
    Ok(())
}
