//! Merge command - reconcile a primary and a secondary record set.

use std::path::PathBuf;

use clap::Args;
use windatlas::merge::{MergeOptions, MergePolicy, RecordMerger};

use super::common::{OutputArgs, Session};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Arguments shared by `merge` and `map-windfarms`.
#[derive(Debug, Args)]
pub struct MergeSettingsArgs {
    /// Merge policy: overwrite (map), enrich_first (enrich1), combine (union, or)
    #[arg(long, default_value = "enrich_first")]
    pub policy: MergePolicy,

    /// Match radius in degrees, overrides [merge] max_distance
    #[arg(long)]
    pub max_distance: Option<f64>,

    /// Provenance tag for merged records
    #[arg(long)]
    pub label: Option<String>,
}

impl MergeSettingsArgs {
    pub fn options(&self, default_max_distance: f64) -> Result<MergeOptions, CliError> {
        let d_max = self.max_distance.unwrap_or(default_max_distance);
        if !d_max.is_finite() || d_max < 0.0 {
            return Err(CliError::Config(format!(
                "--max-distance must be a non-negative number, got {}",
                d_max
            )));
        }
        let options = MergeOptions::new(self.policy, d_max);
        Ok(match &self.label {
            Some(label) => options.with_label(label.clone()),
            None => options,
        })
    }
}

/// Arguments for the merge command.
#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Primary record file (its records are kept)
    pub primary: PathBuf,

    /// Secondary record file
    pub secondary: PathBuf,

    #[command(flatten)]
    pub settings: MergeSettingsArgs,

    #[command(flatten)]
    pub out: OutputArgs,
}

pub fn run(global: &GlobalArgs, args: MergeArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("merge");
    let options = args.settings.options(runner.config().merge.max_distance)?;

    let mut session = Session::new();
    let primary = session.read(&args.primary, None)?;
    let secondary = session.read(&args.secondary, None)?;
    let label = options.label.clone().unwrap_or_else(|| "merge".to_string());
    let records = session.absorb(RecordMerger::new(options).merge(&label, primary, secondary));
    session.finish(&args.out, &records)
}
