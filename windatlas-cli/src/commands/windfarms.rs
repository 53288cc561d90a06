//! Map-windfarms command - distribute wind-farm aggregates onto turbines.

use std::path::PathBuf;

use clap::Args;
use windatlas::merge::WindfarmMapper;

use super::common::{OutputArgs, Session};
use super::merge::MergeSettingsArgs;
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Arguments for the map-windfarms command.
#[derive(Debug, Args)]
pub struct WindfarmArgs {
    /// Point turbine record file
    pub turbines: PathBuf,

    /// Wind-farm record file (n_turbines is the capacity)
    pub farms: PathBuf,

    #[command(flatten)]
    pub settings: MergeSettingsArgs,

    #[command(flatten)]
    pub out: OutputArgs,
}

pub fn run(global: &GlobalArgs, args: WindfarmArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("map-windfarms");
    let options = args.settings.options(runner.config().merge.max_distance)?;

    let mut session = Session::new();
    let turbines = session.read(&args.turbines, None)?;
    let farms = session.read(&args.farms, None)?;
    let label = options
        .label
        .clone()
        .unwrap_or_else(|| "windfarms".to_string());
    let records = session.absorb(WindfarmMapper::new(options).map(&label, turbines, farms));
    session.finish(&args.out, &records)
}
