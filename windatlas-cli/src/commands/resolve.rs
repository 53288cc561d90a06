//! Resolve command - tag records with country and offshore flag.

use std::path::PathBuf;

use clap::Args;
use windatlas::boundary::CountryOffshoreResolver;
use windatlas::config::ConfigFile;
use windatlas::pipeline::resolver_from_config;

use super::common::{OutputArgs, Session};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Arguments for the resolve command.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Input record file
    pub input: PathBuf,

    /// Source tag for records without one
    #[arg(long)]
    pub source: Option<String>,

    /// Land boundary layer (GeoJSON), overrides [boundaries] land
    #[arg(long)]
    pub land: Option<PathBuf>,

    /// EEZ boundary layer (GeoJSON), overrides [boundaries] eez
    #[arg(long)]
    pub eez: Option<PathBuf>,

    #[command(flatten)]
    pub out: OutputArgs,
}

pub fn run(global: &GlobalArgs, args: ResolveArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("resolve");

    let mut config = runner.config().clone();
    if args.land.is_some() {
        config.boundaries.land = args.land.clone();
    }
    if args.eez.is_some() {
        config.boundaries.eez = args.eez.clone();
    }
    let resolver = resolver(&config)?;

    let mut session = Session::new();
    let records = session.read(&args.input, args.source.as_deref())?;
    let label = args.source.as_deref().unwrap_or("input");
    let records = session.absorb(resolver.resolve(label, records));
    session.finish(&args.out, &records)
}

fn resolver(config: &ConfigFile) -> Result<CountryOffshoreResolver, CliError> {
    resolver_from_config(config)?.ok_or_else(|| {
        CliError::Config(
            "No land boundary layer configured. Set [boundaries] land or use --land".to_string(),
        )
    })
}
