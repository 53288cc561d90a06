//! Subset command - restrict a record set to a domain and a situation date.

use std::path::PathBuf;

use clap::Args;
use windatlas::filter::{BoundingBox, RecordFilter, SituationDate, SpatialSubset};

use super::common::{OutputArgs, Session};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Arguments for the subset command.
#[derive(Debug, Args)]
pub struct SubsetArgs {
    /// Input record file
    pub input: PathBuf,

    /// Source tag for records without one
    #[arg(long)]
    pub source: Option<String>,

    /// Keep records inside "min_lon,min_lat,max_lon,max_lat"
    #[arg(long, conflicts_with = "countries", allow_hyphen_values = true)]
    pub bbox: Option<BoundingBox>,

    /// Keep records tagged with these countries (comma list)
    #[arg(long, value_delimiter = ',')]
    pub countries: Option<Vec<String>>,

    /// Keep records in service on this day: all, today or YYYY-MM-DD
    #[arg(long)]
    pub date: Option<SituationDate>,

    #[command(flatten)]
    pub out: OutputArgs,
}

pub fn run(global: &GlobalArgs, args: SubsetArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("subset");

    let mut options = runner.config().subset.clone();
    if let Some(bbox) = args.bbox {
        options.spatial = SpatialSubset::BoundingBox(bbox);
    }
    if let Some(countries) = args.countries {
        options.spatial = SpatialSubset::Countries(countries);
    }
    if let Some(date) = args.date {
        options.situation_date = date;
    }

    let mut session = Session::new();
    let records = session.read(&args.input, args.source.as_deref())?;
    let label = args.source.as_deref().unwrap_or("input");
    let records = session.absorb(RecordFilter::new(options).apply(label, records));
    session.finish(&args.out, &records)
}
