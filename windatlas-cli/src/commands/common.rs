//! Arguments and output helpers shared across commands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Args;
use windatlas::io::write_output;
use windatlas::matcher::MatchSummary;
use windatlas::record::{read_records, write_records, TurbineRecord};
use windatlas::report::{ReviewItem, StageOutput, StageReport};

use crate::error::CliError;

/// Output file options common to every processing command.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output record file (JSON array)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Also write review items to this JSON file
    #[arg(long)]
    pub review: Option<PathBuf>,
}

/// Collects stage reports and review items across one command.
#[derive(Debug, Default)]
pub struct Session {
    pub reports: Vec<StageReport>,
    pub review: Vec<ReviewItem>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a stage output, keep its bookkeeping and return its records.
    pub fn absorb(&mut self, output: StageOutput) -> Vec<TurbineRecord> {
        output.log();
        self.reports.push(output.report);
        self.review.extend(output.review);
        output.records
    }

    /// Read a record file; `source` fills records without one.
    pub fn read(&mut self, path: &Path, source: Option<&str>) -> Result<Vec<TurbineRecord>, CliError> {
        Ok(self.absorb(read_records(path, source)?))
    }

    /// Write records and review items, then print the summary.
    pub fn finish(&self, args: &OutputArgs, records: &[TurbineRecord]) -> Result<(), CliError> {
        let digest = write_records(&args.output, records)?;
        if let Some(path) = &args.review {
            write_review(path, &self.review)?;
        }

        print_reports(&self.reports);
        print_review_counts(&self.review);
        println!();
        println!("Wrote {} records to {}", records.len(), args.output.display());
        println!("SHA-256: {}", digest);
        if let Some(path) = &args.review {
            println!("Review:  {}", path.display());
        }
        Ok(())
    }
}

/// Write review items as a JSON array.
pub fn write_review(path: &Path, review: &[ReviewItem]) -> Result<(), CliError> {
    let mut bytes = serde_json::to_vec_pretty(review)?;
    bytes.push(b'\n');
    write_output(path, &bytes).map_err(|source| CliError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

pub fn print_reports(reports: &[StageReport]) {
    println!("Stages");
    println!("======");
    for report in reports {
        println!("  {}", report);
    }
}

pub fn print_review_counts(review: &[ReviewItem]) {
    println!();
    println!("Review items: {}", review.len());
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for item in review {
        *counts.entry(item.reason.kind()).or_default() += 1;
    }
    for (kind, n) in counts {
        println!("  {:<20} {:>8}", kind, n);
    }
}

pub fn print_summary(summary: &MatchSummary) {
    println!();
    print!("{}", summary);
}
