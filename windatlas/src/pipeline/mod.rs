//! End-to-end composition of the stages.

mod report;
mod runner;

use thiserror::Error;

use crate::boundary::BoundaryError;
use crate::catalog::CatalogError;
use crate::config::ConfigFileError;
use crate::merge::PlanError;
use crate::record::RecordIoError;

pub use report::{PipelineOutcome, RunReport};
pub use runner::{resolver_from_config, Pipeline, RunPlan};

/// Structural failures that stop a run before or between stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No turbine catalog configured (set [catalog] path)")]
    MissingCatalog,

    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Config(#[from] ConfigFileError),

    #[error(transparent)]
    Records(#[from] RecordIoError),
}
