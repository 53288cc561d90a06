//! Combining record sets.
//!
//! - [`RecordMerger`]: pairwise merge with one-to-one spatial correspondence
//! - [`WindfarmMapper`]: point turbines onto aggregate wind-farm records
//! - [`MergePlan`]: an ordered list of such steps over named sets

mod merger;
mod plan;
mod policy;
mod windfarm;


pub use merger::{
    correspond, Contest, Correspondence, MergeOptions, RecordMerger, DEFAULT_MAX_DISTANCE,
};
pub use plan::{MergePlan, MergeStep, PlanError, PlanOutcome, StepKind};
pub use policy::{MergePolicy, UnknownPolicy};
pub use windfarm::{assign_to_farms, WindfarmMapper};
