//! Turbine specification matching.
//!
//! Gives every record a catalog turbine type so downstream generators always
//! have a usable technical model. See [`TurbineSpecMatcher`] for the order
//! of the matching steps.

mod matcher;
mod report;
mod scoring;


pub use matcher::{MatchOutcome, MatcherOptions, TurbineSpecMatcher};
pub use report::{MatchKind, MatchSummary};
pub use scoring::{confidence, score, Dimensions, MatchWeights};
