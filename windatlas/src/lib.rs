//! Windatlas - record matching and merge engine for wind-turbine inventories
//!
//! This library turns heterogeneous per-turbine records from national
//! registers, open map data and commercial databases into one deduplicated,
//! typed inventory. The stages are independent and composable:
//!
//! - [`boundary`] tags records with a country code and an offshore flag
//! - [`dedupe`] collapses near-coincident records within one source
//! - [`merge`] reconciles two sources, or distributes wind-farm aggregates
//!   onto turbine positions, driven by a declarative [`merge::MergePlan`]
//! - [`filter`] restricts the merged inventory to a spatial domain and to
//!   turbines in service on a given day
//! - [`matcher`] assigns a catalog specification to every untyped record
//!
//! Every stage takes a record set and returns a new one together with a
//! [`report::StageReport`] and a list of [`report::ReviewItem`]s.
//! [`pipeline::Pipeline`] chains them for a full run.

pub mod boundary;
pub mod catalog;
pub mod config;
pub mod dedupe;
pub mod filter;
pub mod geo;
pub mod io;
pub mod logging;
pub mod matcher;
pub mod merge;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod spatial;
