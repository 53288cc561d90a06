//! CLI command implementations.

pub mod common;
pub mod config;
pub mod dedupe;
pub mod match_types;
pub mod merge;
pub mod resolve;
pub mod run;
pub mod subset;
pub mod windfarms;
