//! Declarative merge plans.
//!
//! A plan is an ordered list of binary steps over named record sets, for
//! example two national sets into a region and two regions into a
//! continent. The reducer validates the whole plan up front and then runs
//! each step with the generic merger or wind-farm mapper.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::io::read_input;
use crate::record::TurbineRecord;
use crate::report::{ReviewItem, StageReport};

use super::{MergeOptions, MergePolicy, RecordMerger, WindfarmMapper};

/// Errors in a merge plan. All are detected before any step runs.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Merge plan has no steps")]
    Empty,

    #[error("Step {step} refers to unknown record set '{name}'")]
    UnknownInput { step: usize, name: String },

    #[error("Step {step} writes '{name}', which already exists")]
    DuplicateOutput { step: usize, name: String },

    #[error("Plan result '{0}' is not produced by any step")]
    UnknownResult(String),

    #[error("Step {step} has invalid d_max {value}")]
    InvalidDistance { step: usize, value: f64 },

    #[error("Failed to read plan {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid plan JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Which primitive a step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// `RecordMerger` with `left` as primary
    #[default]
    Merge,
    /// `WindfarmMapper` with `left` as turbines and `right` as farms
    Windfarm,
}

/// One binary step of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeStep {
    pub left: String,
    pub right: String,
    pub output: String,
    pub policy: MergePolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_max: Option<f64>,
    /// Provenance tag for merged records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: StepKind,
}

/// An ordered list of merge steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MergePlan {
    pub steps: Vec<MergeStep>,
    /// Name of the set to return; defaults to the last step's output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Everything a plan run produced.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub result: String,
    pub records: Vec<TurbineRecord>,
    pub reports: Vec<StageReport>,
    pub review: Vec<ReviewItem>,
}

impl MergePlan {
    /// Load a plan from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, PlanError> {
        let bytes = read_input(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| PlanError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Name of the set the plan returns.
    pub fn result_name(&self) -> Option<&str> {
        self.result
            .as_deref()
            .or_else(|| self.steps.last().map(|s| s.output.as_str()))
    }

    /// Check the plan against the names of the available inputs.
    pub fn validate<'a>(
        &self,
        inputs: impl IntoIterator<Item = &'a str>,
        default_d_max: f64,
    ) -> Result<(), PlanError> {
        if self.steps.is_empty() {
            return Err(PlanError::Empty);
        }
        let mut known: HashSet<&str> = inputs.into_iter().collect();

        for (step, s) in self.steps.iter().enumerate() {
            for name in [&s.left, &s.right] {
                if !known.contains(name.as_str()) {
                    return Err(PlanError::UnknownInput {
                        step,
                        name: name.clone(),
                    });
                }
            }
            let d_max = s.d_max.unwrap_or(default_d_max);
            if !d_max.is_finite() || d_max < 0.0 {
                return Err(PlanError::InvalidDistance { step, value: d_max });
            }
            if !known.insert(s.output.as_str()) {
                return Err(PlanError::DuplicateOutput {
                    step,
                    name: s.output.clone(),
                });
            }
        }

        if let Some(result) = &self.result {
            if !self.steps.iter().any(|s| &s.output == result) {
                return Err(PlanError::UnknownResult(result.clone()));
            }
        }
        Ok(())
    }

    /// Run the plan over named record sets.
    pub fn execute(
        &self,
        mut sets: BTreeMap<String, Vec<TurbineRecord>>,
        default_d_max: f64,
    ) -> Result<PlanOutcome, PlanError> {
        self.validate(sets.keys().map(String::as_str), default_d_max)?;

        let mut reports = Vec::with_capacity(self.steps.len());
        let mut review = Vec::new();

        for (step, s) in self.steps.iter().enumerate() {
            let left = take_input(&sets, step, &s.left)?;
            let right = take_input(&sets, step, &s.right)?;
            let mut options = MergeOptions::new(s.policy, s.d_max.unwrap_or(default_d_max));
            options.label = s.label.clone();

            let output = match s.kind {
                StepKind::Merge => RecordMerger::new(options).merge(&s.output, left, right),
                StepKind::Windfarm => WindfarmMapper::new(options).map(&s.output, left, right),
            };
            output.log();
            reports.push(output.report);
            review.extend(output.review);
            sets.insert(s.output.clone(), output.records);
        }

        let result = self
            .result_name()
            .map(str::to_string)
            .ok_or(PlanError::Empty)?;
        let records = sets
            .remove(&result)
            .ok_or_else(|| PlanError::UnknownResult(result.clone()))?;

        info!(result = %result, records = records.len(), steps = self.steps.len(), "Merge plan complete");
        Ok(PlanOutcome {
            result,
            records,
            reports,
            review,
        })
    }
}

fn take_input(
    sets: &BTreeMap<String, Vec<TurbineRecord>>,
    step: usize,
    name: &str,
) -> Result<Vec<TurbineRecord>, PlanError> {
    sets.get(name)
        .cloned()
        .ok_or_else(|| PlanError::UnknownInput {
            step,
            name: name.to_string(),
        })
}
