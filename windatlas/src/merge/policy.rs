//! Merge policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::TurbineRecord;

/// How two record sets with partial spatial correspondence are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MergePolicy {
    /// Secondary values replace primary values; unmatched secondary dropped
    Overwrite,
    /// Primary values kept, gaps filled; unmatched secondary dropped
    EnrichFirst,
    /// Like `EnrichFirst`, but unmatched secondary records are kept
    Combine,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown merge policy '{0}' (expected overwrite, enrich_first or combine)")]
pub struct UnknownPolicy(pub String);

impl MergePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            MergePolicy::Overwrite => "overwrite",
            MergePolicy::EnrichFirst => "enrich_first",
            MergePolicy::Combine => "combine",
        }
    }

    /// Apply this policy's attribute rule to a matched pair.
    ///
    /// Returns the number of attributes of `target` that changed.
    pub fn apply(&self, target: &mut TurbineRecord, donor: &TurbineRecord) -> usize {
        match self {
            MergePolicy::Overwrite => target.overwrite_from(donor),
            MergePolicy::EnrichFirst | MergePolicy::Combine => target.fill_missing_from(donor),
        }
    }

    /// Whether unmatched secondary records survive the merge.
    pub fn keeps_unmatched(&self) -> bool {
        matches!(self, MergePolicy::Combine)
    }
}

impl FromStr for MergePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" | "map" => Ok(MergePolicy::Overwrite),
            "enrich_first" | "enrich1" | "enrich_1" | "enrichset1" | "enrich_set_1"
            | "union_with_intersection_2" => Ok(MergePolicy::EnrichFirst),
            "combine" | "union" | "or" => Ok(MergePolicy::Combine),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for MergePolicy {
    type Error = UnknownPolicy;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MergePolicy> for String {
    fn from(policy: MergePolicy) -> Self {
        policy.name().to_string()
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
