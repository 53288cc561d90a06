//! Matching summary: counts per method and per country.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// How a record ended up typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Already typed by its source
    Preassigned,
    Designation,
    Scored,
    RegionDefault,
    Unresolved,
}

impl MatchKind {
    pub fn name(&self) -> &'static str {
        match self {
            MatchKind::Preassigned => "preassigned",
            MatchKind::Designation => "designation",
            MatchKind::Scored => "scored",
            MatchKind::RegionDefault => "region_default",
            MatchKind::Unresolved => "unresolved",
        }
    }
}

/// Counts of matching outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchSummary {
    pub by_method: BTreeMap<MatchKind, usize>,
    /// Country (or `"unknown"`) to per-method counts
    pub by_country: BTreeMap<String, BTreeMap<MatchKind, usize>>,
}

impl MatchSummary {
    pub fn record(&mut self, kind: MatchKind, country: Option<&str>) {
        *self.by_method.entry(kind).or_default() += 1;
        let country = country.unwrap_or("unknown").to_string();
        *self
            .by_country
            .entry(country)
            .or_default()
            .entry(kind)
            .or_default() += 1;
    }

    pub fn count(&self, kind: MatchKind) -> usize {
        self.by_method.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.by_method.values().sum()
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matching summary ({} records)", self.total())?;
        for (kind, n) in &self.by_method {
            writeln!(f, "  {:<15} {:>8}", kind.name(), n)?;
        }
        for (country, counts) in &self.by_country {
            let parts: Vec<String> = counts
                .iter()
                .map(|(kind, n)| format!("{}={}", kind.name(), n))
                .collect();
            writeln!(f, "  {:<8} {}", country, parts.join(" "))?;
        }
        Ok(())
    }
}
