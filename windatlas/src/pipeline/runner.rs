//! Stage composition.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rayon::prelude::*;
use serde::Deserialize;
use tracing::info;

use crate::boundary::{load_layer, CountryOffshoreResolver};
use crate::catalog::{RegionDefaults, SpecCatalog};
use crate::config::ConfigFile;
use crate::dedupe::{DedupeOptions, Deduplicator};
use crate::filter::{RecordFilter, SubsetOptions};
use crate::io::read_input;
use crate::matcher::{MatcherOptions, TurbineSpecMatcher};
use crate::merge::{MergePlan, PlanError, DEFAULT_MAX_DISTANCE};
use crate::record::{read_records, TurbineRecord};
use crate::report::{ReviewItem, StageOutput, StageReport};

use super::report::PipelineOutcome;
use super::PipelineError;

/// A merge plan together with the files of its named sources.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunPlan {
    /// Source name → record file; relative paths are relative to the plan
    pub sources: BTreeMap<String, PathBuf>,
    #[serde(flatten)]
    pub plan: MergePlan,
}

impl RunPlan {
    /// Load a run plan; relative source paths are resolved against the
    /// plan file's directory.
    pub fn from_path(path: &Path) -> Result<Self, PlanError> {
        let bytes = read_input(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut plan: RunPlan = serde_json::from_slice(&bytes).map_err(|source| PlanError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for file in plan.sources.values_mut() {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
        Ok(plan)
    }

    /// Read every source, labelled by its name.
    pub fn load_sources(&self) -> Result<Vec<(String, StageOutput)>, PipelineError> {
        self.sources
            .iter()
            .map(|(name, path)| Ok((name.clone(), read_records(path, Some(name))?)))
            .collect()
    }
}

/// Resolve → dedupe per source, merge by plan, subset, then match
/// specifications.
///
/// Each stage takes a record set and returns a new one; nothing is written
/// to disk between stages.
pub struct Pipeline {
    resolver: Option<CountryOffshoreResolver>,
    dedupe: DedupeOptions,
    merge_distance: f64,
    subset: Option<RecordFilter>,
    catalog: SpecCatalog,
    defaults: RegionDefaults,
    matcher: MatcherOptions,
}

impl Pipeline {
    pub fn new(catalog: SpecCatalog, defaults: RegionDefaults) -> Self {
        Self {
            resolver: None,
            dedupe: DedupeOptions::default(),
            merge_distance: DEFAULT_MAX_DISTANCE,
            subset: None,
            catalog,
            defaults,
            matcher: MatcherOptions::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: CountryOffshoreResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_dedupe(mut self, options: DedupeOptions) -> Self {
        self.dedupe = options;
        self
    }

    pub fn with_merge_distance(mut self, max_distance: f64) -> Self {
        self.merge_distance = max_distance;
        self
    }

    /// Subset the merged inventory before matching.
    pub fn with_subset(mut self, options: SubsetOptions) -> Self {
        self.subset = Some(RecordFilter::new(options));
        self
    }

    pub fn with_matcher(mut self, options: MatcherOptions) -> Self {
        self.matcher = options;
        self
    }

    /// Build a pipeline from configuration, loading all reference data.
    ///
    /// A missing catalog, an unreadable boundary layer or a region default
    /// that names an unknown designation is fatal.
    pub fn from_config(config: &ConfigFile) -> Result<Self, PipelineError> {
        let catalog_path = config
            .catalog
            .path
            .as_ref()
            .ok_or(PipelineError::MissingCatalog)?;
        let catalog = SpecCatalog::from_path(catalog_path)?;
        let defaults = RegionDefaults::new(config.defaults.iter().cloned(), &catalog)?;

        let mut pipeline = Self::new(catalog, defaults)
            .with_dedupe(config.dedupe_options())
            .with_merge_distance(config.merge.max_distance)
            .with_matcher(config.matcher_options());

        if let Some(resolver) = resolver_from_config(config)? {
            pipeline = pipeline.with_resolver(resolver);
        }
        if !config.subset.is_unrestricted() {
            pipeline = pipeline.with_subset(config.subset.clone());
        }
        Ok(pipeline)
    }

    pub fn catalog(&self) -> &SpecCatalog {
        &self.catalog
    }

    pub fn defaults(&self) -> &RegionDefaults {
        &self.defaults
    }

    pub fn matcher(&self) -> TurbineSpecMatcher<'_> {
        TurbineSpecMatcher::new(&self.catalog, &self.defaults, self.matcher.clone())
    }

    /// Tag (when boundaries are configured) and deduplicate one source.
    pub fn prepare(&self, name: &str, records: Vec<TurbineRecord>) -> Vec<StageOutput> {
        let mut outputs = Vec::with_capacity(2);
        let records = match &self.resolver {
            Some(resolver) => {
                let resolved = resolver.resolve(name, records);
                let records = resolved.records.clone();
                outputs.push(resolved);
                records
            }
            None => records,
        };
        outputs.push(Deduplicator::new(self.dedupe.clone()).dedupe(name, records));
        outputs
    }

    /// Run every stage over named sources.
    pub fn run(
        &self,
        plan: &MergePlan,
        sources: BTreeMap<String, Vec<TurbineRecord>>,
    ) -> Result<PipelineOutcome, PipelineError> {
        let started = Utc::now();
        plan.validate(sources.keys().map(String::as_str), self.merge_distance)?;

        let prepared: Vec<(String, Vec<StageOutput>)> = sources
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(name, records)| {
                let outputs = self.prepare(&name, records);
                (name, outputs)
            })
            .collect();

        let mut reports: Vec<StageReport> = Vec::new();
        let mut review: Vec<ReviewItem> = Vec::new();
        let mut sets = BTreeMap::new();
        for (name, outputs) in prepared {
            let mut last = Vec::new();
            for output in outputs {
                output.log();
                reports.push(output.report);
                review.extend(output.review);
                last = output.records;
            }
            sets.insert(name, last);
        }

        let merged = plan.execute(sets, self.merge_distance)?;
        reports.extend(merged.reports);
        review.extend(merged.review);

        let inventory = match &self.subset {
            Some(filter) => {
                let subset = filter.apply(&merged.result, merged.records);
                subset.log();
                reports.push(subset.report);
                subset.records
            }
            None => merged.records,
        };

        let (matched, summary) = self.matcher().assign(&merged.result, inventory);
        matched.log();
        reports.push(matched.report);
        review.extend(matched.review);

        let finished = Utc::now();
        info!(
            records = matched.records.len(),
            review = review.len(),
            elapsed_ms = (finished - started).num_milliseconds(),
            "Pipeline complete"
        );

        Ok(PipelineOutcome {
            inventory: matched.records,
            reports,
            review,
            summary,
            started,
            finished,
        })
    }
}

/// Load the boundary layers named in the configuration, if any.
pub fn resolver_from_config(
    config: &ConfigFile,
) -> Result<Option<CountryOffshoreResolver>, PipelineError> {
    let b = &config.boundaries;
    let Some(land_path) = &b.land else {
        return Ok(None);
    };
    let land = load_layer(land_path, "land", &b.land_name_fields)?;
    let eez = match &b.eez {
        Some(path) => Some(load_layer(path, "eez", &b.eez_name_fields)?),
        None => None,
    };
    Ok(Some(CountryOffshoreResolver::new(land, eez)))
}
