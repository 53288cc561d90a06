//! Mapping point turbines onto aggregate wind-farm records.
//!
//! Some sources only list wind farms with a turbine count. Turbines from a
//! point source are assigned to the nearest farm within range without ever
//! exceeding a farm's count; a turbine pushed out by closer turbines moves
//! on to its next candidate farm until no assignment changes.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::record::TurbineRecord;
use crate::report::{Stage, StageOutput, StageReport};
use crate::spatial::{Neighbor, SpatialIndex};

use super::MergeOptions;

/// Farm capacity; a farm record without a count stands for one turbine.
fn capacity(farm: &TurbineRecord) -> usize {
    farm.n_turbines.map_or(1, |n| n as usize)
}

/// Assign turbines to farms. `result[t]` is the farm index of turbine `t`.
pub fn assign_to_farms(
    turbines: &[TurbineRecord],
    farms: &[TurbineRecord],
    max_distance: f64,
) -> Vec<Option<usize>> {
    let mut assigned: Vec<Option<usize>> = vec![None; turbines.len()];
    if turbines.is_empty() || farms.is_empty() {
        return assigned;
    }

    let index = SpatialIndex::from_records(farms);
    let candidates: Vec<Vec<Neighbor>> = turbines
        .par_iter()
        .map(|t| index.within_radius(&t.position, max_distance))
        .collect();

    let mut next = vec![0usize; turbines.len()];
    // Per farm: (distance, turbine) currently held.
    let mut holders: Vec<Vec<(f64, usize)>> = vec![Vec::new(); farms.len()];
    let mut rounds = 0usize;

    loop {
        let mut proposals: Vec<Vec<(f64, usize)>> = vec![Vec::new(); farms.len()];
        let mut any = false;
        for t in 0..turbines.len() {
            if assigned[t].is_none() {
                if let Some(n) = candidates[t].get(next[t]) {
                    proposals[n.index].push((n.distance, t));
                    any = true;
                }
            }
        }
        if !any {
            break;
        }
        rounds += 1;

        for (f, mut pool) in proposals.into_iter().enumerate() {
            if pool.is_empty() {
                continue;
            }
            pool.append(&mut holders[f]);
            pool.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            let keep = capacity(&farms[f]).min(pool.len());
            for &(_, t) in &pool[keep..] {
                assigned[t] = None;
                next[t] += 1;
            }
            for &(_, t) in &pool[..keep] {
                assigned[t] = Some(f);
            }
            pool.truncate(keep);
            holders[f] = pool;
        }
    }

    debug!(rounds, "Wind-farm assignment settled");
    assigned
}

/// The farm as seen by one of its turbines: per-turbine power, no count.
fn per_turbine_view(farm: &TurbineRecord) -> TurbineRecord {
    let mut view = farm.clone();
    view.installed_power_kw = farm.rated_power_kw();
    view.n_turbines = None;
    view.wind_farm = farm.wind_farm.clone().or_else(|| farm.name.clone());
    view.name = None;
    view
}

/// Maps turbines onto wind farms under a merge policy.
#[derive(Debug, Clone)]
pub struct WindfarmMapper {
    options: MergeOptions,
}

impl WindfarmMapper {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Map `turbines` (point records) onto `farms` (aggregate records).
    ///
    /// Mapped turbines keep their id and position. Under `overwrite` the
    /// farm's attributes win, otherwise the turbine's own values win. The
    /// output is the turbine set; `combine` also keeps each farm that still
    /// has unmapped capacity, with its count and installed power reduced to
    /// the remainder.
    pub fn map(
        &self,
        label: &str,
        turbines: Vec<TurbineRecord>,
        farms: Vec<TurbineRecord>,
    ) -> StageOutput {
        let policy = self.options.policy;
        let mut report = StageReport::new(Stage::WindfarmMap, label);
        report.processed = turbines.len() + farms.len();

        let assignment = assign_to_farms(&turbines, &farms, self.options.max_distance);
        let views: Vec<TurbineRecord> = farms.iter().map(per_turbine_view).collect();
        let mut mapped_per_farm = vec![0usize; farms.len()];
        let mut out = turbines;

        for (t, farm) in assignment.iter().enumerate() {
            let Some(f) = *farm else { continue };
            mapped_per_farm[f] += 1;
            let turbine = &mut out[t];
            let turbine_source = turbine.source.clone();
            if policy.apply(turbine, &views[f]) > 0 {
                turbine.source = match &self.options.label {
                    Some(tag) => tag.clone(),
                    None => format!("{}+{}", turbine_source, farms[f].source),
                };
                report.modified += 1;
            }
        }

        if policy.keeps_unmatched() {
            for (f, farm) in farms.iter().enumerate() {
                let remaining = capacity(farm).saturating_sub(mapped_per_farm[f]);
                if remaining == 0 {
                    continue;
                }
                let mut residual = farm.clone();
                if farm.n_turbines.is_some() {
                    residual.n_turbines = u32::try_from(remaining).ok();
                    residual.installed_power_kw = farm
                        .rated_power_kw()
                        .map(|per_turbine| per_turbine * remaining as f64);
                }
                out.push(residual);
            }
        }

        report.output = out.len();
        info!(
            label,
            policy = %policy,
            mapped = mapped_per_farm.iter().sum::<usize>(),
            farms = farms.len(),
            "Mapped turbines onto wind farms"
        );

        StageOutput {
            records: out,
            report,
            review: Vec::new(),
        }
    }
}
