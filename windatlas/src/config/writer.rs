//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use crate::filter::SpatialSubset;

use super::settings::ConfigFile;

/// Render a `ConfigFile` as the commented INI written by `config init`.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let defaults: String = if config.defaults.is_empty() {
        "; global = E-82\n; global.offshore = SWT-6.0-154\n; DE.onshore = E-115\n".to_string()
    } else {
        config
            .defaults
            .iter()
            .map(|(key, designation)| format!("{} = {}\n", key, designation))
            .collect()
    };

    let (subset_bbox, subset_countries) = match &config.subset.spatial {
        SpatialSubset::BoundingBox(bbox) => (bbox.to_string(), String::new()),
        SpatialSubset::Countries(list) => (String::new(), list.join(", ")),
        SpatialSubset::All => (String::new(), String::new()),
    };

    format!(
        r#"[boundaries]
; GeoJSON FeatureCollections (optionally .gz) with country polygons.
land = {land}
eez = {eez}
; Feature attributes tried in order for the country name.
land_name_fields = {land_fields}
eez_name_fields = {eez_fields}

[catalog]
; JSON array of turbine models.
path = {catalog}

[defaults]
; Fallback designation per region when no catalog entry matches.
; Keys: global, global.onshore, global.offshore, <COUNTRY>, <COUNTRY>.onshore, <COUNTRY>.offshore
{defaults}
[dedupe]
; Records closer than this many degrees are duplicates (0.0015 is about 150 m).
min_distance = {min_distance}
; Sources in order of trust, used to pick the surviving record.
source_priority = {source_priority}
; Fill the survivor's missing attributes from the dropped duplicates.
enrich_survivor = {enrich_survivor}

[merge]
; Default correspondence distance in degrees for plan steps without d_max.
max_distance = {max_distance}

[subset]
; Spatial subset before matching: all, bbox or country.
method = {subset_method}
; min_lon, min_lat, max_lon, max_lat (method = bbox)
bbox = {subset_bbox}
; Country codes as tagged by the resolver (method = country).
countries = {subset_countries}
; Keep turbines in service on this day: all, today or YYYY-MM-DD.
situation_date = {situation_date}

[matcher]
weight_rotor_diameter = {w_d}
weight_hub_height = {w_h}
weight_rated_power = {w_p}
; Catalog matches must score strictly below this weighted distance.
acceptance_threshold = {threshold}
; Catalog matches below this confidence are listed for review.
review_confidence = {review}
; Model names never assigned, comma separated.
forbidden_types = {forbidden}
allow_extrapolation = {extrapolation}

[logging]
; Leave empty to log to the console only.
directory = {log_dir}
file = {log_file}
"#,
        land = optional_path(config.boundaries.land.as_deref()),
        eez = optional_path(config.boundaries.eez.as_deref()),
        land_fields = config.boundaries.land_name_fields.join(", "),
        eez_fields = config.boundaries.eez_name_fields.join(", "),
        catalog = optional_path(config.catalog.path.as_deref()),
        defaults = defaults,
        min_distance = config.dedupe.min_distance,
        source_priority = config.dedupe.source_priority.join(", "),
        enrich_survivor = config.dedupe.enrich_survivor,
        max_distance = config.merge.max_distance,
        subset_method = config.subset.spatial.method(),
        subset_bbox = subset_bbox,
        subset_countries = subset_countries,
        situation_date = config.subset.situation_date,
        w_d = config.matcher.weight_rotor_diameter,
        w_h = config.matcher.weight_hub_height,
        w_p = config.matcher.weight_rated_power,
        threshold = config.matcher.acceptance_threshold,
        review = config.matcher.review_confidence,
        forbidden = config.matcher.forbidden_types.join(", "),
        extrapolation = config.matcher.allow_extrapolation,
        log_dir = optional_path(config.logging.directory.as_deref()),
        log_file = config.logging.file.as_deref().unwrap_or(""),
    )
}

fn optional_path(path: Option<&Path>) -> String {
    path.map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}
