//! GeoJSON boundary loading.
//!
//! Accepts a `FeatureCollection` (optionally gzip-compressed) whose
//! features carry `Polygon` or `MultiPolygon` geometries. Other geometry
//! types and features without a usable name are skipped.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::io::read_input;

use super::layer::{BoundaryFeature, BoundaryLayer};
use super::polygon::{Polygon, Ring};
use super::BoundaryError;

/// Attribute values that mean "no name" in common boundary datasets.
const MISSING_NAMES: [&str; 4] = ["", "N/A", "NA", "-99"];

/// Load a boundary layer, naming features by the first usable field.
pub fn load_layer(
    path: &Path,
    kind: &'static str,
    name_fields: &[String],
) -> Result<BoundaryLayer, BoundaryError> {
    if !path.exists() {
        return Err(BoundaryError::NotFound(path.to_path_buf()));
    }
    let bytes = read_input(path).map_err(|source| BoundaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: Value = serde_json::from_slice(&bytes).map_err(|source| BoundaryError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let layer = parse_feature_collection(&root, kind, name_fields).map_err(|e| match e {
        ParseIssue::NotFeatureCollection => BoundaryError::NotFeatureCollection(path.to_path_buf()),
        ParseIssue::Geometry { feature, reason } => BoundaryError::InvalidGeometry {
            path: path.to_path_buf(),
            feature,
            reason,
        },
    })?;

    if layer.is_empty() {
        return Err(BoundaryError::NoFeatures(path.to_path_buf()));
    }
    info!(path = %path.display(), kind, features = layer.len(), "Loaded boundary layer");
    Ok(layer)
}

#[derive(Debug)]
pub(crate) enum ParseIssue {
    NotFeatureCollection,
    Geometry { feature: usize, reason: String },
}

/// Build a layer from an in-memory GeoJSON document.
pub(crate) fn parse_feature_collection(
    root: &Value,
    kind: &'static str,
    name_fields: &[String],
) -> Result<BoundaryLayer, ParseIssue> {
    if root.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(ParseIssue::NotFeatureCollection);
    }
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or(ParseIssue::NotFeatureCollection)?;

    let mut parsed = Vec::new();
    let mut skipped = 0usize;
    for (order, feature) in features.iter().enumerate() {
        let Some(name) = feature_name(feature, name_fields) else {
            skipped += 1;
            continue;
        };
        let geometry = feature.get("geometry").unwrap_or(&Value::Null);
        let polygons = match geometry.get("type").and_then(Value::as_str) {
            Some("Polygon") => vec![parse_polygon(coordinates(geometry), order)?],
            Some("MultiPolygon") => coordinates(geometry)
                .as_array()
                .ok_or_else(|| geometry_issue(order, "MultiPolygon coordinates must be an array"))?
                .iter()
                .map(|poly| parse_polygon(poly, order))
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                skipped += 1;
                continue;
            }
        };
        parsed.push(BoundaryFeature {
            name,
            file_order: order,
            polygons,
        });
    }

    if skipped > 0 {
        debug!(kind, skipped, "Skipped boundary features without name or polygon geometry");
    }
    Ok(BoundaryLayer::new(kind, parsed))
}

fn feature_name(feature: &Value, name_fields: &[String]) -> Option<String> {
    let properties = feature.get("properties")?;
    name_fields.iter().find_map(|field| {
        let text = match properties.get(field)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!MISSING_NAMES.contains(&text.as_str())).then_some(text)
    })
}

fn coordinates(geometry: &Value) -> &Value {
    geometry.get("coordinates").unwrap_or(&Value::Null)
}

fn geometry_issue(feature: usize, reason: &str) -> ParseIssue {
    ParseIssue::Geometry {
        feature,
        reason: reason.to_string(),
    }
}

fn parse_polygon(value: &Value, feature: usize) -> Result<Polygon, ParseIssue> {
    let rings = value
        .as_array()
        .ok_or_else(|| geometry_issue(feature, "polygon must be an array of rings"))?;
    let mut rings = rings.iter().map(|ring| parse_ring(ring, feature));
    let exterior = rings
        .next()
        .ok_or_else(|| geometry_issue(feature, "polygon has no exterior ring"))??;
    let holes = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, holes))
}

fn parse_ring(value: &Value, feature: usize) -> Result<Ring, ParseIssue> {
    let vertices = value
        .as_array()
        .ok_or_else(|| geometry_issue(feature, "ring must be an array of positions"))?;
    let ring = vertices
        .iter()
        .map(|v| {
            // Extra dimensions (elevation) are ignored.
            let lon = v.get(0).and_then(Value::as_f64);
            let lat = v.get(1).and_then(Value::as_f64);
            match (lon, lat) {
                (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => Ok([lon, lat]),
                _ => Err(geometry_issue(feature, "position must hold two finite numbers")),
            }
        })
        .collect::<Result<Ring, _>>()?;
    if ring.len() < 3 {
        return Err(geometry_issue(feature, "ring needs at least three positions"));
    }
    Ok(ring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn square(x0: f64, y0: f64, size: f64) -> Value {
        json!([[[x0, y0], [x0 + size, y0], [x0 + size, y0 + size], [x0, y0 + size], [x0, y0]]])
    }

    #[test]
    fn test_name_field_fallback() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"ISO_SOV1": "N/A", "SOVEREIGN1": "Norway"},
                 "geometry": {"type": "Polygon", "coordinates": square(0.0, 0.0, 1.0)}},
                {"type": "Feature", "properties": {"ISO_SOV1": -99, "SOVEREIGN1": null},
                 "geometry": {"type": "Polygon", "coordinates": square(2.0, 0.0, 1.0)}}
            ]
        });
        let layer =
            parse_feature_collection(&doc, "eez", &fields(&["ISO_SOV1", "SOVEREIGN1"])).unwrap();
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.locate([0.5, 0.5]), Some("Norway"));
        assert_eq!(layer.locate([2.5, 0.5]), None);
    }

    #[test]
    fn test_multipolygon_and_skipped_geometry() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"name": "DK"},
                 "geometry": {"type": "MultiPolygon",
                              "coordinates": [square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)]}},
                {"properties": {"name": "XX"},
                 "geometry": {"type": "Point", "coordinates": [1.0, 1.0]}}
            ]
        });
        let layer = parse_feature_collection(&doc, "land", &fields(&["name"])).unwrap();
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.locate([5.5, 5.5]), Some("DK"));
        assert_eq!(layer.locate([0.5, 0.5]), Some("DK"));
    }

    #[test]
    fn test_three_dimensional_positions() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"name": "NL"},
                 "geometry": {"type": "Polygon",
                              "coordinates": [[[0.0, 0.0, 3.0], [1.0, 0.0, 3.0], [1.0, 1.0, 3.0], [0.0, 0.0, 3.0]]]}}
            ]
        });
        let layer = parse_feature_collection(&doc, "land", &fields(&["name"])).unwrap();
        assert_eq!(layer.locate([0.9, 0.1]), Some("NL"));
    }

    #[test]
    fn test_bad_geometry_is_reported() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"name": "NL"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0.0, "a"], [1.0, 0.0], [1.0, 1.0]]]}}
            ]
        });
        let result = parse_feature_collection(&doc, "land", &fields(&["name"]));
        assert!(matches!(result, Err(ParseIssue::Geometry { feature: 0, .. })));
    }

    #[test]
    fn test_load_layer_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.geojson");
        assert!(matches!(
            load_layer(&missing, "land", &fields(&["name"])),
            Err(BoundaryError::NotFound(_))
        ));

        let empty = dir.path().join("empty.geojson");
        std::fs::write(&empty, r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(matches!(
            load_layer(&empty, "land", &fields(&["name"])),
            Err(BoundaryError::NoFeatures(_))
        ));

        let wrong = dir.path().join("wrong.geojson");
        std::fs::write(&wrong, r#"{"type":"Feature"}"#).unwrap();
        assert!(matches!(
            load_layer(&wrong, "land", &fields(&["name"])),
            Err(BoundaryError::NotFeatureCollection(_))
        ));
    }
}
