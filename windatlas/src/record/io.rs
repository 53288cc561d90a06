//! Reading and writing record sets as JSON arrays.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::io::{read_input, write_output};
use crate::report::{ReviewItem, ReviewReason, Stage, StageOutput};

use super::{RecordBatch, TurbineRecord};

/// Errors that abort reading or writing a whole record set.
///
/// Individual bad entries are not errors; they become review items.
#[derive(Debug, Error)]
pub enum RecordIoError {
    #[error("Record file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON array of records in {0}")]
    NotAnArray(PathBuf),
}

/// Read a record set and validate it.
///
/// `default_source` is used for entries that carry no `source` field.
/// Numeric ids are accepted and converted to strings.
pub fn read_records(
    path: &Path,
    default_source: Option<&str>,
) -> Result<StageOutput, RecordIoError> {
    if !path.exists() {
        return Err(RecordIoError::NotFound(path.to_path_buf()));
    }
    let bytes = read_input(path).map_err(|source| RecordIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|source| RecordIoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Array(entries) = value else {
        return Err(RecordIoError::NotAnArray(path.to_path_buf()));
    };

    let label = default_source
        .map(str::to_string)
        .unwrap_or_else(|| file_label(path));
    let total = entries.len();
    let (records, malformed) = parse_entries(entries, default_source);

    let mut output = RecordBatch::new(label, records).ingest();
    output.report.processed = total;
    output.report.flagged += malformed.len();
    output.review.splice(0..0, malformed);

    info!(
        path = %path.display(),
        records = output.records.len(),
        rejected = output.report.flagged,
        "Loaded record set"
    );
    Ok(output)
}

/// Write a record set as pretty JSON. Returns the SHA-256 of the file.
pub fn write_records(path: &Path, records: &[TurbineRecord]) -> Result<String, RecordIoError> {
    let bytes = records_json(records).map_err(|source| RecordIoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let digest = write_output(path, &bytes).map_err(|source| RecordIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), records = records.len(), digest = %digest, "Wrote record set");
    Ok(digest)
}

/// Serialized form used for output files and digests.
pub fn records_json(records: &[TurbineRecord]) -> Result<Vec<u8>, serde_json::Error> {
    let mut bytes = serde_json::to_vec_pretty(records)?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn parse_entries(
    entries: Vec<Value>,
    default_source: Option<&str>,
) -> (Vec<TurbineRecord>, Vec<ReviewItem>) {
    let mut records = Vec::with_capacity(entries.len());
    let mut malformed = Vec::new();

    for mut entry in entries {
        if let Value::Object(map) = &mut entry {
            if let Some(Value::Number(n)) = map.get("id") {
                let id = n.to_string();
                map.insert("id".to_string(), Value::String(id));
            }
            if let Some(source) = default_source {
                map.entry("source")
                    .or_insert_with(|| Value::String(source.to_string()));
            }
        }

        let source = string_field(&entry, "source");
        let id = string_field(&entry, "id");
        match serde_json::from_value::<TurbineRecord>(entry) {
            Ok(record) => records.push(record),
            Err(e) => malformed.push(ReviewItem {
                stage: Stage::Ingest,
                source,
                id,
                reason: ReviewReason::Malformed {
                    message: e.to_string(),
                },
            }),
        }
    }

    (records, malformed)
}

fn string_field(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn file_label(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.trim_end_matches(".gz")
        .trim_end_matches(".json")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Position;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let result = read_records(Path::new("/nonexistent/records.json"), None);
        assert!(matches!(result, Err(RecordIoError::NotFound(_))));
    }

    #[test]
    fn test_read_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, r#"{"id": "1"}"#).unwrap();
        assert!(matches!(
            read_records(&path, None),
            Err(RecordIoError::NotAnArray(_))
        ));
    }

    #[test]
    fn test_malformed_entries_become_review_items() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("osm.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 7, "position": {"lon": 4.0, "lat": 52.0}, "rotor_diameter_m": 120.0},
                {"id": "8", "position": {"lon": "east", "lat": 52.0}},
                {"id": "9", "position": {"lon": 4.0, "lat": 95.0}}
            ]"#,
        )
        .unwrap();

        let out = read_records(&path, Some("osm")).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].id, "7");
        assert_eq!(out.records[0].source, "osm");
        assert_eq!(out.records[0].rotor_diameter_m, Some(120.0));
        assert_eq!(out.review.len(), 2);
        assert!(matches!(out.review[0].reason, ReviewReason::Malformed { .. }));
        assert_eq!(out.review[0].id, "8");
        assert!(matches!(
            out.review[1].reason,
            ReviewReason::InvalidPosition { .. }
        ));
        assert_eq!(out.report.processed, 3);
        assert_eq!(out.report.flagged, 2);
    }

    #[test]
    fn test_write_then_read_preserves_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let records = vec![TurbineRecord::new("1", Position::new(4.0, 52.0).unwrap(), "a")
            .with_hub_height(100.0)
            .with_country("NL")];

        let digest = write_records(&path, &records).unwrap();
        assert_eq!(digest.len(), 64);

        let out = read_records(&path, None).unwrap();
        assert_eq!(out.records, records);
    }

    #[test]
    fn test_missing_attributes_are_not_serialized() {
        let records = vec![TurbineRecord::new("1", Position::new(4.0, 52.0).unwrap(), "a")];
        let text = String::from_utf8(records_json(&records).unwrap()).unwrap();
        assert!(!text.contains("hub_height_m"));
        assert!(!text.contains("null"));
    }
}
