//! End-to-end tests of the `windatlas` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn windatlas(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_windatlas"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run windatlas")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Write a config file with the given extra INI text and return its path.
fn config(dir: &Path, extra: &str) -> PathBuf {
    let path = dir.join("config.ini");
    fs::write(&path, extra).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

const CATALOG: &str = r#"[
  {"designation": "E-82", "rotor_diameter_m": 82.0, "hub_height_m": 98.0, "rated_power_kw": 2300.0},
  {"designation": "V112-3.0", "aliases": ["V112"], "manufacturer": "Vestas", "rotor_diameter_m": 112.0, "hub_height_m": 94.0, "rated_power_kw": 3000.0}
]"#;

#[test]
fn test_config_path_honours_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.ini");
    let out = windatlas(&path, &["config", "path"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), path.display().to_string());
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.ini");

    let out = windatlas(&path, &["config", "init"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(path.exists());

    let out = windatlas(&path, &["config", "show"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("[dedupe]"));
    assert!(text.contains("[matcher]"));
}

#[test]
fn test_dedupe_writes_output_and_digest() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "");
    let input = dir.path().join("osm.json");
    fs::write(
        &input,
        r#"[
          {"id": "a", "position": {"lon": 5.0, "lat": 52.0}, "hub_height_m": 98.0},
          {"id": "b", "position": {"lon": 5.0001, "lat": 52.0}},
          {"id": "c", "position": {"lon": 6.0, "lat": 52.0}}
        ]"#,
    )
    .unwrap();
    let output = dir.path().join("out").join("osm.dedup.json");

    let out = windatlas(
        &cfg,
        &[
            "dedupe",
            input.to_str().unwrap(),
            "--source",
            "osm",
            "-o",
            output.to_str().unwrap(),
        ],
    );
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("SHA-256:"));
    assert!(stdout(&out).contains("dedupe[osm]"));

    let records = read_json(&output);
    let ids: Vec<&str> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(records[0]["source"], "osm");
}

#[test]
fn test_merge_enrich_first() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "");
    let primary = dir.path().join("p.json");
    let secondary = dir.path().join("s.json");
    fs::write(
        &primary,
        r#"[{"id": "1", "position": {"lon": 5.0, "lat": 52.0}, "source": "p", "hub_height_m": 100.0}]"#,
    )
    .unwrap();
    fs::write(
        &secondary,
        r#"[{"id": "2", "position": {"lon": 5.001, "lat": 52.0}, "source": "s",
             "hub_height_m": 80.0, "rotor_diameter_m": 120.0}]"#,
    )
    .unwrap();
    let output = dir.path().join("merged.json");

    let out = windatlas(
        &cfg,
        &[
            "merge",
            primary.to_str().unwrap(),
            secondary.to_str().unwrap(),
            "--policy",
            "enrich1",
            "--max-distance",
            "0.01",
            "-o",
            output.to_str().unwrap(),
        ],
    );
    assert!(out.status.success(), "{}", stderr(&out));

    let records = read_json(&output);
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["hub_height_m"], 100.0);
    assert_eq!(records[0]["rotor_diameter_m"], 120.0);
    assert_eq!(records[0]["source"], "p+s");
}

#[test]
fn test_unknown_policy_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "");
    let out = windatlas(
        &cfg,
        &["merge", "a.json", "b.json", "--policy", "sideways", "-o", "x.json"],
    );
    assert!(!out.status.success());
    assert!(stderr(&out).contains("sideways"));
}

#[test]
fn test_run_without_catalog_fails() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "");
    let plan = dir.path().join("plan.json");
    fs::write(&plan, r#"{"sources": {}, "steps": []}"#).unwrap();

    let out = windatlas(
        &cfg,
        &[
            "run",
            plan.to_str().unwrap(),
            "-o",
            dir.path().join("out.json").to_str().unwrap(),
        ],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("No turbine catalog configured"));
}

#[test]
fn test_run_plan_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("catalog.json");
    fs::write(&catalog, CATALOG).unwrap();
    let cfg = config(
        dir.path(),
        &format!(
            "[catalog]\npath = {}\n\n[defaults]\nglobal = E-82\n",
            catalog.display()
        ),
    );

    fs::write(
        dir.path().join("national.json"),
        r#"[{"id": "n1", "position": {"lon": 5.0, "lat": 52.0}, "model": "Vestas V112"}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("osm.json"),
        r#"[
          {"id": "o1", "position": {"lon": 5.0002, "lat": 52.0}, "hub_height_m": 94.0},
          {"id": "o2", "position": {"lon": 6.0, "lat": 52.0}}
        ]"#,
    )
    .unwrap();
    let plan = dir.path().join("plan.json");
    fs::write(
        &plan,
        r#"{
          "sources": {"national": "national.json", "osm": "osm.json"},
          "steps": [{"left": "national", "right": "osm", "output": "all", "policy": "combine"}]
        }"#,
    )
    .unwrap();
    let output = dir.path().join("inventory.json");
    let review = dir.path().join("review.json");
    let report = dir.path().join("report.json");

    let out = windatlas(
        &cfg,
        &[
            "run",
            plan.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--review",
            review.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
        ],
    );
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("Matching summary"));

    let records = read_json(&output);
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], "n1");
    assert_eq!(records[0]["turbine_type"], "V112-3.0");
    assert_eq!(records[0]["source"], "national+osm");
    assert_eq!(records[1]["id"], "o2");
    assert_eq!(records[1]["turbine_type"], "E-82");

    let review = read_json(&review);
    assert!(review
        .as_array()
        .unwrap()
        .iter()
        .any(|item| item["id"] == "o2" && item["reason"] == "default_spec"));

    let report = read_json(&report);
    assert_eq!(report["records"], 2);
    // dedupe x2, merge, match
    assert_eq!(report["stages"].as_array().unwrap().len(), 4);
}

#[test]
fn test_resolve_with_land_layer() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "");
    let land = dir.path().join("land.geojson");
    fs::write(
        &land,
        r#"{"type": "FeatureCollection", "features": [
          {"type": "Feature", "properties": {"name": "DEU"},
           "geometry": {"type": "Polygon",
                        "coordinates": [[[6.0, 47.0], [15.0, 47.0], [15.0, 55.0], [6.0, 55.0], [6.0, 47.0]]]}}
        ]}"#,
    )
    .unwrap();
    let input = dir.path().join("mastr.json");
    fs::write(
        &input,
        r#"[
          {"id": "1", "position": {"lon": 8.0, "lat": 53.0}},
          {"id": "2", "position": {"lon": 2.0, "lat": 53.0}}
        ]"#,
    )
    .unwrap();
    let output = dir.path().join("tagged.json");
    let review = dir.path().join("review.json");

    let out = windatlas(
        &cfg,
        &[
            "resolve",
            input.to_str().unwrap(),
            "--source",
            "mastr",
            "--land",
            land.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--review",
            review.to_str().unwrap(),
        ],
    );
    assert!(out.status.success(), "{}", stderr(&out));

    let records = read_json(&output);
    assert_eq!(records[0]["country"], "DEU");
    assert_eq!(records[0]["is_offshore"], false);
    assert!(records[1].get("country").is_none());

    let review = read_json(&review);
    assert_eq!(review[0]["id"], "2");
    assert_eq!(review[0]["reason"], "outside_boundaries");
}

#[test]
fn test_subset_by_bbox_and_date() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "[subset]\nsituation_date = 2015-06-01\n");
    let input = dir.path().join("mastr.json");
    fs::write(
        &input,
        r#"[
          {"id": "old", "position": {"lon": 8.0, "lat": 53.0}, "commissioned": 2001},
          {"id": "new", "position": {"lon": 8.1, "lat": 53.0}, "commissioned": "2019-03-01"},
          {"id": "far", "position": {"lon": -3.0, "lat": 53.0}, "commissioned": 2001},
          {"id": "undated", "position": {"lon": 8.2, "lat": 53.1}}
        ]"#,
    )
    .unwrap();
    let output = dir.path().join("subset.json");

    let out = windatlas(
        &cfg,
        &[
            "subset",
            input.to_str().unwrap(),
            "--bbox",
            "5,50,10,55",
            "-o",
            output.to_str().unwrap(),
        ],
    );
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("subset[input]"));

    let records = read_json(&output);
    let ids: Vec<&str> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["old", "undated"]);
    assert_eq!(records[0]["commissioned"], "2001-01-01");
}

#[test]
fn test_subset_rejects_inverted_bbox() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "");
    let out = windatlas(
        &cfg,
        &["subset", "in.json", "--bbox", "10,50,5,55", "-o", "out.json"],
    );
    assert!(!out.status.success());
    assert!(stderr(&out).contains("minimum exceeds maximum"));
}
