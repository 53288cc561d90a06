//! Tests for record subsetting.

use super::*;
use crate::report::Stage;

fn record(id: &str, lon: f64, lat: f64) -> TurbineRecord {
    TurbineRecord::new(id, Position::new(lon, lat).unwrap(), "s")
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ids(records: &[TurbineRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn test_bounding_box_edges_are_inside() {
    let bbox = BoundingBox::new(5.0, 50.0, 10.0, 55.0).unwrap();
    assert!(bbox.contains(&Position::new(5.0, 50.0).unwrap()));
    assert!(bbox.contains(&Position::new(10.0, 55.0).unwrap()));
    assert!(!bbox.contains(&Position::new(10.0001, 52.0).unwrap()));
    assert!(!bbox.contains(&Position::new(7.0, 49.9).unwrap()));
}

#[test]
fn test_bounding_box_validation() {
    assert!(matches!(
        BoundingBox::new(10.0, 50.0, 5.0, 55.0),
        Err(SubsetError::InvalidBounds { .. })
    ));
    assert!(matches!(
        BoundingBox::new(5.0, 50.0, 190.0, 55.0),
        Err(SubsetError::InvalidBounds { .. })
    ));
    assert_eq!(
        BoundingBox::from_bounds(&[1.0, 2.0, 3.0]),
        Err(SubsetError::BoundsCount(3))
    );
}

#[test]
fn test_bounding_box_parse_and_display() {
    let bbox: BoundingBox = " 5.5, 50, 10, 55.25 ".parse().unwrap();
    assert_eq!(bbox, BoundingBox::new(5.5, 50.0, 10.0, 55.25).unwrap());
    assert_eq!(bbox.to_string().parse::<BoundingBox>().unwrap(), bbox);
    assert_eq!(
        "5, north, 10, 55".parse::<BoundingBox>(),
        Err(SubsetError::BoundsValue("north".into()))
    );
}

#[test]
fn test_situation_date_parse() {
    assert_eq!("all".parse::<SituationDate>().unwrap(), SituationDate::All);
    assert_eq!("".parse::<SituationDate>().unwrap(), SituationDate::All);
    assert_eq!("Today".parse::<SituationDate>().unwrap(), SituationDate::Today);
    assert_eq!(
        "2019-06-30".parse::<SituationDate>().unwrap(),
        SituationDate::On(day(2019, 6, 30))
    );
    assert!("last week".parse::<SituationDate>().is_err());
    assert_eq!(SituationDate::On(day(2019, 6, 30)).to_string(), "2019-06-30");
    assert!(SituationDate::Today.resolve().is_some());
    assert_eq!(SituationDate::All.resolve(), None);
}

#[test]
fn test_bbox_subset_keeps_order() {
    let filter = RecordFilter::new(SubsetOptions {
        spatial: SpatialSubset::BoundingBox(BoundingBox::new(5.0, 50.0, 10.0, 55.0).unwrap()),
        ..SubsetOptions::default()
    });
    let records = vec![
        record("in-b", 9.0, 54.0),
        record("out", 2.0, 52.0),
        record("in-a", 6.0, 51.0),
    ];
    let out = filter.apply("nl", records);
    assert_eq!(ids(&out.records), vec!["in-b", "in-a"]);
    assert_eq!(out.report.stage, Stage::Subset);
    assert_eq!(out.report.processed, 3);
    assert_eq!(out.report.modified, 1);
    assert_eq!(out.report.output, 2);
    assert!(out.review.is_empty());
}

#[test]
fn test_country_subset() {
    let filter = RecordFilter::new(SubsetOptions {
        spatial: SpatialSubset::Countries(vec!["DEU".into(), "nld".into()]),
        ..SubsetOptions::default()
    });
    let records = vec![
        record("de", 9.0, 52.0).with_country("DEU"),
        record("nl", 5.0, 52.0).with_country("NLD"),
        record("dk", 9.0, 56.0).with_country("DNK"),
        record("untagged", 9.0, 52.0),
    ];
    let out = filter.apply("x", records);
    assert_eq!(ids(&out.records), vec!["de", "nl"]);
}

#[test]
fn test_empty_country_list_keeps_everything() {
    let options = SubsetOptions {
        spatial: SpatialSubset::Countries(Vec::new()),
        ..SubsetOptions::default()
    };
    assert!(options.is_unrestricted());
    let out = RecordFilter::new(options).apply("x", vec![record("a", 0.0, 0.0)]);
    assert_eq!(out.records.len(), 1);
}

#[test]
fn test_situation_date_window() {
    let filter = RecordFilter::new(SubsetOptions {
        situation_date: SituationDate::On(day(2015, 1, 1)),
        ..SubsetOptions::default()
    });
    let records = vec![
        record("running", 0.0, 0.0).with_commissioned(day(2010, 1, 1)),
        record("future", 0.0, 0.0).with_commissioned(day(2016, 1, 1)),
        record("gone", 0.0, 0.0)
            .with_commissioned(day(1995, 1, 1))
            .with_decommissioned(day(2014, 12, 31)),
        record("undated", 0.0, 0.0),
    ];
    let out = filter.apply("x", records);
    assert_eq!(ids(&out.records), vec!["running", "undated"]);
    assert_eq!(filter.situation_date(), Some(day(2015, 1, 1)));
}

#[test]
fn test_spatial_and_date_combine() {
    let filter = RecordFilter::new(SubsetOptions {
        spatial: SpatialSubset::Countries(vec!["DEU".into()]),
        situation_date: SituationDate::On(day(2015, 1, 1)),
    });
    let records = vec![
        record("a", 9.0, 52.0).with_country("DEU"),
        record("b", 9.0, 52.0)
            .with_country("DEU")
            .with_commissioned(day(2020, 1, 1)),
        record("c", 5.0, 52.0).with_country("NLD"),
    ];
    assert_eq!(ids(&filter.apply("x", records).records), vec!["a"]);
}

#[test]
fn test_default_options_are_unrestricted() {
    assert!(SubsetOptions::default().is_unrestricted());
    let bbox = SubsetOptions {
        spatial: SpatialSubset::BoundingBox(BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap()),
        ..SubsetOptions::default()
    };
    assert!(!bbox.is_unrestricted());
}
