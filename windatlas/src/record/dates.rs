//! Lenient service dates.
//!
//! Registers report commissioning dates as ISO dates, ISO date-times, bare
//! year numbers or free text around a year ("2011 (repowered)"). A value
//! without a recognisable year fails deserialization, so the entry is
//! reported as malformed.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Year(f64),
    Text(String),
}

/// Which day a bare year stands for.
#[derive(Debug, Clone, Copy)]
enum YearEdge {
    Start,
    End,
}

pub(super) fn start_of_service<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    optional(deserializer, YearEdge::Start)
}

pub(super) fn end_of_service<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    optional(deserializer, YearEdge::End)
}

fn optional<'de, D>(deserializer: D, edge: YearEdge) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawDate>::deserialize(deserializer)? {
        Some(raw) => parse(raw, edge).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn parse(raw: RawDate, edge: YearEdge) -> Result<NaiveDate, String> {
    match raw {
        RawDate::Year(year) => {
            if !year.is_finite() {
                return Err(format!("invalid year {}", year));
            }
            year_date(year.trunc() as i64, edge)
        }
        RawDate::Text(text) => {
            let text = text.trim();
            let iso = text
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok());
            if let Some(date) = iso {
                return Ok(date);
            }
            let year = first_year(text).ok_or_else(|| format!("no year in date '{}'", text))?;
            year_date(year, edge)
        }
    }
}

/// First run of four ASCII digits.
fn first_year(text: &str) -> Option<i64> {
    text.as_bytes()
        .windows(4)
        .find(|w| w.iter().all(u8::is_ascii_digit))
        .and_then(|w| std::str::from_utf8(w).ok())
        .and_then(|digits| digits.parse().ok())
}

fn year_date(year: i64, edge: YearEdge) -> Result<NaiveDate, String> {
    let (month, day) = match edge {
        YearEdge::Start => (1, 1),
        YearEdge::End => (12, 31),
    };
    i32::try_from(year)
        .ok()
        .filter(|y| (1..=9999).contains(y))
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
        .ok_or_else(|| format!("year {} out of range", year))
}

#[cfg(test)]
mod tests {
    use crate::record::TurbineRecord;
    use chrono::NaiveDate;

    fn parse(extra: &str) -> Result<TurbineRecord, serde_json::Error> {
        serde_json::from_str(&format!(
            r#"{{"id": "t", "position": {{"lon": 8.0, "lat": 53.0}}, "source": "mastr"{}}}"#,
            extra
        ))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_dates_and_date_times() {
        let r = parse(r#", "commissioned": "2011-05-03", "decommissioned": "2031-01-15T00:00:00""#)
            .unwrap();
        assert_eq!(r.commissioned, Some(date(2011, 5, 3)));
        assert_eq!(r.decommissioned, Some(date(2031, 1, 15)));
    }

    #[test]
    fn test_bare_years_cover_the_whole_year() {
        let r = parse(r#", "commissioned": 2004, "decommissioned": "2024""#).unwrap();
        assert_eq!(r.commissioned, Some(date(2004, 1, 1)));
        assert_eq!(r.decommissioned, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_year_inside_free_text() {
        let r = parse(r#", "commissioned": "ca. 1998 (repowered)""#).unwrap();
        assert_eq!(r.commissioned, Some(date(1998, 1, 1)));
    }

    #[test]
    fn test_null_and_missing_dates() {
        let r = parse(r#", "commissioned": null"#).unwrap();
        assert_eq!(r.commissioned, None);
        assert_eq!(r.decommissioned, None);
    }

    #[test]
    fn test_text_without_year_is_rejected() {
        let err = parse(r#", "commissioned": "unknown""#).unwrap_err();
        assert!(err.to_string().contains("no year"), "{}", err);
    }

    #[test]
    fn test_dates_serialize_as_iso() {
        let r = parse(r#", "commissioned": 2004"#).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["commissioned"], "2004-01-01");
        assert!(json.get("decommissioned").is_none());
    }
}
