//! Event catalog and event search.
//!
//! Events are loaded from a JSON file and filtered after the fetch: search
//! term, radius around an origin, then a date window relative to "today".

use crate::geo::{Coordinates, GeoError, GeoPoint, Hit, RadiusQuery};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub image: Option<String>,
    pub venue: Venue,
}

impl Event {
    fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?;
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
    }

    fn matches_term(&self, term: &str) -> bool {
        let fields = [
            Some(self.name.as_str()),
            Some(self.kind.as_str()),
            Some(self.venue.name.as_str()),
            self.venue.city.as_deref(),
        ];
        fields
            .into_iter()
            .flatten()
            .any(|f| f.to_lowercase().contains(term))
    }
}

// ─── Date windows ────────────────────────────────────────────────

/// Relative date window for event search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Week,
    Weekend,
    Month,
}

impl DateFilter {
    /// Inclusive date range for this window, or None for `All`.
    pub fn window(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let days_to_sunday = 6 - i64::from(today.weekday().num_days_from_monday());
        let sunday = today + Duration::days(days_to_sunday);
        match self {
            Self::All => None,
            Self::Today => Some((today, today)),
            Self::Week => Some((today, sunday)),
            Self::Weekend => {
                let saturday = sunday - Duration::days(1);
                let start = if today.weekday() == Weekday::Sun { today } else { saturday };
                Some((start, sunday))
            }
            Self::Month => Some((today, last_day_of_month(today))),
        }
    }

    pub fn accepts(self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        match (self.window(today), date) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some((start, end)), Some(d)) => start <= d && d <= end,
        }
    }
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Weekend => "weekend",
            Self::Month => "month",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "weekend" => Ok(Self::Weekend),
            "month" => Ok(Self::Month),
            other => Err(format!(
                "Unknown date filter '{}'. Use all, today, week, weekend or month.",
                other
            )),
        }
    }
}

// ─── Catalog ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Cannot read event catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed event catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A search over the catalog.
#[derive(Debug, Clone)]
pub struct EventQuery {
    pub term: Option<String>,
    pub area: RadiusQuery,
    pub when: DateFilter,
}

/// The set of known events.
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Load a JSON array of events. A missing file is an empty catalog.
    pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
        let data = match fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(CatalogError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        let events = serde_json::from_str(&data).map_err(|source| CatalogError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events matching the query, nearest first.
    pub fn search(&self, query: &EventQuery, today: NaiveDate) -> Vec<Hit<Event>> {
        let term = query
            .term
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        let candidates = self.events.iter().filter(|e| {
            term.as_deref().map_or(true, |t| e.matches_term(t))
                && query.when.accepts(e.parsed_date(), today)
        });

        query
            .area
            .filter(candidates.cloned(), |e: &Event| -> Result<GeoPoint, GeoError> {
                e.venue.coordinates.to_point()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{DistanceUnit, CHARLOTTE};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn event(id: &str, name: &str, kind: &str, date: Option<&str>, lat: f64, lon: f64) -> Event {
        Event {
            id: id.into(),
            name: name.into(),
            date: date.map(String::from),
            time: Some("19:30".into()),
            url: None,
            kind: kind.into(),
            image: None,
            venue: Venue {
                name: format!("{} Venue", name),
                address: None,
                city: Some("Charlotte".into()),
                state: Some("NC".into()),
                coordinates: Coordinates { latitude: lat, longitude: lon },
            },
        }
    }

    // Wednesday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn catalog() -> EventCatalog {
        EventCatalog::new(vec![
            event("1", "Panthers Home Game", "Sports", Some("2024-05-18"), 35.2258, -80.8528),
            event("2", "Jazz at the Mint", "Music", Some("2024-05-15"), 35.2243, -80.8487),
            event("3", "Whitewater Fest", "Outdoors", Some("2024-05-30"), 35.2735, -81.0051),
            event("4", "Raleigh Food Fair", "Food", Some("2024-05-16"), 35.7796, -78.6382),
            event("5", "Pop-up Gallery", "Art", None, 35.2290, -80.8405),
            event("6", "Broken Coords", "Music", Some("2024-05-15"), 95.0, 0.0),
        ])
    }

    fn query(term: Option<&str>, radius: f64, when: DateFilter) -> EventQuery {
        EventQuery {
            term: term.map(String::from),
            area: RadiusQuery::new(CHARLOTTE, radius, DistanceUnit::Miles).unwrap(),
            when,
        }
    }

    fn ids(hits: &[Hit<Event>]) -> Vec<&str> {
        hits.iter().map(|h| h.item.id.as_str()).collect()
    }

    #[test]
    fn test_radius_filter_sorted() {
        let hits = catalog().search(&query(None, 25.0, DateFilter::All), today());
        assert_eq!(ids(&hits), vec!["5", "2", "1", "3"]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_wide_radius_includes_raleigh() {
        let hits = catalog().search(&query(None, 150.0, DateFilter::All), today());
        assert!(ids(&hits).contains(&"4"));
        assert!(!ids(&hits).contains(&"6"));
    }

    #[test]
    fn test_term_matches_type_and_city() {
        let c = catalog();
        assert_eq!(ids(&c.search(&query(Some("music"), 25.0, DateFilter::All), today())), vec!["2"]);
        assert_eq!(ids(&c.search(&query(Some("  JAZZ "), 25.0, DateFilter::All), today())), vec!["2"]);
        assert_eq!(c.search(&query(Some("charlotte"), 25.0, DateFilter::All), today()).len(), 4);
        assert!(c.search(&query(Some("opera"), 25.0, DateFilter::All), today()).is_empty());
    }

    #[test]
    fn test_date_filters() {
        let c = catalog();
        let run = |when| ids(&c.search(&query(None, 25.0, when), today()))
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        assert_eq!(run(DateFilter::Today), vec!["2"]);
        assert_eq!(run(DateFilter::Week), vec!["2", "1"]);
        assert_eq!(run(DateFilter::Weekend), vec!["1"]);
        assert_eq!(run(DateFilter::Month), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_weekend_window() {
        let sat = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap();
        let sun = NaiveDate::from_ymd_opt(2024, 5, 19).unwrap();
        assert_eq!(DateFilter::Weekend.window(today()), Some((sat, sun)));
        assert_eq!(DateFilter::Weekend.window(sat), Some((sat, sun)));
        assert_eq!(DateFilter::Weekend.window(sun), Some((sun, sun)));
        assert_eq!(DateFilter::Week.window(sun), Some((sun, sun)));
    }

    #[test]
    fn test_month_window_december() {
        let d = NaiveDate::from_ymd_opt(2024, 12, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(DateFilter::Month.window(d), Some((d, end)));
        let feb = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(
            DateFilter::Month.window(feb).unwrap().1,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_undated_only_in_all() {
        assert!(DateFilter::All.accepts(None, today()));
        assert!(!DateFilter::Month.accepts(None, today()));
    }

    #[test]
    fn test_parse_date_filter() {
        assert_eq!("weekend".parse::<DateFilter>().unwrap(), DateFilter::Weekend);
        assert_eq!("ALL".parse::<DateFilter>().unwrap(), DateFilter::All);
        assert!("fortnight".parse::<DateFilter>().is_err());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog = EventCatalog::load_from(&dir.path().join("events.json")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{
                "id": "tm-1",
                "name": "Symphony Night",
                "date": "2024-05-15",
                "time": null,
                "url": "https://example.com/tickets",
                "type": "Music",
                "image": null,
                "venue": {{
                    "name": "Belk Theater",
                    "address": "130 N Tryon St",
                    "city": "Charlotte",
                    "state": "NC",
                    "coordinates": {{"latitude": 35.2282, "longitude": -80.8426}}
                }}
            }}]"#
        )
        .unwrap();

        let catalog = EventCatalog::load_from(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        let hits = catalog.search(&query(Some("symphony"), 5.0, DateFilter::Today), today());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item.kind, "Music");
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            EventCatalog::load_from(file.path()),
            Err(CatalogError::Parse { .. })
        ));
    }

    #[test]
    fn test_event_serializes_type_field() {
        let json = serde_json::to_value(event("9", "X", "Comedy", None, 35.0, -80.0)).unwrap();
        assert_eq!(json["type"], "Comedy");
        assert_eq!(json["venue"]["coordinates"]["latitude"], 35.0);
    }
}
