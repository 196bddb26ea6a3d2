//! Canonical departure and station entities.

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;

use super::error::NormalizeError;
use super::mode::{Mode, classify, line_name};
use super::time::{RawTimestamp, parse_delay, parse_departure_time};

/// A departure record as handed over by a timetable collaborator.
///
/// Fields are kept in their upstream encodings; [`Departure::from_raw`]
/// turns them into a canonical [`Departure`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDeparture {
    /// Provider category code ("T", "IC", "strain", ...)
    pub category: String,
    /// Display line, if the provider gives one ("S7")
    pub line: String,
    /// Line number, used with `category` when `line` is empty
    pub number: String,
    /// Station the departure leaves from
    pub from: String,
    /// Terminus or exit station
    pub to: String,
    /// Formatted departure time
    pub time: Option<String>,
    /// Departure time as Unix epoch seconds
    pub timestamp: Option<i64>,
    /// Delay: empty, "X" or minutes
    pub delay: String,
    /// Platform or track
    pub platform: Option<String>,
}

/// A normalized departure, ready for filtering and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Line or vehicle name ("7", "S7")
    pub name: String,
    /// Canonical transport mode
    pub mode: Mode,
    /// Raw provider category; spoken when `mode` is unknown
    pub category: String,
    /// Departure station
    pub from: String,
    /// Destination
    pub to: String,
    /// When it leaves
    pub departing_at: DateTime<FixedOffset>,
    /// Minutes behind schedule; 0 is on time or unknown
    pub delay_minutes: u32,
    /// Platform, when reported
    pub platform: Option<String>,
}

impl Departure {
    /// Normalize a raw record.
    ///
    /// Fails only when the delay or the departure time cannot be read.
    pub fn from_raw(raw: &RawDeparture, tz: Tz) -> Result<Self, NormalizeError> {
        let departing_at = parse_departure_time(
            RawTimestamp {
                text: raw.time.as_deref(),
                epoch: raw.timestamp,
            },
            tz,
        )?;
        let delay_minutes = parse_delay(&raw.delay)?;

        let name = if raw.line.trim().is_empty() {
            line_name(&raw.category, &raw.number)
        } else {
            raw.line.trim().to_string()
        };

        let platform = raw
            .platform
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Self {
            name,
            mode: classify(&raw.category),
            category: raw.category.trim().to_string(),
            from: raw.from.clone(),
            to: raw.to.clone(),
            departing_at,
            delay_minutes,
            platform,
        })
    }

    /// Whether the departure is reported as running late.
    pub fn is_delayed(&self) -> bool {
        self.delay_minutes >= 1
    }
}

/// A station near a location.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Station name
    pub name: String,
    /// Distance in meters, when known
    pub distance_meters: Option<f64>,
}

impl Station {
    pub fn new(name: impl Into<String>, distance_meters: Option<f64>) -> Self {
        Self {
            name: name.into(),
            distance_meters,
        }
    }

    /// Whole meters to announce, or `None` when the distance should not be
    /// spoken.
    ///
    /// Fractions are truncated; anything under one meter counts as unknown.
    pub fn whole_meters(&self) -> Option<u64> {
        let meters = self.distance_meters?;
        if !meters.is_finite() || meters < 1.0 {
            return None;
        }
        Some(meters.trunc() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock;
    use chrono_tz::Europe::Zurich;

    fn raw() -> RawDeparture {
        RawDeparture {
            category: "T".into(),
            line: String::new(),
            number: "7".into(),
            from: "Zürich, Bahnhofplatz/HB".into(),
            to: "Wollishofen".into(),
            time: Some("2018-01-27 12:10:00".into()),
            timestamp: None,
            delay: "X".into(),
            platform: Some(String::new()),
        }
    }

    #[test]
    fn from_raw_normalizes_all_fields() {
        let dep = Departure::from_raw(&raw(), Zurich).unwrap();
        assert_eq!(dep.name, "7");
        assert_eq!(dep.mode, Mode::Tram);
        assert_eq!(dep.category, "T");
        assert_eq!(dep.to, "Wollishofen");
        assert_eq!(clock(&dep.departing_at, Zurich), "12:10");
        assert_eq!(dep.delay_minutes, 0);
        assert!(!dep.is_delayed());
        assert_eq!(dep.platform, None);
    }

    #[test]
    fn explicit_line_wins_over_number() {
        let raw = RawDeparture {
            category: "S".into(),
            line: "S7".into(),
            number: "18742".into(),
            ..raw()
        };
        let dep = Departure::from_raw(&raw, Zurich).unwrap();
        assert_eq!(dep.name, "S7");
        assert_eq!(dep.mode, Mode::Train);
    }

    #[test]
    fn unknown_category_is_kept() {
        let raw = RawDeparture {
            category: "FUN".into(),
            ..raw()
        };
        let dep = Departure::from_raw(&raw, Zurich).unwrap();
        assert_eq!(dep.mode, Mode::Unknown);
        assert_eq!(dep.category, "FUN");
    }

    #[test]
    fn delay_and_platform() {
        let raw = RawDeparture {
            delay: "4".into(),
            platform: Some(" 6 ".into()),
            ..raw()
        };
        let dep = Departure::from_raw(&raw, Zurich).unwrap();
        assert_eq!(dep.delay_minutes, 4);
        assert!(dep.is_delayed());
        assert_eq!(dep.platform.as_deref(), Some("6"));
    }

    #[test]
    fn bad_delay_fails() {
        let raw = RawDeparture {
            delay: "?".into(),
            ..raw()
        };
        assert_eq!(
            Departure::from_raw(&raw, Zurich),
            Err(NormalizeError::Delay { value: "?".into() })
        );
    }

    #[test]
    fn missing_time_fails() {
        let raw = RawDeparture {
            time: None,
            ..raw()
        };
        assert_eq!(
            Departure::from_raw(&raw, Zurich),
            Err(NormalizeError::MissingTimestamp)
        );
    }

    #[test]
    fn station_distance_rules() {
        assert_eq!(Station::new("Zurich HB", Some(1.2)).whole_meters(), Some(1));
        assert_eq!(Station::new("Zurich HB SZU", Some(2.7)).whole_meters(), Some(2));
        assert_eq!(Station::new("Stauffacher", Some(0.0)).whole_meters(), None);
        assert_eq!(Station::new("Stauffacher", Some(0.4)).whole_meters(), None);
        assert_eq!(Station::new("Stauffacher", Some(-3.0)).whole_meters(), None);
        assert_eq!(Station::new("Stauffacher", Some(f64::NAN)).whole_meters(), None);
        assert_eq!(Station::new("Stauffacher", None).whole_meters(), None);
    }
}
