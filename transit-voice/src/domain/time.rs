//! Time and delay normalization.
//!
//! Upstream sources encode the same logical departure time in several
//! visually similar ways: an ISO-8601 string with offset, a Unix epoch, or a
//! wall-clock string in the operating timezone. The assistant additionally
//! sends requested start times either as a bare `HH:MM:SS` or as a full
//! date-time with a misleading `Z` suffix. The parsers here try the cheap,
//! unambiguous encodings first and fall back in a fixed order.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

use super::error::NormalizeError;

/// Delay marker meaning "delay not reported".
pub const UNKNOWN_DELAY: &str = "X";

/// Wall-clock layouts used by the timetable API for local times.
const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Layouts accepted for a bare requested start time.
const BARE_TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// A departure's timestamp fields as they arrive from upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTimestamp<'a> {
    /// Formatted time: ISO-8601 with offset, or local `YYYY-MM-DD HH:MM:SS`.
    pub text: Option<&'a str>,
    /// Unix epoch seconds.
    pub epoch: Option<i64>,
}

/// Resolve a departure's timestamp fields to an absolute time.
///
/// 1. `text` as ISO-8601 with an offset is used as-is.
/// 2. Otherwise `epoch` is authoritative, rendered in `tz`.
/// 3. Otherwise `text` as a wall-clock time in `tz`.
///
/// # Examples
///
/// ```
/// use transit_voice::domain::{RawTimestamp, parse_departure_time};
///
/// let tz = chrono_tz::Europe::Zurich;
/// let raw = RawTimestamp { text: Some("2018-01-27T12:10:00+0100"), epoch: None };
/// let t = parse_departure_time(raw, tz).unwrap();
/// assert_eq!(t.format("%H:%M").to_string(), "12:10");
///
/// // 2018-01-27 12:10:15 UTC
/// let raw = RawTimestamp { text: None, epoch: Some(1517055015) };
/// let t = parse_departure_time(raw, tz).unwrap();
/// assert_eq!(t.format("%H:%M").to_string(), "13:10");
/// ```
pub fn parse_departure_time(
    raw: RawTimestamp<'_>,
    tz: Tz,
) -> Result<DateTime<FixedOffset>, NormalizeError> {
    let text = raw.text.map(str::trim).filter(|t| !t.is_empty());

    if let Some(absolute) = text.and_then(parse_absolute) {
        return Ok(absolute);
    }

    if let Some(epoch) = raw.epoch {
        let utc = DateTime::from_timestamp(epoch, 0).ok_or_else(|| NormalizeError::Timestamp {
            value: epoch.to_string(),
        })?;
        return Ok(utc.with_timezone(&tz).fixed_offset());
    }

    match text {
        Some(text) => parse_local(text, tz)
            .map(|t| t.fixed_offset())
            .ok_or_else(|| NormalizeError::Timestamp {
                value: text.to_string(),
            }),
        None => Err(NormalizeError::MissingTimestamp),
    }
}

/// Parse an ISO-8601 date-time that carries its own offset.
fn parse_absolute(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// Parse a wall-clock date-time in `tz`.
///
/// Inside a DST fold the earlier instant wins; inside a gap there is none.
fn parse_local(text: &str, tz: Tz) -> Option<DateTime<Tz>> {
    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

/// Parse the assistant's requested start time.
///
/// A bare `HH:MM:SS` is taken to be `today` in `tz`. Near midnight that may be
/// the wrong day; no attempt is made to guess otherwise. A full date-time is
/// read as wall-clock time in `tz`, ignoring a trailing `Z`. Anything else
/// means "no start time requested" and yields `None`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use transit_voice::domain::parse_requested_start;
///
/// let tz = chrono_tz::Europe::Zurich;
/// let today = NaiveDate::from_ymd_opt(2018, 1, 27).unwrap();
///
/// let t = parse_requested_start("15:04:05", today, tz).unwrap();
/// assert_eq!(t.date_naive(), today);
///
/// let t = parse_requested_start("2018-02-01T08:30:00Z", today, tz).unwrap();
/// assert_eq!(t.format("%Y-%m-%d %H:%M").to_string(), "2018-02-01 08:30");
///
/// assert!(parse_requested_start("", today, tz).is_none());
/// assert!(parse_requested_start("soonish", today, tz).is_none());
/// ```
pub fn parse_requested_start(raw: &str, today: NaiveDate, tz: Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(time) = BARE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
    {
        return tz.from_local_datetime(&today.and_time(time)).earliest();
    }

    let wall_clock = raw.strip_suffix('Z').unwrap_or(raw);
    if let Ok(naive) = NaiveDateTime::parse_from_str(wall_clock, "%Y-%m-%dT%H:%M:%S") {
        return tz.from_local_datetime(&naive).earliest();
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&tz))
}

/// Parse a raw delay field into whole minutes.
///
/// Empty and [`UNKNOWN_DELAY`] both mean zero; upstream does not distinguish
/// "on time" from "not reported". Early departures clamp to zero.
///
/// # Examples
///
/// ```
/// use transit_voice::domain::parse_delay;
///
/// assert_eq!(parse_delay("").unwrap(), 0);
/// assert_eq!(parse_delay("X").unwrap(), 0);
/// assert_eq!(parse_delay("3").unwrap(), 3);
/// assert_eq!(parse_delay("+2").unwrap(), 2);
/// assert!(parse_delay("late").is_err());
/// ```
pub fn parse_delay(raw: &str) -> Result<u32, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == UNKNOWN_DELAY {
        return Ok(0);
    }

    let minutes: i64 = trimmed.parse().map_err(|_| NormalizeError::Delay {
        value: raw.to_string(),
    })?;

    Ok(u32::try_from(minutes.max(0)).unwrap_or(u32::MAX))
}

/// Render a time of day as 24-hour `HH:MM` in `tz`.
pub fn clock<Z: TimeZone>(time: &DateTime<Z>, tz: Tz) -> String {
    time.with_timezone(&tz).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use chrono_tz::Europe::Zurich;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, 27).unwrap()
    }

    #[test]
    fn iso_with_offset_is_used_as_is() {
        let raw = RawTimestamp {
            text: Some("2018-01-27T12:10:00+01:00"),
            epoch: Some(0),
        };
        let t = parse_departure_time(raw, Zurich).unwrap();
        assert_eq!(t.hour(), 12);
        assert_eq!(t.minute(), 10);
        assert_eq!(t.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn iso_without_colon_in_offset() {
        let raw = RawTimestamp {
            text: Some("2018-01-27T12:10:00+0100"),
            epoch: None,
        };
        let t = parse_departure_time(raw, Zurich).unwrap();
        assert_eq!(clock(&t, Zurich), "12:10");
    }

    #[test]
    fn epoch_wins_over_local_text() {
        let raw = RawTimestamp {
            text: Some("2018-01-27 09:00:00"),
            epoch: Some(1517055015),
        };
        let t = parse_departure_time(raw, Zurich).unwrap();
        assert_eq!(clock(&t, Zurich), "13:10");
    }

    #[test]
    fn local_text_in_operating_zone() {
        let raw = RawTimestamp {
            text: Some("2018-07-01 08:15:00"),
            epoch: None,
        };
        let t = parse_departure_time(raw, Zurich).unwrap();
        assert_eq!(clock(&t, Zurich), "08:15");
        // Summer time
        assert_eq!(t.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn local_text_without_seconds() {
        let raw = RawTimestamp {
            text: Some("2018-01-27 23:59"),
            epoch: None,
        };
        let t = parse_departure_time(raw, Zurich).unwrap();
        assert_eq!(clock(&t, Zurich), "23:59");
    }

    #[test]
    fn injected_zone_changes_rendering() {
        let raw = RawTimestamp {
            text: None,
            epoch: Some(1517055015),
        };
        let t = parse_departure_time(raw, chrono_tz::UTC).unwrap();
        assert_eq!(clock(&t, chrono_tz::UTC), "12:10");
        assert_eq!(clock(&t, Zurich), "13:10");
    }

    #[test]
    fn garbage_text_is_an_error() {
        let raw = RawTimestamp {
            text: Some("half past noon"),
            epoch: None,
        };
        assert_eq!(
            parse_departure_time(raw, Zurich),
            Err(NormalizeError::Timestamp {
                value: "half past noon".into()
            })
        );
    }

    #[test]
    fn nothing_to_parse() {
        assert_eq!(
            parse_departure_time(RawTimestamp::default(), Zurich),
            Err(NormalizeError::MissingTimestamp)
        );
        let blank = RawTimestamp {
            text: Some("  "),
            epoch: None,
        };
        assert_eq!(
            parse_departure_time(blank, Zurich),
            Err(NormalizeError::MissingTimestamp)
        );
    }

    #[test]
    fn bare_time_is_today() {
        let t = parse_requested_start("15:04:05", today(), Zurich).unwrap();
        assert_eq!(t.date_naive(), today());
        assert_eq!((t.hour(), t.minute(), t.second()), (15, 4, 5));
    }

    #[test]
    fn bare_time_without_seconds() {
        let t = parse_requested_start("07:30", today(), Zurich).unwrap();
        assert_eq!((t.hour(), t.minute()), (7, 30));
    }

    #[test]
    fn full_date_with_z_is_wall_clock() {
        let t = parse_requested_start("2018-02-01T08:30:00Z", today(), Zurich).unwrap();
        assert_eq!(t.day(), 1);
        assert_eq!(t.month(), 2);
        assert_eq!((t.hour(), t.minute()), (8, 30));
    }

    #[test]
    fn full_date_with_numeric_offset() {
        let t = parse_requested_start("2018-02-01T07:30:00+00:00", today(), Zurich).unwrap();
        assert_eq!((t.hour(), t.minute()), (8, 30));
    }

    #[test]
    fn unparseable_start_is_unset() {
        assert!(parse_requested_start("", today(), Zurich).is_none());
        assert!(parse_requested_start("tomorrow", today(), Zurich).is_none());
        assert!(parse_requested_start("25:00:00", today(), Zurich).is_none());
    }

    #[test]
    fn start_in_dst_gap_is_unset() {
        let spring_forward = NaiveDate::from_ymd_opt(2018, 3, 25).unwrap();
        assert!(parse_requested_start("02:30:00", spring_forward, Zurich).is_none());
    }

    #[test]
    fn delay_markers() {
        assert_eq!(parse_delay(""), Ok(0));
        assert_eq!(parse_delay(" "), Ok(0));
        assert_eq!(parse_delay("X"), Ok(0));
        assert_eq!(parse_delay("0"), Ok(0));
        assert_eq!(parse_delay("12"), Ok(12));
        assert_eq!(parse_delay("+3"), Ok(3));
    }

    #[test]
    fn early_departure_clamps_to_zero() {
        assert_eq!(parse_delay("-1"), Ok(0));
    }

    #[test]
    fn non_numeric_delay_is_an_error() {
        assert_eq!(
            parse_delay("x"),
            Err(NormalizeError::Delay { value: "x".into() })
        );
        assert!(parse_delay("2.5").is_err());
        assert!(parse_delay("2 min").is_err());
    }
}
