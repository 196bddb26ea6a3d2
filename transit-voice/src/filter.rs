//! Route and mode filtering of departures.
//!
//! Users may ask for "the next 3 trams" or "the S7 and S8". Filtering keeps
//! upstream order (usually soonest first) and stops as soon as enough
//! departures have been kept.

use std::collections::HashSet;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::domain::{Departure, Mode};

/// Number of departures announced when the user names no limit.
pub const DEFAULT_LIMIT: usize = 5;

/// Number of stations announced when the user names no limit.
pub const DEFAULT_STATION_LIMIT: usize = 3;

/// Error returned for a malformed filter parameter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// Limit is negative, fractional or not a number
    #[error("invalid limit {value:?}: expected a non-negative whole number")]
    Limit { value: String },
}

/// What the user asked to hear about.
///
/// Empty allow-lists mean "no restriction".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub allowed_routes: HashSet<String>,
    pub allowed_modes: HashSet<Mode>,
    pub limit: usize,
    /// Only affects phrasing, never which departures are kept.
    pub requested_start: Option<DateTime<Tz>>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            allowed_routes: HashSet::new(),
            allowed_modes: HashSet::new(),
            limit: DEFAULT_LIMIT,
            requested_start: None,
        }
    }
}

impl FilterCriteria {
    /// Unrestricted criteria with the default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to these route names.
    pub fn with_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_routes = routes.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to these modes.
    pub fn with_modes(mut self, modes: impl IntoIterator<Item = Mode>) -> Self {
        self.allowed_modes = modes.into_iter().collect();
        self
    }

    /// Set the maximum number of departures.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Record the start time the user asked about.
    pub fn with_requested_start(mut self, start: Option<DateTime<Tz>>) -> Self {
        self.requested_start = start;
        self
    }

    /// Whether a departure passes both allow-lists.
    pub fn admits(&self, departure: &Departure) -> bool {
        (self.allowed_routes.is_empty() || self.allowed_routes.contains(&departure.name))
            && (self.allowed_modes.is_empty() || self.allowed_modes.contains(&departure.mode))
    }
}

/// Keep the departures the criteria admit, in upstream order, up to the limit.
///
/// Emission stops as soon as `limit` departures have been kept.
pub fn filter(departures: &[Departure], criteria: &FilterCriteria) -> Vec<Departure> {
    let mut kept = Vec::with_capacity(criteria.limit.min(departures.len()));
    if criteria.limit == 0 {
        return kept;
    }

    for departure in departures {
        if !criteria.admits(departure) {
            continue;
        }
        kept.push(departure.clone());
        if kept.len() == criteria.limit {
            break;
        }
    }

    kept
}

/// Parse a user-supplied limit.
///
/// Absent or blank means `default`. Whole JSON-style numbers such as `"3.0"`
/// are accepted.
///
/// # Examples
///
/// ```
/// use transit_voice::filter::parse_limit;
///
/// assert_eq!(parse_limit(None, 5), Ok(5));
/// assert_eq!(parse_limit(Some(""), 5), Ok(5));
/// assert_eq!(parse_limit(Some("3"), 5), Ok(3));
/// assert_eq!(parse_limit(Some("2.0"), 5), Ok(2));
/// assert!(parse_limit(Some("-1"), 5).is_err());
/// assert!(parse_limit(Some("many"), 5).is_err());
/// ```
pub fn parse_limit(raw: Option<&str>, default: usize) -> Result<usize, FilterError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(default);
    };

    let invalid = || FilterError::Limit {
        value: raw.to_string(),
    };

    if let Ok(n) = raw.parse::<usize>() {
        return Ok(n);
    }

    let n: f64 = raw.parse().map_err(|_| invalid())?;
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= usize::MAX as f64 {
        Ok(n as usize)
    } else {
        Err(invalid())
    }
}
