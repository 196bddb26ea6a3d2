//! Swiss public transport timetable client.
//!
//! Three endpoints are used:
//! - `/stationboard`: upcoming departures from one stop
//! - `/connections`: journeys between two places, with their legs
//! - `/locations`: stops, addresses and phone book entries near coordinates
//!
//! Departure times come back as local `YYYY-MM-DD HH:MM:SS` strings and
//! delays as `"+2"`, `"X"` or nothing; [`convert`] carries them over as
//! [`RawDeparture`](crate::domain::RawDeparture) records for the normalizer.

mod client;
pub mod convert;
mod error;
mod mock;
mod types;

use std::future::Future;

use chrono::DateTime;
use chrono_tz::Tz;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, TimetableClient, TimetableConfig};
pub use convert::{connection_departures, nearby_stations, stationboard_departures};
pub use error::TimetableError;
pub use mock::{MockTimetable, RecordedQuery};
pub use types::{
    BoardEntry, Connection, ConnectionsResponse, JourneyLeg, LegExit, Location, LocationsResponse,
    StationboardResponse, Stop, Terminal,
};

/// Departures from one stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationboardQuery {
    pub station: String,
    /// Upstream page size; the API default when `None`
    pub limit: Option<usize>,
    /// Earliest departure; now when `None`
    pub datetime: Option<DateTime<Tz>>,
}

impl StationboardQuery {
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            limit: None,
            datetime: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_datetime(mut self, datetime: Option<DateTime<Tz>>) -> Self {
        self.datetime = datetime;
        self
    }
}

/// Journeys between two places.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionsQuery {
    pub from: String,
    pub to: String,
    pub limit: Option<usize>,
    pub datetime: Option<DateTime<Tz>>,
}

impl ConnectionsQuery {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            limit: None,
            datetime: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_datetime(mut self, datetime: Option<DateTime<Tz>>) -> Self {
        self.datetime = datetime;
        self
    }
}

/// Places near a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationsQuery {
    pub latitude: f64,
    pub longitude: f64,
}

/// Source of timetable data.
///
/// Implemented by [`TimetableClient`] for the live API and by
/// [`MockTimetable`] for tests.
pub trait Timetable: Send + Sync + 'static {
    fn stationboard(
        &self,
        query: &StationboardQuery,
    ) -> impl Future<Output = Result<StationboardResponse, TimetableError>> + Send;

    fn connections(
        &self,
        query: &ConnectionsQuery,
    ) -> impl Future<Output = Result<ConnectionsResponse, TimetableError>> + Send;

    fn locations(
        &self,
        query: &LocationsQuery,
    ) -> impl Future<Output = Result<LocationsResponse, TimetableError>> + Send;
}
