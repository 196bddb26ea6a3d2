//! Mock timetable for testing without API access.
//!
//! Serves canned responses keyed by station name and records every query
//! it receives.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::error::TimetableError;
use super::types::{ConnectionsResponse, LocationsResponse, StationboardResponse};
use super::{ConnectionsQuery, LocationsQuery, StationboardQuery, Timetable};

/// A query the mock has answered.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedQuery {
    Stationboard(StationboardQuery),
    Connections(ConnectionsQuery),
    Locations(LocationsQuery),
}

/// Timetable that serves pre-loaded responses.
///
/// Unknown stations and routes answer with a 404 error, like an API that
/// does not know the stop.
#[derive(Debug, Clone, Default)]
pub struct MockTimetable {
    boards: HashMap<String, StationboardResponse>,
    connections: HashMap<(String, String), ConnectionsResponse>,
    locations: LocationsResponse,
    queries: Arc<Mutex<Vec<RecordedQuery>>>,
}

impl MockTimetable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `board` for departures from `station`.
    pub fn with_stationboard(
        mut self,
        station: impl Into<String>,
        board: StationboardResponse,
    ) -> Self {
        self.boards.insert(station.into(), board);
        self
    }

    /// Serve `response` for journeys from `from` to `to`.
    pub fn with_connections(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        response: ConnectionsResponse,
    ) -> Self {
        self.connections.insert((from.into(), to.into()), response);
        self
    }

    /// Serve `locations` for every coordinate query.
    pub fn with_locations(mut self, locations: LocationsResponse) -> Self {
        self.locations = locations;
        self
    }

    /// Queries answered so far, oldest first.
    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.log().clone()
    }

    fn log(&self) -> MutexGuard<'_, Vec<RecordedQuery>> {
        // Poisoning only means another test panicked mid-push.
        self.queries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn not_found(what: String) -> TimetableError {
        TimetableError::Api {
            status: 404,
            message: format!("no mock data for {what}"),
        }
    }
}

impl Timetable for MockTimetable {
    async fn stationboard(
        &self,
        query: &StationboardQuery,
    ) -> Result<StationboardResponse, TimetableError> {
        self.log().push(RecordedQuery::Stationboard(query.clone()));
        self.boards
            .get(&query.station)
            .cloned()
            .ok_or_else(|| Self::not_found(format!("station {}", query.station)))
    }

    async fn connections(
        &self,
        query: &ConnectionsQuery,
    ) -> Result<ConnectionsResponse, TimetableError> {
        self.log().push(RecordedQuery::Connections(query.clone()));
        self.connections
            .get(&(query.from.clone(), query.to.clone()))
            .cloned()
            .ok_or_else(|| Self::not_found(format!("route {} -> {}", query.from, query.to)))
    }

    async fn locations(&self, query: &LocationsQuery) -> Result<LocationsResponse, TimetableError> {
        self.log().push(RecordedQuery::Locations(*query));
        Ok(self.locations.clone())
    }
}
