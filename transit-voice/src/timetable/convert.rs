//! Conversion from timetable DTOs to raw departure records and stations.
//!
//! Conversion never fails: upstream values are carried over verbatim and
//! checked later by the normalizer.

use tracing::debug;

use crate::domain::{RawDeparture, Station};

use super::types::{
    BoardEntry, Connection, ConnectionsResponse, JourneyLeg, Location, LocationsResponse,
    StationboardResponse,
};

/// Icon class the locations endpoint uses for street addresses.
const ADDRESS_ICON: &str = "sl-icon-type-adr";

/// Icon class prefix for phone book entries.
const PHONE_BOOK_ICON_PREFIX: &str = "sl-icon-tel";

/// Leg type for walking between stops.
const WALK: &str = "walk";

/// Departures on a station board, in board order.
pub fn stationboard_departures(board: &StationboardResponse) -> Vec<RawDeparture> {
    let from = board
        .stop
        .as_ref()
        .map(|stop| stop.name.as_str())
        .unwrap_or_default();

    board
        .connections
        .iter()
        .map(|entry| board_entry(entry, from))
        .collect()
}

fn board_entry(entry: &BoardEntry, from: &str) -> RawDeparture {
    RawDeparture {
        category: category(&entry.kind, entry.category.as_deref()),
        line: entry.line.clone(),
        number: entry.number.clone(),
        from: from.to_string(),
        to: entry.terminal.name.clone(),
        time: Some(entry.time.clone()),
        timestamp: None,
        delay: entry.dep_delay.clone().unwrap_or_default(),
        platform: entry.track.clone(),
    }
}

/// The first ridden leg of each connection, in connection order.
///
/// Walking legs are skipped, as is the closing leg that only names the
/// arrival stop. Connections that are walking only contribute nothing.
pub fn connection_departures(response: &ConnectionsResponse) -> Vec<RawDeparture> {
    response
        .connections
        .iter()
        .filter_map(|connection| {
            let departure = first_ridden_leg(connection);
            if departure.is_none() {
                debug!(from = %connection.from, to = %connection.to, "connection without a ridden leg");
            }
            departure
        })
        .collect()
}

fn first_ridden_leg(connection: &Connection) -> Option<RawDeparture> {
    let leg = connection
        .legs
        .iter()
        .find(|leg| !leg.kind.eq_ignore_ascii_case(WALK) && leg.departure.is_some())?;
    Some(journey_leg(leg, &connection.from))
}

fn journey_leg(leg: &JourneyLeg, from: &str) -> RawDeparture {
    let to = leg
        .exit
        .as_ref()
        .map(|exit| {
            exit.sbb_name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(&exit.name)
                .to_string()
        })
        .or_else(|| leg.terminal.clone())
        .unwrap_or_default();

    RawDeparture {
        category: category(&leg.kind, leg.category.as_deref()),
        line: leg.line.clone(),
        number: leg.number.clone(),
        from: from.to_string(),
        to,
        time: leg.departure.clone(),
        timestamp: None,
        delay: leg.dep_delay.clone().unwrap_or_default(),
        platform: leg.track.clone(),
    }
}

/// Vehicle type when given, else the category code.
fn category(kind: &str, code: Option<&str>) -> String {
    if kind.trim().is_empty() {
        code.unwrap_or_default().to_string()
    } else {
        kind.to_string()
    }
}

/// Whether a location result is a station rather than an address or a
/// phone book entry.
pub fn is_station(location: &Location) -> bool {
    location.iconclass != ADDRESS_ICON && !location.iconclass.starts_with(PHONE_BOOK_ICON_PREFIX)
}

/// Stations among location results, closest first as returned, at most
/// `limit` of them.
pub fn nearby_stations(locations: &LocationsResponse, limit: usize) -> Vec<Station> {
    locations
        .iter()
        .filter(|location| is_station(location))
        .take(limit)
        .map(|location| Station::new(location.label.clone(), location.dist))
        .collect()
}
