//! Timetable API response DTOs.
//!
//! These map onto the JSON of the stationboard, connections and locations
//! endpoints. Fields the API sometimes omits are `Option` or defaulted.

use serde::Deserialize;

/// Response from `/stationboard`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StationboardResponse {
    /// The stop the board is for.
    #[serde(default)]
    pub stop: Option<Stop>,

    /// Departures, soonest first.
    #[serde(default)]
    pub connections: Vec<BoardEntry>,
}

/// A stop as named by the API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Stop {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

/// One departure on a station board.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BoardEntry {
    /// Local departure time, `YYYY-MM-DD HH:MM:SS`.
    pub time: String,

    /// Vehicle type ("tram", "bus", "strain", "express_train").
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Category code ("T", "BUS", "S", "IC").
    #[serde(rename = "*G", default)]
    pub category: Option<String>,

    /// Display line ("S7", "13").
    #[serde(default)]
    pub line: String,

    #[serde(default)]
    pub number: String,

    #[serde(default)]
    pub terminal: Terminal,

    #[serde(default)]
    pub track: Option<String>,

    /// "+2", "X" or absent.
    #[serde(default)]
    pub dep_delay: Option<String>,
}

/// Terminus of a line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Terminal {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Response from `/connections`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConnectionsResponse {
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// A journey from origin to destination.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub departure: String,
    #[serde(default)]
    pub legs: Vec<JourneyLeg>,
}

/// One leg of a connection. The last leg of a journey only names the
/// arrival stop and carries no departure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JourneyLeg {
    #[serde(default)]
    pub departure: Option<String>,

    /// Stop the leg starts at.
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(rename = "*G", default)]
    pub category: Option<String>,

    #[serde(default)]
    pub line: String,

    #[serde(default)]
    pub number: String,

    #[serde(default)]
    pub terminal: Option<String>,

    #[serde(default)]
    pub track: Option<String>,

    #[serde(default)]
    pub dep_delay: Option<String>,

    #[serde(default)]
    pub exit: Option<LegExit>,
}

/// Where a leg is left.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegExit {
    #[serde(default)]
    pub name: String,

    /// Official station name, when it differs from `name`.
    #[serde(default)]
    pub sbb_name: Option<String>,

    #[serde(default)]
    pub arrival: Option<String>,

    #[serde(default)]
    pub track: Option<String>,
}

/// One result from `/locations`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Location {
    pub label: String,

    /// Meters from the queried coordinates.
    #[serde(default)]
    pub dist: Option<f64>,

    /// Result kind: stations, addresses ("sl-icon-type-adr"), phone
    /// book entries ("sl-icon-tel...").
    #[serde(default)]
    pub iconclass: String,
}

/// Response from `/locations`.
pub type LocationsResponse = Vec<Location>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stationboard_fixture() {
        let board: StationboardResponse =
            serde_json::from_str(include_str!("../../data/fixtures/stationboard.json")).unwrap();
        assert_eq!(board.stop.as_ref().unwrap().name, "Zürich, Central");
        assert_eq!(board.connections.len(), 4);

        let first = &board.connections[0];
        assert_eq!(first.kind, "tram");
        assert_eq!(first.category.as_deref(), Some("T"));
        assert_eq!(first.line, "7");
        assert_eq!(first.terminal.name, "Zürich, Wollishofen");
        assert_eq!(first.dep_delay, None);
    }

    #[test]
    fn connections_fixture() {
        let resp: ConnectionsResponse =
            serde_json::from_str(include_str!("../../data/fixtures/connections.json")).unwrap();
        assert_eq!(resp.connections.len(), 2);

        let legs = &resp.connections[0].legs;
        assert_eq!(legs[0].kind, "walk");
        assert_eq!(legs[1].line, "IR36");
        assert_eq!(
            legs[1].exit.as_ref().and_then(|e| e.sbb_name.as_deref()),
            Some("Basel SBB")
        );
        assert_eq!(legs.last().unwrap().departure, None);
    }

    #[test]
    fn locations_fixture() {
        let resp: LocationsResponse =
            serde_json::from_str(include_str!("../../data/fixtures/locations.json")).unwrap();
        assert_eq!(resp.len(), 5);
        assert_eq!(resp[0].iconclass, "sl-icon-type-adr");
        assert_eq!(resp[1].dist, Some(1.0));
    }

    #[test]
    fn sparse_entries_default() {
        let board: StationboardResponse =
            serde_json::from_str(r#"{"connections":[{"time":"2018-01-27 12:10:00"}]}"#).unwrap();
        assert_eq!(board.stop, None);
        assert_eq!(board.connections[0].kind, "");
        assert_eq!(board.connections[0].terminal, Terminal::default());

        let empty: StationboardResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.connections.is_empty());
    }
}
