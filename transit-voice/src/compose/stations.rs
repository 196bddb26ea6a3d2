use crate::domain::Station;
use crate::locale::Phrase;

use super::Composer;

impl Composer<'_> {
    /// Announce nearby stations, closest first as given.
    ///
    /// `near` names the place the user searched around; `None` (or blank)
    /// means the device location.
    pub fn stations(&self, near: Option<&str>, stations: &[Station]) -> String {
        let near = near.map(str::trim).filter(|n| !n.is_empty());

        if stations.is_empty() {
            return match near {
                Some(near) => self.table.render(Phrase::NoStationsNear, &[("near", near)]),
                None => self.table.render(Phrase::NoStations, &[]),
            };
        }

        let list = stations
            .iter()
            .map(|station| self.station(station))
            .collect::<Vec<_>>()
            .join(&self.table.render(Phrase::StationSeparator, &[]));

        let frame = match (stations.len() == 1, near.is_some()) {
            (true, false) => Phrase::ClosestStation,
            (true, true) => Phrase::ClosestStationNear,
            (false, false) => Phrase::ClosestStations,
            (false, true) => Phrase::ClosestStationsNear,
        };

        self.table.render(
            frame,
            &[("near", near.unwrap_or_default()), ("list", list.as_str())],
        )
    }

    fn station(&self, station: &Station) -> String {
        match station.whole_meters() {
            Some(meters) => {
                let distance = meters.to_string();
                self.table.render_count(
                    Phrase::StationDistance,
                    meters,
                    &[("name", station.name.as_str()), ("distance", distance.as_str())],
                )
            }
            None => station.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn single_station_near_device() {
        let catalog = catalog();
        let composer = catalog.composer(&locale("en"));
        let stations = [Station::new("Zurich HB", Some(1.0))];
        assert_eq!(
            composer.stations(None, &stations),
            "The closest station to you is: Zurich HB, 1 meter away."
        );
    }

    #[test]
    fn several_stations_near_place() {
        let catalog = catalog();
        let composer = catalog.composer(&locale("en"));
        let stations = [
            Station::new("Zurich HB SZU", Some(2.0)),
            Station::new("Zurich HB", Some(1.0)),
        ];
        assert_eq!(
            composer.stations(Some("Zurich"), &stations),
            "The closest stations to Zurich are: Zurich HB SZU, 2 meters away; Zurich HB, 1 \
             meter away."
        );
    }

    #[test]
    fn distances_truncate_and_unknown_is_silent() {
        let catalog = catalog();
        let composer = catalog.composer(&locale("en"));
        let stations = [
            Station::new("Stadelhofen", Some(412.9)),
            Station::new("Bellevue", None),
            Station::new("Bürkliplatz", Some(0.4)),
        ];
        assert_eq!(
            composer.stations(None, &stations),
            "The closest stations to you are: Stadelhofen, 412 meters away; Bellevue; \
             Bürkliplatz."
        );
    }

    #[test]
    fn nothing_found() {
        let catalog = catalog();
        let composer = catalog.composer(&locale("en"));
        assert_eq!(
            composer.stations(None, &[]),
            "I could not find any matching stations."
        );
        assert_eq!(
            composer.stations(Some(" "), &[]),
            "I could not find any matching stations."
        );
        assert_eq!(
            composer.stations(Some("Atlantis"), &[]),
            "I could not find any matching stations near Atlantis."
        );
    }

    #[test]
    fn german_and_french() {
        let catalog = catalog();
        let stations = [
            Station::new("Zürich HB", Some(1.0)),
            Station::new("Zürich, Bahnhofquai/HB", Some(85.0)),
        ];

        let de = catalog.composer(&locale("de"));
        assert_eq!(
            de.stations(Some("Zürich"), &stations[..1]),
            "Die nächste Haltestelle bei Zürich ist: Zürich HB, 1 Meter entfernt."
        );

        let fr = catalog.composer(&locale("fr"));
        assert_eq!(
            fr.stations(None, &stations),
            "Les arrêts les plus proches de vous sont : Zürich HB, à 1 mètre ; Zürich, \
             Bahnhofquai/HB, à 85 mètres."
        );
    }
}
