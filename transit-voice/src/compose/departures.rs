//! Departure announcements.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::domain::{Departure, clock};
use crate::locale::Phrase;

use super::{Composer, join_with_final};

/// What the user asked about, beyond the departures themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartureContext {
    /// Station the departures leave from
    pub from: String,
    /// Destination the user asked for, if any
    pub destination: Option<String>,
    /// Start time the user asked for, if any
    pub requested_start: Option<DateTime<Tz>>,
}

impl DepartureContext {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            ..Self::default()
        }
    }

    pub fn with_destination(mut self, destination: Option<String>) -> Self {
        self.destination = destination.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn with_requested_start(mut self, start: Option<DateTime<Tz>>) -> Self {
        self.requested_start = start;
        self
    }
}

impl Composer<'_> {
    /// Announce a list of departures.
    ///
    /// No departures gives the fixed "nothing found" sentence; one gives the
    /// singular frame; more give the plural frame with a count. Destination
    /// and start time each select their own frame.
    pub fn departures(&self, context: &DepartureContext, departures: &[Departure]) -> String {
        if departures.is_empty() {
            return self.table.render(Phrase::NoDepartures, &[]);
        }

        let phrases: Vec<String> = departures.iter().map(|d| self.departure(d)).collect();
        let list = join_with_final(
            &phrases,
            &self.table.render(Phrase::ListSeparator, &[]),
            &self.table.render(Phrase::ListFinalSeparator, &[]),
        );

        let single = departures.len() == 1;
        let frame = match (
            single,
            context.requested_start.is_some(),
            context.destination.is_some(),
        ) {
            (true, false, false) => Phrase::NextDeparture,
            (true, false, true) => Phrase::NextDepartureTo,
            (true, true, false) => Phrase::NextDepartureAt,
            (true, true, true) => Phrase::NextDepartureAtTo,
            (false, false, false) => Phrase::NextDepartures,
            (false, false, true) => Phrase::NextDeparturesTo,
            (false, true, false) => Phrase::NextDeparturesAt,
            (false, true, true) => Phrase::NextDeparturesAtTo,
        };

        let count = departures.len().to_string();
        let start = context
            .requested_start
            .map(|t| clock(&t, self.timezone))
            .unwrap_or_default();
        let destination = context.destination.as_deref().unwrap_or_default();

        self.table.render(
            frame,
            &[
                ("count", count.as_str()),
                ("from", context.from.as_str()),
                ("destination", destination),
                ("start", start.as_str()),
                ("list", list.as_str()),
            ],
        )
    }

    /// Describe one departure: vehicle, punctuality, platform, time and
    /// destination.
    pub fn departure(&self, departure: &Departure) -> String {
        let words = self.table.mode_words(departure.mode);
        // Modes without a noun speak the provider's category code.
        let noun = words.noun.as_deref().unwrap_or(&departure.category);
        let vehicle = self.table.render(
            Phrase::Vehicle,
            &[
                ("article", words.article.as_str()),
                ("noun", noun),
                ("name", departure.name.as_str()),
            ],
        );

        let platform = departure
            .platform
            .as_deref()
            .map(|p| self.table.render(Phrase::Platform, &[("platform", p)]))
            .unwrap_or_default();
        let time = clock(&departure.departing_at, self.timezone);
        let delay = departure.delay_minutes.to_string();

        let args = [
            ("vehicle", vehicle.as_str()),
            ("platform", platform.as_str()),
            ("time", time.as_str()),
            ("to", departure.to.as_str()),
            ("delay", delay.as_str()),
        ];

        if departure.is_delayed() {
            self.table.render_count(
                Phrase::DepartureDelayed,
                u64::from(departure.delay_minutes),
                &args,
            )
        } else {
            self.table.render(Phrase::DepartureOnTime, &args)
        }
    }
}
