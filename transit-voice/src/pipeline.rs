//! Raw records to one spoken sentence.
//!
//! The pipeline runs normalize, filter and compose in that order. It is
//! all-or-nothing: if any record fails to normalize, no sentence is produced.

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::debug;

use crate::compose::{Composer, DepartureContext};
use crate::domain::{Departure, NormalizeError, RawDeparture, classify, parse_requested_start};
use crate::filter::{DEFAULT_LIMIT, FilterCriteria, FilterError, filter, parse_limit};

/// Errors that abort an announcement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// A composed sentence and how many departures it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub speech: String,
    pub count: usize,
}

impl Announcement {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Filter parameters as the user phrased them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartureRequest {
    /// Line names ("S7", "13")
    pub routes: Vec<String>,
    /// Mode words or provider codes ("tram", "IC")
    pub modes: Vec<String>,
    /// Maximum number of departures
    pub limit: Option<String>,
    /// Requested start time
    pub start: Option<String>,
}

/// Build filter criteria from user parameters.
///
/// Blank route names are ignored. Mode words go through the mode classifier,
/// so "tram" and "T" are the same restriction. An unreadable start time
/// means "no explicit start time". Only a malformed limit is an error.
pub fn criteria(
    request: &DepartureRequest,
    today: NaiveDate,
    tz: Tz,
) -> Result<FilterCriteria, FilterError> {
    let routes = request
        .routes
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty());
    let modes = request
        .modes
        .iter()
        .filter(|m| !m.trim().is_empty())
        .map(|m| classify(m));
    let limit = parse_limit(request.limit.as_deref(), DEFAULT_LIMIT)?;
    let start = request
        .start
        .as_deref()
        .and_then(|raw| parse_requested_start(raw, today, tz));

    Ok(FilterCriteria::new()
        .with_routes(routes)
        .with_modes(modes)
        .with_limit(limit)
        .with_requested_start(start))
}

/// Normalize every record in the composer's timezone. The first bad record
/// fails the batch.
pub fn normalize(raws: &[RawDeparture], tz: Tz) -> Result<Vec<Departure>, NormalizeError> {
    raws.iter().map(|raw| Departure::from_raw(raw, tz)).collect()
}

/// Normalize, filter and announce departures from `from`.
///
/// # Examples
///
/// ```
/// use transit_voice::filter::FilterCriteria;
/// use transit_voice::domain::RawDeparture;
/// use transit_voice::locale::{Catalog, LocaleResolver};
/// use transit_voice::pipeline::announce_departures;
///
/// let catalog = Catalog::builtin().unwrap();
/// let locale = LocaleResolver::new(chrono_tz::Europe::Zurich).resolve("en");
/// let raw = RawDeparture {
///     category: "T".into(),
///     number: "7".into(),
///     to: "Wollishofen".into(),
///     time: Some("2018-01-27 12:10:00".into()),
///     ..RawDeparture::default()
/// };
///
/// let announcement = announce_departures(
///     &catalog.composer(&locale),
///     "Zurich",
///     None,
///     &[raw],
///     &FilterCriteria::new(),
/// )
/// .unwrap();
/// assert_eq!(announcement.count, 1);
/// assert_eq!(
///     announcement.speech,
///     "The next departure from Zurich is: the 7 tram departing on-time at 12:10 to Wollishofen."
/// );
/// ```
pub fn announce_departures(
    composer: &Composer<'_>,
    from: &str,
    destination: Option<&str>,
    raws: &[RawDeparture],
    criteria: &FilterCriteria,
) -> Result<Announcement, PipelineError> {
    let departures = normalize(raws, composer.timezone())?;
    let kept = filter(&departures, criteria);
    debug!(
        received = departures.len(),
        kept = kept.len(),
        limit = criteria.limit,
        "filtered departures"
    );

    let context = DepartureContext::new(from)
        .with_destination(destination.map(str::to_string))
        .with_requested_start(criteria.requested_start);

    Ok(Announcement {
        speech: composer.departures(&context, &kept),
        count: kept.len(),
    })
}
