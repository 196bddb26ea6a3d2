//! Per-language phrase tables.
//!
//! Every sentence the assistant speaks is built from a [`Phrase`] looked up in
//! the table of the negotiated language. Tables are plain JSON, embedded at
//! build time and validated once at startup: each table must define every
//! phrase and every mode, plural-sensitive phrases must give `one` and
//! `other` forms, and templates may only use the slots declared for their
//! phrase. After [`Catalog::builtin`] returns, the catalog is immutable.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Deserialize;

use crate::domain::Mode;

use super::negotiate::Language;
use super::template::{Template, TemplateError};

/// Embedded tables, one per supported language.
const BUILTIN_TABLES: [&str; 3] = [
    include_str!("../../locales/en.json"),
    include_str!("../../locales/de.json"),
    include_str!("../../locales/fr.json"),
];

/// Identifier of a localized phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phrase {
    /// Article, mode noun and line name: "the S7 bus", "die Tram 7"
    Vehicle,
    DepartureOnTime,
    DepartureDelayed,
    /// Platform fragment spliced into a departure
    Platform,
    ListSeparator,
    ListFinalSeparator,
    NoDepartures,
    NextDeparture,
    NextDepartureTo,
    NextDepartureAt,
    NextDepartureAtTo,
    NextDepartures,
    NextDeparturesTo,
    NextDeparturesAt,
    NextDeparturesAtTo,
    NoStations,
    NoStationsNear,
    ClosestStation,
    ClosestStationNear,
    ClosestStations,
    ClosestStationsNear,
    StationDistance,
    StationSeparator,
    NeedLocation,
    PermissionContext,
}

const DEPARTURE_SLOTS: &[&str] = &["vehicle", "platform", "time", "to", "delay"];

impl Phrase {
    pub const ALL: [Phrase; 25] = [
        Phrase::Vehicle,
        Phrase::DepartureOnTime,
        Phrase::DepartureDelayed,
        Phrase::Platform,
        Phrase::ListSeparator,
        Phrase::ListFinalSeparator,
        Phrase::NoDepartures,
        Phrase::NextDeparture,
        Phrase::NextDepartureTo,
        Phrase::NextDepartureAt,
        Phrase::NextDepartureAtTo,
        Phrase::NextDepartures,
        Phrase::NextDeparturesTo,
        Phrase::NextDeparturesAt,
        Phrase::NextDeparturesAtTo,
        Phrase::NoStations,
        Phrase::NoStationsNear,
        Phrase::ClosestStation,
        Phrase::ClosestStationNear,
        Phrase::ClosestStations,
        Phrase::ClosestStationsNear,
        Phrase::StationDistance,
        Phrase::StationSeparator,
        Phrase::NeedLocation,
        Phrase::PermissionContext,
    ];

    /// Key used in the JSON tables.
    pub fn key(&self) -> &'static str {
        match self {
            Phrase::Vehicle => "vehicle",
            Phrase::DepartureOnTime => "departure_on_time",
            Phrase::DepartureDelayed => "departure_delayed",
            Phrase::Platform => "platform",
            Phrase::ListSeparator => "list_separator",
            Phrase::ListFinalSeparator => "list_final_separator",
            Phrase::NoDepartures => "no_departures",
            Phrase::NextDeparture => "next_departure",
            Phrase::NextDepartureTo => "next_departure_to",
            Phrase::NextDepartureAt => "next_departure_at",
            Phrase::NextDepartureAtTo => "next_departure_at_to",
            Phrase::NextDepartures => "next_departures",
            Phrase::NextDeparturesTo => "next_departures_to",
            Phrase::NextDeparturesAt => "next_departures_at",
            Phrase::NextDeparturesAtTo => "next_departures_at_to",
            Phrase::NoStations => "no_stations",
            Phrase::NoStationsNear => "no_stations_near",
            Phrase::ClosestStation => "closest_station",
            Phrase::ClosestStationNear => "closest_station_near",
            Phrase::ClosestStations => "closest_stations",
            Phrase::ClosestStationsNear => "closest_stations_near",
            Phrase::StationDistance => "station_distance",
            Phrase::StationSeparator => "station_separator",
            Phrase::NeedLocation => "need_location",
            Phrase::PermissionContext => "permission_context",
        }
    }

    /// Slots a template for this phrase may reference.
    pub fn slots(&self) -> &'static [&'static str] {
        match self {
            Phrase::Vehicle => &["article", "noun", "name"],
            Phrase::DepartureOnTime | Phrase::DepartureDelayed => DEPARTURE_SLOTS,
            Phrase::Platform => &["platform"],
            Phrase::NextDeparture => &["from", "list"],
            Phrase::NextDepartureTo => &["from", "destination", "list"],
            Phrase::NextDepartureAt => &["from", "start", "list"],
            Phrase::NextDepartureAtTo => &["from", "start", "destination", "list"],
            Phrase::NextDepartures => &["count", "from", "list"],
            Phrase::NextDeparturesTo => &["count", "from", "destination", "list"],
            Phrase::NextDeparturesAt => &["count", "from", "start", "list"],
            Phrase::NextDeparturesAtTo => &["count", "from", "start", "destination", "list"],
            Phrase::NoStationsNear => &["near"],
            Phrase::ClosestStation | Phrase::ClosestStations => &["list"],
            Phrase::ClosestStationNear | Phrase::ClosestStationsNear => &["near", "list"],
            Phrase::StationDistance => &["name", "distance"],
            Phrase::ListSeparator
            | Phrase::ListFinalSeparator
            | Phrase::NoDepartures
            | Phrase::NoStations
            | Phrase::StationSeparator
            | Phrase::NeedLocation
            | Phrase::PermissionContext => &[],
        }
    }

    /// Whether the phrase has `one`/`other` forms.
    pub fn is_plural(&self) -> bool {
        matches!(self, Phrase::DepartureDelayed | Phrase::StationDistance)
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Errors found while loading phrase tables.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("malformed phrase table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{language}: missing phrase {phrase}")]
    MissingPhrase { language: Language, phrase: Phrase },

    #[error("{language}: missing words for mode {mode}")]
    MissingMode { language: Language, mode: Mode },

    #[error("{language}: phrase {phrase} needs \"one\" and \"other\" forms")]
    PluralExpected { language: Language, phrase: Phrase },

    #[error("{language}: phrase {phrase} takes no plural forms")]
    PluralUnexpected { language: Language, phrase: Phrase },

    #[error("{language}: phrase {phrase} uses undeclared slot {{{slot}}}")]
    UndeclaredSlot {
        language: Language,
        phrase: Phrase,
        slot: String,
    },

    #[error("{language}: phrase {phrase}: {source}")]
    Template {
        language: Language,
        phrase: Phrase,
        source: TemplateError,
    },

    #[error("no phrase table for {0}")]
    MissingLanguage(Language),

    #[error("more than one phrase table for {0}")]
    DuplicateLanguage(Language),
}

/// A phrase as written in the JSON table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Plain(String),
    Plural { one: String, other: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModeWords {
    article: String,
    #[serde(default)]
    noun: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    language: Language,
    modes: HashMap<Mode, RawModeWords>,
    phrases: HashMap<Phrase, RawEntry>,
}

#[derive(Debug, Clone)]
enum Entry {
    Plain(Template),
    Plural { one: Template, other: Template },
}

/// Article and noun for one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeWords {
    pub article: String,
    /// `None` means "speak the provider's category code".
    pub noun: Option<String>,
}

/// A validated phrase table for one language.
#[derive(Debug, Clone)]
pub struct PhraseTable {
    language: Language,
    // Indexed by position in `Phrase::ALL` / `Mode::ALL`; filled completely
    // during validation.
    entries: Vec<Entry>,
    modes: Vec<ModeWords>,
}

impl PhraseTable {
    /// Parse and validate one JSON table.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawTable = serde_json::from_str(json)?;
        Self::validate(raw)
    }

    fn validate(mut raw: RawTable) -> Result<Self, CatalogError> {
        let language = raw.language;

        let mut entries = Vec::with_capacity(Phrase::ALL.len());
        for phrase in Phrase::ALL {
            let entry = raw
                .phrases
                .remove(&phrase)
                .ok_or(CatalogError::MissingPhrase { language, phrase })?;
            entries.push(compile(language, phrase, entry)?);
        }

        let mut modes = Vec::with_capacity(Mode::ALL.len());
        for mode in Mode::ALL {
            let words = raw
                .modes
                .remove(&mode)
                .ok_or(CatalogError::MissingMode { language, mode })?;
            modes.push(ModeWords {
                article: words.article,
                noun: words.noun,
            });
        }

        Ok(Self {
            language,
            entries,
            modes,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn entry(&self, phrase: Phrase) -> &Entry {
        let idx = Phrase::ALL.iter().position(|p| *p == phrase).unwrap_or(0);
        &self.entries[idx]
    }

    /// Article and noun for a mode.
    pub fn mode_words(&self, mode: Mode) -> &ModeWords {
        let idx = Mode::ALL.iter().position(|m| *m == mode).unwrap_or(0);
        &self.modes[idx]
    }

    /// Render a phrase. Plural phrases use their `other` form.
    pub fn render(&self, phrase: Phrase, args: &[(&str, &str)]) -> String {
        match self.entry(phrase) {
            Entry::Plain(template) => template.render(args),
            Entry::Plural { other, .. } => other.render(args),
        }
    }

    /// Render a phrase, picking the plural form for `count`.
    pub fn render_count(&self, phrase: Phrase, count: u64, args: &[(&str, &str)]) -> String {
        match self.entry(phrase) {
            Entry::Plain(template) => template.render(args),
            Entry::Plural { one, .. } if count == 1 => one.render(args),
            Entry::Plural { other, .. } => other.render(args),
        }
    }
}

fn compile(language: Language, phrase: Phrase, raw: RawEntry) -> Result<Entry, CatalogError> {
    let parse = |source: &str| -> Result<Template, CatalogError> {
        let template = Template::parse(source).map_err(|source| CatalogError::Template {
            language,
            phrase,
            source,
        })?;
        let declared: HashSet<&str> = phrase.slots().iter().copied().collect();
        if let Some(slot) = template.slots().find(|slot| !declared.contains(slot)) {
            return Err(CatalogError::UndeclaredSlot {
                language,
                phrase,
                slot: slot.to_string(),
            });
        }
        Ok(template)
    };

    match (raw, phrase.is_plural()) {
        (RawEntry::Plain(source), false) => Ok(Entry::Plain(parse(&source)?)),
        (RawEntry::Plural { one, other }, true) => Ok(Entry::Plural {
            one: parse(&one)?,
            other: parse(&other)?,
        }),
        (RawEntry::Plain(_), true) => Err(CatalogError::PluralExpected { language, phrase }),
        (RawEntry::Plural { .. }, false) => {
            Err(CatalogError::PluralUnexpected { language, phrase })
        }
    }
}

/// Phrase tables for every supported language.
///
/// Built once before serving and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    // One table per `Language::SUPPORTED` entry, in that order.
    tables: Vec<PhraseTable>,
}

impl Catalog {
    /// Load the tables shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_TABLES)
    }

    /// Load a catalog from JSON tables. Every supported language needs
    /// exactly one table.
    pub fn from_json<'a>(sources: impl IntoIterator<Item = &'a str>) -> Result<Self, CatalogError> {
        let mut by_language: HashMap<Language, PhraseTable> = HashMap::new();
        for source in sources {
            let table = PhraseTable::from_json(source)?;
            let language = table.language();
            if by_language.insert(language, table).is_some() {
                return Err(CatalogError::DuplicateLanguage(language));
            }
        }

        let mut tables = Vec::with_capacity(Language::SUPPORTED.len());
        for language in Language::SUPPORTED {
            let table = by_language
                .remove(&language)
                .ok_or(CatalogError::MissingLanguage(language))?;
            tables.push(table);
        }

        Ok(Self { tables })
    }

    /// The table for a language.
    pub fn table(&self, language: Language) -> &PhraseTable {
        self.tables
            .iter()
            .find(|t| t.language() == language)
            .unwrap_or(&self.tables[0])
    }
}
