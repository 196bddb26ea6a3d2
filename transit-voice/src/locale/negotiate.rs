//! Language negotiation.

use std::fmt;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A language with a phrase table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
}

impl Language {
    /// Supported languages in negotiation order. The first is the fallback.
    pub const SUPPORTED: [Language; 3] = [Language::English, Language::German, Language::French];

    /// The language used when nothing better matches.
    pub const FALLBACK: Language = Language::SUPPORTED[0];

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
            Language::French => "fr",
        }
    }

    /// Look up a supported language by its primary subtag.
    fn from_primary_subtag(subtag: &str) -> Option<Self> {
        Self::SUPPORTED
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(subtag))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A negotiated language together with the zone all times are spoken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub language: Language,
    pub timezone: Tz,
}

/// Negotiates a [`Locale`] from whatever language tag the client sent.
///
/// The display timezone is fixed to the operating region and injected at
/// construction; it never comes from the client.
#[derive(Debug, Clone, Copy)]
pub struct LocaleResolver {
    timezone: Tz,
}

impl LocaleResolver {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// The operating timezone.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Resolve a raw language tag to a supported locale.
    ///
    /// Accepts single tags (`de`, `de-CH`, `de_CH`) as well as
    /// Accept-Language style lists (`fr-CH, de;q=0.8`). Never fails: empty,
    /// malformed or unsupported input resolves to [`Language::FALLBACK`].
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_voice::locale::{Language, LocaleResolver};
    ///
    /// let resolver = LocaleResolver::new(chrono_tz::Europe::Zurich);
    /// assert_eq!(resolver.resolve("de-CH").language, Language::German);
    /// assert_eq!(resolver.resolve("it, fr;q=0.5").language, Language::French);
    /// assert_eq!(resolver.resolve("").language, Language::English);
    /// assert_eq!(resolver.resolve("klingon").language, Language::English);
    /// ```
    pub fn resolve(&self, raw_tag: &str) -> Locale {
        Locale {
            language: negotiate(raw_tag),
            timezone: self.timezone,
        }
    }
}

/// Pick the best supported language for a tag or tag list.
fn negotiate(raw_tag: &str) -> Language {
    let mut candidates: Vec<(f32, &str)> = raw_tag
        .split(',')
        .filter_map(parse_weighted)
        .collect();

    // Stable sort keeps client order among equal weights.
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

    candidates
        .into_iter()
        .filter(|(weight, _)| *weight > 0.0)
        .find_map(|(_, tag)| {
            let primary = tag.split(['-', '_']).next().unwrap_or(tag);
            Language::from_primary_subtag(primary)
        })
        .unwrap_or(Language::FALLBACK)
}

/// Parse one `tag;q=weight` entry. Entries with a malformed weight are dropped.
fn parse_weighted(entry: &str) -> Option<(f32, &str)> {
    let mut parts = entry.split(';');
    let tag = parts.next()?.trim();
    if tag.is_empty() {
        return None;
    }

    let mut weight = 1.0;
    for param in parts {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("q") {
            weight = value.trim().parse::<f32>().ok().filter(|w| w.is_finite())?;
        }
    }

    Some((weight, tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Zurich;

    fn lang(tag: &str) -> Language {
        LocaleResolver::new(Zurich).resolve(tag).language
    }

    #[test]
    fn exact_tags() {
        assert_eq!(lang("en"), Language::English);
        assert_eq!(lang("de"), Language::German);
        assert_eq!(lang("fr"), Language::French);
    }

    #[test]
    fn regional_variants() {
        assert_eq!(lang("de-CH"), Language::German);
        assert_eq!(lang("de_AT"), Language::German);
        assert_eq!(lang("en-US"), Language::English);
        assert_eq!(lang("fr-CH"), Language::French);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(lang("DE"), Language::German);
        assert_eq!(lang("Fr-ch"), Language::French);
    }

    #[test]
    fn fallback_for_unsupported() {
        assert_eq!(lang("it"), Language::English);
        assert_eq!(lang("rm-CH"), Language::English);
        assert_eq!(lang(""), Language::English);
        assert_eq!(lang(";;;"), Language::English);
        assert_eq!(lang("de;q=banana"), Language::English);
    }

    #[test]
    fn accept_language_weights() {
        assert_eq!(lang("it-CH, de;q=0.9, en;q=0.8"), Language::German);
        assert_eq!(lang("en;q=0.2, fr;q=0.7"), Language::French);
        assert_eq!(lang("de, fr"), Language::German);
        assert_eq!(lang("de;q=0, fr;q=0.1"), Language::French);
    }

    #[test]
    fn timezone_is_injected() {
        let locale = LocaleResolver::new(chrono_tz::UTC).resolve("de");
        assert_eq!(locale.timezone, chrono_tz::UTC);
    }

    #[test]
    fn fallback_is_first_supported() {
        assert_eq!(Language::FALLBACK, Language::English);
        assert_eq!(Language::SUPPORTED[0], Language::FALLBACK);
    }
}
