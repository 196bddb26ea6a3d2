//! Spoken response composition.
//!
//! A [`Composer`] renders canonical departures, nearby stations or the
//! location prompt into exactly one sentence in the negotiated language.
//! Everything language-specific comes from the phrase table.

mod departures;
mod prompt;
mod stations;

use chrono_tz::Tz;

use crate::locale::{Catalog, Locale, PhraseTable};

pub use departures::DepartureContext;
pub use prompt::{DEVICE_PRECISE_LOCATION, LocationPrompt, PERMISSION_INTENT, PermissionRequest};

/// Renders sentences for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Composer<'a> {
    table: &'a PhraseTable,
    timezone: Tz,
}

impl<'a> Composer<'a> {
    /// A composer speaking `locale`'s language and times in its timezone.
    pub fn new(catalog: &'a Catalog, locale: &Locale) -> Self {
        Self {
            table: catalog.table(locale.language),
            timezone: locale.timezone,
        }
    }

    /// Zone times are spoken in.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

impl Catalog {
    /// Shorthand for [`Composer::new`].
    pub fn composer(&self, locale: &Locale) -> Composer<'_> {
        Composer::new(self, locale)
    }
}

/// Join phrases with `separator`, using `final_separator` before the last.
fn join_with_final(parts: &[String], separator: &str, final_separator: &str) -> String {
    match parts.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, init)) => format!("{}{final_separator}{last}", init.join(separator)),
    }
}
