//! Localization: language negotiation and phrase tables.
//!
//! Composition code never branches on the language. It asks the
//! [`PhraseTable`] of the negotiated [`Locale`] for a [`Phrase`] and fills in
//! named slots, so supporting a new language means adding a table.

mod catalog;
mod negotiate;
mod template;

pub use catalog::{Catalog, CatalogError, ModeWords, Phrase, PhraseTable};
pub use negotiate::{Language, Locale, LocaleResolver};
pub use template::{Template, TemplateError};
