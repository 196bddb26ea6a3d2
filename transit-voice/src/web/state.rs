//! Application state for the web layer.

use std::sync::Arc;

use crate::locale::{Catalog, LocaleResolver};
use crate::timetable::Timetable;

/// Shared application state.
///
/// The catalog is built once before serving and only read afterwards.
pub struct AppState<T> {
    /// Timetable data source
    pub timetable: Arc<T>,

    /// Validated phrase tables
    pub catalog: Arc<Catalog>,

    /// Language negotiation and operating timezone
    pub resolver: LocaleResolver,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            timetable: Arc::clone(&self.timetable),
            catalog: Arc::clone(&self.catalog),
            resolver: self.resolver,
        }
    }
}

impl<T: Timetable> AppState<T> {
    /// Create a new app state.
    pub fn new(timetable: T, catalog: Catalog, resolver: LocaleResolver) -> Self {
        Self {
            timetable: Arc::new(timetable),
            catalog: Arc::new(catalog),
            resolver,
        }
    }
}
