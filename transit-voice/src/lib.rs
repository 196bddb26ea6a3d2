//! Voice assistant fulfilment for public transport departures.
//!
//! Answers questions like "when does the next tram leave Central?" or
//! "which stations are near me?" with one spoken sentence, in the
//! user's language.

pub mod compose;
pub mod config;
pub mod domain;
pub mod filter;
pub mod locale;
pub mod pipeline;
pub mod timetable;
pub mod web;
