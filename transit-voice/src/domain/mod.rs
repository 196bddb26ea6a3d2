//! Domain types for the departure announcer.
//!
//! This module contains the canonical departure model and the normalizers
//! that build it from raw upstream records. Types are validated at
//! construction, so rendering code can trust them.

mod departure;
mod error;
mod mode;
mod time;

pub use departure::{Departure, RawDeparture, Station};
pub use error::NormalizeError;
pub use mode::{Mode, classify, line_name};
pub use time::{
    RawTimestamp, UNKNOWN_DELAY, clock, parse_delay, parse_departure_time, parse_requested_start,
};
