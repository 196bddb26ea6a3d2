//! Web layer for the voice assistant.
//!
//! Exposes the Dialogflow fulfilment webhook and a health check.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, Intent, create_router};
pub use state::AppState;
