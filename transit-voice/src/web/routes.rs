//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::compose::Composer;
use crate::filter::{DEFAULT_STATION_LIMIT, FilterError, parse_limit};
use crate::pipeline::{self, DepartureRequest, PipelineError};
use crate::timetable::{
    ConnectionsQuery, StationboardQuery, Timetable, TimetableError, connection_departures,
    nearby_stations, stationboard_departures,
};

use super::dto::*;
use super::state::AppState;

/// Conversation intents the webhook fulfils.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Next departures from a stop, optionally towards a destination
    Departures,
    /// Stations near the device
    Stations,
}

impl Intent {
    /// Map an agent intent name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "next-departure"
            | "next-departures"
            | "from-here-to"
            | "from-here-to-with-permission" => Some(Intent::Departures),
            "find-stations" | "find-stations-with-permission" => Some(Intent::Stations),
            _ => None,
        }
    }
}

/// Create the application router.
pub fn create_router<T: Timetable>(state: AppState<T>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/dialogflow", post(dialogflow::<T>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Dialogflow fulfilment webhook.
async fn dialogflow<T: Timetable>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    Json(req): Json<DialogflowRequest>,
) -> Result<Json<DialogflowResponse>, AppError> {
    // The conversation language wins over the HTTP header.
    let tag = if req.lang.trim().is_empty() {
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    } else {
        req.lang.as_str()
    };
    let locale = state.resolver.resolve(tag);
    info!(intent = req.intent_name(), language = %locale.language, "received intent");

    let intent = Intent::from_name(req.intent_name()).ok_or_else(|| AppError::BadRequest {
        message: format!("unknown intent {:?}", req.intent_name()),
    })?;

    let composer = state.catalog.composer(&locale);
    let response = match intent {
        Intent::Departures => departures(&*state.timetable, &composer, &req).await?,
        Intent::Stations => stations(&*state.timetable, &composer, &req).await?,
    };

    Ok(Json(response))
}

/// Announce departures from the requested or nearest origin.
async fn departures<T: Timetable>(
    timetable: &T,
    composer: &Composer<'_>,
    req: &DialogflowRequest,
) -> Result<DialogflowResponse, AppError> {
    let params = &req.result.parameters;
    let source = params.source.trim();

    let tz = composer.timezone();
    let today = Utc::now().with_timezone(&tz).date_naive();
    let request = DepartureRequest {
        routes: params.route.clone(),
        modes: params.transport.clone(),
        limit: params.limit_text(),
        start: Some(params.date_time.clone()),
    };
    let criteria = pipeline::criteria(&request, today, tz)?;

    let origin = if !source.is_empty() {
        source.to_string()
    } else if let Some(address) = req.device_address() {
        address.to_string()
    } else if let Some(position) = req.device_position() {
        // Coordinates without an address: start from the closest station.
        let locations = timetable.locations(&position).await?;
        match nearby_stations(&locations, 1).into_iter().next() {
            Some(station) => station.name,
            None => {
                info!("no station near the device");
                let speech = composer.stations(None, &[]);
                return Ok(DialogflowResponse::speech(speech, true));
            }
        }
    } else {
        debug!("no origin and no device location, requesting permission");
        return Ok(DialogflowResponse::location_prompt(composer.need_location()));
    };

    let destination = Some(params.destination.trim()).filter(|d| !d.is_empty());
    let raws = match destination {
        Some(destination) => {
            let query = ConnectionsQuery::new(origin.as_str(), destination)
                .with_datetime(criteria.requested_start);
            connection_departures(&timetable.connections(&query).await?)
        }
        None => {
            let query =
                StationboardQuery::new(origin.as_str()).with_datetime(criteria.requested_start);
            stationboard_departures(&timetable.stationboard(&query).await?)
        }
    };

    let announcement =
        pipeline::announce_departures(composer, &origin, destination, &raws, &criteria)?;
    info!(origin = %origin, count = announcement.count, "announcing departures");

    let expect_user_response = announcement.is_empty();
    Ok(DialogflowResponse::speech(
        announcement.speech,
        expect_user_response,
    ))
}

/// Announce stations near the device.
async fn stations<T: Timetable>(
    timetable: &T,
    composer: &Composer<'_>,
    req: &DialogflowRequest,
) -> Result<DialogflowResponse, AppError> {
    let Some(position) = req.device_position() else {
        debug!("no device location, requesting permission");
        return Ok(DialogflowResponse::location_prompt(composer.need_location()));
    };

    let limit = match parse_limit(
        req.result.parameters.limit_text().as_deref(),
        DEFAULT_STATION_LIMIT,
    )? {
        0 => DEFAULT_STATION_LIMIT,
        n => n,
    };

    let locations = timetable.locations(&position).await?;
    let stations = nearby_stations(&locations, limit);
    info!(found = stations.len(), limit, "announcing stations");

    let speech = composer.stations(req.device_address(), &stations);
    Ok(DialogflowResponse::speech(speech, stations.is_empty()))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// The request cannot be fulfilled as sent
    BadRequest { message: String },
    /// The timetable failed or sent unusable data
    Upstream { message: String },
}

impl From<TimetableError> for AppError {
    fn from(e: TimetableError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl From<FilterError> for AppError {
    fn from(e: FilterError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Filter(e) => e.into(),
            PipelineError::Normalize(e) => AppError::Upstream {
                message: format!("unusable timetable data: {e}"),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
