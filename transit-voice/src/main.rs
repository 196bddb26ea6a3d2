use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_voice::config::Config;
use transit_voice::locale::{Catalog, LocaleResolver};
use transit_voice::timetable::TimetableClient;
use transit_voice::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("transit_voice=info,tower_http=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // Phrase tables are validated before serving.
    let catalog = Catalog::builtin()?;
    let client = TimetableClient::new(config.timetable.clone())?;

    let state = AppState::new(client, catalog, LocaleResolver::new(config.timezone));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(
        addr = %config.addr,
        timezone = %config.timezone,
        timetable = %config.timetable.base_url,
        "transit-voice listening"
    );
    info!("endpoints: GET /health, POST /dialogflow");

    axum::serve(listener, app).await?;
    Ok(())
}
