mod config;
mod errors;
mod itinerary;
mod models;
mod report;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::itinerary::repository::InMemoryItineraryRepository;
use crate::itinerary::ItineraryService;
use crate::report::ReportAssembler;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Itinerary API v{}", env!("CARGO_PKG_VERSION"));

    let repo = Arc::new(InMemoryItineraryRepository::new());
    info!("In-memory itinerary store initialized");

    let assembler = ReportAssembler::new(&config.output_dir);
    info!("Reports will be written to {}", assembler.output_dir().display());

    let state = AppState {
        itineraries: ItineraryService::new(repo, assembler),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
