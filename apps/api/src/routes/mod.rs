pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::itinerary::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/itineraries",
            post(handlers::handle_create).get(handlers::handle_list),
        )
        .route(
            "/api/v1/itineraries/:id",
            get(handlers::handle_get)
                .put(handlers::handle_update)
                .delete(handlers::handle_delete),
        )
        .route(
            "/api/v1/itineraries/:id/pdf",
            post(handlers::handle_generate_pdf),
        )
        .route(
            "/api/v1/itineraries/:id/pdf/download",
            get(handlers::handle_download_pdf),
        )
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
