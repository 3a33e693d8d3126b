use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the main application router with all routes and middleware
#[tracing::instrument(skip(state))]
pub fn create_router(state: AppState) -> Router {
    let stylesheet = ServeFile::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static/style.css"));

    Router::new()
        .route("/", get(handlers::page::display_page))
        .route("/events", get(handlers::events::reload_events))
        .route("/health", get(handlers::health::health_check))
        .route_service("/style.css", stylesheet)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
