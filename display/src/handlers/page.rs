// Results page handler

use axum::{extract::State, response::Html};
use tera::Context;
use tracing::{debug, error, warn};

use crate::handlers::ErrorResponse;
use crate::state::AppState;
use crate::templates::TEMPLATES;
use common::speedtest;

/// Render the speedtest results page and arm the hourly refresh for this
/// page load.
///
/// Every load re-reads the log from disk and re-derives its own refresh
/// trigger; nothing is shared between loads.
#[tracing::instrument(skip(state))]
pub async fn display_page(State(state): State<AppState>) -> Result<Html<String>, ErrorResponse> {
    let samples = speedtest::load_report(&state.settings.display.log_path).map_err(|e| {
        error!(error = %e, path = %state.settings.display.log_path, "Failed to load speedtest report");
        ErrorResponse::new("internal_error", "Could not read the speedtest log")
    })?;

    if samples.is_empty() {
        warn!("Speedtest log is empty or contains only headers");
    }

    let mut context = Context::new();
    context.insert("results", &samples);

    let body = TEMPLATES.render("index.html", &context).map_err(|e| {
        error!(error = %e, "Template rendering failed");
        ErrorResponse::new("internal_error", "Could not render the results page")
    })?;

    let handle = state.scheduler.arm().map_err(|e| {
        error!(error = %e, "Failed to arm page refresh");
        ErrorResponse::new("internal_error", "Could not schedule the page refresh")
    })?;
    debug!(target = %handle.target(), "Page refresh armed for this load");

    Ok(Html(body))
}
