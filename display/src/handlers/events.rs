use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::AppState;

/// Server-Sent Events stream carrying reload commands to the displayed
/// page
#[tracing::instrument(skip(state))]
pub async fn reload_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.reload_tx.subscribe();
    let stream = BroadcastStream::new(rx).map(|msg| {
        match msg {
            Ok(command) => {
                let json = serde_json::to_string(&command).unwrap_or_default();
                Ok(Event::default().event("reload").data(json))
            }
            Err(_) => {
                // Lagged behind, send a reconnect event
                Ok(Event::default().event("reconnect"))
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
