//! Webhook receiver for the portal's event queue.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::event::WebhookEvent;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub accepted: usize,
}

/// POST / - accept a batch of events and process it in the background.
///
/// The portal only needs to know the batch arrived; each event is
/// acknowledged separately once it has been handled.
pub async fn receive_events(
    State(state): State<AppState>,
    Json(events): Json<Vec<WebhookEvent>>,
) -> Json<AcceptedResponse> {
    let accepted = events.len();
    tracing::debug!(count = accepted, "Webhook batch received");

    if accepted > 0 {
        let relay = state.relay.clone();
        tokio::spawn(async move {
            let summary = relay.process_batch(events).await;
            tracing::info!(
                received = summary.received,
                dispatched = summary.dispatched,
                skipped = summary.skipped,
                failed = summary.failed,
                acknowledged = summary.acknowledged,
                "Webhook batch processed"
            );
        });
    }

    Json(AcceptedResponse { accepted })
}
