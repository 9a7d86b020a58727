use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub interesting_events: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// POST /admin/reload - re-fetch chatbot settings and templates
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>> {
    let interesting_events = state.relay.reload().await?;
    let loaded_at = state.relay.snapshot().map(|s| s.loaded_at);

    Ok(Json(ReloadResponse {
        interesting_events,
        loaded_at,
    }))
}
