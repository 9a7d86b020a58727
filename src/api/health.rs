//! Health check and statistics endpoints.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::notification::DispatcherStatsSnapshot;
use crate::relay::{RelayState, RelayStatsSnapshot};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: String,
    pub version: String,
    pub state: RelayState,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub state: RelayState,
    pub listener_id: String,
    pub interesting_events: Vec<String>,
    pub destinations: usize,
    pub settings_loaded_at: Option<DateTime<Utc>>,
    pub events: RelayStatsSnapshot,
    pub deliveries: DispatcherStatsSnapshot,
}

/// GET /ping - 200 when the relay is ready, 503 otherwise
pub async fn ping(State(state): State<AppState>) -> (StatusCode, Json<PingResponse>) {
    let relay_state = state.relay.state();
    let (status_code, status) = if relay_state == RelayState::Ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status_code,
        Json(PingResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            state: relay_state,
            uptime_seconds: state.start_time.elapsed().as_secs(),
        }),
    )
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let relay = &state.relay;
    let snapshot = relay.snapshot();

    let mut interesting_events: Vec<String> = snapshot
        .as_ref()
        .map(|s| s.interest.keys().map(|k| k.to_string()).collect())
        .unwrap_or_default();
    interesting_events.sort();

    Json(StatsResponse {
        state: relay.state(),
        listener_id: relay.listener().id.clone(),
        interesting_events,
        destinations: snapshot
            .as_ref()
            .map(|s| s.globals.hook_urls().len())
            .unwrap_or(0),
        settings_loaded_at: snapshot.as_ref().map(|s| s.loaded_at),
        events: relay.stats(),
        deliveries: relay.dispatcher().stats(),
    })
}
