use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};

use super::admin::reload;
use super::health::{ping, stats};
use super::metrics::prometheus_metrics;
use super::webhook::receive_events;

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Webhook batches from the portal
        .route("/", post(receive_events))
        // Health & Stats
        .route("/ping", get(ping))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/admin",
            Router::new()
                .route("/reload", post(reload))
                .route_layer(middleware::from_fn_with_state(state, api_key_auth)),
        )
}
