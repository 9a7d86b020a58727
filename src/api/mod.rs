//! API layer - HTTP endpoint handlers.

mod admin;
mod health;
mod metrics;
mod routes;
mod webhook;

pub use admin::{reload, ReloadResponse};
pub use health::{ping, stats, PingResponse, StatsResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use webhook::{receive_events, AcceptedResponse};
