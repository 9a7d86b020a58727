//! Prometheus metrics for the chatbot relay.
//!
//! - Event metrics (received, outcome, handling latency)
//! - Delivery metrics (webhook POSTs delivered / failed)
//! - Relay state (readiness, interest table size)

mod helpers;

pub use helpers::{encode_metrics, DeliveryMetrics, EventMetrics, RelayMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "chatbot";

lazy_static! {
    // ============================================================================
    // Event Metrics
    // ============================================================================

    /// Events received from the portal's webhook queue
    pub static ref EVENTS_RECEIVED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_events_received_total", METRIC_PREFIX),
        "Total events received from the portal"
    ).unwrap();

    /// Handled events by outcome
    pub static ref EVENTS_HANDLED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_events_handled_total", METRIC_PREFIX),
        "Total events handled, by outcome",
        &["outcome"]
    ).unwrap();

    /// Time spent handling an interesting event (lookup, render, fan-out)
    pub static ref EVENT_HANDLING_SECONDS: Histogram = register_histogram!(
        format!("{}_event_handling_seconds", METRIC_PREFIX),
        "Event handling latency in seconds",
        vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    /// Failed event acknowledgements
    pub static ref ACKNOWLEDGE_FAILED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_acknowledge_failed_total", METRIC_PREFIX),
        "Total failed event acknowledgements"
    ).unwrap();

    // ============================================================================
    // Delivery Metrics
    // ============================================================================

    /// Webhook POSTs answered with 2xx
    pub static ref DELIVERIES_SUCCEEDED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_deliveries_succeeded_total", METRIC_PREFIX),
        "Total chat webhook posts that succeeded"
    ).unwrap();

    /// Webhook POSTs that failed
    pub static ref DELIVERIES_FAILED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_deliveries_failed_total", METRIC_PREFIX),
        "Total chat webhook posts that failed"
    ).unwrap();

    // ============================================================================
    // Relay State
    // ============================================================================

    /// 1 when the relay is ready to handle events
    pub static ref RELAY_READY: IntGauge = register_int_gauge!(
        format!("{}_relay_ready", METRIC_PREFIX),
        "Relay readiness (1=ready, 0=not ready)"
    ).unwrap();

    /// Number of event kinds the relay acts upon
    pub static ref INTEREST_TABLE_SIZE: IntGauge = register_int_gauge!(
        format!("{}_interest_table_size", METRIC_PREFIX),
        "Number of event kinds with an enabled template"
    ).unwrap();
}
