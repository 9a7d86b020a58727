//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    ACKNOWLEDGE_FAILED_TOTAL, DELIVERIES_FAILED_TOTAL, DELIVERIES_SUCCEEDED_TOTAL,
    EVENTS_HANDLED_TOTAL, EVENTS_RECEIVED_TOTAL, EVENT_HANDLING_SECONDS, INTEREST_TABLE_SIZE,
    RELAY_READY,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording event metrics
pub struct EventMetrics;

impl EventMetrics {
    pub fn record_received(count: u64) {
        EVENTS_RECEIVED_TOTAL.inc_by(count);
    }

    /// Record the outcome label of a handled event
    pub fn record_outcome(outcome: &str) {
        EVENTS_HANDLED_TOTAL.with_label_values(&[outcome]).inc();
    }

    pub fn record_handling_time(seconds: f64) {
        EVENT_HANDLING_SECONDS.observe(seconds);
    }

    pub fn record_acknowledge_failed() {
        ACKNOWLEDGE_FAILED_TOTAL.inc();
    }
}

/// Helper struct for recording webhook delivery metrics
pub struct DeliveryMetrics;

impl DeliveryMetrics {
    pub fn record_delivered(count: u64) {
        DELIVERIES_SUCCEEDED_TOTAL.inc_by(count);
    }

    pub fn record_failed(count: u64) {
        DELIVERIES_FAILED_TOTAL.inc_by(count);
    }
}

/// Helper struct for relay state gauges
pub struct RelayMetrics;

impl RelayMetrics {
    pub fn set_ready(ready: bool) {
        RELAY_READY.set(if ready { 1 } else { 0 });
    }

    pub fn set_interest_table_size(size: usize) {
        INTEREST_TABLE_SIZE.set(size as i64);
    }
}
