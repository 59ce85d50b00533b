//! Metrics collection for estimate-service.
//!
//! Exposes standard Prometheus metrics plus counters for submissions,
//! notification outcomes, and adjustment-provider calls.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static ESTIMATE_SUBMITTED_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static ESTIMATE_NOTIFICATION_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static ADJUSTMENT_CALLS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize metrics collection.
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }

    let registry = Registry::new();

    let submitted_counter = IntCounterVec::new(
        Opts::new(
            "estimate_submitted_total",
            "Total estimate submissions by outcome",
        ),
        &["status"],
    )
    .expect("Failed to create estimate_submitted_total metric");

    let notification_counter = IntCounterVec::new(
        Opts::new(
            "estimate_notification_total",
            "Total staff notifications by channel and outcome",
        ),
        &["channel", "status"],
    )
    .expect("Failed to create estimate_notification_total metric");

    let adjustment_counter = IntCounterVec::new(
        Opts::new(
            "adjustment_provider_calls_total",
            "Total adjustment provider calls by outcome",
        ),
        &["status"],
    )
    .expect("Failed to create adjustment_provider_calls_total metric");

    registry
        .register(Box::new(submitted_counter.clone()))
        .expect("Failed to register estimate_submitted_total");
    registry
        .register(Box::new(notification_counter.clone()))
        .expect("Failed to register estimate_notification_total");
    registry
        .register(Box::new(adjustment_counter.clone()))
        .expect("Failed to register adjustment_provider_calls_total");

    PROMETHEUS_REGISTRY
        .set(registry)
        .expect("Failed to set prometheus registry");
    ESTIMATE_SUBMITTED_TOTAL
        .set(submitted_counter)
        .expect("Failed to set estimate_submitted_total");
    ESTIMATE_NOTIFICATION_TOTAL
        .set(notification_counter)
        .expect("Failed to set estimate_notification_total");
    ADJUSTMENT_CALLS_TOTAL
        .set(adjustment_counter)
        .expect("Failed to set adjustment_provider_calls_total");
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

/// Record an estimate submission outcome.
pub fn record_estimate(status: &str) {
    if let Some(counter) = ESTIMATE_SUBMITTED_TOTAL.get() {
        counter.with_label_values(&[status]).inc();
    }
}

/// Record a notification delivery outcome.
pub fn record_notification(channel: &str, status: &str) {
    if let Some(counter) = ESTIMATE_NOTIFICATION_TOTAL.get() {
        counter.with_label_values(&[channel, status]).inc();
    }
}

/// Record an adjustment provider call.
pub fn record_adjustment_call(status: &str) {
    if let Some(counter) = ADJUSTMENT_CALLS_TOTAL.get() {
        counter.with_label_values(&[status]).inc();
    }
}
