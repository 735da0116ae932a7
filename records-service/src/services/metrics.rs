//! Prometheus metrics for records-service.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Search metrics
pub static SEARCH_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static SEARCH_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

// Summarization metrics
pub static SUMMARY_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static SUMMARY_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize all metrics. Must be called once at startup.
pub fn init_metrics() {
    let registry = Registry::new();

    let search_requests = IntCounterVec::new(
        Opts::new("records_search_requests_total", "Total search requests"),
        &["status"],
    )
    .expect("Failed to create records_search_requests_total metric");

    let search_latency = HistogramVec::new(
        HistogramOpts::new(
            "records_search_latency_seconds",
            "Search backend latency in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        &["backend"],
    )
    .expect("Failed to create records_search_latency_seconds metric");

    let summary_requests = IntCounterVec::new(
        Opts::new(
            "records_summary_requests_total",
            "Total summarization requests",
        ),
        &["status"],
    )
    .expect("Failed to create records_summary_requests_total metric");

    let summary_latency = HistogramVec::new(
        HistogramOpts::new(
            "records_summary_latency_seconds",
            "Summary generation latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["model"],
    )
    .expect("Failed to create records_summary_latency_seconds metric");

    registry
        .register(Box::new(search_requests.clone()))
        .expect("Failed to register records_search_requests_total");
    registry
        .register(Box::new(search_latency.clone()))
        .expect("Failed to register records_search_latency_seconds");
    registry
        .register(Box::new(summary_requests.clone()))
        .expect("Failed to register records_summary_requests_total");
    registry
        .register(Box::new(summary_latency.clone()))
        .expect("Failed to register records_summary_latency_seconds");

    let _ = REGISTRY.set(registry);
    let _ = SEARCH_REQUESTS_TOTAL.set(search_requests);
    let _ = SEARCH_LATENCY_SECONDS.set(search_latency);
    let _ = SUMMARY_REQUESTS_TOTAL.set(summary_requests);
    let _ = SUMMARY_LATENCY_SECONDS.set(summary_latency);

    tracing::info!("Prometheus metrics initialized");
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record a completed search request.
pub fn record_search(status: &str, backend: &str, duration_secs: f64) {
    if let Some(counter) = SEARCH_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[status]).inc();
    }
    if let Some(histogram) = SEARCH_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[backend])
            .observe(duration_secs);
    }
}

/// Record a completed summarization request.
pub fn record_summary(status: &str, model: &str, duration_secs: f64) {
    if let Some(counter) = SUMMARY_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[status]).inc();
    }
    if let Some(histogram) = SUMMARY_LATENCY_SECONDS.get() {
        histogram.with_label_values(&[model]).observe(duration_secs);
    }
}
