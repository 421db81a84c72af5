//! Metrics and observability utilities
//!
//! Provides metric descriptions with the `citemap` prefix, recording helpers
//! and the optional Prometheus exporter.

use crate::config::ObservabilityConfig;
use crate::errors::{AppError, Result};
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Metrics prefix for all Citemap metrics
pub const METRICS_PREFIX: &str = "citemap";

/// Buckets for per-frame highlight latency (in seconds).
/// Target: well inside one 60 fps frame (16.7ms)
pub const FRAME_BUCKETS: &[f64] = &[
    0.0001, // 0.1ms
    0.0005, // 0.5ms
    0.001,  // 1ms
    0.002,  // 2ms
    0.004,  // 4ms
    0.008,  // 8ms
    0.016,  // 16ms - frame budget
    0.033,  // 33ms
    0.100,  // 100ms
];

/// Buckets for semantic lookups (generation + embedding round trips)
pub const LOOKUP_BUCKETS: &[f64] = &[
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.000,  // 2s
    5.000,  // 5s
    10.00,  // 10s
    30.00,  // 30s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Graph build metrics
    describe_counter!(
        format!("{}_edges_accepted_total", METRICS_PREFIX),
        Unit::Count,
        "Citation edges accepted into the graph"
    );

    describe_counter!(
        format!("{}_edges_rejected_total", METRICS_PREFIX),
        Unit::Count,
        "Citation edges dropped because they would close a cycle"
    );

    describe_counter!(
        format!("{}_edges_dangling_total", METRICS_PREFIX),
        Unit::Count,
        "References to papers missing from the catalog"
    );

    describe_histogram!(
        format!("{}_graph_build_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Citation graph build latency in seconds"
    );

    describe_histogram!(
        format!("{}_layout_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Initial layout latency in seconds"
    );

    // Highlight loop metrics
    describe_histogram!(
        format!("{}_frame_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Highlight engine time per frame in seconds"
    );

    // Semantic lookup metrics
    describe_counter!(
        format!("{}_semantic_lookups_total", METRICS_PREFIX),
        Unit::Count,
        "Semantic lookups by outcome"
    );

    describe_histogram!(
        format!("{}_semantic_lookup_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Semantic lookup latency in seconds"
    );

    tracing::info!("Metrics registered");
}

/// Install the Prometheus exporter when a port is configured
pub fn install_exporter(config: &ObservabilityConfig) -> Result<()> {
    if config.metrics_port == 0 {
        return Ok(());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let exporter_error = |e: metrics_exporter_prometheus::BuildError| AppError::Configuration {
        message: format!("Failed to install Prometheus exporter: {}", e),
    };

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_frame_duration_seconds", METRICS_PREFIX)),
            FRAME_BUCKETS,
        )
        .map_err(exporter_error)?
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_semantic_lookup_duration_seconds", METRICS_PREFIX)),
            LOOKUP_BUCKETS,
        )
        .map_err(exporter_error)?
        .install()
        .map_err(exporter_error)?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Counts from one graph build
pub fn record_graph_build(duration_secs: f64, accepted: usize, rejected: usize, dangling: usize) {
    counter!(format!("{}_edges_accepted_total", METRICS_PREFIX)).increment(accepted as u64);
    counter!(format!("{}_edges_rejected_total", METRICS_PREFIX)).increment(rejected as u64);
    counter!(format!("{}_edges_dangling_total", METRICS_PREFIX)).increment(dangling as u64);
    histogram!(format!("{}_graph_build_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}

pub fn record_layout(duration_secs: f64) {
    histogram!(format!("{}_layout_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}

pub fn record_frame(duration_secs: f64) {
    histogram!(format!("{}_frame_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}

/// Helper to record semantic lookup metrics
pub struct LookupMetrics {
    start: Instant,
}

impl LookupMetrics {
    /// Start tracking a lookup
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    /// Record lookup completion; `outcome` is `matched`, `no_match` or `error`
    pub fn finish(self, outcome: &'static str) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_semantic_lookups_total", METRICS_PREFIX),
            "outcome" => outcome
        )
        .increment(1);

        histogram!(format!("{}_semantic_lookup_duration_seconds", METRICS_PREFIX)).record(duration);
    }
}
