//! Metrics collection for observability

use crate::error::Result;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_int_gauge_with_registry, CounterVec, Encoder, HistogramVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // HTTP API metrics
    pub summarize_requests: CounterVec,
    pub summarize_request_duration: HistogramVec,

    // Summarization path metrics
    pub summaries_produced: CounterVec,
    pub upstream_failures: CounterVec,
    pub upstream_request_duration: HistogramVec,
    pub upstream_circuit_open: IntGauge,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        let summarize_requests = register_counter_vec_with_registry!(
            Opts::new("summarize_requests_total", "Total summarize API requests"),
            &["status"],
            registry
        )?;

        let summarize_request_duration = register_histogram_vec_with_registry!(
            "summarize_request_duration_seconds",
            "Summarize API request duration in seconds",
            &["source"],
            registry
        )?;

        let summaries_produced = register_counter_vec_with_registry!(
            Opts::new("summaries_produced_total", "Summaries produced by path"),
            &["path"],
            registry
        )?;

        let upstream_failures = register_counter_vec_with_registry!(
            Opts::new("upstream_failures_total", "Completion endpoint failures by reason"),
            &["reason"],
            registry
        )?;

        let upstream_request_duration = register_histogram_vec_with_registry!(
            "upstream_request_duration_seconds",
            "Completion endpoint call duration in seconds",
            &["outcome"],
            registry
        )?;

        let upstream_circuit_open = register_int_gauge_with_registry!(
            Opts::new(
                "upstream_circuit_open",
                "Whether the completion endpoint circuit breaker is open (1) or not (0)"
            ),
            registry
        )?;

        Ok(Self {
            registry,
            summarize_requests,
            summarize_request_duration,
            summaries_produced,
            upstream_failures,
            upstream_request_duration,
            upstream_circuit_open,
        })
    }

    /// Record a finished summarize request (`success`, `rejected` or `error`)
    pub fn record_request(&self, status: &str, source: &str, seconds: f64) {
        self.summarize_requests.with_label_values(&[status]).inc();
        self.summarize_request_duration
            .with_label_values(&[source])
            .observe(seconds);
    }

    /// Record which path produced a summary
    pub fn record_summary(&self, path: &str) {
        self.summaries_produced.with_label_values(&[path]).inc();
    }

    /// Record an absorbed upstream failure
    pub fn record_upstream_failure(&self, reason: &str) {
        self.upstream_failures.with_label_values(&[reason]).inc();
    }

    /// Record one call to the completion endpoint
    pub fn record_upstream_call(&self, success: bool, seconds: f64) {
        let outcome = if success { "success" } else { "error" };
        self.upstream_request_duration
            .with_label_values(&[outcome])
            .observe(seconds);
    }

    pub fn record_breaker_open(&self, open: bool) {
        self.upstream_circuit_open.set(i64::from(open));
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
