//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `ledger_invocations_total` - Invocations by operation
//! - `ledger_failures_total` - Failed invocations by operation
//! - `ledger_transfer_duration_seconds` - Transfer latency histogram

use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry};
use std::sync::Arc;

/// Metrics collector, injected into the service (no globals)
#[derive(Clone)]
pub struct Metrics {
    invocations_total: IntCounterVec,
    failures_total: IntCounterVec,
    transfer_duration: Histogram,
    registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let invocations_total = IntCounterVec::new(
            Opts::new("ledger_invocations_total", "Invocations by operation"),
            &["operation"],
        )?;
        registry.register(Box::new(invocations_total.clone()))?;

        let failures_total = IntCounterVec::new(
            Opts::new("ledger_failures_total", "Failed invocations by operation"),
            &["operation"],
        )?;
        registry.register(Box::new(failures_total.clone()))?;

        let transfer_duration = Histogram::with_opts(
            HistogramOpts::new(
                "ledger_transfer_duration_seconds",
                "Transfer latency histogram",
            )
            .buckets(vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250]),
        )?;
        registry.register(Box::new(transfer_duration.clone()))?;

        Ok(Self {
            invocations_total,
            failures_total,
            transfer_duration,
            registry,
        })
    }

    /// Record an invocation of an operation
    pub fn record_invocation(&self, operation: &str) {
        self.invocations_total.with_label_values(&[operation]).inc();
    }

    /// Record a failed invocation
    pub fn record_failure(&self, operation: &str) {
        self.failures_total.with_label_values(&[operation]).inc();
    }

    /// Observe transfer latency
    pub fn observe_transfer_duration(&self, seconds: f64) {
        self.transfer_duration.observe(seconds);
    }

    /// Invocation count for an operation (used by tests)
    pub fn invocations(&self, operation: &str) -> u64 {
        self.invocations_total.with_label_values(&[operation]).get()
    }

    /// Failure count for an operation (used by tests)
    pub fn failures(&self, operation: &str) -> u64 {
        self.failures_total.with_label_values(&[operation]).get()
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.invocations("move"), 0);
        assert_eq!(metrics.failures("move"), 0);
    }

    #[test]
    fn test_record_invocation() {
        let metrics = Metrics::new().unwrap();
        metrics.record_invocation("query");
        metrics.record_invocation("query");
        metrics.record_invocation("move");

        assert_eq!(metrics.invocations("query"), 2);
        assert_eq!(metrics.invocations("move"), 1);
    }

    #[test]
    fn test_record_failure() {
        let metrics = Metrics::new().unwrap();
        metrics.record_failure("init");
        assert_eq!(metrics.failures("init"), 1);
        assert_eq!(metrics.invocations("init"), 0);
    }
}
