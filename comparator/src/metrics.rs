//! Prometheus metrics for the trial comparator.
//!
//! [`ComparatorMetrics`] owns a dedicated [`Registry`] so an embedder can
//! expose it next to its own metrics or render it with
//! [`ComparatorMetrics::encode_text`].

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, Histogram,
    HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::time::Duration;

use certcmp_verification::Classification;

use crate::ComparatorError;

pub struct ComparatorMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Finished comparisons, labelled by classification.
    pub comparisons: IntCounterVec,
    /// Mismatch reports handed to the report sink.
    pub reports: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Comparison jobs currently in flight.
    pub jobs_in_flight: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Primary verification latency of comparison jobs.
    pub primary_latency_ms: Histogram,
    /// Trial verification latency.
    pub trial_latency_ms: Histogram,
}

impl ComparatorMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let comparisons = register_int_counter_vec_with_registry!(
            Opts::new(
                "certcmp_trial_comparisons_total",
                "Finished trial comparisons by classification"
            ),
            &["result"],
            registry
        )
        .expect("failed to register comparisons counter");

        let reports = register_int_counter_with_registry!(
            Opts::new(
                "certcmp_trial_reports_total",
                "Mismatch reports sent to the report sink"
            ),
            registry
        )
        .expect("failed to register reports counter");

        let jobs_in_flight = register_int_gauge_with_registry!(
            Opts::new(
                "certcmp_jobs_in_flight",
                "Trial comparison jobs currently in flight"
            ),
            registry
        )
        .expect("failed to register jobs_in_flight gauge");

        // Histograms: exponential buckets from 1 ms up to about 9 min.
        let primary_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "certcmp_primary_latency_ms",
                "Primary verification latency in milliseconds"
            )
            .buckets(
                prometheus::exponential_buckets(1.0, 2.0, 20).expect("valid latency buckets")
            ),
            registry
        )
        .expect("failed to register primary_latency_ms histogram");

        let trial_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "certcmp_trial_latency_ms",
                "Trial verification latency in milliseconds"
            )
            .buckets(
                prometheus::exponential_buckets(1.0, 2.0, 20).expect("valid latency buckets")
            ),
            registry
        )
        .expect("failed to register trial_latency_ms histogram");

        Self {
            registry,
            comparisons,
            reports,
            jobs_in_flight,
            primary_latency_ms,
            trial_latency_ms,
        }
    }

    pub fn record_classification(&self, classification: Classification) {
        self.comparisons
            .with_label_values(&[classification.as_str()])
            .inc();
    }

    /// How many comparisons finished with `classification`.
    pub fn classification_count(&self, classification: Classification) -> u64 {
        self.comparisons
            .with_label_values(&[classification.as_str()])
            .get()
    }

    pub fn observe_primary_latency(&self, latency: Duration) {
        self.primary_latency_ms.observe(latency.as_secs_f64() * 1000.0);
    }

    pub fn observe_trial_latency(&self, latency: Duration) {
        self.trial_latency_ms.observe(latency.as_secs_f64() * 1000.0);
    }

    /// Render every metric in the Prometheus text exposition format.
    pub fn encode_text(&self) -> Result<String, ComparatorError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))?)
    }
}

impl Default for ComparatorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certcmp_verification::{IgnoredReason, MismatchKind};

    #[test]
    fn classification_counters_are_labelled() {
        let m = ComparatorMetrics::new();
        m.record_classification(Classification::Equal);
        m.record_classification(Classification::Equal);
        m.record_classification(Classification::Mismatch(MismatchKind::PrimaryErrorTrialValid));
        assert_eq!(m.classification_count(Classification::Equal), 2);
        assert_eq!(
            m.classification_count(Classification::Mismatch(
                MismatchKind::PrimaryErrorTrialValid
            )),
            1
        );
        assert_eq!(
            m.classification_count(Classification::Ignored(
                IgnoredReason::ConfigurationChanged
            )),
            0
        );
    }

    #[test]
    fn encode_text_contains_metric_names() {
        let m = ComparatorMetrics::new();
        m.record_classification(Classification::Equal);
        m.observe_trial_latency(Duration::from_millis(12));
        let text = m.encode_text().unwrap();
        assert!(text.contains("certcmp_trial_comparisons_total"));
        assert!(text.contains("result=\"equal\""));
        assert!(text.contains("certcmp_trial_latency_ms_count 1"));
    }
}
