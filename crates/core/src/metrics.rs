//! Prometheus metrics for the catalog loaders.
//!
//! This module provides metrics for:
//! - Remote loading (outcomes, latency)
//! - Local cache (loads, saves, validations)
//!
//! Nothing is registered here; the embedding application registers
//! [`all_metrics`] with its own registry.

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts};

// =============================================================================
// Remote Loading Metrics
// =============================================================================

/// Remote catalog loads by result.
pub static REMOTE_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("catalog_remote_loads_total", "Total remote catalog loads"),
        &["result"], // "success", "connectivity", "invalid_data"
    )
    .unwrap()
});

/// Remote catalog load duration in seconds.
pub static REMOTE_LOAD_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "catalog_remote_load_duration_seconds",
            "Duration of remote catalog loads",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .unwrap()
});

// =============================================================================
// Local Cache Metrics
// =============================================================================

/// Cache loads by result.
pub static CACHE_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("catalog_cache_loads_total", "Total catalog cache loads"),
        &["result"], // "hit", "miss", "expired", "error"
    )
    .unwrap()
});

/// Cache saves by result.
pub static CACHE_SAVES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("catalog_cache_saves_total", "Total catalog cache saves"),
        &["result"], // "success", "delete_error", "insert_error"
    )
    .unwrap()
});

/// Cache validations by action taken.
pub static CACHE_VALIDATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "catalog_cache_validations_total",
            "Total catalog cache validations",
        ),
        &["action"], // "empty", "kept", "expired", "unreadable"
    )
    .unwrap()
});

/// Get all metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Remote
        Box::new(REMOTE_LOADS.clone()),
        Box::new(REMOTE_LOAD_DURATION.clone()),
        // Cache
        Box::new(CACHE_LOADS.clone()),
        Box::new(CACHE_SAVES.clone()),
        Box::new(CACHE_VALIDATIONS.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }

        CACHE_LOADS.with_label_values(&["hit"]).inc();

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"catalog_cache_loads_total".to_string()));
    }
}
