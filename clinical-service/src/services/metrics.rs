//! Prometheus metrics for clinical-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_int_counter, register_int_gauge_vec, CounterVec, IntCounter,
    IntGaugeVec, TextEncoder,
};

/// Evaluated lab results by flag.
pub static LAB_FLAGS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "clinical_lab_flags_total",
        "Total number of evaluated lab results by flag",
        &["flag"]
    )
    .expect("Failed to register lab_flags_total")
});

pub static ICU_TICKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "clinical_icu_ticks_total",
        "Total number of ICU vitals refresh ticks"
    )
    .expect("Failed to register icu_ticks_total")
});

/// Current number of ICU beds in each status.
pub static ICU_BEDS: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!(
        "clinical_icu_beds",
        "Number of monitored ICU beds by status",
        &["status"] // stable, warning, critical
    )
    .expect("Failed to register icu_beds")
});

/// Rejected requests by domain error kind.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "clinical_errors_total",
        "Total number of clinical errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&LAB_FLAGS_TOTAL);
    Lazy::force(&ICU_TICKS_TOTAL);
    Lazy::force(&ICU_BEDS);
    Lazy::force(&ERRORS_TOTAL);
    Lazy::force(&service_core::middleware::metrics::HTTP_REQUESTS_TOTAL);
    Lazy::force(&service_core::middleware::metrics::HTTP_REQUEST_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
