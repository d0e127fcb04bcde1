//! Prometheus metrics for billing-service.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, CounterVec, TextEncoder};

/// Invoice counter by invoice type and status transition.
pub static INVOICES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "billing_invoices_total",
        "Total number of invoices by type and status",
        &["invoice_type", "status"] // pending, paid, cancelled
    )
    .expect("Failed to register invoices_total")
});

/// Billed amount counter by currency.
pub static INVOICE_AMOUNT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "billing_invoice_amount_total",
        "Total final invoice amount by currency",
        &["currency"]
    )
    .expect("Failed to register invoice_amount_total")
});

/// Amount covered by schemes, by scheme code.
pub static SCHEME_AMOUNT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "billing_scheme_amount_total",
        "Total amount covered by government or insurance schemes",
        &["scheme"]
    )
    .expect("Failed to register scheme_amount_total")
});

/// Preview calculations by tax basis.
pub static PREVIEWS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "billing_previews_total",
        "Total number of invoice total previews",
        &["tax_basis"]
    )
    .expect("Failed to register previews_total")
});

/// Rejected requests by domain error kind.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "billing_errors_total",
        "Total number of billing errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&INVOICES_TOTAL);
    Lazy::force(&INVOICE_AMOUNT_TOTAL);
    Lazy::force(&SCHEME_AMOUNT_TOTAL);
    Lazy::force(&PREVIEWS_TOTAL);
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
