//! HTTP middleware shared by the services.

pub mod cors;
pub mod metrics;
pub mod tracing;

pub use cors::cors_layer;
pub use metrics::metrics_middleware;
pub use self::tracing::{REQUEST_ID_HEADER, http_trace_layer, request_id_middleware};
