//! Application startup and lifecycle management.

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    cors_layer, http_trace_layer, metrics_middleware, request_id_middleware,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::BillingConfig;
use crate::handlers::{catalog, health, invoices, patients, schemes};
use crate::services::{BillingService, Directory, InvoiceCalculator, InvoiceStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: BillingConfig,
    pub billing: Arc<BillingService>,
}

impl AppState {
    pub fn new(config: BillingConfig) -> Self {
        let settings = &config.billing;
        let store = InvoiceStore::new(&settings.invoice_prefix, &settings.currency);
        let billing = BillingService::new(
            Arc::new(Directory::seeded()),
            store,
            InvoiceCalculator::new(settings.tax_basis),
            &settings.currency,
        );

        Self {
            config,
            billing: Arc::new(billing),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/patients", get(patients::search_patients))
        .route("/patients/:id", get(patients::get_patient))
        .route("/catalog/items", get(catalog::search_catalog))
        .route("/schemes", get(schemes::list_schemes))
        .route("/invoices/preview", post(invoices::preview_invoice))
        .route(
            "/invoices",
            post(invoices::create_invoice).get(invoices::list_invoices),
        )
        .route("/invoices/:id", get(invoices::get_invoice))
        .route("/invoices/:id/pay", post(invoices::pay_invoice))
        .route("/invoices/:id/cancel", post(invoices::cancel_invoice));

    let cors = cors_layer(&state.config.common.allowed_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_endpoint))
        .nest("/api", api)
        .layer(from_fn(metrics_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: BillingConfig) -> Result<Self, AppError> {
        tracing::info!(
            tax_basis = %config.billing.tax_basis,
            currency = %config.billing.currency,
            "Initializing billing service"
        );

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(AppState::new(config));

        tracing::info!("Billing service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn run_with_graceful_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}
