//! Application startup and lifecycle management.
//!
//! The HTTP server and the ICU refresh task share one `CancellationToken`:
//! when the server stops, the refresher is cancelled and awaited.

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
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::ClinicalConfig;
use crate::handlers::{health, icu, lab};
use crate::services::{IcuMonitor, LabCatalog};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ClinicalConfig,
    pub lab: Arc<LabCatalog>,
    pub icu: IcuMonitor,
}

impl AppState {
    pub fn new(config: ClinicalConfig) -> Self {
        let icu = IcuMonitor::seeded(config.icu.rng_seed);
        Self {
            config,
            lab: Arc::new(LabCatalog::seeded()),
            icu,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/lab/parameters", get(lab::search_parameters))
        .route("/lab/results/evaluate", post(lab::evaluate_results))
        .route("/icu/beds", get(icu::list_beds))
        .route("/icu/beds/:bed_id", get(icu::get_bed));

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
    monitor: IcuMonitor,
    refresh_interval: Duration,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ClinicalConfig) -> Result<Self, AppError> {
        let refresh_interval = Duration::from_millis(config.icu.refresh_interval_ms);
        tracing::info!(
            refresh_interval_ms = config.icu.refresh_interval_ms,
            seeded = config.icu.rng_seed.is_some(),
            "Initializing clinical service"
        );

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState::new(config);
        let monitor = state.icu.clone();
        let router = build_router(state);

        tracing::info!("Clinical service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
            monitor,
            refresh_interval,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_graceful_shutdown(std::future::pending()).await
    }

    /// Serve until `signal` resolves, then stop the ICU refresher.
    pub async fn run_with_graceful_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown = CancellationToken::new();
        let refresher = self.monitor.spawn(self.refresh_interval, shutdown.clone());

        let result = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await;

        shutdown.cancel();
        if let Err(e) = refresher.await {
            tracing::error!("ICU monitor task failed: {}", e);
        }

        result
    }
}
