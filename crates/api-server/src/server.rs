//! API server: HTTP REST endpoints and the Prometheus metrics exporter.

use crate::optimize_rest;
use crate::rest::{self, AppState};
use crate::swagger::ApiDoc;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use creative_compliance::ComplianceEngine;
use creative_core::config::AppConfig;
use creative_imaging::ImageOptimizer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the application router.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        // Compliance endpoints
        .route("/v1/analyze", post(rest::handle_analyze))
        .route("/v1/fix", post(rest::handle_fix))
        .route("/v1/optimize", post(optimize_rest::handle_optimize))
        // Operational endpoints
        .route("/", get(rest::root))
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main API server.
pub struct ApiServer {
    config: AppConfig,
    compliance: Arc<ComplianceEngine>,
    optimizer: Arc<ImageOptimizer>,
}

impl ApiServer {
    pub fn new(
        config: AppConfig,
        compliance: Arc<ComplianceEngine>,
        optimizer: Arc<ImageOptimizer>,
    ) -> Self {
        Self {
            config,
            compliance,
            optimizer,
        }
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let state = AppState {
            compliance: self.compliance.clone(),
            optimizer: self.optimizer.clone(),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
        };

        let app = router(state, self.config.api.max_body_bytes);

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
