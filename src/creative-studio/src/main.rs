//! Creative Studio: retail media creative compliance service.
//!
//! Main entry point that loads the rulebook, builds the engines and starts the server.

use clap::Parser;
use creative_api::ApiServer;
use creative_compliance::ComplianceEngine;
use creative_core::config::AppConfig;
use creative_imaging::ImageOptimizer;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "creative-studio")]
#[command(about = "Retail media creative compliance, auto-fix and image optimization service")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "CREATIVE_STUDIO__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CREATIVE_STUDIO__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics exporter port (overrides config)
    #[arg(long, env = "CREATIVE_STUDIO__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Do not start the Prometheus exporter
    #[arg(long, default_value_t = false)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "creative_studio=info,creative_api=info,creative_compliance=info,creative_imaging=info,tower_http=info".into()
            }),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Creative Studio starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        banned_keywords = config.rulebook.banned_keywords.len(),
        default_max_kb = config.optimizer.default_max_kb,
        "Configuration loaded"
    );

    let compliance = Arc::new(ComplianceEngine::new(&config.rulebook));
    let optimizer = Arc::new(ImageOptimizer::new(&config.optimizer));

    let api_server = ApiServer::new(config.clone(), compliance, optimizer);

    if cli.no_metrics {
        info!("Metrics exporter disabled");
    } else if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Creative Studio is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
