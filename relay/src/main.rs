//! carstate relay
//!
//! Subscribes to a TeslaMate MQTT broker and serves the latest value of every
//! whitelisted field per car over HTTP.
//!
//! Usage:
//!   MQTT_HOST=mosquitto carstate-relay --http-port 3000
//!
//! Snapshots live in memory only and are rebuilt from the live stream after
//! a restart.

use anyhow::{Context, Result};
use carstate_ingest::IngestionPipeline;
use carstate_relay::{Args, RelayConfig, StreamSubscriber, build_router};
use carstate_store::SnapshotStore;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("carstate relay starting...");
    let config = RelayConfig::from_args(args);
    if !config.access_mode().is_authenticated() {
        info!("Running without API_KEY, limiting the exposed data.");
    }

    let store = Arc::new(SnapshotStore::new());
    let pipeline = Arc::new(IngestionPipeline::new(config.pipeline_config(), store.clone()));

    info!("Connecting with clientID {}", config.broker.client_id);
    let mut stream = StreamSubscriber::new(&config.broker, pipeline);
    stream
        .connect()
        .await
        .context("Failed to connect to MQTT broker")?;

    let app = build_router(store, config.api_key.as_deref());
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", config.http_port))?;
    info!("HTTP API listening on port {}", config.http_port);
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutting down"),
            Err(e) => {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        result = server => {
            result.context("HTTP server task panicked")?.context("HTTP server failed")?;
        }
        result = stream.run(shutdown) => {
            result.context("Failed to disconnect from MQTT broker")?;
        }
    }
    Ok(())
}
