//! Q&A board event indexer.
//!
//! Runs two halves on one runtime: a background task that polls Soroban
//! `getEvents` for board contract events and persists them to SQLite, and a
//! small Axum REST API serving the indexed history. Ctrl-C drains both.

mod api;
mod config;
mod db;
mod errors;
mod events;
mod indexer;
mod rpc;

use std::sync::Arc;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controls verbosity.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // A .env file is optional; real env vars win.
    let _ = dotenvy::dotenv();
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let pool = db::init_pool(&config.database_url).await?;

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let shutdown = CancellationToken::new();
    let indexer_task = tokio::spawn(indexer::run(
        Arc::new(indexer::IndexerState {
            pool: pool.clone(),
            config: config.clone(),
            client,
        }),
        shutdown.clone(),
    ));

    let app = api::router(Arc::new(api::ApiState { pool }));
    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
            shutdown.cancel();
        })
        .await?;

    indexer_task.await?;
    Ok(())
}
