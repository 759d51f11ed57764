//! Campaign funding service, entry point.
//!
//! Serves the campaign ledger over an Axum REST API backed by SQLite. In
//! simulation mode a background task settles pending contributions after a
//! fixed delay.

mod address;
mod api;
mod config;
mod db;
mod errors;
mod models;
mod seed;
mod settler;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use settler::SettlerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controls verbosity.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Optional .env file.
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let pool = db::init_pool(&config.database_url).await?;

    if config.seed_demo_campaigns {
        seed::seed_demo_campaigns(&pool).await?;
    }

    let shutdown = CancellationToken::new();

    // ─── Settlement simulator ─────────────────────────────
    let settler = if config.simulate_settlement {
        let state = Arc::new(SettlerState {
            pool: pool.clone(),
            config: config.clone(),
        });
        Some(tokio::spawn(settler::run(state, shutdown.clone())))
    } else {
        None
    };

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(api::ApiState {
        pool: pool.clone(),
        percent_precision: config.percent_precision,
    });

    let app = api::router(api_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Some(handle) = settler {
        let _ = handle.await;
    }
    pool.close().await;

    Ok(())
}
