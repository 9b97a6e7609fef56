//! # Captive Portal API Server
//!
//! Serves the RFC 8908 captive portal API for a gateway. Clients (or the
//! gateway on their behalf) ask `GET /captive-portal/api/{identifier}` whether
//! they are captive; operators call `POST /operation/release/` and
//! `POST /operation/holdCaptive/` to change that.
//!
//! ## Configuration
//! - YAML file (`--config`, `CAPTIVE_CONFIG_PATH`) with the portal, venue-info,
//!   `allowUnknownClients` and storage settings.
//! - `--db-url` / `DATABASE_URL` overrides the storage URL.
//! - `--port`, `--bind`, `--log-dir`, `--log-level` for the process itself.
//!   A `.env` file in the working directory is read first.

use anyhow::{Context, Result};
use clap::Parser;
use lib_captive::loggers::setup_tracing;
use lib_captive::{ClientStore, MemoryClientStore, PgClientStore, Registry, StorageBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio_graceful::Shutdown;
use tracing::{error, info, warn};

mod captive_logic;
use captive_logic::{config, routes};

const APP_NAME: &str = "server_captive";

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let args = config::ServerArgs::parse();
    let _log_guard = setup_tracing(APP_NAME, args.log_dir.as_deref(), &args.log_level)
        .context("initializing logging")?;

    let captive_config = config::load_config(&args)?;
    info!("{}", captive_config);

    let store: Arc<dyn ClientStore> = match captive_config.storage.backend {
        StorageBackend::Postgres => Arc::new(
            PgClientStore::connect(&captive_config.storage)
                .await
                .context("connecting to PostgreSQL")?,
        ),
        StorageBackend::Memory => {
            warn!("Using the in-memory client store; client state is lost on restart.");
            Arc::new(MemoryClientStore::new())
        }
    };

    let registry = Registry::new(store, Arc::new(captive_config));
    let app = routes::router(registry);

    let addr = args.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Starting HTTP server on http://{}", addr);

    let shutdown = Shutdown::default();
    shutdown.spawn_task_fn(move |guard| async move {
        let result = axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async move { guard.cancelled().await })
            .await;
        if let Err(e) = result {
            error!("HTTP server failed: {}", e);
        }
    });

    match shutdown.shutdown_with_limit(Duration::from_secs(10)).await {
        Ok(elapsed) => {
            info!(
                "shutdown: gracefully {}s after shutdown signal received",
                elapsed.as_secs_f64()
            );
        }
        Err(e) => {
            warn!("shutdown: forcefully due to timeout: {}", e);
        }
    }

    info!("Bye!");
    Ok(())
}
