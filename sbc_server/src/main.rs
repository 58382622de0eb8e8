//! This crate serves the next Simbio waste collection dates for one address.
//!
//! The dates are read from <https://www.simbio.si/sl/moj-dan-odvoza-odpadkov> every 15 minutes.
//! `/` renders them as a page, `/api/data` returns them as JSON.

mod app;
mod error;
mod route;
mod template;

use std::sync::Arc;

use anyhow::Result;
use sbc_core::{CacheState, Refresher, Settings, UpstreamClient};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load();
    info!(address = %settings.address, "starting bin collector service");

    let cache = Arc::new(CacheState::new());
    let client = UpstreamClient::new(
        &settings.upstream_url,
        &settings.address,
        settings.request_timeout,
    )?;
    let cancel = CancellationToken::new();
    let refresher = Refresher::new(Arc::new(client), Arc::clone(&cache), cancel.clone())
        .with_retry(settings.retry)
        .with_interval(settings.refresh_interval);

    if !refresher.refresh_and_log().await {
        info!("serving empty schedule until the next successful update");
    }
    let updater = tokio::spawn(refresher.run());

    let state = AppState::new(cache, settings.template_path.clone());
    let app = app::router(state, &settings.static_dir);
    let server = axum::Server::try_bind(&settings.listen_addr)?;
    info!(addr = %settings.listen_addr, "server running");
    server
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    cancel.cancel();
    updater.await?;
    info!("bin collector service stopped");
    Ok(())
}

/// Resolve on Ctrl-C and stop the refresher.
async fn shutdown_signal(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            error!(error = %err, "failed to listen for the shutdown signal");
            std::future::pending::<()>().await;
        }
    }
    cancel.cancel();
}
