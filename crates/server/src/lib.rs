// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sprocket renames freshly uploaded Strava activities.
//!
//! It keeps per-athlete OAuth tokens valid (single-flight refresh with
//! rotation), keeps exactly one webhook push subscription registered against
//! this deployment, and swaps Strava's auto-generated activity titles for
//! something with more personality.

pub mod config;
pub mod error;
pub mod rename;
pub mod state;
pub mod store;
pub mod strava;
pub mod tokens;
pub mod transport;
pub mod webhook;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::state::AppState;
use crate::transport::build_router;
use crate::webhook::dispatch::spawn_event_worker;
use crate::webhook::worker::spawn_reconcile_worker;

/// Run the server until shutdown.
pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    let store = store::open_store(&config)?;
    let check_interval = config.check_interval();
    let (state, event_rx) = AppState::new(config, store, shutdown.clone());
    let state = Arc::new(state);

    spawn_event_worker(Arc::clone(&state), event_rx);

    if check_interval.is_zero() {
        tracing::info!("subscription reconcile worker disabled");
    } else {
        spawn_reconcile_worker(Arc::clone(&state), check_interval);
    }

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
                shutdown.cancel();
            }
        });
    }

    tracing::info!(
        addr = %addr,
        callback_url = %state.config.callback_url(),
        store = %state.config.store,
        "sprocket listening"
    );
    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    Ok(())
}
