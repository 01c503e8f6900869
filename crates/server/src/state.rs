// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared service state.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::store::TokenStore;
use crate::strava::StravaClient;
use crate::tokens::TokenManager;
use crate::webhook::dispatch::{QueuedEvent, QUEUE_CAPACITY};
use crate::webhook::reconciler::Reconciler;

pub struct AppState {
    pub config: Config,
    pub strava: Arc<StravaClient>,
    pub tokens: TokenManager,
    pub reconciler: Reconciler,
    /// Sender half of the event queue. The dispatch worker owns the receiver.
    pub events: mpsc::Sender<QueuedEvent>,
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Build state plus the receiver half of the event queue, which the
    /// caller hands to [`crate::webhook::dispatch::spawn_event_worker`].
    pub fn new(
        config: Config,
        store: Arc<dyn TokenStore>,
        shutdown: CancellationToken,
    ) -> (Self, mpsc::Receiver<QueuedEvent>) {
        let strava = Arc::new(StravaClient::new(
            config.upstream_base.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
            config.http_timeout(),
        ));
        let tokens =
            TokenManager::new(Arc::clone(&store), Arc::clone(&strava), config.refresh_skew_secs);
        let reconciler = Reconciler::new(
            Arc::clone(&strava),
            config.callback_url(),
            config.verify_token.clone(),
        );
        let (events, event_rx) = mpsc::channel(QUEUE_CAPACITY);
        (Self { config, strava, tokens, reconciler, events, shutdown }, event_rx)
    }
}

/// Current time as milliseconds since the Unix epoch.
pub fn epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Current time as seconds since the Unix epoch.
pub fn epoch_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
