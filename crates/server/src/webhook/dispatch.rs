// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound event dispatch: acknowledge fast, process in the background.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::Error;
use crate::rename;
use crate::state::AppState;
use crate::strava::models::WebhookEvent;

/// Queue capacity. Strava retries undelivered events, so bounded-and-drop
/// beats unbounded growth when the worker falls behind.
pub const QUEUE_CAPACITY: usize = 64;

/// A webhook event accepted for background processing.
#[derive(Debug)]
pub struct QueuedEvent {
    /// Delivery id for log correlation.
    pub id: String,
    pub event: WebhookEvent,
}

impl QueuedEvent {
    pub fn new(event: WebhookEvent) -> Self {
        Self { id: uuid::Uuid::new_v4().to_string(), event }
    }
}

/// Whether an event is one the renamer acts on.
pub fn wants(event: &WebhookEvent) -> bool {
    event.object_type == "activity" && event.aspect_type == "create"
}

/// Spawn the single background worker that consumes queued events.
pub fn spawn_event_worker(state: Arc<AppState>, mut event_rx: mpsc::Receiver<QueuedEvent>) {
    tokio::spawn(async move {
        loop {
            let queued = tokio::select! {
                _ = state.shutdown.cancelled() => break,
                item = event_rx.recv() => match item {
                    Some(queued) => queued,
                    None => break,
                },
            };
            process(&state, queued).await;
        }
        tracing::debug!("event worker stopped");
    });
}

/// Process one event. Failures are logged and swallowed: Strava already got
/// its 200 and will not redeliver, so there is nobody left to report to.
async fn process(state: &AppState, queued: QueuedEvent) {
    let event = &queued.event;
    let token = match state.tokens.get_valid(event.owner_id).await {
        Ok(record) => record,
        Err(Error::NotFound(_)) => {
            tracing::debug!(
                delivery = %queued.id,
                owner_id = event.owner_id,
                "no credentials for event owner"
            );
            return;
        }
        Err(Error::AuthRevoked) => {
            // Terminal: drop the dead grant so status reads as disconnected
            // until the athlete re-authenticates.
            if let Err(e) = state.tokens.disconnect(event.owner_id) {
                tracing::warn!(
                    owner_id = event.owner_id,
                    err = %e,
                    "failed to clear revoked credentials"
                );
            }
            tracing::warn!(
                delivery = %queued.id,
                owner_id = event.owner_id,
                "grant revoked, credentials cleared"
            );
            return;
        }
        Err(e) => {
            tracing::warn!(
                delivery = %queued.id,
                owner_id = event.owner_id,
                err = %e,
                "token lookup failed"
            );
            return;
        }
    };

    match rename::rename_activity(&state.strava, &token.access_token, event.object_id).await {
        Ok(Some(name)) => {
            tracing::info!(
                delivery = %queued.id,
                activity_id = event.object_id,
                name,
                "renamed new activity"
            );
        }
        Ok(None) => {
            tracing::debug!(
                delivery = %queued.id,
                activity_id = event.object_id,
                "activity kept its custom title"
            );
        }
        Err(e) => {
            tracing::warn!(
                delivery = %queued.id,
                activity_id = event.object_id,
                err = %e,
                "rename failed"
            );
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
