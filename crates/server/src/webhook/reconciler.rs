// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription reconciliation.
//!
//! Target state: exactly one push subscription upstream, pointed at this
//! deployment's callback URL. Upstream is the source of truth; the in-memory
//! view here is a cache that gets rebuilt by listing.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::state::epoch_ms;
use crate::strava::models::Subscription;
use crate::strava::StravaClient;

/// Process-local view of the canonical subscription.
#[derive(Debug, Default)]
struct ReconcileState {
    subscription: Option<Subscription>,
    healthy: bool,
    last_checked_ms: Option<u64>,
}

/// Snapshot returned by [`Reconciler::status`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubscriptionStatus {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked_ms: Option<u64>,
}

pub struct Reconciler {
    strava: Arc<StravaClient>,
    callback_url: String,
    verify_token: String,
    state: Mutex<ReconcileState>,
}

impl Reconciler {
    pub fn new(strava: Arc<StravaClient>, callback_url: String, verify_token: String) -> Self {
        Self { strava, callback_url, verify_token, state: Mutex::new(ReconcileState::default()) }
    }

    /// Drive upstream toward "exactly one subscription, pointed at our
    /// callback".
    ///
    /// A subscription already matching the callback URL is adopted as-is, so
    /// repeated calls are no-ops. Stale subscriptions (other callback URLs
    /// from earlier deployments) are deleted before the create. A creation
    /// race surfaces as an upstream "already exists" rejection and resolves
    /// by re-listing and adopting whatever won.
    pub async fn ensure(&self) -> Result<Subscription> {
        let mut state = self.state.lock().await;

        let subs = match self.strava.list_subscriptions().await {
            Ok(subs) => subs,
            Err(e) => {
                state.healthy = false;
                return Err(e);
            }
        };

        if let Some(sub) = subs.iter().find(|s| s.callback_url == self.callback_url) {
            tracing::info!(subscription_id = sub.id, "adopted existing subscription");
            return Ok(adopt(&mut state, sub.clone()));
        }

        for sub in &subs {
            match self.strava.delete_subscription(sub.id).await {
                Ok(()) | Err(Error::NotFound(_)) => {
                    tracing::info!(
                        subscription_id = sub.id,
                        callback_url = %sub.callback_url,
                        "deleted stale subscription"
                    );
                }
                Err(e) => {
                    state.healthy = false;
                    return Err(e);
                }
            }
        }

        match self.strava.create_subscription(&self.callback_url, &self.verify_token).await {
            Ok(sub) => {
                tracing::info!(
                    subscription_id = sub.id,
                    callback_url = %self.callback_url,
                    "created subscription"
                );
                Ok(adopt(&mut state, sub))
            }
            Err(Error::Conflict) => {
                // Lost a creation race. Whoever won owns a matching
                // subscription now, so adopt theirs.
                let subs = self.strava.list_subscriptions().await?;
                match subs.into_iter().find(|s| s.callback_url == self.callback_url) {
                    Some(sub) => {
                        tracing::info!(
                            subscription_id = sub.id,
                            "adopted subscription after create conflict"
                        );
                        Ok(adopt(&mut state, sub))
                    }
                    None => {
                        state.healthy = false;
                        Err(Error::TransientIo(
                            "create conflicted but no matching subscription listed".to_owned(),
                        ))
                    }
                }
            }
            Err(e) => {
                state.healthy = false;
                Err(e)
            }
        }
    }

    /// Confirm the canonical subscription is still present upstream. Never
    /// mutates upstream state. Returns `(healthy, last_checked_ms)`.
    pub async fn check(&self) -> (bool, Option<u64>) {
        let mut state = self.state.lock().await;
        state.last_checked_ms = Some(epoch_ms());

        let Some(canonical_id) = state.subscription.as_ref().map(|s| s.id) else {
            state.healthy = false;
            return (false, state.last_checked_ms);
        };

        match self.strava.list_subscriptions().await {
            Ok(subs) => {
                state.healthy = subs.iter().any(|s| s.id == canonical_id);
                if !state.healthy {
                    tracing::warn!(
                        subscription_id = canonical_id,
                        "canonical subscription gone upstream"
                    );
                    state.subscription = None;
                }
            }
            Err(e) => {
                // Listing failed; the subscription may well still exist, so
                // keep the id around for the next attempt.
                tracing::warn!(err = %e, "subscription health check failed");
                state.healthy = false;
            }
        }
        (state.healthy, state.last_checked_ms)
    }

    /// Delete the canonical subscription upstream. If none is tracked, the
    /// callback URL identifies it through a list. Already-gone counts as
    /// success. Returns whether anything was removed.
    pub async fn teardown(&self) -> Result<bool> {
        let mut state = self.state.lock().await;

        let canonical = match state.subscription.take() {
            Some(sub) => Some(sub),
            None => self
                .strava
                .list_subscriptions()
                .await?
                .into_iter()
                .find(|s| s.callback_url == self.callback_url),
        };

        state.healthy = false;
        state.last_checked_ms = Some(epoch_ms());

        let Some(sub) = canonical else {
            return Ok(false);
        };

        match self.strava.delete_subscription(sub.id).await {
            Ok(()) => {
                tracing::info!(subscription_id = sub.id, "subscription removed");
                Ok(true)
            }
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Current in-memory view for the status endpoint. No upstream call.
    pub async fn status(&self) -> SubscriptionStatus {
        let state = self.state.lock().await;
        SubscriptionStatus {
            active: state.healthy,
            subscription_id: state.subscription.as_ref().map(|s| s.id),
            callback_url: state.subscription.as_ref().map(|s| s.callback_url.clone()),
            last_checked_ms: state.last_checked_ms,
        }
    }
}

fn adopt(state: &mut ReconcileState, sub: Subscription) -> Subscription {
    state.healthy = true;
    state.last_checked_ms = Some(epoch_ms());
    state.subscription = Some(sub.clone());
    sub
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
