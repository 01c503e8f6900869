// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic subscription self-healing.

use std::sync::Arc;
use std::time::Duration;

use crate::state::AppState;

/// Spawn the background reconcile loop.
///
/// One task that never overlaps itself: missed ticks are skipped rather than
/// bursted. The first tick fires immediately, which doubles as the startup
/// subscribe. Stops when the shutdown token fires.
pub fn spawn_reconcile_worker(state: Arc<AppState>, interval: Duration) {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = state.shutdown.cancelled() => break,
                _ = timer.tick() => {}
            }

            let (healthy, _) = state.reconciler.check().await;
            if healthy {
                tracing::debug!("subscription healthy");
                continue;
            }

            match state.reconciler.ensure().await {
                Ok(sub) => {
                    tracing::info!(subscription_id = sub.id, "subscription reconciled");
                }
                Err(e) => {
                    // Leave it to the next tick; transient upstream failures
                    // are common enough that crashing is worse than waiting.
                    tracing::warn!(err = %e, "subscription reconcile failed");
                }
            }
        }
        tracing::debug!("reconcile worker stopped");
    });
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
