// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight token refresh keyed by athlete.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::state::epoch_secs;
use crate::store::{TokenRecord, TokenStore};
use crate::strava::StravaClient;

/// Owns the read-refresh-write cycle for athlete credentials.
///
/// A per-athlete async mutex serializes refreshes: concurrent callers that
/// find a stale record all queue on the same lock, and whoever wins re-reads
/// the store before deciding to refresh. The losers then observe the winner's
/// result instead of issuing duplicate refresh calls. Duplicate refreshes are
/// not just wasteful: with rotation, the second one burns a refresh token the
/// first one already retired.
pub struct TokenManager {
    store: Arc<dyn TokenStore>,
    strava: Arc<StravaClient>,
    refresh_skew_secs: i64,
    locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

impl TokenManager {
    pub fn new(
        store: Arc<dyn TokenStore>,
        strava: Arc<StravaClient>,
        refresh_skew_secs: u64,
    ) -> Self {
        Self {
            store,
            strava,
            refresh_skew_secs: refresh_skew_secs as i64,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Return a currently valid token record for the athlete, refreshing
    /// transparently when the stored one is expired or inside the skew
    /// window.
    pub async fn get_valid(&self, athlete_id: i64) -> Result<TokenRecord> {
        let record = self.store.get(athlete_id)?.ok_or(Error::NotFound("token"))?;
        if self.is_fresh(&record) {
            return Ok(record);
        }

        let lock = self.subject_lock(athlete_id)?;
        let guard = lock.lock().await;

        // Re-read: another caller may have finished the refresh while this
        // one waited on the lock.
        let record = self.store.get(athlete_id)?.ok_or(Error::NotFound("token"))?;
        let result = if self.is_fresh(&record) {
            Ok(record)
        } else {
            self.refresh(athlete_id, record).await
        };

        drop(guard);
        drop(lock);
        self.prune_lock(athlete_id);
        result
    }

    /// Validate and persist a token record (initial exchange or manual seed).
    pub fn store_tokens(&self, athlete_id: i64, record: &TokenRecord) -> Result<()> {
        if record.access_token.is_empty() || record.refresh_token.is_empty() {
            return Err(Error::BadRequest(
                "access and refresh tokens must be non-empty".to_owned(),
            ));
        }
        self.store.put(athlete_id, record)
    }

    /// Remove stored credentials. Removing a missing record is fine.
    pub fn disconnect(&self, athlete_id: i64) -> Result<()> {
        self.store.delete(athlete_id)
    }

    /// Whether any credentials are stored for the athlete.
    pub fn is_connected(&self, athlete_id: i64) -> Result<bool> {
        Ok(self.store.get(athlete_id)?.is_some())
    }

    fn is_fresh(&self, record: &TokenRecord) -> bool {
        epoch_secs() < record.expires_at - self.refresh_skew_secs
    }

    /// Refresh under the per-athlete lock. Stored state is untouched unless
    /// the upstream accepted the grant.
    async fn refresh(&self, athlete_id: i64, current: TokenRecord) -> Result<TokenRecord> {
        let token = self.strava.refresh_token(&current.refresh_token).await?;

        // Rotation: a new refresh token replaces the old one for good. An
        // empty one means the grant was not rotated this time.
        let refresh_token = if token.refresh_token.is_empty() {
            current.refresh_token
        } else {
            token.refresh_token
        };

        if token.expires_at <= current.expires_at {
            tracing::warn!(
                athlete_id,
                expires_at = token.expires_at,
                previous = current.expires_at,
                "refresh did not extend expiry"
            );
        }

        let record = TokenRecord {
            athlete_id,
            access_token: token.access_token,
            refresh_token,
            expires_at: token.expires_at,
        };
        self.store.put(athlete_id, &record)?;
        tracing::info!(athlete_id, expires_at = record.expires_at, "token refreshed");
        Ok(record)
    }

    fn subject_lock(&self, athlete_id: i64) -> Result<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| lock_poisoned())?;
        Ok(Arc::clone(locks.entry(athlete_id).or_default()))
    }

    /// Drop the lock entry once nobody else holds it. Checking the strong
    /// count under the table lock is race-free: new holders need that lock.
    fn prune_lock(&self, athlete_id: i64) {
        if let Ok(mut locks) = self.locks.lock() {
            if let Some(entry) = locks.get(&athlete_id) {
                if Arc::strong_count(entry) == 1 {
                    locks.remove(&athlete_id);
                }
            }
        }
    }

    #[cfg(test)]
    fn lock_table_len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }
}

fn lock_poisoned() -> Error {
    Error::TransientIo("token lock table poisoned".to_owned())
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
