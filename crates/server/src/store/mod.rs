// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token persistence behind a narrow key-value contract.

pub mod file;
pub mod memory;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;

/// Stored OAuth credentials for one athlete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub athlete_id: i64,
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry as epoch seconds.
    pub expires_at: i64,
}

/// Durable mapping from athlete id to token record.
///
/// Implementations must be safe for concurrent use and must make each `put`
/// atomic from a reader's point of view: no partially written record is ever
/// visible.
pub trait TokenStore: Send + Sync {
    fn get(&self, athlete_id: i64) -> Result<Option<TokenRecord>>;
    fn put(&self, athlete_id: i64, record: &TokenRecord) -> Result<()>;
    fn delete(&self, athlete_id: i64) -> Result<()>;
}

/// Open the configured store backend.
pub fn open_store(config: &Config) -> Result<Arc<dyn TokenStore>> {
    match config.store.as_str() {
        "memory" => Ok(Arc::new(memory::MemoryStore::new())),
        _ => Ok(Arc::new(file::FileStore::open(config.state_dir().join("tokens"))?)),
    }
}
