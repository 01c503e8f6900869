// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory token store for tests and throwaway deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::store::{TokenRecord, TokenStore};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<i64, TokenRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> Error {
    Error::TransientIo("token store lock poisoned".to_owned())
}

impl TokenStore for MemoryStore {
    fn get(&self, athlete_id: i64) -> Result<Option<TokenRecord>> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(&athlete_id).cloned())
    }

    fn put(&self, athlete_id: i64, record: &TokenRecord) -> Result<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.insert(athlete_id, record.clone());
        Ok(())
    }

    fn delete(&self, athlete_id: i64) -> Result<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.remove(&athlete_id);
        Ok(())
    }
}
