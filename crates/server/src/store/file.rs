// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed token store: one JSON file per athlete, written atomically.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::store::{TokenRecord, TokenStore};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, athlete_id: i64) -> PathBuf {
        self.dir.join(format!("{athlete_id}.json"))
    }
}

impl TokenStore for FileStore {
    fn get(&self, athlete_id: i64) -> Result<Option<TokenRecord>> {
        let path = self.path_for(athlete_id);
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = serde_json::from_str(&contents)?;
        Ok(Some(record))
    }

    fn put(&self, athlete_id: i64, record: &TokenRecord) -> Result<()> {
        save_atomic(&self.path_for(athlete_id), record)
    }

    fn delete(&self, athlete_id: i64) -> Result<()> {
        match std::fs::remove_file(self.path_for(athlete_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write a record to a temp file, then rename into place.
///
/// The temp name includes the PID and a process-wide counter so concurrent
/// saves cannot clobber each other's half-written file.
fn save_atomic(path: &Path, record: &TokenRecord) -> Result<()> {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let json = serde_json::to_string_pretty(record)?;
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        "{}.{}.{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id(),
        seq,
    );
    let tmp_path = path.with_file_name(tmp_name);
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
