// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Audio Storage Module
//!
//! Keeps the most recent clip at `<static_dir>/output.mp3` for clients that
//! fetch `/get_audio`, plus a bounded in-memory cache of recent clips keyed
//! by id so a client can fetch exactly the audio produced by its own request.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use lru::LruCache;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// File name of the latest clip inside the static directory
pub const AUDIO_FILE_NAME: &str = "output.mp3";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Audio not found: {0}")]
    NotFound(String),

    #[error("Audio storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A published clip
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub id: Uuid,
    pub bytes: Bytes,
}

/// Statistics about audio storage
#[derive(Debug, Clone, Default)]
pub struct AudioStoreStats {
    pub published: u64,
    pub cached: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Latest-clip file plus LRU cache of recent clips
#[derive(Clone)]
pub struct AudioStore {
    static_dir: PathBuf,
    clips: Arc<Mutex<LruCache<Uuid, Bytes>>>,
    stats: Arc<Mutex<AudioStoreStats>>,
}

impl AudioStore {
    /// Create a store rooted at `static_dir` caching up to `capacity` clips
    pub fn new(static_dir: impl Into<PathBuf>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            static_dir: static_dir.into(),
            clips: Arc::new(Mutex::new(LruCache::new(capacity))),
            stats: Arc::new(Mutex::new(AudioStoreStats::default())),
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Path of the latest clip
    pub fn latest_path(&self) -> PathBuf {
        self.static_dir.join(AUDIO_FILE_NAME)
    }

    /// Create the static directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.static_dir).await?;
        debug!("Static directory ready: {}", self.static_dir.display());
        Ok(())
    }

    /// Store a new clip and make it the latest one
    ///
    /// The file is written under a temporary name and renamed into place,
    /// so readers of `output.mp3` never see a partial clip.
    pub async fn publish(&self, bytes: Vec<u8>) -> Result<AudioClip, StoreError> {
        let id = Uuid::new_v4();
        let bytes = Bytes::from(bytes);

        let tmp_path = self.static_dir.join(format!(".{}.mp3.tmp", id));
        if let Err(e) = write_then_rename(&tmp_path, &self.latest_path(), &bytes).await {
            warn!("Failed to publish audio {}: {}", id, e);
            return Err(e.into());
        }

        let cached = {
            let mut clips = self.clips.lock().await;
            clips.put(id, bytes.clone());
            clips.len()
        };

        let mut stats = self.stats.lock().await;
        stats.published += 1;
        stats.cached = cached;

        info!("🔊 Audio {} published ({} bytes)", id, bytes.len());
        Ok(AudioClip { id, bytes })
    }

    /// Read the latest clip from disk
    pub async fn latest(&self) -> Result<Bytes, StoreError> {
        match tokio::fs::read(self.latest_path()).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(AUDIO_FILE_NAME.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a cached clip by id
    pub async fn get(&self, id: &Uuid) -> Result<Bytes, StoreError> {
        let found = self.clips.lock().await.get(id).cloned();

        let mut stats = self.stats.lock().await;
        match found {
            Some(bytes) => {
                stats.hits += 1;
                Ok(bytes)
            }
            None => {
                stats.misses += 1;
                Err(StoreError::NotFound(id.to_string()))
            }
        }
    }

    pub async fn stats(&self) -> AudioStoreStats {
        self.stats.lock().await.clone()
    }
}

/// Write `bytes` beside `target` and move them into place, leaving no
/// scratch file behind on failure
async fn write_then_rename(tmp_path: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let result = match tokio::fs::write(tmp_path, bytes).await {
        Ok(()) => tokio::fs::rename(tmp_path, target).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(tmp_path).await;
    }
    result
}
