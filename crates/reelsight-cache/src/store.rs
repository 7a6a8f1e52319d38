//! Two-tier analysis cache keyed by source URL.
//!
//! Results are held in memory for the fast path and persisted as
//! gzip-compressed JSON records on disk so restarts keep warm entries.
//! The cache is injectable state (held behind an `Arc` in application
//! state), not a process-wide singleton, so tests can use their own
//! directories and concurrent requests share one coherent view.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{CacheError, CacheResult};

/// Default entry lifetime (1 hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// On-disk cache record.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    url: String,
    timestamp: i64,
    data: serde_json::Value,
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    data: serde_json::Value,
    timestamp: i64,
}

/// URL-keyed analysis cache with memory and file tiers.
pub struct AnalysisCache {
    dir: PathBuf,
    ttl: Duration,
    memory: RwLock<HashMap<String, MemoryEntry>>,
}

impl AnalysisCache {
    /// Open (creating if needed) a cache rooted at `dir`.
    pub async fn open(dir: impl AsRef<Path>, ttl: Duration) -> CacheResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            ttl,
            memory: RwLock::new(HashMap::new()),
        })
    }

    /// Generate a stable cache key from a source URL.
    pub fn cache_key(url: &str) -> String {
        let digest = Sha256::digest(url.trim().as_bytes());
        format!("{:x}", digest)
    }

    /// Fetch a cached value for a URL.
    ///
    /// Returns `None` on a miss, an expired entry, or any read/parse
    /// failure; corrupt entries are removed.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let key = Self::cache_key(url);
        let now = Utc::now().timestamp();

        // Memory tier; expired entries are dropped so the map does not
        // grow without bound across distinct URLs
        let mut expired_in_memory = false;
        {
            let memory = self.memory.read().await;
            if let Some(entry) = memory.get(&key) {
                if self.is_fresh(entry.timestamp, now) {
                    debug!(url = %url, "Cache hit (memory)");
                    return serde_json::from_value(entry.data.clone()).ok();
                }
                expired_in_memory = true;
            }
        }
        if expired_in_memory {
            let mut memory = self.memory.write().await;
            if memory
                .get(&key)
                .is_some_and(|entry| !self.is_fresh(entry.timestamp, now))
            {
                memory.remove(&key);
            }
        }

        // File tier; repopulate memory on hit
        let record = self.read_record(&key).await?;
        if !self.is_fresh(record.timestamp, now) {
            let _ = tokio::fs::remove_file(self.entry_path(&key)).await;
            return None;
        }

        let mut memory = self.memory.write().await;
        memory.insert(
            key,
            MemoryEntry {
                data: record.data.clone(),
                timestamp: record.timestamp,
            },
        );
        debug!(url = %url, "Cache hit (file)");
        serde_json::from_value(record.data).ok()
    }

    /// Store a value for a URL in both tiers.
    pub async fn set<T: Serialize>(&self, url: &str, value: &T) -> CacheResult<()> {
        let key = Self::cache_key(url);
        let timestamp = Utc::now().timestamp();
        let data = serde_json::to_value(value)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        {
            let mut memory = self.memory.write().await;
            memory.insert(
                key.clone(),
                MemoryEntry {
                    data: data.clone(),
                    timestamp,
                },
            );
        }

        let record = CacheRecord {
            url: url.to_string(),
            timestamp,
            data,
        };
        let compressed = compress_record(&record)?;
        tokio::fs::write(self.entry_path(&key), compressed).await?;

        debug!(url = %url, "Cache set");
        Ok(())
    }

    /// Remove any cached value for a URL.
    pub async fn invalidate(&self, url: &str) {
        let key = Self::cache_key(url);
        self.memory.write().await.remove(&key);
        let _ = tokio::fs::remove_file(self.entry_path(&key)).await;
    }

    /// Delete all expired entries from both tiers; returns how many file
    /// entries were removed.
    pub async fn clear_expired(&self) -> CacheResult<usize> {
        let now = Utc::now().timestamp();
        let mut removed = 0;

        self.memory
            .write()
            .await
            .retain(|_, entry| self.is_fresh(entry.timestamp, now));

        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map_or(true, |e| e != "gz") {
                continue;
            }
            let stale = match tokio::fs::read(&path).await {
                Ok(bytes) => match decompress_record(&bytes) {
                    Some(record) => !self.is_fresh(record.timestamp, now),
                    None => true,
                },
                Err(_) => true,
            };
            if stale && tokio::fs::remove_file(&path).await.is_ok() {
                removed += 1;
            }
        }

        Ok(removed)
    }

    fn is_fresh(&self, stored_at: i64, now: i64) -> bool {
        now.saturating_sub(stored_at) < self.ttl.as_secs() as i64
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json.gz"))
    }

    async fn read_record(&self, key: &str) -> Option<CacheRecord> {
        let path = self.entry_path(key);
        let bytes = tokio::fs::read(&path).await.ok()?;
        let record = decompress_record(&bytes);
        if record.is_none() {
            warn!(path = %path.display(), "Removing corrupt cache entry");
            let _ = tokio::fs::remove_file(&path).await;
        }
        record
    }
}

/// Compress a record to gzip JSON bytes.
fn compress_record(record: &CacheRecord) -> CacheResult<Vec<u8>> {
    let json = serde_json::to_vec(record)
        .map_err(|e| CacheError::Serialization(e.to_string()))?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|e| CacheError::Serialization(format!("Failed to gzip record: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| CacheError::Serialization(format!("Failed to finish gzip encoding: {}", e)))
}

/// Decompress gzip bytes to a record. `None` means cache miss.
fn decompress_record(bytes: &[u8]) -> Option<CacheRecord> {
    let mut decoder = GzDecoder::new(bytes);
    let mut json = Vec::new();
    decoder.read_to_end(&mut json).ok()?;
    serde_json::from_slice(&json).ok()
}
