use super::{dedup_by_video_id, read_catalog, VideoRecord};
use crate::error::CatalogError;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// In-memory catalog shared by all query requests.
///
/// The catalog is held as an immutable snapshot. Readers take a cheap clone of the
/// `Arc` and iterate without holding the lock; [`CatalogStore::shuffle`] and
/// [`CatalogStore::replace`] build a new vector and swap it in under the write lock,
/// so a reader sees either the old or the new order, never a mix.
#[derive(Debug)]
pub struct CatalogStore {
    snapshot: RwLock<Arc<Vec<VideoRecord>>>,
    source: Option<PathBuf>,
}

/// Timing diagnostics of a shuffle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleReport {
    pub catalog_size: usize,
    pub elapsed_ms: f64,
}

/// Catalog size and per-category record counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_videos: usize,
    pub categories: BTreeMap<String, usize>,
}

impl CatalogStore {
    pub fn new(records: Vec<VideoRecord>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(dedup_by_video_id(records))),
            source: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Load the enriched catalog from disk.
    ///
    /// A missing or malformed file is logged and yields an empty store; the service
    /// still starts and every search returns no results.
    pub async fn load(path: &Path) -> Self {
        let records = match read_catalog(path).await {
            Ok(records) => {
                info!("✅ Loaded {} videos from {}", records.len(), path.display());
                records
            }
            Err(e) => {
                warn!("Starting with an empty catalog: {}", e);
                Vec::new()
            }
        };

        Self {
            snapshot: RwLock::new(Arc::new(dedup_by_video_id(records))),
            source: Some(path.to_path_buf()),
        }
    }

    /// Current catalog snapshot.
    pub async fn snapshot(&self) -> Arc<Vec<VideoRecord>> {
        self.snapshot.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.snapshot.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Replace the whole catalog, returning the size of the installed snapshot.
    pub async fn replace(&self, records: Vec<VideoRecord>) -> usize {
        let records = Arc::new(dedup_by_video_id(records));
        let count = records.len();
        *self.snapshot.write().await = records;
        count
    }

    /// Re-read the file this store was loaded from.
    ///
    /// On failure the current catalog is kept and the error returned.
    pub async fn reload(&self) -> Result<usize, CatalogError> {
        let Some(path) = &self.source else {
            return Ok(self.len().await);
        };

        let records = read_catalog(path).await?;
        let count = self.replace(records).await;
        info!("🔄 Reloaded {} videos from {}", count, path.display());
        Ok(count)
    }

    /// Reorder the catalog with a full shuffle. Content and cardinality are unchanged.
    pub async fn shuffle(&self) -> ShuffleReport {
        let start = Instant::now();

        let mut guard = self.snapshot.write().await;
        let mut records = guard.as_ref().clone();
        records.shuffle(&mut rand::thread_rng());
        let catalog_size = records.len();
        *guard = Arc::new(records);
        drop(guard);

        ShuffleReport {
            catalog_size,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }

    pub async fn stats(&self) -> CatalogStats {
        let snapshot = self.snapshot().await;
        let mut categories = BTreeMap::new();
        for record in snapshot.iter() {
            *categories.entry(record.category.to_string()).or_insert(0) += 1;
        }

        CatalogStats {
            total_videos: snapshot.len(),
            categories,
        }
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::empty()
    }
}
