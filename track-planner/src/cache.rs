//! Caching layer for planned schedules.
//!
//! Results are kept in memory and, optionally, as JSON files on disk so
//! that they survive restarts. The timetable is fixed for the life of the
//! process, so entries never expire; capacity alone bounds the memory tier.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use moka::future::Cache as MokaCache;
use tracing::{debug, info, warn};

use crate::domain::{ClockTime, QueryResult};
use crate::planner::Query;

/// Suffix of on-disk cache files.
const FILE_SUFFIX: &str = "-schedule.json";

/// Cache key: the station pair in sorted order, which way it is travelled
/// and the optional target time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    first: String,
    second: String,
    reversed: bool,
    depart_after: Option<ClockTime>,
}

impl CacheKey {
    pub fn new(query: &Query) -> Self {
        let reversed = query.destination < query.origin;
        let (first, second) = if reversed {
            (query.destination.clone(), query.origin.clone())
        } else {
            (query.origin.clone(), query.destination.clone())
        };
        Self {
            first,
            second,
            reversed,
            depart_after: query.depart_after,
        }
    }

    /// Stable string form, safe to use as a file name.
    ///
    /// `a__b` for the pair, `~rev` when travelling from the later name to
    /// the earlier, `@HHMM` when a target time is set. Names are escaped,
    /// so the separators never occur inside them.
    pub fn as_file_stem(&self) -> String {
        let mut stem = format!("{}__{}", sanitize(&self.first), sanitize(&self.second));
        if self.reversed {
            stem.push_str("~rev");
        }
        if let Some(t) = self.depart_after {
            stem.push_str(&format!("@{:02}{:02}", t.hour(), t.minute()));
        }
        stem
    }
}

/// Percent-escape characters that are unsafe in file names or that the
/// stem uses as separators, so distinct names give distinct stems.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let escape = matches!(
            c,
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '~' | '@' | '_' | '%' | '.'
        ) || c.is_whitespace()
            || c.is_control();
        if escape {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{b:02X}"));
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Errors reading or writing on-disk cache entries.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid cache entry {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("schedule computation failed: {message}")]
    Compute { message: String },
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of in-memory entries.
    pub max_capacity: u64,

    /// Directory for persisted entries; `None` keeps the cache in memory
    /// only.
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1000,
            dir: None,
        }
    }
}

/// Schedule cache: memory, then disk, then compute.
pub struct ScheduleCache {
    entries: MokaCache<CacheKey, Arc<QueryResult>>,
    dir: Option<PathBuf>,
}

impl ScheduleCache {
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .build();

        Self {
            entries,
            dir: config.dir.clone(),
        }
    }

    /// Where the entry for `key` lives on disk, if persistence is enabled.
    pub fn file_path(&self, key: &CacheKey) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}{FILE_SUFFIX}", key.as_file_stem())))
    }

    /// Get the result for `query`, computing it with `compute` on a miss.
    ///
    /// `compute` runs on the blocking thread pool. Concurrent callers with
    /// the same key wait for a single computation; a failed computation is
    /// not cached. Disk problems are logged and never fail the lookup.
    pub async fn get_or_compute<F>(
        &self,
        query: &Query,
        compute: F,
    ) -> Result<Arc<QueryResult>, Arc<CacheError>>
    where
        F: FnOnce(&Query) -> QueryResult + Send + 'static,
    {
        let key = CacheKey::new(query);
        let path = self.file_path(&key);
        let owned = query.clone();

        self.entries
            .try_get_with(key, async move {
                if let Some(path) = &path {
                    match read_entry(path).await {
                        Ok(Some(result)) => {
                            debug!(path = %path.display(), "schedule loaded from disk");
                            return Ok(Arc::new(result));
                        }
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, "ignoring unreadable cache entry"),
                    }
                }

                let result = tokio::task::spawn_blocking(move || compute(&owned))
                    .await
                    .map_err(|e| CacheError::Compute {
                        message: e.to_string(),
                    })?;

                if let Some(path) = &path {
                    match write_entry(path, &result).await {
                        Ok(()) => info!(path = %path.display(), "schedule persisted"),
                        Err(e) => warn!(error = %e, "failed to persist schedule"),
                    }
                }
                Ok::<_, CacheError>(Arc::new(result))
            })
            .await
    }

    /// Number of in-memory entries.
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Apply pending housekeeping so that `entry_count` is current.
    pub async fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks().await;
    }

    /// Drop all in-memory entries. Files on disk are kept.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

/// Read a persisted entry. A missing file is `Ok(None)`.
pub async fn read_entry(path: &Path) -> Result<Option<QueryResult>, CacheError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CacheError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| CacheError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Persist an entry, creating the cache directory if needed.
pub async fn write_entry(path: &Path, result: &QueryResult) -> Result<(), CacheError> {
    let io_err = |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(result).map_err(|source| CacheError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tokio::fs::write(path, json).await.map_err(io_err)
}
