//! Single-slot on-disk cache for the price snapshot and its provenance.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{CacheRecord, CRAFTED_SLOTS};

const CACHE_DIR: &str = "oathplate-calc";
const CACHE_FILENAME: &str = "prices_cache.json";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file unreadable: {0}")]
    Io(#[from] io::Error),
    #[error("cache file corrupt: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Persistence port for the price cache. `Ok(None)` means nothing was saved
/// yet; an `Err` from `load` means something is there but cannot be used.
pub trait CacheStore {
    fn load(&self) -> Result<Option<CacheRecord>, CacheError>;
    fn save(&self, record: &CacheRecord) -> Result<(), CacheError>;

    /// Absent and unreadable both end up as `None`.
    fn load_usable(&self) -> Option<CacheRecord> {
        match self.load() {
            Ok(record) => record,
            Err(err) => {
                warn!("[cache] ignoring unusable cache: {err}");
                None
            }
        }
    }
}

/// Default cache location (in the local app data directory).
pub fn default_cache_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_DIR)
        .join(CACHE_FILENAME)
}

/// Pretty-printed JSON file, replaced atomically on save.
#[derive(Clone, Debug)]
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileCache {
    fn default() -> Self {
        Self::new(default_cache_path())
    }
}

impl CacheStore for JsonFileCache {
    fn load(&self) -> Result<Option<CacheRecord>, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("[cache] no cache found at {}", self.path.display());
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let record: CacheRecord = serde_json::from_str(&content)
            .map_err(|err| CacheError::Corrupt(err.to_string()))?;

        if !record.snapshot.has_full_item_list() {
            return Err(CacheError::Corrupt(format!(
                "expected {CRAFTED_SLOTS} crafted items, found {}",
                record.snapshot.items.len()
            )));
        }

        info!(
            "[cache] loaded {} snapshot from {}",
            record.provenance.tag.label(),
            self.path.display()
        );
        Ok(Some(record))
    }

    fn save(&self, record: &CacheRecord) -> Result<(), CacheError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let content = serde_json::to_string_pretty(record)?;

        // Write beside the target and rename over it, so a failed write never
        // clobbers the previous cache.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| CacheError::Io(err.error))?;

        info!("[cache] saved snapshot to {}", self.path.display());
        Ok(())
    }
}
