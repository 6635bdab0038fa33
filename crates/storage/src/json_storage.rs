//! JSON file storage implementation.
//!
//! Stores each key as `<key>.json` under a root directory and keeps a small
//! per-key meta marker (version + updated_at) under `meta/`. Writes go to a
//! temporary file first and are renamed into place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::trait_::validate_key;
use super::{Result, Storage};

/// File-based JSON storage backend.
#[derive(Debug)]
pub struct JsonStorage {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the data and meta
    /// directories if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join("meta").join(format!("{}.meta.json", key))
    }

    /// Current version of `key`, 0 if it was never written.
    pub async fn version(&self, key: &str) -> Result<u64> {
        validate_key(key)?;
        Ok(read_version(&self.meta_path(key)).await)
    }

    /// Read and increment per-key version, return new version.
    async fn bump_version(&self, key: &str) -> Result<u64> {
        let path = self.meta_path(key);
        let version = read_version(&path).await + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait]
impl Storage for JsonStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        match fs::read_to_string(self.value_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let _guard = self.write_lock.lock().await;

        let path = self.value_path(key);
        let tmp = self.root.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;

        let version = self.bump_version(key).await?;
        debug!(key, version, bytes = value.len(), "saved");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let _guard = self.write_lock.lock().await;

        for path in [self.value_path(key), self.meta_path(key)] {
            fs::remove_file(&path).await.or_else(|e| {
                if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
            })?;
        }
        debug!(key, "removed");
        Ok(())
    }
}

async fn read_version(path: &Path) -> u64 {
    // A missing or unreadable marker counts as version 0.
    match fs::read_to_string(path).await {
        Ok(s) => serde_json::from_str::<serde_json::Value>(&s)
            .ok()
            .and_then(|json| json.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0),
        Err(_) => 0,
    }
}
