//! Local key/value storage
//!
//! Durable string storage for client-side state. Values are whole documents
//! replaced on every write.

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying medium could not be read or written.
    #[error("storage io error at {path}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Keys become file names, so they are restricted to a safe character set.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

/// Durable string storage keyed by name.
#[automock]
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Stores each key as a JSON file in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store files under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(io_error(&path)(error)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(io_error(&self.dir))?;

        // Write to a sibling file and rename so readers never see a partial value.
        let temp_path = path.with_extension("json.tmp");

        tokio::fs::write(&temp_path, value)
            .await
            .map_err(io_error(&temp_path))?;

        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(io_error(&path))?;

        debug!(path = %path.display(), bytes = value.len(), "stored value");

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(&path)(error)),
        }
    }
}

/// Volatile storage for tests and sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<FxHashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().await.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn file_storage_round_trips_values() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("state"));

        assert_eq!(storage.get("giftpack-cart").await?, None);

        storage.set("giftpack-cart", r#"{"items":[]}"#).await?;

        assert_eq!(
            storage.get("giftpack-cart").await?.as_deref(),
            Some(r#"{"items":[]}"#)
        );
        assert!(dir.path().join("state/giftpack-cart.json").exists());
        assert!(!dir.path().join("state/giftpack-cart.json.tmp").exists());

        storage.remove("giftpack-cart").await?;
        storage.remove("giftpack-cart").await?;

        assert_eq!(storage.get("giftpack-cart").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn file_storage_rejects_path_like_keys() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());

        assert!(matches!(
            storage.set("../escape", "x").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.get("").await,
            Err(StorageError::InvalidKey(_))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn memory_storage_round_trips_values() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set("k", "v").await?;
        assert_eq!(storage.get("k").await?.as_deref(), Some("v"));

        storage.remove("k").await?;
        assert_eq!(storage.get("k").await?, None);

        Ok(())
    }
}
