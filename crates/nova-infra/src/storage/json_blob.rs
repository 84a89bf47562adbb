//! File-backed [`BlobStore`]: one `{key}.json` file per key.
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! crash mid-write never leaves a truncated blob behind.

use std::path::{Path, PathBuf};

use nova_core::memory::store::BlobStore;
use nova_types::error::RepositoryError;

#[derive(Debug, Clone)]
pub struct JsonFileBlobStore {
    dir: PathBuf,
}

impl JsonFileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the blob for `key`. Keys are restricted to a safe file-name
    /// alphabet so they can never escape the store directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, RepositoryError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RepositoryError::Storage(format!("invalid blob key: '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for JsonFileBlobStore {
    async fn load(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::Storage(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn save(&self, key: &str, blob: &str) -> Result<(), RepositoryError> {
        let path = self.path_for(key)?;
        let storage_err =
            |e: std::io::Error| RepositoryError::Storage(format!("failed to write {}: {e}", path.display()));

        tokio::fs::create_dir_all(&self.dir).await.map_err(storage_err)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, blob).await.map_err(storage_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(storage_err)?;
        tracing::debug!(key, bytes = blob.len(), "blob saved");
        Ok(())
    }
}
