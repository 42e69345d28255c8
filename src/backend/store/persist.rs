//! JSON file persistence for the data store
//!
//! The whole store is written after every mutation. Writes go to a sibling
//! `.tmp` file which is then renamed over the target.

use std::path::{Path, PathBuf};

use crate::backend::error::BackendError;
use crate::backend::store::DataStore;

#[derive(Debug, Clone, Default)]
pub struct Persistence {
    path: Option<PathBuf>,
}

impl Persistence {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Never touches the filesystem
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the store. A missing file is an empty store.
    pub async fn load(&self) -> Result<DataStore, BackendError> {
        let Some(path) = &self.path else {
            return Ok(DataStore::new());
        };

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No data file at {}, starting empty", path.display());
                return Ok(DataStore::new());
            }
            Err(e) => {
                return Err(BackendError::storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let store: DataStore = serde_json::from_slice(&bytes).map_err(|e| {
            BackendError::storage(format!("Corrupt data file {}: {}", path.display(), e))
        })?;
        tracing::info!(
            "Loaded {} users, {} channels and {} DMs from {}",
            store.users.len(),
            store.channels.len(),
            store.dms.len(),
            path.display()
        );
        Ok(store)
    }

    pub async fn save(&self, store: &DataStore) -> Result<(), BackendError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(store)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                BackendError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let tmp = tmp_path(path);
        tokio::fs::write(&tmp, &bytes).await.map_err(|e| {
            tracing::error!("Failed to write {}: {}", tmp.display(), e);
            BackendError::storage(format!("Failed to write data file: {}", e))
        })?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            tracing::error!("Failed to replace {}: {}", path.display(), e);
            BackendError::storage(format!("Failed to replace data file: {}", e))
        })?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
