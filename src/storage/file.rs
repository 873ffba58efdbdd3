use super::RecordStore;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A collection persisted as a single JSON array file.
pub struct JsonFileStore<T> {
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _records: PhantomData,
        }
    }

    /// Copies `seed` into place if the store file does not exist yet.
    ///
    /// Returns `true` if the store was initialized from the seed. An existing
    /// store is never overwritten.
    pub async fn seed_from(&self, seed: &Path) -> Result<bool> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .with_context(|| format!("checking {}", self.path.display()))?;
        if exists {
            tracing::info!("Store {} already exists", self.path.display());
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }

        tokio::fs::copy(seed, &self.path).await.with_context(|| {
            format!(
                "seeding {} from {}",
                self.path.display(),
                seed.display()
            )
        })?;

        tracing::info!(
            "Store {} initialized from seed {}",
            self.path.display(),
            seed.display()
        );
        Ok(true)
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()))
    }
}

#[async_trait]
impl<T> RecordStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// A missing file is an empty collection; an unreadable or malformed one
    /// is an error.
    async fn load(&self) -> Result<Vec<T>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Store {} missing, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };

        serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", self.path.display()))
    }

    async fn save(&self, records: &[T]) -> Result<()> {
        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.temp_path();

        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;

        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("replacing {}", self.path.display()));
        }

        Ok(())
    }
}
