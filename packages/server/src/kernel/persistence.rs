//! File-backed cache image.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::traits::BaseCachePersistence;

/// Stores the cache image in a single file.
///
/// Writes go to a `.tmp` sibling which is then renamed over the target, so a
/// crash mid-write leaves the previous image intact.
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cache".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl BaseCachePersistence for FilePersistence {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read cache image {}", self.path.display())),
        }
    }

    async fn save(&self, image: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let temp = self.temp_path();
        let file = tokio::fs::File::create(&temp)
            .await
            .with_context(|| format!("Failed to create {}", temp.display()))?;
        write_all_synced(file, image)
            .await
            .with_context(|| format!("Failed to write {}", temp.display()))?;

        tokio::fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))
    }
}

async fn write_all_synced(mut file: tokio::fs::File, image: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    file.write_all(image).await?;
    file.sync_all().await
}
