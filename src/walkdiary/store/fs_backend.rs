use super::backend::StorageBackend;
use crate::error::{DiaryError, Result};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use tokio::fs as async_fs;
use uuid::Uuid;

/// Stores each key as `<root>/<key>.json`.
///
/// Writes go through `tokio::fs`, which hands the blocking calls to the
/// runtime's blocking pool.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

#[async_trait(?Send)]
impl StorageBackend for FsBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(DiaryError::Io)?;
        Ok(Some(content))
    }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        async_fs::create_dir_all(&self.root)
            .await
            .map_err(DiaryError::Io)?;

        // Atomic write
        let tmp_path = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        async_fs::write(&tmp_path, value)
            .await
            .map_err(DiaryError::Io)?;
        if let Err(e) = async_fs::rename(&tmp_path, self.path_for(key)).await {
            let _ = async_fs::remove_file(&tmp_path).await;
            return Err(DiaryError::Io(e));
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match async_fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DiaryError::Io(e)),
        }
    }
}
