use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{validate_key, Storage, StorageError};

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        // Write then rename so readers never see a truncated file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        tracing::debug!(key, "Persisted collection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).await.unwrap();

        assert_eq!(storage.get("eventify_events").await.unwrap(), None);

        storage
            .set("eventify_events", "[]".to_string())
            .await
            .unwrap();
        assert_eq!(
            storage.get("eventify_events").await.unwrap().as_deref(),
            Some("[]")
        );
        assert!(dir.path().join("eventify_events.json").exists());
        assert!(!dir.path().join("eventify_events.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = FileStorage::open(dir.path()).await.unwrap();
            storage
                .set("eventify_users", r#"[{"id":"1"}]"#.to_string())
                .await
                .unwrap();
        }

        let reopened = FileStorage::open(dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("eventify_users").await.unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).await.unwrap();
        let result = storage.set("../escape", "x".to_string()).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
