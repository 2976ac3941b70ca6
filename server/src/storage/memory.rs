use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Storage, StorageError};

/// Process-local store, used by tests and `STORAGE_BACKEND=memory`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Memory store whose writes to chosen keys can be made to fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStorage {
    inner: MemoryStorage,
    failing: std::sync::Mutex<std::collections::HashSet<String>>,
}

#[cfg(test)]
impl FailingStorage {
    pub(crate) fn fail_writes(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    pub(crate) fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }
}

#[cfg(test)]
#[async_trait]
impl Storage for FailingStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let refused = self.failing.lock().unwrap().contains(key);
        if refused {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("write to '{}' refused", key),
            )));
        }
        self.inner.set(key, value).await
    }
}
