//! Key/value persistence for service collections.
//!
//! Every service keeps its whole collection as one JSON array under a fixed
//! key and rewrites it after each mutation, so a backend only needs to store
//! opaque strings.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::config::StorageBackend;

pub mod file;
pub mod memory;
pub mod postgres;

pub use file::FileStorage;
pub use memory::MemoryStorage;
#[cfg(test)]
pub(crate) use memory::FailingStorage;
pub use postgres::PostgresStorage;

pub mod keys {
    pub const EVENTS: &str = "eventify_events";
    pub const BOOKINGS: &str = "eventify_bookings";
    pub const PAYMENTS: &str = "eventify_payments";
    pub const REVIEWS: &str = "eventify_reviews";
    pub const USERS: &str = "eventify_users";
    pub const SESSIONS: &str = "eventify_sessions";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Reads a collection; `None` means the key has never been written.
pub async fn load_collection<T>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<Vec<T>>, StorageError>
where
    T: DeserializeOwned,
{
    match storage.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub async fn save_collection<T>(
    storage: &dyn Storage,
    key: &str,
    items: &[T],
) -> Result<(), StorageError>
where
    T: Serialize,
{
    let raw = serde_json::to_string(items)?;
    storage.set(key, raw).await
}

/// Opens the backend selected by configuration.
pub async fn connect(backend: &StorageBackend) -> Result<Arc<dyn Storage>, StorageError> {
    let storage: Arc<dyn Storage> = match backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Arc::new(MemoryStorage::new())
        }
        StorageBackend::File(dir) => {
            tracing::info!(dir = %dir.display(), "Using file storage");
            Arc::new(FileStorage::open(dir).await?)
        }
        StorageBackend::Postgres(url) => {
            tracing::info!("Using Postgres storage");
            Arc::new(PostgresStorage::connect(url).await?)
        }
    };
    Ok(storage)
}

pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
