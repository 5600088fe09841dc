use crate::errors::StorageError;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::{collections::HashMap, path::PathBuf};
use tokio::{fs, sync::Mutex};

/// Asynchronous string-keyed store. Every value is a complete serialized
/// collection; `set` overwrites whatever was there.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value)
            .await
            .map_err(|source| StorageError::Write {
                key: key.to_string(),
                source,
            })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_value(self, key: &str, value: impl Into<String>) -> Self {
        self.values.lock().await.insert(key.to_string(), value.into());
        self
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })
}

pub async fn persist_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let payload = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, payload).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_dir() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("mood_tracker_store_{}_{}", std::process::id(), nanos));
        path
    }

    #[tokio::test]
    async fn file_store_reports_missing_key_as_absent() {
        let dir = unique_dir();
        fs::create_dir_all(&dir).await.unwrap();
        let store = FileStore::new(&dir);

        assert_eq!(store.get("moodEntries").await.unwrap(), None);

        store.set("moodEntries", "[]".to_string()).await.unwrap();
        assert_eq!(store.get("moodEntries").await.unwrap().as_deref(), Some("[]"));
        assert!(dir.join("moodEntries.json").exists());

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn file_store_write_into_missing_dir_is_a_write_error() {
        let store = FileStore::new(unique_dir().join("nested"));
        let err = store.set("places", "[]".to_string()).await.unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
        assert_eq!(err.key(), "places");
    }

    #[tokio::test]
    async fn malformed_json_is_a_read_error() {
        let store = MemoryStore::new().with_value("events", "{not json").await;
        let err = load_json::<Vec<String>>(&store, "events").await.unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
        assert_eq!(err.key(), "events");
    }

    #[tokio::test]
    async fn persist_then_load_returns_same_value() {
        let store = MemoryStore::new();
        let labels = vec!["Park".to_string(), "Home".to_string()];
        persist_json(&store, "places", &labels).await.unwrap();
        let loaded: Option<Vec<String>> = load_json(&store, "places").await.unwrap();
        assert_eq!(loaded, Some(labels));
    }
}
