use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::storage::{FetchedObject, ObjectStore, PutObject, StorageError};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    declared_length: Option<u64>,
    user_metadata: HashMap<String, String>,
}

#[derive(Default)]
struct State {
    objects: HashMap<(String, String), StoredObject>,
    get_failures: HashMap<(String, String), String>,
    put_failures: HashMap<(String, String), String>,
    writes: Vec<PutObject>,
    body_reads: usize,
}

/// In-process store. Every successful write is journaled so callers can
/// inspect exactly what was stored and in which order.
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    pub async fn insert(&self, container: &str, key: &str, bytes: Vec<u8>) {
        self.insert_with_metadata(container, key, bytes, HashMap::new())
            .await;
    }

    pub async fn insert_with_metadata(
        &self,
        container: &str,
        key: &str,
        bytes: Vec<u8>,
        user_metadata: HashMap<String, String>,
    ) {
        let mut state = self.state.write().await;
        state.objects.insert(
            (container.to_string(), key.to_string()),
            StoredObject {
                bytes,
                declared_length: None,
                user_metadata,
            },
        );
    }

    /// Report `length` instead of the real byte count on reads
    pub async fn set_declared_length(&self, container: &str, key: &str, length: u64) {
        let mut state = self.state.write().await;
        if let Some(object) = state
            .objects
            .get_mut(&(container.to_string(), key.to_string()))
        {
            object.declared_length = Some(length);
        }
    }

    /// Make reads of `key` fail with the given provider error code
    pub async fn fail_get(&self, container: &str, key: &str, code: &str) {
        let mut state = self.state.write().await;
        state
            .get_failures
            .insert((container.to_string(), key.to_string()), code.to_string());
    }

    /// Make writes of `key` fail with the given provider error code
    pub async fn fail_put(&self, container: &str, key: &str, code: &str) {
        let mut state = self.state.write().await;
        state
            .put_failures
            .insert((container.to_string(), key.to_string()), code.to_string());
    }

    /// Successful writes in the order they happened
    pub async fn writes(&self) -> Vec<PutObject> {
        self.state.read().await.writes.clone()
    }

    /// Number of reads that handed out an object body
    pub async fn body_reads(&self) -> usize {
        self.state.read().await.body_reads
    }

    pub async fn object(&self, container: &str, key: &str) -> Option<Vec<u8>> {
        self.state
            .read()
            .await
            .objects
            .get(&(container.to_string(), key.to_string()))
            .map(|object| object.bytes.clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(
        &self,
        container: &str,
        key: &str,
        max_length: u64,
    ) -> Result<FetchedObject, StorageError> {
        let mut state = self.state.write().await;
        let id = (container.to_string(), key.to_string());

        if let Some(code) = state.get_failures.get(&id) {
            debug!("MEMORY STORE - injected get failure {} for {}", code, key);
            return Err(StorageError::from_code(
                code,
                "injected failure",
                container,
                key,
            ));
        }

        let object = state.objects.get(&id).ok_or_else(|| StorageError::NotFound {
            container: container.to_string(),
            key: key.to_string(),
        })?;

        let declared_length = object
            .declared_length
            .unwrap_or(object.bytes.len() as u64);
        if declared_length > max_length {
            return Err(StorageError::TooLarge {
                size: declared_length,
                limit: max_length,
            });
        }

        let fetched = FetchedObject {
            bytes: object.bytes.clone(),
            declared_length,
            user_metadata: object.user_metadata.clone(),
        };
        state.body_reads += 1;
        Ok(fetched)
    }

    async fn put(&self, object: PutObject) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        let id = (object.container.clone(), object.key.clone());

        if let Some(code) = state.put_failures.get(&id) {
            return Err(StorageError::from_code(
                code,
                "injected failure",
                &object.container,
                &object.key,
            ));
        }

        info!(
            "MEMORY STORE - stored {}/{} ({} bytes, {}, encryption {})",
            object.container,
            object.key,
            object.bytes.len(),
            object.content_type,
            object.encryption.as_str()
        );

        state.objects.insert(
            id,
            StoredObject {
                bytes: object.bytes.clone(),
                declared_length: None,
                user_metadata: object.user_metadata.clone(),
            },
        );
        state.writes.push(object);
        Ok(())
    }

    fn name(&self) -> &str {
        "In-Memory Object Store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        store.insert("uploads", "a.jpg", vec![1, 2, 3]).await;

        let fetched = store.get("uploads", "a.jpg", u64::MAX).await.unwrap();
        assert_eq!(fetched.bytes, vec![1, 2, 3]);
        assert_eq!(fetched.declared_length, 3);
        assert!(fetched.user_metadata.is_empty());
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get("uploads", "missing.jpg", u64::MAX).await.unwrap_err();
        assert_eq!(err.code(), "NoSuchKey");
    }

    #[tokio::test]
    async fn test_declared_length_override() {
        let store = MemoryStore::new();
        store.insert("uploads", "big.jpg", vec![0; 16]).await;
        store
            .set_declared_length("uploads", "big.jpg", 60 * 1024 * 1024)
            .await;

        let fetched = store.get("uploads", "big.jpg", u64::MAX).await.unwrap();
        assert_eq!(fetched.declared_length, 60 * 1024 * 1024);
        assert_eq!(fetched.bytes.len(), 16);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryStore::new();
        store.insert("uploads", "a.jpg", vec![1]).await;
        store.fail_get("uploads", "a.jpg", "AccessDenied").await;
        store.fail_put("out", "processed/a.jpg", "InternalError").await;

        let err = store.get("uploads", "a.jpg", u64::MAX).await.unwrap_err();
        assert!(matches!(err, StorageError::AccessDenied { .. }));

        let err = store
            .put(PutObject::new("out", "processed/a.jpg", vec![1], "image/jpeg"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "InternalError");
        assert!(store.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_writes_journaled() {
        let store = MemoryStore::new();
        store
            .put(PutObject::new("out", "processed/a.png", vec![9, 9], "image/png"))
            .await
            .unwrap();

        let writes = store.writes().await;
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].key, "processed/a.png");
        assert_eq!(store.object("out", "processed/a.png").await, Some(vec![9, 9]));
    }

    #[tokio::test]
    async fn test_body_not_read_when_declared_length_exceeds_limit() {
        let store = MemoryStore::new();
        store.insert("uploads", "big.jpg", vec![0; 16]).await;
        store
            .set_declared_length("uploads", "big.jpg", 60 * 1024 * 1024)
            .await;

        let err = store
            .get("uploads", "big.jpg", 50 * 1024 * 1024)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::TooLarge {
                size: 62914560,
                limit: 52428800
            }
        ));
        assert_eq!(store.body_reads().await, 0);

        store.get("uploads", "big.jpg", u64::MAX).await.unwrap();
        assert_eq!(store.body_reads().await, 1);
    }

    #[tokio::test]
    async fn test_exact_limit_is_read() {
        let store = MemoryStore::new();
        store.insert("uploads", "a.jpg", vec![0; 16]).await;

        let fetched = store.get("uploads", "a.jpg", 16).await.unwrap();
        assert_eq!(fetched.bytes.len(), 16);
        assert_eq!(store.body_reads().await, 1);
    }

    #[test]
    fn test_store_name() {
        assert_eq!(MemoryStore::new().name(), "In-Memory Object Store");
    }
}
