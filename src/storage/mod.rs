pub mod config;
pub mod error;
pub mod providers;
pub mod types;

pub use self::config::*;
pub use error::*;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Blob store holding both the original uploads and the processed output
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read an object. When the declared length exceeds `max_length` the read
    /// fails with [`StorageError::TooLarge`] before any of the body is fetched.
    async fn get(
        &self,
        container: &str,
        key: &str,
        max_length: u64,
    ) -> Result<FetchedObject, StorageError>;
    async fn put(&self, object: PutObject) -> Result<(), StorageError>;
    fn name(&self) -> &str;
}

pub type DynObjectStore = Arc<dyn ObjectStore>;

pub async fn create_store(config: &S3Config) -> DynObjectStore {
    Arc::new(providers::s3::S3Store::new(config).await)
}
