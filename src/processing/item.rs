use tracing::{debug, error, info};

use super::classify::classify;
use super::normalize::normalize;
use super::resize::resize_and_encode;
use super::types::{ImageSize, ProcessedAsset, Provenance, SourceFormat, content_type_for};
use crate::storage::{DynObjectStore, EncryptionMode, PutObject, StorageError};
use crate::{Config, MAX_IMAGE_SIZE, PipelineError};

/// Prefix under which normalized images are written
pub const PROCESSED_PREFIX: &str = "processed/";

pub fn processed_key(object_key: &str) -> String {
    format!("{}{}", PROCESSED_PREFIX, object_key)
}

/// Outcome of a successfully processed object
#[derive(Debug, Clone)]
pub struct ProcessedItem {
    pub destination_key: String,
    pub content_type: &'static str,
    pub provenance: Provenance,
}

/// Runs one object through fetch, classify, normalize, resize/encode and store
pub struct ItemProcessor {
    store: DynObjectStore,
    destination_container: String,
    target_size: ImageSize,
}

impl ItemProcessor {
    pub fn new(
        store: DynObjectStore,
        destination_container: impl Into<String>,
        target_size: ImageSize,
    ) -> Self {
        Self {
            store,
            destination_container: destination_container.into(),
            target_size,
        }
    }

    pub fn from_config(store: DynObjectStore, config: &Config) -> Self {
        Self::new(store, config.processed_bucket.clone(), config.target_size())
    }

    pub async fn process_item(
        &self,
        source_container: &str,
        object_key: &str,
    ) -> Result<ProcessedItem, PipelineError> {
        match self.run(source_container, object_key).await {
            Ok(item) => Ok(item),
            Err(e) => {
                match e.error_code() {
                    Some(code) => error!(
                        object_key,
                        error_class = e.class(),
                        error_code = code,
                        retryable = e.is_retryable(),
                        "Storage error processing image {}: {}",
                        object_key,
                        code
                    ),
                    None => error!(
                        object_key,
                        error_class = e.class(),
                        retryable = e.is_retryable(),
                        "Error processing image {}: {}",
                        object_key,
                        e
                    ),
                }
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        source_container: &str,
        object_key: &str,
    ) -> Result<ProcessedItem, PipelineError> {
        let fetched = self
            .store
            .get(source_container, object_key, MAX_IMAGE_SIZE)
            .await
            .map_err(fetch_error)?;

        debug!(
            "Fetched {} from {} via {}: {} bytes, {} metadata entries",
            object_key,
            source_container,
            self.store.name(),
            fetched.bytes.len(),
            fetched.user_metadata.len()
        );

        let original_byte_size = fetched.declared_length;
        let target = self.target_size;
        let raw_bytes = fetched.bytes;

        // Decoding and resampling are CPU-bound, keep them off the runtime threads
        let (format, encoded_bytes) = tokio::task::spawn_blocking(
            move || -> Result<(SourceFormat, Vec<u8>), PipelineError> {
                transform(&raw_bytes, original_byte_size, target)
            },
        )
        .await??;

        let asset = ProcessedAsset {
            content_type: content_type_for(format.name()),
            provenance: Provenance {
                original_container: source_container.to_string(),
                original_key: object_key.to_string(),
                original_byte_size,
                processed_byte_size: encoded_bytes.len() as u64,
            },
            encoded_bytes,
        };

        let destination_key = processed_key(object_key);
        let item = ProcessedItem {
            destination_key: destination_key.clone(),
            content_type: asset.content_type,
            provenance: asset.provenance.clone(),
        };

        let request = PutObject::new(
            self.destination_container.clone(),
            destination_key,
            asset.encoded_bytes,
            asset.content_type,
        )
        .with_metadata(asset.provenance.to_metadata())
        .with_encryption(EncryptionMode::Aes256);

        self.store
            .put(request)
            .await
            .map_err(PipelineError::Write)?;

        info!(
            "Successfully processed and uploaded: {} ({} -> {} bytes)",
            item.destination_key,
            item.provenance.original_byte_size,
            item.provenance.processed_byte_size
        );

        Ok(item)
    }
}

/// An oversized object is rejected by the store before its body is read
fn fetch_error(err: StorageError) -> PipelineError {
    match err {
        StorageError::TooLarge { size, limit } => PipelineError::SizeLimitExceeded { size, limit },
        other => PipelineError::Fetch(other),
    }
}

/// Pure part of the pipeline: same bytes and target always give the same output
pub fn transform(
    raw_bytes: &[u8],
    declared_size: u64,
    target: ImageSize,
) -> Result<(SourceFormat, Vec<u8>), PipelineError> {
    let asset = classify(raw_bytes, declared_size)?;

    info!(
        "Original image - Format: {}, Size: {}, Mode: {}",
        asset.format.name(),
        asset.dimensions(),
        asset.color_mode().name()
    );

    let asset = normalize(asset);
    let encoded = resize_and_encode(&asset, target)?;
    Ok((asset.format, encoded))
}
