use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    Client,
    config::Region,
    error::{DisplayErrorContext, ProvideErrorMetadata},
    primitives::ByteStream,
    types::ServerSideEncryption,
};
use tracing::{debug, error};

use crate::storage::{
    EncryptionMode, FetchedObject, ObjectStore, PutObject, S3Config, StorageError,
};

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub async fn new(config: &S3Config) -> Self {
        let mut aws_config_builder = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            aws_config_builder = aws_config_builder.region(Region::new(region.clone()));
        }

        let aws_config = aws_config_builder.load().await;
        Self {
            client: Client::new(&aws_config),
        }
    }
}

/// Classify an SDK failure by its service error code
fn storage_error<E>(err: &E, container: &str, key: &str) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let code = err.code().unwrap_or("Unknown");
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(err).to_string());
    StorageError::from_code(code, message, container, key)
}

fn server_side_encryption(mode: EncryptionMode) -> ServerSideEncryption {
    match mode {
        EncryptionMode::Aes256 => ServerSideEncryption::Aes256,
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(
        &self,
        container: &str,
        key: &str,
        max_length: u64,
    ) -> Result<FetchedObject, StorageError> {
        debug!("GetObject s3://{}/{}", container, key);

        let response = self
            .client
            .get_object()
            .bucket(container)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let err = storage_error(&e, container, key);
                error!("S3 GetObject failed for {}: {}", key, err.code());
                err
            })?;

        let declared_length = response.content_length().map(|len| len.max(0) as u64);
        if let Some(size) = declared_length.filter(|&size| size > max_length) {
            // Dropping the response abandons the body stream unread
            debug!("Skipping body of {}: {} bytes declared", key, size);
            return Err(StorageError::TooLarge {
                size,
                limit: max_length,
            });
        }
        let user_metadata = response.metadata().cloned().unwrap_or_default();

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Body(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(FetchedObject {
            declared_length: declared_length.unwrap_or(bytes.len() as u64),
            bytes,
            user_metadata,
        })
    }

    async fn put(&self, object: PutObject) -> Result<(), StorageError> {
        debug!(
            "PutObject s3://{}/{} ({} bytes, {})",
            object.container,
            object.key,
            object.bytes.len(),
            object.content_type
        );

        let PutObject {
            container,
            key,
            bytes,
            content_type,
            user_metadata,
            encryption,
        } = object;

        match self
            .client
            .put_object()
            .bucket(&container)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .set_metadata(Some(user_metadata))
            .server_side_encryption(server_side_encryption(encryption))
            .send()
            .await
        {
            Ok(output) => {
                debug!("Object stored. ETag: {:?}", output.e_tag());
                Ok(())
            }
            Err(e) => {
                let err = storage_error(&e, &container, &key);
                error!("S3 PutObject failed for {}: {}", key, err.code());
                Err(err)
            }
        }
    }

    fn name(&self) -> &str {
        "Amazon S3"
    }
}
