use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// One invocation's worth of queue messages
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QueueEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<BatchMessage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMessage {
    /// Empty when the queue omitted it; the message is still processed
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl BatchMessage {
    pub fn new(message_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            body: Some(body.into()),
        }
    }

    /// Unwrap the storage notification carried in the body
    pub fn parse_records(&self) -> Result<Vec<ObjectChangeRecord>, PipelineError> {
        let body = self.body.as_deref().ok_or_else(|| {
            PipelineError::EnvelopeParse(<serde_json::Error as serde::de::Error>::missing_field(
                "body",
            ))
        })?;

        let envelope: StorageEventEnvelope = serde_json::from_str(body)?;
        Ok(envelope
            .records
            .into_iter()
            .map(|record| ObjectChangeRecord {
                source_container: record.s3.bucket.name,
                object_key: record.s3.object.key,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct StorageEventEnvelope {
    #[serde(rename = "Records")]
    records: Vec<StorageEventRecord>,
}

#[derive(Debug, Deserialize)]
struct StorageEventRecord {
    s3: StorageEntity,
}

#[derive(Debug, Deserialize)]
struct StorageEntity {
    bucket: BucketEntity,
    object: ObjectEntity,
}

#[derive(Debug, Deserialize)]
struct BucketEntity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ObjectEntity {
    key: String,
}

/// Object named by a storage change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectChangeRecord {
    pub source_container: String,
    pub object_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Failed message identifiers, in batch order
    pub failed_message_identifiers: Vec<String>,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.failed_message_identifiers.is_empty()
    }
}

/// Partial batch response understood by the queue's redrive mechanism
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub batch_item_failures: Vec<BatchItemFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemFailure {
    pub item_identifier: String,
}

impl From<BatchResult> for BatchResponse {
    fn from(result: BatchResult) -> Self {
        Self {
            batch_item_failures: result
                .failed_message_identifiers
                .into_iter()
                .map(|item_identifier| BatchItemFailure { item_identifier })
                .collect(),
        }
    }
}
