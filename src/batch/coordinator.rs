use tracing::{error, info};

use super::types::{BatchMessage, BatchResponse, BatchResult, QueueEvent};
use crate::PipelineError;
use crate::processing::ItemProcessor;

/// Walks a batch in order and folds per-message failures into a report.
///
/// Messages and their records are processed one at a time. A failure never
/// stops the batch; it only lands the owning message in the failure set.
pub struct BatchCoordinator {
    processor: ItemProcessor,
}

impl BatchCoordinator {
    pub fn new(processor: ItemProcessor) -> Self {
        Self { processor }
    }

    pub async fn handle_event(&self, event: QueueEvent) -> BatchResponse {
        self.handle_batch(&event.records).await.into()
    }

    pub async fn handle_batch(&self, batch: &[BatchMessage]) -> BatchResult {
        let mut failed_message_identifiers = Vec::new();
        let mut processed_count = 0usize;

        for message in batch {
            if let Err(e) = self.handle_message(message, &mut processed_count).await {
                error!(
                    message_id = %message.message_id,
                    error_class = e.class(),
                    "Error processing record: {}",
                    e
                );
                failed_message_identifiers.push(message.message_id.clone());
            }
        }

        info!(
            failed = failed_message_identifiers.len(),
            "Successfully processed {} images", processed_count
        );

        BatchResult {
            failed_message_identifiers,
        }
    }

    /// The first failing record ends the message; it will be redelivered whole
    async fn handle_message(
        &self,
        message: &BatchMessage,
        processed_count: &mut usize,
    ) -> Result<(), PipelineError> {
        let records = message.parse_records()?;

        for record in &records {
            info!(
                "Processing image: {} from bucket: {}",
                record.object_key, record.source_container
            );
            self.processor
                .process_item(&record.source_container, &record.object_key)
                .await?;
            *processed_count += 1;
        }

        Ok(())
    }
}
