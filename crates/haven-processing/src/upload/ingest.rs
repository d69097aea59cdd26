//! Chooses between the optimized and the fallback upload for one submission.

use std::sync::Arc;

use haven_core::{BatchUploadResult, SourceImage};
use haven_storage::Storage;

use super::batch::BatchUploader;
use super::fallback::FallbackUploader;
use super::progress::ProgressObserver;
use crate::error::PipelineError;
use crate::image::VariantGenerator;
use crate::validator::UploadValidator;

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub result: BatchUploadResult,
    /// True when the optimized batch could not start and the images were
    /// stored as single objects instead.
    pub used_fallback: bool,
}

impl IngestOutcome {
    /// Message to show the user when some images were not stored.
    pub fn failure_summary(&self) -> Option<String> {
        self.result.failure_summary()
    }
}

pub struct ImageIngestor {
    batch: BatchUploader,
    fallback: FallbackUploader,
}

impl ImageIngestor {
    pub fn new(storage: Arc<dyn Storage>, generator: Arc<dyn VariantGenerator>) -> Self {
        Self {
            batch: BatchUploader::new(Arc::clone(&storage), generator),
            fallback: FallbackUploader::new(storage),
        }
    }

    pub fn with_validator(self, validator: UploadValidator) -> Self {
        Self {
            batch: self.batch.with_validator(validator.clone()),
            fallback: self.fallback.with_validator(validator),
        }
    }

    /// Store `files` for `property_id`.
    ///
    /// Runs the optimized batch first. Only a batch that could not start falls
    /// back to single-object uploads; a partial failure is returned as it is.
    /// Fails with `NoImagesUploaded` when files were given but none was stored.
    pub async fn ingest(
        &self,
        files: &[SourceImage],
        property_id: &str,
        on_progress: Option<ProgressObserver>,
    ) -> Result<IngestOutcome, PipelineError> {
        let result = self
            .batch
            .upload_batch(files, property_id, on_progress.clone())
            .await;

        let outcome = match result.batch_start_error().map(str::to_owned) {
            Some(reason) => {
                tracing::warn!(
                    property_id = %property_id,
                    reason = %reason,
                    "Optimized upload could not start, falling back to original-only upload"
                );
                IngestOutcome {
                    result: self
                        .fallback
                        .upload_simple(files, property_id, on_progress)
                        .await,
                    used_fallback: true,
                }
            }
            None => IngestOutcome {
                result,
                used_fallback: false,
            },
        };

        if !files.is_empty() && outcome.result.images.is_empty() {
            let summary = outcome
                .failure_summary()
                .unwrap_or_else(|| format!("0 of {} images were stored", files.len()));
            return Err(PipelineError::NoImagesUploaded(summary));
        }

        if let Some(summary) = outcome.failure_summary() {
            tracing::warn!(property_id = %property_id, "{}", summary);
        }

        Ok(outcome)
    }
}
