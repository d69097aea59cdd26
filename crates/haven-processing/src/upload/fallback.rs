//! Single-object upload used when the optimized batch cannot start.
//!
//! Each file is stored once, unresized, and its record points all four sizes
//! at that one object.

use std::sync::Arc;

use futures::future::join_all;
use haven_core::{BatchUploadResult, ImageSize, SourceImage, StoredImageRecord};
use haven_storage::keys::{base_path, extension_for, validate_property_id, variant_path};
use haven_storage::Storage;
use tracing::Instrument;

use super::progress::{ProgressObserver, ProgressTracker};
use super::{abort_batch, batch_timestamp, check_file};
use crate::error::PipelineError;
use crate::validator::UploadValidator;

pub struct FallbackUploader {
    storage: Arc<dyn Storage>,
    validator: Option<UploadValidator>,
}

impl FallbackUploader {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            validator: None,
        }
    }

    pub fn with_validator(mut self, validator: UploadValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub async fn upload_simple(
        &self,
        files: &[SourceImage],
        property_id: &str,
        on_progress: Option<ProgressObserver>,
    ) -> BatchUploadResult {
        let span = tracing::info_span!("upload_simple", property_id = %property_id, files = files.len());
        self.run(files, property_id, on_progress)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        files: &[SourceImage],
        property_id: &str,
        on_progress: Option<ProgressObserver>,
    ) -> BatchUploadResult {
        let tracker = ProgressTracker::new(files, on_progress);
        tracker.start();

        if let Err(e) = validate_property_id(property_id) {
            return abort_batch(&tracker, &PipelineError::from(e));
        }

        let timestamp = batch_timestamp();
        let uploads = files.iter().enumerate().map(|(index, file)| {
            self.upload_one(&tracker, index, file, property_id, timestamp + index as i64)
        });
        let result = BatchUploadResult::from_outcomes(join_all(uploads).await);

        tracing::info!(
            stored = result.images.len(),
            failed = result.errors.len(),
            "Fallback upload finished"
        );
        result
    }

    async fn upload_one(
        &self,
        tracker: &ProgressTracker,
        index: usize,
        file: &SourceImage,
        property_id: &str,
        timestamp: i64,
    ) -> (usize, Result<StoredImageRecord, String>) {
        let stored = match check_file(self.validator.as_ref(), file) {
            Ok(()) => {
                tracker.mark_uploading(index);
                self.store_original(file, property_id, timestamp).await
            }
            Err(e) => Err(e),
        };

        match stored {
            Ok(record) => {
                tracker.mark_completed(index);
                (index, Ok(record))
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(index, file_name = %file.name, error = %message, "Fallback upload failed");
                tracker.mark_failed(index, message.clone());
                (index, Err(message))
            }
        }
    }

    async fn store_original(
        &self,
        file: &SourceImage,
        property_id: &str,
        timestamp: i64,
    ) -> Result<StoredImageRecord, PipelineError> {
        let base = base_path(property_id, timestamp)?;
        let key = variant_path(&base, ImageSize::Original, &extension_for(file));

        self.storage
            .put(&key, file.data.clone(), &file.content_type)
            .await?;
        tracing::debug!(key = %key, size_bytes = file.size(), "Stored original image");

        Ok(StoredImageRecord::single(key))
    }
}
