//! Optimized upload: four renditions per image, stored concurrently.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use haven_core::{
    BatchUploadResult, ImageSize, ImageVariant, ImageVariantSet, SourceImage, StoredImageRecord,
};
use haven_storage::keys::{base_path, extension_for, validate_property_id, variant_path};
use haven_storage::Storage;
use tracing::Instrument;
use uuid::Uuid;

use super::progress::{ProgressObserver, ProgressTracker};
use super::{abort_batch, batch_timestamp, check_file};
use crate::error::PipelineError;
use crate::image::VariantGenerator;
use crate::validator::UploadValidator;

pub struct BatchUploader {
    storage: Arc<dyn Storage>,
    generator: Arc<dyn VariantGenerator>,
    validator: Option<UploadValidator>,
}

impl BatchUploader {
    pub fn new(storage: Arc<dyn Storage>, generator: Arc<dyn VariantGenerator>) -> Self {
        Self {
            storage,
            generator,
            validator: None,
        }
    }

    /// Reject files failing `validator` before generation. Rejections fail
    /// only their own slot.
    pub fn with_validator(mut self, validator: UploadValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Generate and store every file of the batch.
    ///
    /// Files succeed or fail independently. The returned result carries the
    /// stored records in file order and one error per failed file, or a single
    /// `index == -1` error when the batch could not start at all.
    pub async fn upload_batch(
        &self,
        files: &[SourceImage],
        property_id: &str,
        on_progress: Option<ProgressObserver>,
    ) -> BatchUploadResult {
        let span = tracing::info_span!(
            "upload_batch",
            batch_id = %Uuid::new_v4(),
            property_id = %property_id,
            files = files.len()
        );
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
        let start = std::time::Instant::now();
        let tracker = ProgressTracker::new(files, on_progress);
        tracker.start();

        if let Err(e) = validate_property_id(property_id) {
            return abort_batch(&tracker, &PipelineError::from(e));
        }

        // Validation failures keep their slot; everything else is generated.
        let mut outcomes: BTreeMap<usize, Result<ImageVariantSet, PipelineError>> = BTreeMap::new();
        let mut accepted = Vec::new();
        let mut to_generate = Vec::new();
        for (index, file) in files.iter().enumerate() {
            match check_file(self.validator.as_ref(), file) {
                Ok(()) => {
                    accepted.push(index);
                    to_generate.push(file.clone());
                }
                Err(e) => {
                    outcomes.insert(index, Err(e));
                }
            }
        }

        let generated = match self.generator.generate_variants_batch(&to_generate).await {
            Ok(generated) => generated,
            Err(e) => return abort_batch(&tracker, &e),
        };
        for (position, variants) in generated {
            if let Some(&index) = accepted.get(position) {
                outcomes.insert(index, variants);
            }
        }

        let timestamp = batch_timestamp();
        let uploads = files.iter().enumerate().map(|(index, file)| {
            let variants = outcomes.remove(&index).unwrap_or_else(|| {
                Err(PipelineError::Encode("no variants were generated".to_string()))
            });
            self.upload_one(&tracker, index, file, variants, property_id, timestamp + index as i64)
        });
        let settled = join_all(uploads).await;

        let result = BatchUploadResult::from_outcomes(settled);
        tracing::info!(
            stored = result.images.len(),
            failed = result.errors.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Batch upload finished"
        );
        result
    }

    async fn upload_one(
        &self,
        tracker: &ProgressTracker,
        index: usize,
        file: &SourceImage,
        variants: Result<ImageVariantSet, PipelineError>,
        property_id: &str,
        timestamp: i64,
    ) -> (usize, Result<StoredImageRecord, String>) {
        let stored = match variants {
            Ok(variants) => {
                tracker.mark_uploading(index);
                self.store_variants(file, &variants, property_id, timestamp)
                    .await
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
                tracing::warn!(index, file_name = %file.name, error = %message, "Image upload failed");
                tracker.mark_failed(index, message.clone());
                (index, Err(message))
            }
        }
    }

    /// Put all four renditions and wait for every put to settle. Puts that
    /// succeeded before a sibling failed are left in place.
    async fn store_variants(
        &self,
        file: &SourceImage,
        variants: &ImageVariantSet,
        property_id: &str,
        timestamp: i64,
    ) -> Result<StoredImageRecord, PipelineError> {
        let base = base_path(property_id, timestamp)?;
        let extension = extension_for(file);
        let key = |size: ImageSize| variant_path(&base, size, &extension);

        let record = StoredImageRecord {
            original: key(ImageSize::Original),
            small: key(ImageSize::Small),
            medium: key(ImageSize::Medium),
            large: key(ImageSize::Large),
        };

        let puts = variants
            .iter()
            .map(|(size, variant)| self.put(record.path(size), size, variant));
        join_all(puts).await.into_iter().collect::<Result<(), _>>()?;

        Ok(record)
    }

    async fn put(&self, key: &str, size: ImageSize, variant: &ImageVariant) -> Result<(), PipelineError> {
        self.storage
            .put(key, variant.data.clone(), &variant.content_type)
            .await?;
        tracing::debug!(
            key = %key,
            size = size.as_str(),
            size_bytes = variant.data.len(),
            "Stored image variant"
        );
        Ok(())
    }
}
