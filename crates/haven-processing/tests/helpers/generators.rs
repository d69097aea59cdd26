//! Variant generators that fail in scripted ways.

use async_trait::async_trait;
use haven_core::{ImageVariantSet, SourceImage};
use haven_processing::{PipelineError, VariantBatch, VariantGenerator};

/// A generator that cannot start any batch.
pub struct UnavailableGenerator;

#[async_trait]
impl VariantGenerator for UnavailableGenerator {
    async fn generate_variants(&self, _image: &SourceImage) -> Result<ImageVariantSet, PipelineError> {
        Err(PipelineError::BatchStart("image codec unavailable".to_string()))
    }

    async fn generate_variants_batch(&self, _images: &[SourceImage]) -> Result<VariantBatch, PipelineError> {
        Err(PipelineError::BatchStart("image codec unavailable".to_string()))
    }
}
