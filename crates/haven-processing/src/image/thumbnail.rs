//! Thumbnail generation: three resized renditions plus the untouched original.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::join_all;
use haven_core::{ImageVariant, ImageVariantSet, SourceImage};
use image::{DynamicImage, GenericImageView, ImageReader};

use super::resize::{ImageResize, ResizeBounds};
use crate::compression::{ImageCompressor, OutputFormat};
use crate::error::PipelineError;

/// Per-index outcome of generating variants for a batch.
pub type VariantBatch = BTreeMap<usize, Result<ImageVariantSet, PipelineError>>;

/// Target bounds and encoder quality for one resized rendition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantPreset {
    pub bounds: ResizeBounds,
    /// In `(0.0, 1.0]`
    pub quality: f32,
}

impl VariantPreset {
    pub const fn new(max_width: u32, max_height: u32, quality: f32) -> Self {
        Self {
            bounds: ResizeBounds::new(max_width, max_height),
            quality,
        }
    }

    fn is_valid(&self) -> bool {
        self.bounds.is_valid() && self.quality > 0.0 && self.quality <= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailPresets {
    pub small: VariantPreset,
    pub medium: VariantPreset,
    pub large: VariantPreset,
}

impl Default for ThumbnailPresets {
    fn default() -> Self {
        Self {
            small: VariantPreset::new(300, 200, 0.8),
            medium: VariantPreset::new(600, 400, 0.85),
            large: VariantPreset::new(800, 600, 0.9),
        }
    }
}

impl ThumbnailPresets {
    fn validate(&self) -> Result<(), PipelineError> {
        for (name, preset) in [("small", &self.small), ("medium", &self.medium), ("large", &self.large)] {
            if !preset.is_valid() {
                return Err(PipelineError::BatchStart(format!(
                    "invalid {} preset: {}x{} @ {}",
                    name, preset.bounds.max_width, preset.bounds.max_height, preset.quality
                )));
            }
        }
        Ok(())
    }
}

/// Produces the four renditions of each image.
///
/// The batch uploader only sees this trait, so tests can swap in generators
/// that fail on demand.
#[async_trait]
pub trait VariantGenerator: Send + Sync {
    async fn generate_variants(&self, image: &SourceImage) -> Result<ImageVariantSet, PipelineError>;

    /// Generate variants for every image concurrently. A failing image only
    /// fails its own slot; `Err` means the batch could not start.
    async fn generate_variants_batch(&self, images: &[SourceImage]) -> Result<VariantBatch, PipelineError> {
        Ok(generate_each(self, images).await)
    }
}

async fn generate_each<G>(generator: &G, images: &[SourceImage]) -> VariantBatch
where
    G: VariantGenerator + ?Sized,
{
    let results = join_all(images.iter().map(|image| generator.generate_variants(image))).await;
    results.into_iter().enumerate().collect()
}

#[derive(Debug, Clone, Default)]
pub struct ThumbnailGenerator {
    presets: ThumbnailPresets,
}

impl ThumbnailGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_presets(presets: ThumbnailPresets) -> Self {
        Self { presets }
    }

    fn decode(data: &[u8]) -> Result<DynamicImage, PipelineError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode(e.to_string()))?;
        reader.decode().map_err(|e| PipelineError::Decode(e.to_string()))
    }
}

async fn render(
    img: Arc<DynamicImage>,
    preset: VariantPreset,
    format: OutputFormat,
) -> Result<ImageVariant, PipelineError> {
    tokio::task::spawn_blocking(move || -> Result<ImageVariant, PipelineError> {
        let resized = ImageResize::resize_to_fit(&img, preset.bounds);
        let (width, height) = resized.dimensions();
        let data = ImageCompressor::compress(&resized, format, preset.quality)?;
        Ok(ImageVariant {
            data,
            width,
            height,
            content_type: format.to_mime_type().to_string(),
        })
    })
    .await?
}

#[async_trait]
impl VariantGenerator for ThumbnailGenerator {
    async fn generate_variants(&self, image: &SourceImage) -> Result<ImageVariantSet, PipelineError> {
        let start = std::time::Instant::now();
        let data: Bytes = image.data.clone();

        let decoded = tokio::task::spawn_blocking(move || ThumbnailGenerator::decode(&data)).await??;
        let (width, height) = decoded.dimensions();

        let format = OutputFormat::from_mime_type(&image.content_type).ok_or_else(|| {
            PipelineError::Encode(format!("unsupported output format: {}", image.content_type))
        })?;

        let decoded = Arc::new(decoded);
        let (small, medium, large) = tokio::try_join!(
            render(Arc::clone(&decoded), self.presets.small, format),
            render(Arc::clone(&decoded), self.presets.medium, format),
            render(Arc::clone(&decoded), self.presets.large, format),
        )?;

        tracing::debug!(
            file_name = %image.name,
            width,
            height,
            size_bytes = image.size(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Generated image variants"
        );

        Ok(ImageVariantSet {
            original: ImageVariant {
                data: image.data.clone(),
                width,
                height,
                content_type: image.content_type.clone(),
            },
            small,
            medium,
            large,
        })
    }

    async fn generate_variants_batch(&self, images: &[SourceImage]) -> Result<VariantBatch, PipelineError> {
        self.presets.validate()?;
        Ok(generate_each(self, images).await)
    }
}
