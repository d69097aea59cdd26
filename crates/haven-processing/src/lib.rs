//! Haven image ingestion pipeline
//!
//! Turns the photos a user attached to a listing into stored renditions:
//! thumbnail generation, upload validation, per-file progress tracking, the
//! optimized four-rendition batch upload and its single-object fallback.

pub mod compression;
pub mod error;
pub mod image;
pub mod upload;
pub mod validator;

// Re-export commonly used types
pub use compression::{ImageCompressor, OutputFormat};
pub use error::PipelineError;
pub use crate::image::{
    ImageResize, ResizeBounds, ThumbnailGenerator, ThumbnailPresets, VariantBatch,
    VariantGenerator, VariantPreset,
};
pub use upload::{
    BatchUploader, FallbackUploader, ImageIngestor, IngestOutcome, ProgressError, ProgressEvent,
    ProgressObserver, ProgressTracker,
};
pub use validator::{UploadValidator, ValidationError};
