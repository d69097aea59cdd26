//! Haven Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! every Haven component: the storage backends, the image ingestion pipeline and
//! the command-line tools.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, LogLevel};
pub use models::{
    normalize_images, BatchError, BatchUploadResult, ImageSize, ImageVariant, ImageVariantSet,
    SourceImage, StoredImageRecord, StoredImageRef, UploadProgressEntry, UploadStatus,
};
pub use storage_types::StorageBackend;
