//! Error types for the ingestion pipeline.

use haven_core::AppError;
use haven_storage::StorageError;
use thiserror::Error;

use crate::validator::ValidationError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source bytes are not a readable image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// A resized variant could not be produced or serialized.
    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The batch could not begin; no per-file work was attempted.
    #[error("Batch could not start: {0}")]
    BatchStart(String),

    #[error("Invalid upload: {0}")]
    InvalidInput(String),

    #[error("Invalid upload: {0}")]
    FileTooLarge(String),

    /// Neither the optimized nor the fallback upload stored a single image.
    #[error("No images were uploaded: {0}")]
    NoImagesUploaded(String),
}

impl From<ValidationError> for PipelineError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { .. } => PipelineError::FileTooLarge(err.to_string()),
            _ => PipelineError::InvalidInput(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::Encode(format!("image task failed: {}", err))
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Decode(_) | PipelineError::Encode(_) => {
                AppError::ImageProcessing(err.to_string())
            }
            PipelineError::Storage(e) => e.into(),
            PipelineError::InvalidInput(msg) => AppError::InvalidInput(msg),
            PipelineError::FileTooLarge(msg) => AppError::PayloadTooLarge(msg),
            PipelineError::BatchStart(_) | PipelineError::NoImagesUploaded(_) => {
                AppError::UploadRejected(err.to_string())
            }
        }
    }
}
