//! Upload paths: optimized batch (four renditions per image), single-object
//! fallback, and the ingestor that chooses between them.

pub mod batch;
pub mod fallback;
pub mod ingest;
pub mod progress;

pub use batch::BatchUploader;
pub use fallback::FallbackUploader;
pub use ingest::{ImageIngestor, IngestOutcome};
pub use progress::{ProgressError, ProgressEvent, ProgressObserver, ProgressTracker};

use haven_core::{BatchUploadResult, SourceImage};

use crate::error::PipelineError;
use crate::validator::UploadValidator;

/// Milliseconds since the epoch, read once per batch. File `i` of the batch is
/// stored under `base + i`.
pub(crate) fn batch_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Fail every entry with the same message and build the `index == -1` result.
pub(crate) fn abort_batch(tracker: &ProgressTracker, err: &PipelineError) -> BatchUploadResult {
    let message = err.to_string();
    tracing::error!(error = %message, "Batch upload could not start");
    tracker.fail_all(&message);
    BatchUploadResult::batch_start_failure(message)
}

pub(crate) fn check_file(validator: Option<&UploadValidator>, file: &SourceImage) -> Result<(), PipelineError> {
    match validator {
        Some(validator) => validator.validate(file).map_err(PipelineError::from),
        None => Ok(()),
    }
}
