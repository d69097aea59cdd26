//! Per-file progress for one batch, pushed to an optional observer.

use std::sync::{Arc, Mutex, MutexGuard};

use haven_core::constants::{PROGRESS_COMPLETED, PROGRESS_UPLOADING};
use haven_core::{SourceImage, UploadProgressEntry, UploadStatus};
use thiserror::Error;

/// Receives a full snapshot after every transition.
pub type ProgressObserver = Arc<dyn Fn(&[UploadProgressEntry]) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Variants exist (or the single original is about to be stored).
    VariantsReady,
    /// Every storage put for the file was acknowledged.
    UploadsAcknowledged,
    Failed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("No progress entry for index {0}")]
    UnknownIndex(usize),

    #[error("Invalid progress transition for index {index}: {from} on {event}")]
    InvalidTransition {
        index: usize,
        from: UploadStatus,
        event: &'static str,
    },
}

impl ProgressEvent {
    fn name(&self) -> &'static str {
        match self {
            ProgressEvent::VariantsReady => "variants_ready",
            ProgressEvent::UploadsAcknowledged => "uploads_acknowledged",
            ProgressEvent::Failed(_) => "failed",
        }
    }
}

/// Lifecycle table for one entry:
///
/// | from                 | event               | to        | progress |
/// |----------------------|---------------------|-----------|----------|
/// | generating           | VariantsReady       | uploading | 25       |
/// | uploading            | UploadsAcknowledged | completed | 100      |
/// | generating/uploading | Failed              | error     | 0        |
///
/// Terminal entries never change again.
pub struct ProgressTracker {
    entries: Mutex<Vec<UploadProgressEntry>>,
    observer: Option<ProgressObserver>,
}

impl ProgressTracker {
    pub fn new(files: &[SourceImage], observer: Option<ProgressObserver>) -> Self {
        let entries = files
            .iter()
            .enumerate()
            .map(|(index, file)| UploadProgressEntry::new(index, file.name.clone()))
            .collect();

        Self {
            entries: Mutex::new(entries),
            observer,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<UploadProgressEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Publish the initial `generating` state.
    pub fn start(&self) {
        self.emit();
    }

    /// Apply `event` to the entry at `index` and notify the observer.
    pub fn apply(&self, index: usize, event: ProgressEvent) -> Result<(), ProgressError> {
        {
            let mut entries = self.lock();
            let entry = entries
                .get_mut(index)
                .ok_or(ProgressError::UnknownIndex(index))?;

            match (entry.status, &event) {
                (UploadStatus::Generating, ProgressEvent::VariantsReady) => {
                    entry.status = UploadStatus::Uploading;
                    entry.progress = PROGRESS_UPLOADING;
                }
                (UploadStatus::Uploading, ProgressEvent::UploadsAcknowledged) => {
                    entry.status = UploadStatus::Completed;
                    entry.progress = PROGRESS_COMPLETED;
                }
                (UploadStatus::Generating | UploadStatus::Uploading, ProgressEvent::Failed(message)) => {
                    entry.status = UploadStatus::Error;
                    entry.progress = 0;
                    entry.error = Some(message.clone());
                }
                (from, _) => {
                    return Err(ProgressError::InvalidTransition {
                        index,
                        from,
                        event: event.name(),
                    });
                }
            }
        }

        self.emit();
        Ok(())
    }

    pub fn mark_uploading(&self, index: usize) {
        self.apply_logged(index, ProgressEvent::VariantsReady);
    }

    pub fn mark_completed(&self, index: usize) {
        self.apply_logged(index, ProgressEvent::UploadsAcknowledged);
    }

    pub fn mark_failed(&self, index: usize, message: impl Into<String>) {
        self.apply_logged(index, ProgressEvent::Failed(message.into()));
    }

    fn apply_logged(&self, index: usize, event: ProgressEvent) {
        if let Err(e) = self.apply(index, event) {
            tracing::warn!(error = %e, index, "Progress update rejected");
        }
    }

    /// Mark every non-terminal entry failed with the same message and notify
    /// once.
    pub fn fail_all(&self, message: &str) {
        {
            let mut entries = self.lock();
            for entry in entries.iter_mut().filter(|e| !e.status.is_terminal()) {
                entry.status = UploadStatus::Error;
                entry.progress = 0;
                entry.error = Some(message.to_string());
            }
        }
        self.emit();
    }

    pub fn snapshot(&self) -> Vec<UploadProgressEntry> {
        self.lock().clone()
    }

    fn emit(&self) {
        if let Some(observer) = &self.observer {
            let snapshot = self.snapshot();
            observer(&snapshot);
        }
    }
}
