//! Aggregate outcome of one batch upload.

use serde::{Deserialize, Serialize};

use super::stored::StoredImageRecord;
use crate::constants::BATCH_START_ERROR_INDEX;

/// A failed image, or the synthetic `index == -1` entry for a batch that could
/// not start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    pub index: i64,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUploadResult {
    pub success: bool,
    /// Successful records in original file order, failed slots omitted.
    pub images: Vec<StoredImageRecord>,
    pub errors: Vec<BatchError>,
}

impl BatchUploadResult {
    /// Aggregate per-file outcomes. Outcomes may arrive in any order; the
    /// result is ordered by file index.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (usize, Result<StoredImageRecord, String>)>,
    {
        let mut outcomes: Vec<_> = outcomes.into_iter().collect();
        outcomes.sort_by_key(|(index, _)| *index);

        let mut images = Vec::new();
        let mut errors = Vec::new();
        for (index, outcome) in outcomes {
            match outcome {
                Ok(record) => images.push(record),
                Err(error) => errors.push(BatchError {
                    index: index as i64,
                    error,
                }),
            }
        }

        Self {
            success: errors.is_empty(),
            images,
            errors,
        }
    }

    /// Result for a batch that failed before any per-file work started.
    pub fn batch_start_failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            images: Vec::new(),
            errors: vec![BatchError {
                index: BATCH_START_ERROR_INDEX,
                error: message.into(),
            }],
        }
    }

    /// The batch-level message when the batch could not start at all.
    pub fn batch_start_error(&self) -> Option<&str> {
        match self.errors.as_slice() {
            [only] if only.index == BATCH_START_ERROR_INDEX => Some(&only.error),
            _ => None,
        }
    }

    /// User-facing summary of the failures, if any.
    pub fn failure_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        if let Some(message) = self.batch_start_error() {
            return Some(format!("Image upload could not start: {}", message));
        }
        let total = self.images.len() + self.errors.len();
        Some(format!(
            "{} of {} images failed to upload",
            self.errors.len(),
            total
        ))
    }
}
