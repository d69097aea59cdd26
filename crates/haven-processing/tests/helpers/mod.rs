//! Test helpers: fixture images, an in-memory storage with failure injection,
//! scripted variant generators and a progress recorder.
//!
//! Run from workspace root: `cargo test -p haven-processing`.

#![allow(dead_code)]

pub mod fixtures;
pub mod generators;
pub mod storage;

use std::sync::{Arc, Mutex};

use haven_core::{UploadProgressEntry, UploadStatus};
use haven_processing::ProgressObserver;

/// Collects every snapshot the pipeline publishes.
#[derive(Clone, Default)]
pub struct ProgressRecorder {
    snapshots: Arc<Mutex<Vec<Vec<UploadProgressEntry>>>>,
}

impl ProgressRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observer(&self) -> ProgressObserver {
        let snapshots = Arc::clone(&self.snapshots);
        Arc::new(move |snapshot: &[UploadProgressEntry]| {
            snapshots.lock().unwrap().push(snapshot.to_vec());
        })
    }

    pub fn snapshots(&self) -> Vec<Vec<UploadProgressEntry>> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn last(&self) -> Vec<UploadProgressEntry> {
        self.snapshots().last().cloned().unwrap_or_default()
    }

    /// Progress values seen for one file, in publication order.
    pub fn history(&self, index: usize) -> Vec<(UploadStatus, u8)> {
        self.snapshots()
            .iter()
            .filter_map(|s| s.get(index).map(|e| (e.status, e.progress)))
            .collect()
    }
}

/// Progress never decreases for a file except when it drops to 0 on error.
pub fn assert_monotonic(history: &[(UploadStatus, u8)]) {
    for pair in history.windows(2) {
        let (_, before) = pair[0];
        let (status, after) = pair[1];
        assert!(
            after >= before || (status == UploadStatus::Error && after == 0),
            "progress went from {} to {} ({})",
            before,
            after,
            status
        );
    }
}
