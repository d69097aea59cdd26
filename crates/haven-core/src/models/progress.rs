//! Per-file upload progress as reported to observers.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Generating,
    Uploading,
    Completed,
    Error,
}

impl UploadStatus {
    /// `completed` and `error` end a file's lifecycle within a batch.
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Error)
    }
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStatus::Generating => write!(f, "generating"),
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Completed => write!(f, "completed"),
            UploadStatus::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgressEntry {
    pub index: usize,
    pub file_name: String,
    /// 0-100
    pub progress: u8,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadProgressEntry {
    pub fn new(index: usize, file_name: impl Into<String>) -> Self {
        Self {
            index,
            file_name: file_name.into(),
            progress: 0,
            status: UploadStatus::Generating,
            error: None,
        }
    }
}
