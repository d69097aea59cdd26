//! Error types module
//!
//! `AppError` is the application-level error: the pipeline and storage crates
//! convert their own errors into it at the outer edge (binaries, request
//! handlers) so callers get one place to decide on log level and exit status.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => AppError::NotFound(err.to_string()),
            _ => AppError::Internal(format!("IO error: {}", err)),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl AppError {
    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::ImageProcessing(_) => "IMAGE_PROCESSING_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::UploadRejected(_) => "UPLOAD_REJECTED",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether retrying the same operation may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_)
                | AppError::UploadRejected(_)
                | AppError::Internal(_)
                | AppError::InternalWithSource { .. }
        )
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) | AppError::NotFound(_) | AppError::PayloadTooLarge(_) => {
                LogLevel::Debug
            }
            AppError::ImageProcessing(_) | AppError::UploadRejected(_) => LogLevel::Warn,
            AppError::Storage(_)
            | AppError::Config(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => LogLevel::Error,
        }
    }

    /// Emit this error through `tracing` at its own log level.
    pub fn log(&self) {
        match self.log_level() {
            LogLevel::Debug => {
                tracing::debug!(code = self.error_code(), error = %self, "operation failed")
            }
            LogLevel::Warn => {
                tracing::warn!(code = self.error_code(), error = %self, "operation failed")
            }
            LogLevel::Error => {
                tracing::error!(code = self.error_code(), error = %self, "operation failed")
            }
        }
    }
}
