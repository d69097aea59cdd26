//! Shared helpers for the Haven command-line tools.

use std::path::Path;

use haven_core::{AppError, BatchError, BatchUploadResult, StoredImageRecord, UploadProgressEntry};
use haven_storage::{resolve_urls, ImageUrls, Storage, StorageResult};
use serde::Serialize;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// MIME type guessed from a file's extension.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Extra line printed after a failed run when retrying could help.
pub fn retry_hint(err: &AppError) -> Option<&'static str> {
    err.is_recoverable()
        .then_some("The failure may be temporary; run the upload again to retry.")
}

/// One-line rendering of a progress snapshot.
pub fn format_progress(snapshot: &[UploadProgressEntry]) -> String {
    snapshot
        .iter()
        .map(|e| format!("{} {}% {}", e.file_name, e.progress, e.status))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[derive(Debug, Serialize)]
pub struct StoredImageReport {
    pub paths: StoredImageRecord,
    pub urls: ImageUrls,
}

/// What `haven-upload` prints once a run finishes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub property_id: String,
    pub used_fallback: bool,
    pub success: bool,
    pub images: Vec<StoredImageReport>,
    pub errors: Vec<BatchError>,
}

impl UploadReport {
    pub fn build(
        property_id: &str,
        storage: &dyn Storage,
        result: &BatchUploadResult,
        used_fallback: bool,
    ) -> StorageResult<Self> {
        let images = result
            .images
            .iter()
            .map(|record| {
                Ok(StoredImageReport {
                    urls: resolve_urls(storage, record)?,
                    paths: record.clone(),
                })
            })
            .collect::<StorageResult<Vec<_>>>()?;

        Ok(Self {
            property_id: property_id.to_string(),
            used_fallback,
            success: result.success,
            images,
            errors: result.errors.clone(),
        })
    }

    pub fn print_table(&self) {
        println!("Property: {}", self.property_id);
        if self.used_fallback {
            println!("Mode: original only (fallback)");
        }
        println!();
        println!("{:<6} {:<40} {:<60}", "Size", "Path", "URL");
        println!("{}", "-".repeat(108));
        for image in &self.images {
            for (size, path, url) in [
                ("orig", &image.paths.original, &image.urls.original),
                ("small", &image.paths.small, &image.urls.small),
                ("medium", &image.paths.medium, &image.urls.medium),
                ("large", &image.paths.large, &image.urls.large),
            ] {
                println!(
                    "{:<6} {:<40} {:<60}",
                    size,
                    truncate_string(path, 40),
                    truncate_string(url, 60)
                );
            }
            println!();
        }
        for error in &self.errors {
            println!("#{:<5} {}", error.index, error.error);
        }
    }
}
