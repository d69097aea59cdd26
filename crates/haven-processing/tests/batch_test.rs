//! Optimized batch upload tests.
//!
//! Run with: `cargo test -p haven-processing --test batch_test`

mod helpers;

use std::collections::HashSet;
use std::sync::Arc;

use haven_core::{ImageSize, UploadStatus};
use haven_processing::{BatchUploader, ThumbnailGenerator, UploadValidator};
use helpers::fixtures;
use helpers::generators::UnavailableGenerator;
use helpers::storage::MockStorage;
use helpers::{assert_monotonic, ProgressRecorder};

fn uploader(storage: &Arc<MockStorage>) -> BatchUploader {
    BatchUploader::new(storage.clone(), Arc::new(ThumbnailGenerator::new()))
}

/// Timestamp segment of `{property}/{timestamp}[_size].{ext}`.
fn timestamp_of(path: &str) -> i64 {
    let file = path.rsplit('/').next().unwrap();
    let stem = file.split(['.', '_']).next().unwrap();
    stem.parse().unwrap()
}

#[tokio::test]
async fn test_all_images_succeed() {
    let storage = Arc::new(MockStorage::new());
    let recorder = ProgressRecorder::new();
    let files = fixtures::listing_photos();

    let result = uploader(&storage)
        .upload_batch(&files, "prop-1", Some(recorder.observer()))
        .await;

    assert!(result.success);
    assert!(result.errors.is_empty());
    assert_eq!(result.images.len(), 3);
    assert_eq!(storage.keys().len(), 12);

    for record in &result.images {
        let distinct: HashSet<&str> = record.paths().into_iter().collect();
        assert_eq!(distinct.len(), 4);
        for path in record.paths() {
            assert!(path.starts_with("prop-1/"));
            assert!(path.ends_with(".jpg"));
            assert!(storage.object(path).is_some());
        }
        assert_eq!(record.small, record.original.replace(".jpg", "_small.jpg"));
    }

    // Timestamps are consecutive in file order
    let base = timestamp_of(&result.images[0].original);
    for (index, record) in result.images.iter().enumerate() {
        assert_eq!(timestamp_of(&record.original), base + index as i64);
    }

    for entry in recorder.last() {
        assert_eq!(entry.status, UploadStatus::Completed);
        assert_eq!(entry.progress, 100);
    }
    for index in 0..files.len() {
        assert_monotonic(&recorder.history(index));
    }
}

#[tokio::test]
async fn test_original_is_stored_unmodified() {
    let storage = Arc::new(MockStorage::new());
    let files = vec![fixtures::jpeg("porch.JPG", 1000, 700)];

    let result = uploader(&storage).upload_batch(&files, "prop-9", None).await;

    let record = &result.images[0];
    assert!(record.original.ends_with(".jpg"));
    let original = storage.object(&record.original).unwrap();
    assert_eq!(original.data, files[0].data);
    assert_eq!(original.content_type, "image/jpeg");

    let small = storage.object(record.path(ImageSize::Small)).unwrap();
    let decoded = image::load_from_memory(&small.data).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (300, 210));
}

#[tokio::test]
async fn test_each_size_is_stored_under_its_own_key() {
    let storage = Arc::new(MockStorage::new());
    let files = vec![fixtures::jpeg("lounge.jpg", 1000, 1000)];

    let result = uploader(&storage).upload_batch(&files, "prop-8", None).await;
    assert_eq!(storage.put_attempts(), 4);

    let record = &result.images[0];
    for (size, expected) in [
        (ImageSize::Original, (1000, 1000)),
        (ImageSize::Small, (200, 200)),
        (ImageSize::Medium, (400, 400)),
        (ImageSize::Large, (600, 600)),
    ] {
        let stored = storage.object(record.path(size)).unwrap();
        let decoded = image::load_from_memory(&stored.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), expected, "{:?}", size);
    }
}

#[tokio::test]
async fn test_one_failed_put_fails_only_that_image() {
    // The second file is the only PNG, so only its puts can match
    let storage = Arc::new(MockStorage::failing_when(|key| key.ends_with("_medium.png")));
    let recorder = ProgressRecorder::new();
    let files = vec![
        fixtures::jpeg("a.jpg", 800, 600),
        fixtures::png("b.png", 800, 600),
        fixtures::jpeg("c.jpg", 800, 600),
    ];

    let result = uploader(&storage)
        .upload_batch(&files, "prop-2", Some(recorder.observer()))
        .await;

    assert!(!result.success);
    assert_eq!(result.images.len(), 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].index, 1);
    assert!(result.errors[0].error.contains("injected failure"));
    assert!(result.images[0].original.ends_with(".jpg"));
    assert!(timestamp_of(&result.images[0].original) < timestamp_of(&result.images[1].original));

    let last = recorder.last();
    assert_eq!(last[0].status, UploadStatus::Completed);
    assert_eq!(last[1].status, UploadStatus::Error);
    assert_eq!(last[1].progress, 0);
    assert!(last[1].error.as_deref().unwrap().contains("_medium.png"));
    assert_eq!(last[2].status, UploadStatus::Completed);

    // Index 1 reached uploading before failing
    let history = recorder.history(1);
    assert!(history.contains(&(UploadStatus::Uploading, 25)));
    assert_monotonic(&history);

    // Sibling puts of the failed image are not rolled back
    assert_eq!(storage.put_attempts(), 12);
    assert_eq!(storage.keys().len(), 11);
}

#[tokio::test]
async fn test_undecodable_image_fails_alone() {
    let storage = Arc::new(MockStorage::new());
    let files = vec![
        fixtures::jpeg("a.jpg", 400, 300),
        fixtures::corrupt_jpeg("b.jpg"),
    ];

    let result = uploader(&storage).upload_batch(&files, "prop-3", None).await;

    assert_eq!(result.images.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].index, 1);
    assert!(result.errors[0].error.starts_with("Failed to decode image"));
    assert_eq!(result.images.len() + result.errors.len(), files.len());
    // Nothing was stored for the broken file
    assert_eq!(storage.put_attempts(), 4);
}

#[tokio::test]
async fn test_generator_failure_aborts_batch() {
    let storage = Arc::new(MockStorage::new());
    let recorder = ProgressRecorder::new();
    let files = fixtures::listing_photos();

    let result = BatchUploader::new(storage.clone(), Arc::new(UnavailableGenerator))
        .upload_batch(&files, "prop-4", Some(recorder.observer()))
        .await;

    assert!(!result.success);
    assert!(result.images.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].index, -1);
    assert_eq!(
        result.batch_start_error(),
        Some("Batch could not start: image codec unavailable")
    );
    assert_eq!(storage.put_attempts(), 0);

    let last = recorder.last();
    assert_eq!(last.len(), 3);
    for entry in last {
        assert_eq!(entry.status, UploadStatus::Error);
        assert_eq!(entry.progress, 0);
        assert_eq!(
            entry.error.as_deref(),
            Some("Batch could not start: image codec unavailable")
        );
    }
}

#[tokio::test]
async fn test_invalid_property_id_aborts_batch() {
    let storage = Arc::new(MockStorage::new());
    let files = fixtures::listing_photos();

    let result = uploader(&storage).upload_batch(&files, "../other", None).await;

    assert!(result.batch_start_error().is_some());
    assert_eq!(storage.put_attempts(), 0);
}

#[tokio::test]
async fn test_validator_rejects_single_file() {
    let storage = Arc::new(MockStorage::new());
    let files = vec![
        fixtures::jpeg("a.jpg", 400, 300),
        fixtures::jpeg("b.tiff", 400, 300),
        fixtures::jpeg("c.jpg", 400, 300),
    ];
    let validator = UploadValidator::new(
        10 * 1024 * 1024,
        vec!["jpg".to_string(), "jpeg".to_string()],
        vec!["image/jpeg".to_string()],
    );

    let result = uploader(&storage)
        .with_validator(validator)
        .upload_batch(&files, "prop-5", None)
        .await;

    assert_eq!(result.images.len(), 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].index, 1);
    assert!(result.errors[0].error.starts_with("Invalid upload"));
    // The surviving files keep their own timestamps
    assert_eq!(
        timestamp_of(&result.images[1].original) - timestamp_of(&result.images[0].original),
        2
    );
}

#[tokio::test]
async fn test_empty_batch() {
    let storage = Arc::new(MockStorage::new());
    let result = uploader(&storage).upload_batch(&[], "prop-6", None).await;

    assert!(result.success);
    assert!(result.images.is_empty());
    assert!(result.errors.is_empty());
}
