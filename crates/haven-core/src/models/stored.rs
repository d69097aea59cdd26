//! Persisted image references.
//!
//! Property records store an ordered list of images. Current data stores one
//! path per size; older listings stored a single bare path string. Both shapes
//! are accepted here and normalized into `StoredImageRecord` so nothing
//! downstream has to care which one it got.

use serde::{Deserialize, Serialize};

use super::image::ImageSize;

/// Storage paths of the four renditions of one image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StoredImageRef")]
pub struct StoredImageRecord {
    pub original: String,
    pub small: String,
    pub medium: String,
    pub large: String,
}

impl StoredImageRecord {
    /// A record that points every size at the same object.
    pub fn single(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            original: path.clone(),
            small: path.clone(),
            medium: path.clone(),
            large: path,
        }
    }

    pub fn path(&self, size: ImageSize) -> &str {
        match size {
            ImageSize::Original => &self.original,
            ImageSize::Small => &self.small,
            ImageSize::Medium => &self.medium,
            ImageSize::Large => &self.large,
        }
    }

    pub fn paths(&self) -> [&str; 4] {
        [&self.original, &self.small, &self.medium, &self.large]
    }

    /// True when no real thumbnails exist (legacy data or the fallback upload).
    pub fn is_single_object(&self) -> bool {
        self.small == self.original && self.medium == self.original && self.large == self.original
    }
}

/// Either shape of a persisted image, as found in a property record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredImageRef {
    Legacy(String),
    Record {
        original: String,
        small: String,
        medium: String,
        large: String,
    },
}

impl From<StoredImageRef> for StoredImageRecord {
    fn from(value: StoredImageRef) -> Self {
        match value {
            StoredImageRef::Legacy(path) => StoredImageRecord::single(path),
            StoredImageRef::Record {
                original,
                small,
                medium,
                large,
            } => StoredImageRecord {
                original,
                small,
                medium,
                large,
            },
        }
    }
}

impl From<StoredImageRecord> for StoredImageRef {
    fn from(value: StoredImageRecord) -> Self {
        StoredImageRef::Record {
            original: value.original,
            small: value.small,
            medium: value.medium,
            large: value.large,
        }
    }
}

/// Normalize a property's `images` list into four-field records, keeping order.
pub fn normalize_images(images: Vec<StoredImageRef>) -> Vec<StoredImageRecord> {
    images.into_iter().map(StoredImageRecord::from).collect()
}
