//! Public URL resolution for stored image records.

use haven_core::{ImageSize, StoredImageRecord};
use serde::Serialize;

use crate::traits::{Storage, StorageResult};

/// Public URLs of the four renditions of one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUrls {
    pub original: String,
    pub small: String,
    pub medium: String,
    pub large: String,
}

/// Map every path of `record` to its public URL.
pub fn resolve_urls(storage: &dyn Storage, record: &StoredImageRecord) -> StorageResult<ImageUrls> {
    Ok(ImageUrls {
        original: storage.public_url(record.path(ImageSize::Original))?,
        small: storage.public_url(record.path(ImageSize::Small))?,
        medium: storage.public_url(record.path(ImageSize::Medium))?,
        large: storage.public_url(record.path(ImageSize::Large))?,
    })
}
