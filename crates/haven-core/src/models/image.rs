//! Source images and their resized variants.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A raw image selected for upload: opaque bytes plus name and MIME type.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl SourceImage {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Lowercased extension of the file name, if it has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map(|e| e.to_lowercase())
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// The four stored renditions of one source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Original,
    Small,
    Medium,
    Large,
}

impl ImageSize {
    pub const ALL: [ImageSize; 4] = [
        ImageSize::Original,
        ImageSize::Small,
        ImageSize::Medium,
        ImageSize::Large,
    ];

    /// Suffix appended to the base storage path (`{base}{suffix}.{ext}`).
    pub fn path_suffix(self) -> &'static str {
        match self {
            ImageSize::Original => "",
            ImageSize::Small => "_small",
            ImageSize::Medium => "_medium",
            ImageSize::Large => "_large",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Original => "original",
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
        }
    }
}

/// One rendition of an image.
#[derive(Debug, Clone)]
pub struct ImageVariant {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
    pub content_type: String,
}

/// Exactly four renditions derived from one `SourceImage`.
///
/// `original` carries the source bytes untouched.
#[derive(Debug, Clone)]
pub struct ImageVariantSet {
    pub original: ImageVariant,
    pub small: ImageVariant,
    pub medium: ImageVariant,
    pub large: ImageVariant,
}

impl ImageVariantSet {
    pub fn get(&self, size: ImageSize) -> &ImageVariant {
        match size {
            ImageSize::Original => &self.original,
            ImageSize::Small => &self.small,
            ImageSize::Medium => &self.medium,
            ImageSize::Large => &self.large,
        }
    }

    /// All four variants paired with their size, original first.
    pub fn iter(&self) -> impl Iterator<Item = (ImageSize, &ImageVariant)> {
        ImageSize::ALL.into_iter().map(move |size| (size, self.get(size)))
    }
}
