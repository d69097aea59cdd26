//! Shared key generation for storage backends and uploaders.
//!
//! Key format: `{property_id}/{timestamp}{suffix}.{ext}` where `suffix` is empty
//! for the original and `_small`, `_medium` or `_large` for resized variants.

use haven_core::constants::FALLBACK_EXTENSION;
use haven_core::{ImageSize, SourceImage};

use crate::traits::{StorageError, StorageResult};

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// A property id becomes the first path segment, so it must be exactly one
/// non-empty segment.
pub fn validate_property_id(property_id: &str) -> StorageResult<()> {
    if property_id.trim().is_empty() {
        return Err(StorageError::InvalidKey("Property id is empty".to_string()));
    }
    if property_id.contains('/') || property_id.contains('\\') || property_id.contains("..") {
        return Err(StorageError::InvalidKey(format!(
            "Property id is not a single path segment: {}",
            property_id
        )));
    }
    Ok(())
}

/// Base path shared by all renditions of one image: `{property_id}/{timestamp}`.
pub fn base_path(property_id: &str, timestamp: i64) -> StorageResult<String> {
    validate_property_id(property_id)?;
    Ok(format!("{}/{}", property_id, timestamp))
}

/// Full key of one rendition.
pub fn variant_path(base: &str, size: ImageSize, extension: &str) -> String {
    format!("{}{}.{}", base, size.path_suffix(), extension)
}

/// Extension used for every stored rendition of `image`.
///
/// Taken from the file name; when the name has none, from the MIME type.
pub fn extension_for(image: &SourceImage) -> String {
    image
        .extension()
        .or_else(|| extension_from_content_type(&image.content_type).map(String::from))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/bmp" => Some("bmp"),
        "image/avif" => Some("avif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_paths() {
        let base = base_path("prop-42", 1_700_000_000_001).unwrap();
        assert_eq!(base, "prop-42/1700000000001");
        assert_eq!(
            variant_path(&base, ImageSize::Original, "jpg"),
            "prop-42/1700000000001.jpg"
        );
        assert_eq!(
            variant_path(&base, ImageSize::Medium, "jpg"),
            "prop-42/1700000000001_medium.jpg"
        );
    }

    #[test]
    fn test_property_id_must_be_one_segment() {
        assert!(base_path("", 1).is_err());
        assert!(base_path("  ", 1).is_err());
        assert!(base_path("a/b", 1).is_err());
        assert!(base_path("..", 1).is_err());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("p/1.jpg").is_ok());
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(
            validate_key("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_key("/etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_extension_for() {
        let named = SourceImage::new("Front.PNG", "image/png", Vec::<u8>::new());
        assert_eq!(extension_for(&named), "png");

        let unnamed = SourceImage::new("blob", "image/webp", Vec::<u8>::new());
        assert_eq!(extension_for(&unnamed), "webp");

        let unknown = SourceImage::new("blob", "application/octet-stream", Vec::<u8>::new());
        assert_eq!(extension_for(&unknown), "bin");
    }
}
