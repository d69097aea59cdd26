//! Haven Storage Library
//!
//! Remote object storage for listing images: the `Storage` trait the ingestion
//! pipeline is handed, plus S3 and local filesystem implementations.
//!
//! # Storage key format
//!
//! Every image of a property lives under the property's prefix:
//!
//! - **Original**: `{property_id}/{timestamp}.{ext}`
//! - **Resized**: `{property_id}/{timestamp}_{small|medium|large}.{ext}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in
//! the `keys` module so every backend and uploader agrees on the layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;
pub mod urls;

// Re-export commonly used types
pub use factory::create_storage;
pub use haven_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use urls::{resolve_urls, ImageUrls};
