//! Image processing module
//!
//! Resizing and thumbnail generation for uploaded listing photos.

pub mod resize;
pub mod thumbnail;

pub use resize::{ImageResize, ResizeBounds};
pub use thumbnail::{ThumbnailGenerator, ThumbnailPresets, VariantBatch, VariantGenerator, VariantPreset};
