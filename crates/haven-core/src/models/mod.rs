//! Data models for the image ingestion pipeline
//!
//! Organized by lifecycle stage: what the user selected (`image`), what ends up
//! persisted on the property record (`stored`), and what the pipeline reports
//! while and after it runs (`progress`, `batch`).

mod batch;
mod image;
mod progress;
mod stored;

pub use batch::*;
pub use image::*;
pub use progress::*;
pub use stored::*;
