//! Application-wide constants.

/// Progress reported once an image's variants are ready and its uploads begin.
pub const PROGRESS_UPLOADING: u8 = 25;

/// Progress reported once every storage put for an image has been acknowledged.
pub const PROGRESS_COMPLETED: u8 = 100;

/// Index used for the synthetic error entry of a batch that could not start.
pub const BATCH_START_ERROR_INDEX: i64 = -1;

/// Extension used for stored objects when neither the file name nor the MIME
/// type yields one.
pub const FALLBACK_EXTENSION: &str = "bin";
