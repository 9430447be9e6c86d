//! Image processing and upload pipeline for homestage.
//!
//! Converts an operator-supplied staging render into a published image
//! reference: the input is validated, downsized and recompressed, stamped
//! with the company watermark, given a collision-resistant filename, and
//! uploaded to object storage before the reference row is written.

pub mod pipeline;
pub mod slug;
pub mod storage;

pub use pipeline::{
    GeneratedUpload, MediaConfig, NoopObserver, ProgressObserver, Stage, UploadPipeline,
};
pub use slug::slug_or_default;
pub use storage::{resolve_public_url, ObjectStorage, S3ObjectStorage};
