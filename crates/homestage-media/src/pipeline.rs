//! Client-side upload pipeline: validate → compress → watermark → name →
//! upload.
//!
//! The pipeline is an explicit state machine with single-writer transitions.
//! Stages execute strictly in sequence; a failure at any stage aborts the
//! remainder and surfaces a stage-specific message, and no generated
//! image-reference row is written unless the upload succeeded. Progress
//! percentages are observable outputs of the Compressing and Watermarking
//! stages only.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{overlay, FilterType};
use image::{DynamicImage, GenericImageView};
use tracing::{debug, info, warn};

use homestage_core::defaults::{
    COMPRESS_JPEG_QUALITY, FILENAME_RANDOM_BYTES, MAX_IMAGE_DIMENSION_PX, MAX_UPLOAD_BYTES,
    OUTPUT_CONTENT_TYPE, WATERMARK_JPEG_QUALITY,
};
use homestage_core::{Error, ImageVariant, PropertyImageRepository, Result};

use crate::slug::slug_or_default;
use crate::storage::{resolve_public_url, ObjectStorage};

/// Pipeline state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    Compressing,
    Watermarking,
    Naming,
    Uploading,
    Succeeded,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::Compressing => "compressing",
            Stage::Watermarking => "watermarking",
            Stage::Naming => "naming",
            Stage::Uploading => "uploading",
            Stage::Succeeded => "succeeded",
            Stage::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observer seam for stage transitions and in-stage progress.
///
/// Default methods are no-ops so callers only implement what they render.
pub trait ProgressObserver: Send + Sync {
    fn stage_changed(&self, _stage: Stage) {}
    fn progress(&self, _stage: Stage, _percent: u8) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// Process-wide media configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Bucket receiving every generated image.
    pub bucket: String,
    /// Public base URL generated keys resolve against at display time.
    pub public_base_url: String,
    /// Watermark asset composited over every upload.
    pub watermark_path: PathBuf,
}

/// A completed upload: the stored key and the appended image reference.
#[derive(Debug, Clone)]
pub struct GeneratedUpload {
    pub key: String,
    pub image_ref_id: i64,
    pub public_url: String,
}

/// The upload pipeline. One invocation per image; concurrent invocations
/// for different properties are independent.
pub struct UploadPipeline {
    config: MediaConfig,
    storage: Arc<dyn ObjectStorage>,
    images: Arc<dyn PropertyImageRepository>,
    observer: Arc<dyn ProgressObserver>,
}

impl UploadPipeline {
    pub fn new(
        config: MediaConfig,
        storage: Arc<dyn ObjectStorage>,
        images: Arc<dyn PropertyImageRepository>,
    ) -> Self {
        Self {
            config,
            storage,
            images,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Attach a progress observer.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run the full pipeline for one input image.
    ///
    /// On success a generated image reference has been appended to the
    /// property; on any failure no row was written.
    pub async fn process(
        &self,
        property_id: i64,
        street: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<GeneratedUpload> {
        let start = Instant::now();
        match self.run(property_id, street, bytes).await {
            Ok(upload) => {
                self.observer.stage_changed(Stage::Succeeded);
                info!(
                    subsystem = "media",
                    component = "pipeline",
                    op = "process",
                    property_id = property_id,
                    key = %upload.key,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Upload pipeline succeeded"
                );
                Ok(upload)
            }
            Err(e) => {
                self.observer.stage_changed(Stage::Failed);
                warn!(
                    subsystem = "media",
                    component = "pipeline",
                    op = "process",
                    property_id = property_id,
                    error = %e,
                    "Upload pipeline failed"
                );
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        property_id: i64,
        street: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<GeneratedUpload> {
        // Validate
        self.observer.stage_changed(Stage::Validating);
        let input = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&bytes)
                .map_err(|e| Error::Image(format!("validation: input is not a decodable image: {}", e)))
        })
        .await
        .map_err(|e| Error::Internal(format!("image task panicked: {}", e)))??;

        // Compress
        self.observer.stage_changed(Stage::Compressing);
        self.observer.progress(Stage::Compressing, 0);
        let observer = self.observer.clone();
        let compressed = tokio::task::spawn_blocking(move || {
            let resized = resize_to_fit(input, MAX_IMAGE_DIMENSION_PX);
            observer.progress(Stage::Compressing, 50);
            let jpeg = encode_jpeg(&resized, COMPRESS_JPEG_QUALITY)?;
            observer.progress(Stage::Compressing, 100);
            Ok::<_, Error>(jpeg)
        })
        .await
        .map_err(|e| Error::Internal(format!("image task panicked: {}", e)))??;

        if compressed.len() > MAX_UPLOAD_BYTES {
            return Err(Error::Image(format!(
                "compression: output is {} bytes, over the {} byte budget",
                compressed.len(),
                MAX_UPLOAD_BYTES
            )));
        }
        debug!(
            subsystem = "media",
            component = "pipeline",
            op = "compress",
            bytes = compressed.len(),
            "Compressed input"
        );

        // Watermark
        self.observer.stage_changed(Stage::Watermarking);
        self.observer.progress(Stage::Watermarking, 0);
        let asset = tokio::fs::read(&self.config.watermark_path)
            .await
            .map_err(|e| {
                Error::Image(format!(
                    "watermark: failed to load asset {}: {}",
                    self.config.watermark_path.display(),
                    e
                ))
            })?;
        let observer = self.observer.clone();
        let watermarked = tokio::task::spawn_blocking(move || {
            let base = image::load_from_memory(&compressed)
                .map_err(|e| Error::Image(format!("watermark: re-decode failed: {}", e)))?;
            let mark = image::load_from_memory(&asset)
                .map_err(|e| Error::Image(format!("watermark: asset is not a decodable image: {}", e)))?;
            observer.progress(Stage::Watermarking, 50);

            // The watermark is stretched to exactly cover the source,
            // never tiled or anchored.
            let (w, h) = base.dimensions();
            let stretched = mark.resize_exact(w, h, FilterType::Lanczos3);
            let mut canvas = base.to_rgba8();
            overlay(&mut canvas, &stretched.to_rgba8(), 0, 0);

            let jpeg = encode_jpeg(&DynamicImage::ImageRgba8(canvas), WATERMARK_JPEG_QUALITY)?;
            observer.progress(Stage::Watermarking, 100);
            Ok::<_, Error>(jpeg)
        })
        .await
        .map_err(|e| Error::Internal(format!("image task panicked: {}", e)))??;

        // Name
        self.observer.stage_changed(Stage::Naming);
        let key = generate_key(street);

        // Upload, then append the image reference. On upload failure no
        // row is written; an orphan reference must never exist.
        self.observer.stage_changed(Stage::Uploading);
        self.storage
            .put(&self.config.bucket, &key, &watermarked, OUTPUT_CONTENT_TYPE)
            .await?;
        let image_ref_id = self
            .images
            .insert(ImageVariant::Generated, property_id, &key)
            .await?;

        Ok(GeneratedUpload {
            public_url: resolve_public_url(&self.config.public_base_url, &key),
            key,
            image_ref_id,
        })
    }
}

/// Downsize so neither dimension exceeds `max_px`, preserving aspect ratio.
/// Images already within bounds are returned unchanged.
fn resize_to_fit(img: DynamicImage, max_px: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_px && height <= max_px {
        return img;
    }
    img.resize(max_px, max_px, FilterType::Lanczos3)
}

/// Encode as JPEG at the given quality factor.
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut cursor = Cursor::new(&mut buf);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| Error::Image(format!("jpeg encode failed: {}", e)))?;
    Ok(buf)
}

/// Deterministic filename: `{slug}-{hex suffix}.jpg`.
fn generate_key(street: Option<&str>) -> String {
    let suffix: [u8; FILENAME_RANDOM_BYTES] = rand::random();
    format!("{}-{}.jpg", slug_or_default(street), hex::encode(suffix))
}
