//! End-to-end pipeline tests with in-memory storage and image repositories.
//!
//! Inputs are synthesized with the image crate so no fixture files are
//! needed; the watermark asset is written to a temp directory per test.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

use homestage_core::{Error, ImageReference, ImageVariant, PropertyImageRepository, Result};
use homestage_media::{
    MediaConfig, ObjectStorage, ProgressObserver, Stage, UploadPipeline,
};

#[derive(Debug, Clone)]
struct StoredObject {
    bucket: String,
    key: String,
    bytes: Vec<u8>,
    content_type: String,
}

#[derive(Default)]
struct MockStorage {
    objects: Mutex<Vec<StoredObject>>,
    fail: bool,
}

impl MockStorage {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Storage("simulated outage".to_string()));
        }
        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            bytes: bytes.to_vec(),
            content_type: content_type.to_string(),
        });
        Ok(())
    }
}

#[derive(Default)]
struct MockImages {
    next_id: AtomicI64,
    rows: Mutex<Vec<(ImageVariant, i64, String)>>,
}

impl MockImages {
    fn rows(&self) -> Vec<(ImageVariant, i64, String)> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl PropertyImageRepository for MockImages {
    async fn insert(&self, variant: ImageVariant, property_id: i64, url: &str) -> Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows
            .lock()
            .unwrap()
            .push((variant, property_id, url.to_string()));
        Ok(id)
    }

    async fn list(&self, variant: ImageVariant, property_id: i64) -> Result<Vec<ImageReference>> {
        let _ = (variant, property_id);
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct RecordingObserver {
    stages: Mutex<Vec<Stage>>,
    progress: Mutex<Vec<(Stage, u8)>>,
}

impl ProgressObserver for RecordingObserver {
    fn stage_changed(&self, stage: Stage) {
        self.stages.lock().unwrap().push(stage);
    }

    fn progress(&self, stage: Stage, percent: u8) {
        self.progress.lock().unwrap().push((stage, percent));
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([180, 40, 40]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Writes a watermark asset into a temp dir and returns (dir guard, config).
fn config_with_watermark() -> (TempDir, MediaConfig) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("watermark.png");
    std::fs::write(&path, png_bytes(64, 64)).unwrap();
    let config = MediaConfig {
        bucket: "homestage-generated".to_string(),
        public_base_url: "https://cdn.example.com".to_string(),
        watermark_path: path,
    };
    (dir, config)
}

#[tokio::test]
async fn test_pipeline_uploads_watermarked_jpeg_and_records_reference() {
    let (_dir, config) = config_with_watermark();
    let storage = Arc::new(MockStorage::default());
    let images = Arc::new(MockImages::default());
    let pipeline = UploadPipeline::new(config, storage.clone(), images.clone());

    let upload = pipeline
        .process(42, Some("123 Main St"), png_bytes(1600, 1200))
        .await
        .unwrap();

    let objects = storage.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].bucket, "homestage-generated");
    assert_eq!(objects[0].content_type, "image/jpeg");
    assert_eq!(objects[0].key, upload.key);

    // Stored bytes decode as a JPEG within the dimension cap.
    let stored = image::load_from_memory(&objects[0].bytes).unwrap();
    assert!(stored.width() <= 768 && stored.height() <= 768);
    assert_eq!(
        image::guess_format(&objects[0].bytes).unwrap(),
        ImageFormat::Jpeg
    );

    let rows = images.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, ImageVariant::Generated);
    assert_eq!(rows[0].1, 42);
    assert_eq!(rows[0].2, upload.key);

    assert!(upload.key.starts_with("123-main-st-"));
    assert!(upload.key.ends_with(".jpg"));
    assert_eq!(
        upload.public_url,
        format!("https://cdn.example.com/{}", upload.key)
    );
}

#[tokio::test]
async fn test_small_input_keeps_its_dimensions() {
    let (_dir, config) = config_with_watermark();
    let storage = Arc::new(MockStorage::default());
    let images = Arc::new(MockImages::default());
    let pipeline = UploadPipeline::new(config, storage.clone(), images);

    pipeline
        .process(1, Some("9 Oak Ct"), png_bytes(320, 240))
        .await
        .unwrap();

    let stored = image::load_from_memory(&storage.objects()[0].bytes).unwrap();
    assert_eq!((stored.width(), stored.height()), (320, 240));
}

#[tokio::test]
async fn test_undecodable_input_fails_before_any_side_effect() {
    let (_dir, config) = config_with_watermark();
    let storage = Arc::new(MockStorage::default());
    let images = Arc::new(MockImages::default());
    let observer = Arc::new(RecordingObserver::default());
    let pipeline = UploadPipeline::new(config, storage.clone(), images.clone())
        .with_observer(observer.clone());

    let err = pipeline
        .process(1, None, b"this is a text file, not an image".to_vec())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("validation"));
    assert!(storage.objects().is_empty());
    assert!(images.rows().is_empty());

    // The pipeline stopped at validation; no later stage ran.
    let stages = observer.stages.lock().unwrap().clone();
    assert_eq!(stages, vec![Stage::Validating, Stage::Failed]);
}

#[tokio::test]
async fn test_missing_watermark_asset_aborts_before_upload() {
    let storage = Arc::new(MockStorage::default());
    let images = Arc::new(MockImages::default());
    let config = MediaConfig {
        bucket: "homestage-generated".to_string(),
        public_base_url: "https://cdn.example.com".to_string(),
        watermark_path: PathBuf::from("/nonexistent/watermark.png"),
    };
    let pipeline = UploadPipeline::new(config, storage.clone(), images.clone());

    let err = pipeline
        .process(1, Some("1 Elm St"), png_bytes(100, 100))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("watermark"));
    assert!(storage.objects().is_empty());
    assert!(images.rows().is_empty());
}

#[tokio::test]
async fn test_upload_failure_writes_no_image_reference() {
    let (_dir, config) = config_with_watermark();
    let storage = Arc::new(MockStorage::failing());
    let images = Arc::new(MockImages::default());
    let pipeline = UploadPipeline::new(config, storage, images.clone());

    let err = pipeline
        .process(1, Some("1 Elm St"), png_bytes(100, 100))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Storage(_)));
    assert!(images.rows().is_empty());
}

#[tokio::test]
async fn test_observer_sees_stages_in_order_with_scoped_progress() {
    let (_dir, config) = config_with_watermark();
    let storage = Arc::new(MockStorage::default());
    let images = Arc::new(MockImages::default());
    let observer = Arc::new(RecordingObserver::default());
    let pipeline =
        UploadPipeline::new(config, storage, images).with_observer(observer.clone());

    pipeline
        .process(1, Some("1 Elm St"), png_bytes(1000, 800))
        .await
        .unwrap();

    let stages = observer.stages.lock().unwrap().clone();
    assert_eq!(
        stages,
        vec![
            Stage::Validating,
            Stage::Compressing,
            Stage::Watermarking,
            Stage::Naming,
            Stage::Uploading,
            Stage::Succeeded,
        ]
    );

    // Progress is reported only by the compress and watermark stages,
    // monotonically within each.
    let progress = observer.progress.lock().unwrap().clone();
    assert!(!progress.is_empty());
    for (stage, _) in &progress {
        assert!(matches!(stage, Stage::Compressing | Stage::Watermarking));
    }
    for window in progress
        .iter()
        .filter(|(s, _)| *s == Stage::Compressing)
        .collect::<Vec<_>>()
        .windows(2)
    {
        assert!(window[0].1 <= window[1].1);
    }
}
