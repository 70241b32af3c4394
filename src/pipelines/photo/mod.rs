// SPDX-License-Identifier: MPL-2.0

//! Async photo capture pipeline
//!
//! ```text
//! Preview frame (RGBA) → Post-Processing → JPEG Encoding → Disk I/O
//!       ↓
//! Preview continues uninterrupted
//! ```
//!
//! Every stage runs on a blocking worker, so the preview keeps streaming
//! while a photo is written.

pub mod encoding;
pub mod processing;

pub use encoding::{EncodedImage, EncodingQuality, PhotoEncoder, encode_jpeg};
pub use processing::{PostProcessingConfig, PostProcessor, ProcessedImage, process_frame};

use crate::backends::camera::types::CameraFrame;
use crate::errors::PhotoError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Orchestrates process → encode → save
pub struct PhotoPipeline {
    post_processor: PostProcessor,
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    pub fn new(mirror: bool, quality: EncodingQuality) -> Self {
        Self {
            post_processor: PostProcessor::new(PostProcessingConfig { mirror }),
            encoder: PhotoEncoder::new(quality),
        }
    }

    /// Turn a preview frame into a JPEG file in `output_dir`
    pub async fn capture_and_save(
        &self,
        frame: Arc<CameraFrame>,
        output_dir: PathBuf,
    ) -> Result<PathBuf, PhotoError> {
        info!(
            width = frame.width,
            height = frame.height,
            frame_age_ms = frame.captured_at.elapsed().as_millis(),
            "Capturing photo"
        );

        let processed = self.post_processor.process(frame).await?;
        let encoded = self.encoder.encode(processed).await?;
        self.encoder.save(encoded, output_dir).await
    }
}

/// Capture the given frame, or fail when there is none yet
pub async fn take_picture(
    frame: Option<Arc<CameraFrame>>,
    output_dir: PathBuf,
    mirror: bool,
    quality: EncodingQuality,
) -> Result<PathBuf, PhotoError> {
    let frame = frame.ok_or(PhotoError::NoFrameAvailable)?;
    PhotoPipeline::new(mirror, quality)
        .capture_and_save(frame, output_dir)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lensflip-photo-{}-{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_take_picture_writes_jpeg() {
        let dir = scratch_dir("write");
        let _ = std::fs::remove_dir_all(&dir);

        let frame = Arc::new(CameraFrame::from_rgba(16, 8, vec![128; 16 * 8 * 4]));
        let path = take_picture(Some(frame), dir.clone(), true, EncodingQuality::Low)
            .await
            .unwrap();

        assert_eq!(path.extension().unwrap(), "jpg");
        let bytes = std::fs::read(&path).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_two_captures_do_not_overwrite() {
        let dir = scratch_dir("twice");
        let _ = std::fs::remove_dir_all(&dir);

        let frame = Arc::new(CameraFrame::from_rgba(4, 4, vec![0; 64]));
        let first = take_picture(Some(frame.clone()), dir.clone(), false, EncodingQuality::High)
            .await
            .unwrap();
        let second = take_picture(Some(frame), dir.clone(), false, EncodingQuality::High)
            .await
            .unwrap();

        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_captures_keep_every_photo() {
        let dir = scratch_dir("concurrent");
        let _ = std::fs::remove_dir_all(&dir);

        // Each capture gets its own width so the files can be told apart
        let tasks: Vec<_> = (1..=16u32)
            .map(|width| {
                let dir = dir.clone();
                tokio::spawn(async move {
                    let frame = Arc::new(CameraFrame::from_rgba(
                        width,
                        2,
                        vec![200; (width * 2 * 4) as usize],
                    ));
                    let path = take_picture(Some(frame), dir, false, EncodingQuality::Low)
                        .await
                        .unwrap();
                    (width, path)
                })
            })
            .collect();

        let mut paths = Vec::new();
        for task in tasks {
            let (width, path) = task.await.unwrap();
            let decoded = image::open(&path).unwrap();
            assert_eq!(decoded.width(), width, "{} holds another capture", path.display());
            paths.push(path);
        }

        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 16);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_frame_fails() {
        let result = take_picture(None, scratch_dir("none"), false, EncodingQuality::High).await;
        assert!(matches!(result, Err(PhotoError::NoFrameAvailable)));
    }
}
