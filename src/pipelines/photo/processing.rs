// SPDX-License-Identifier: MPL-2.0

//! Frame preparation before encoding
//!
//! Drops the alpha channel, strips stride padding and optionally mirrors the
//! image so that front-camera photos match what the preview showed.

use crate::backends::camera::types::CameraFrame;
use crate::errors::PhotoError;
use image::RgbImage;
use std::sync::Arc;
use tracing::debug;

/// Post-processing configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostProcessingConfig {
    /// Flip horizontally
    pub mirror: bool,
}

/// RGB image ready for encoding
pub struct ProcessedImage {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

pub struct PostProcessor {
    config: PostProcessingConfig,
}

impl PostProcessor {
    pub fn new(config: PostProcessingConfig) -> Self {
        Self { config }
    }

    /// Convert the frame on a blocking worker
    pub async fn process(&self, frame: Arc<CameraFrame>) -> Result<ProcessedImage, PhotoError> {
        let config = self.config;
        tokio::task::spawn_blocking(move || process_frame(&frame, config))
            .await
            .map_err(|e| PhotoError::EncodingFailed(format!("Processing task error: {}", e)))?
    }
}

/// RGBA (with stride) to RGB, mirrored if requested
pub fn process_frame(
    frame: &CameraFrame,
    config: PostProcessingConfig,
) -> Result<ProcessedImage, PhotoError> {
    if !frame.is_complete() {
        return Err(PhotoError::InvalidFrame(format!(
            "{}x{} frame with stride {} has only {} bytes",
            frame.width,
            frame.height,
            frame.stride,
            frame.data.len()
        )));
    }

    let width = frame.width as usize;
    let mut rgb = Vec::with_capacity(width * frame.height as usize * 3);

    for row in frame
        .data
        .chunks(frame.stride as usize)
        .take(frame.height as usize)
    {
        let pixels = row[..width * 4].chunks_exact(4);
        if config.mirror {
            pixels.rev().for_each(|px| rgb.extend_from_slice(&px[..3]));
        } else {
            pixels.for_each(|px| rgb.extend_from_slice(&px[..3]));
        }
    }

    let image = RgbImage::from_raw(frame.width, frame.height, rgb)
        .ok_or_else(|| PhotoError::InvalidFrame("RGB buffer size mismatch".to_string()))?;

    debug!(
        width = frame.width,
        height = frame.height,
        mirror = config.mirror,
        "Frame converted to RGB"
    );

    Ok(ProcessedImage {
        image,
        width: frame.width,
        height: frame.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pixel_frame() -> CameraFrame {
        // red, green; 4 padding bytes per row
        CameraFrame {
            width: 2,
            height: 1,
            data: Arc::from(vec![255, 0, 0, 255, 0, 255, 0, 255, 9, 9, 9, 9]),
            stride: 12,
            captured_at: std::time::Instant::now(),
        }
    }

    #[test]
    fn test_alpha_and_padding_dropped() {
        let processed = process_frame(&two_pixel_frame(), PostProcessingConfig::default()).unwrap();
        assert_eq!(processed.image.as_raw(), &vec![255, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn test_mirror_swaps_columns() {
        let processed =
            process_frame(&two_pixel_frame(), PostProcessingConfig { mirror: true }).unwrap();
        assert_eq!(processed.image.as_raw(), &vec![0, 255, 0, 255, 0, 0]);
    }

    #[test]
    fn test_truncated_frame_rejected() {
        let frame = CameraFrame::from_rgba(4, 4, vec![0; 8]);
        assert!(matches!(
            process_frame(&frame, PostProcessingConfig::default()),
            Err(PhotoError::InvalidFrame(_))
        ));
    }
}
