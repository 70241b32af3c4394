// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding and writing to disk

use super::processing::ProcessedImage;
use crate::constants::storage::PHOTO_MIME_TYPE;
use crate::errors::PhotoError;
use crate::storage;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// JPEG quality presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingQuality {
    Low,
    Medium,
    #[default]
    High,
    Maximum,
}

impl EncodingQuality {
    pub const ALL: [EncodingQuality; 4] = [
        EncodingQuality::Low,
        EncodingQuality::Medium,
        EncodingQuality::High,
        EncodingQuality::Maximum,
    ];

    /// JPEG quality value (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            EncodingQuality::Low => 60,
            EncodingQuality::Medium => 80,
            EncodingQuality::High => 92,
            EncodingQuality::Maximum => 98,
        }
    }
}

/// Encoded image data ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn extension(&self) -> &'static str {
        "jpg"
    }
}

pub struct PhotoEncoder {
    quality: EncodingQuality,
}

impl PhotoEncoder {
    pub fn new(quality: EncodingQuality) -> Self {
        Self { quality }
    }

    /// Encode on a blocking worker
    pub async fn encode(&self, processed: ProcessedImage) -> Result<EncodedImage, PhotoError> {
        let quality = self.quality;
        tokio::task::spawn_blocking(move || -> Result<EncodedImage, PhotoError> {
            let data = encode_jpeg(&processed.image, quality)?;
            debug!(size = data.len(), ?quality, "Encoding complete");
            Ok(EncodedImage {
                data,
                mime_type: PHOTO_MIME_TYPE,
                width: processed.width,
                height: processed.height,
            })
        })
        .await
        .map_err(|e| PhotoError::EncodingFailed(format!("Encoding task error: {}", e)))?
    }

    /// Write to a fresh file in `output_dir`, creating the directory if needed
    pub async fn save(
        &self,
        encoded: EncodedImage,
        output_dir: PathBuf,
    ) -> Result<PathBuf, PhotoError> {
        tokio::task::spawn_blocking(move || -> Result<PathBuf, PhotoError> {
            storage::ensure_directory(&output_dir)?;
            let (path, mut file) = storage::create_photo_file(
                &output_dir,
                &chrono::Local::now(),
                encoded.extension(),
            )?;
            if let Err(e) = file.write_all(&encoded.data).and_then(|()| file.sync_all()) {
                // Do not leave a truncated photo behind
                let _ = std::fs::remove_file(&path);
                return Err(e.into());
            }
            info!(
                path = %path.display(),
                width = encoded.width,
                height = encoded.height,
                mime = encoded.mime_type,
                "Photo saved"
            );
            Ok(path)
        })
        .await
        .map_err(|e| PhotoError::SaveFailed(format!("Save task error: {}", e)))?
    }
}

/// Encode an RGB image as JPEG
pub fn encode_jpeg(image: &RgbImage, quality: EncodingQuality) -> Result<Vec<u8>, PhotoError> {
    let mut buffer = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
        &mut buffer,
        quality.jpeg_quality(),
    );

    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| PhotoError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

    Ok(buffer)
}
