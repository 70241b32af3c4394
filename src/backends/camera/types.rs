// SPDX-License-Identifier: GPL-3.0-only
// Shared types for the camera backend

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which way the selected lens points, relative to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LensFacing {
    /// Pointing away from the user
    #[default]
    Back,
    /// Pointing at the user (selfie camera, laptop webcam)
    Front,
}

impl LensFacing {
    pub const ALL: [LensFacing; 2] = [LensFacing::Back, LensFacing::Front];

    /// The opposite lens
    pub fn toggled(self) -> Self {
        match self {
            LensFacing::Back => LensFacing::Front,
            LensFacing::Front => LensFacing::Back,
        }
    }

    /// Parse a CLI/user-supplied lens name
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "back" | "rear" | "world" => Some(LensFacing::Back),
            "front" | "user" | "selfie" => Some(LensFacing::Front),
            _ => None,
        }
    }
}

impl std::fmt::Display for LensFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LensFacing::Back => write!(f, "back"),
            LensFacing::Front => write!(f, "front"),
        }
    }
}

/// Physical mounting of a camera, as reported by PipeWire/libcamera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraLocation {
    Front,
    Back,
    /// USB webcams and anything else without a fixed orientation
    External,
}

impl CameraLocation {
    /// Parse `api.libcamera.location` / `device.form-factor` style values
    pub fn from_property(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "front" | "0" => Some(CameraLocation::Front),
            "back" | "rear" | "1" => Some(CameraLocation::Back),
            "external" | "2" | "webcam" => Some(CameraLocation::External),
            _ => None,
        }
    }

    /// The lens facing this location satisfies exactly, if any
    pub fn facing(&self) -> Option<LensFacing> {
        match self {
            CameraLocation::Front => Some(LensFacing::Front),
            CameraLocation::Back => Some(LensFacing::Back),
            CameraLocation::External => None,
        }
    }
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraDevice {
    pub name: String,
    /// Capture target for `pipewiresrc` (`pipewire-serial-N`, `pipewire-N`, or empty for default)
    pub path: String,
    /// PipeWire node ID, used for format enumeration
    pub node_id: Option<String>,
    /// Mounting position when the system knows it
    pub location: Option<CameraLocation>,
}

/// Framerate as a fraction (numerator/denominator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Framerate {
    pub num: u32,
    pub denom: u32,
}

impl Framerate {
    /// Create a new framerate from numerator and denominator
    pub fn new(num: u32, denom: u32) -> Self {
        Self {
            num,
            denom: if denom == 0 { 1 } else { denom },
        }
    }

    /// Create a framerate from an integer (e.g., 30 becomes 30/1)
    pub fn from_int(fps: u32) -> Self {
        Self { num: fps, denom: 1 }
    }

    /// Get the rounded-down integer framerate
    pub fn as_int(&self) -> u32 {
        self.num / self.denom
    }

    /// Format as GStreamer fraction string (e.g., "60000/1001")
    pub fn as_gst_fraction(&self) -> String {
        format!("{}/{}", self.num, self.denom)
    }
}

impl std::fmt::Display for Framerate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.denom != 1 {
            write!(f, "{:.2}", self.num as f64 / self.denom as f64)
        } else {
            write!(f, "{}", self.num)
        }
    }
}

/// Camera format specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub framerate: Option<Framerate>,
    /// FourCC code (e.g., "MJPG", "YUYV")
    pub pixel_format: String,
}

impl std::fmt::Display for CameraFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(fps) = &self.framerate {
            write!(
                f,
                "{}x{} @ {}fps ({})",
                self.width, self.height, fps, self.pixel_format
            )
        } else {
            write!(f, "{}x{} ({})", self.width, self.height, self.pixel_format)
        }
    }
}

/// A single RGBA frame from the camera
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixels, `stride` bytes per row
    pub data: Arc<[u8]>,
    /// Row stride in bytes (may include padding)
    pub stride: u32,
    /// Timestamp when frame was captured (for latency diagnostics)
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a frame from tightly packed RGBA bytes
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data),
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    /// Whether the buffer is large enough for the advertised geometry
    pub fn is_complete(&self) -> bool {
        if self.width == 0 || self.height == 0 || self.stride < self.width * 4 {
            return false;
        }
        let needed = self.stride as usize * (self.height as usize - 1) + self.width as usize * 4;
        self.data.len() >= needed
    }

    /// Copy out tightly packed RGBA rows (drops stride padding)
    pub fn packed_rgba(&self) -> Vec<u8> {
        let row_bytes = self.width as usize * 4;
        if self.stride as usize == row_bytes {
            return self.data[..row_bytes * self.height as usize].to_vec();
        }
        self.data
            .chunks(self.stride as usize)
            .take(self.height as usize)
            .flat_map(|row| &row[..row_bytes])
            .copied()
            .collect()
    }
}

/// Frame sender type for preview streams
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<BackendError> for crate::errors::CameraError {
    fn from(err: BackendError) -> Self {
        crate::errors::CameraError::InitializationFailed(err.to_string())
    }
}
