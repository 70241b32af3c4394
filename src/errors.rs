// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera application

use std::fmt;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Photo capture errors
    Photo(PhotoError),
    /// Camera permission errors
    Permission(PermissionError),
}

/// Camera-specific errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// Requested camera index does not exist
    IndexOutOfRange { index: usize, count: usize },
    /// Camera initialization failed
    InitializationFailed(String),
    /// The pipeline stopped delivering frames
    NoFrames,
}

/// Photo capture errors
#[derive(Debug, Clone)]
pub enum PhotoError {
    /// No frame available for capture
    NoFrameAvailable,
    /// Frame buffer does not match its advertised geometry
    InvalidFrame(String),
    /// Encoding failed
    EncodingFailed(String),
    /// Save failed
    SaveFailed(String),
}

/// Camera permission errors
#[derive(Debug, Clone)]
pub enum PermissionError {
    /// The desktop portal (or its camera interface) is not reachable
    PortalUnavailable(String),
    /// The portal was reachable but the request itself failed
    RequestFailed(String),
    /// The user did not answer in time
    Timeout,
    /// The user or the system refused camera access
    Denied,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Permission(e) => write!(f, "Permission error: {}", e),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::IndexOutOfRange { index, count } => write!(
                f,
                "Camera index {} out of range (0-{})",
                index,
                count.saturating_sub(1)
            ),
            CameraError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            CameraError::NoFrames => write!(f, "Failed to capture frame from camera"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::NoFrameAvailable => write!(f, "No frame available for capture"),
            PhotoError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::PortalUnavailable(msg) => write!(f, "Portal unavailable: {}", msg),
            PermissionError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            PermissionError::Timeout => write!(f, "Permission request timed out"),
            PermissionError::Denied => write!(f, "Camera access denied"),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for PermissionError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        AppError::Permission(err)
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}

impl From<zbus::Error> for PermissionError {
    fn from(err: zbus::Error) -> Self {
        PermissionError::RequestFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_message() {
        let err = CameraError::IndexOutOfRange { index: 3, count: 2 };
        assert_eq!(err.to_string(), "Camera index 3 out of range (0-1)");
    }

    #[test]
    fn test_photo_error_wraps_into_app_error() {
        let err: AppError = PhotoError::NoFrameAvailable.into();
        assert_eq!(
            err.to_string(),
            "Photo error: No frame available for capture"
        );
    }
}
