// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   UI Layer (App)    │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CaptureController  │  ← Lens selection, lifecycle binding
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← Enumeration, preview streaming
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌────────┐
//!       │PipeWire│
//!       └────────┘
//! ```

pub mod controller;
pub mod pipewire;
pub mod types;

pub use controller::{CaptureController, choose_format};
pub use pipewire::{PipeWireBackend, PreviewPipeline};
pub use types::*;

/// What the app needs from a camera system
pub trait CameraBackend: Send + Sync {
    /// Cameras currently present
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Formats the device offers; empty when unknown
    fn get_formats(&self, device: &CameraDevice) -> Vec<CameraFormat>;

    /// Start streaming RGBA frames into `frame_sender`
    ///
    /// Streaming stops when the returned pipeline is dropped.
    fn start_preview(
        &self,
        device: &CameraDevice,
        format: Option<&CameraFormat>,
        frame_sender: FrameSender,
    ) -> BackendResult<PreviewPipeline>;

    /// Whether this backend can run on this system
    fn is_available(&self) -> bool;
}

/// The backend used by the app and the CLI
pub fn get_backend() -> Box<dyn CameraBackend> {
    Box::new(PipeWireBackend::new())
}
