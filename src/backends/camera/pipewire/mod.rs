// SPDX-License-Identifier: MPL-2.0

//! PipeWire camera backend
//!
//! Discovery goes through `pw-cli`, streaming through GStreamer's `pipewiresrc`.

mod enumeration;
mod pipeline;

pub use enumeration::{
    DEFAULT_CAMERA_NAME, enumerate_pipewire_cameras, get_pipewire_formats, is_pipewire_available,
    parse_enum_formats, parse_node_list,
};
pub use pipeline::{
    PreviewPipeline, build_pipeline_string, stream_failure, target_object_property,
};

use super::CameraBackend;
use super::types::*;
use tracing::info;

/// PipeWire backend implementation
#[derive(Debug, Default)]
pub struct PipeWireBackend;

impl PipeWireBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for PipeWireBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        match enumerate_pipewire_cameras() {
            Some(cameras) => {
                info!(count = cameras.len(), "PipeWire cameras enumerated");
                cameras
            }
            None => {
                info!("PipeWire enumeration unavailable");
                Vec::new()
            }
        }
    }

    fn get_formats(&self, device: &CameraDevice) -> Vec<CameraFormat> {
        get_pipewire_formats(device)
    }

    fn start_preview(
        &self,
        device: &CameraDevice,
        format: Option<&CameraFormat>,
        frame_sender: FrameSender,
    ) -> BackendResult<PreviewPipeline> {
        PreviewPipeline::new(device, format, frame_sender)
    }

    fn is_available(&self) -> bool {
        is_pipewire_available()
    }
}
