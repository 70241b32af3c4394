// SPDX-License-Identifier: GPL-3.0-only

//! Camera handlers: enumeration, hotplug, frames and lens reversal

use crate::app::camera_preview::frame_to_handle;
use crate::app::state::{AppModel, Message};
use crate::backends::camera::types::{CameraDevice, CameraFrame};
use cosmic::Task;
use std::sync::Arc;
use tracing::{debug, info};

impl AppModel {
    /// Enumerate cameras off the UI thread
    pub(crate) fn enumerate_cameras_task() -> Task<cosmic::Action<Message>> {
        Task::perform(
            async {
                tokio::task::spawn_blocking(|| {
                    crate::backends::camera::get_backend().enumerate_cameras()
                })
                .await
                .unwrap_or_default()
            },
            |cameras| cosmic::Action::App(Message::CamerasEnumerated(cameras)),
        )
    }

    pub(crate) fn handle_cameras_enumerated(
        &mut self,
        cameras: Vec<CameraDevice>,
    ) -> Task<cosmic::Action<Message>> {
        info!(count = cameras.len(), "Cameras enumerated");
        self.cameras_enumerated = true;
        self.controller.set_devices(cameras);
        self.log_resolved_device();
        Task::none()
    }

    pub(crate) fn handle_camera_list_changed(
        &mut self,
        cameras: Vec<CameraDevice>,
    ) -> Task<cosmic::Action<Message>> {
        let previous = self.controller.session_key();
        if !self.controller.set_devices(cameras) {
            return Task::none();
        }

        info!(count = self.controller.devices().len(), "Camera list changed");
        if self.controller.session_key() != previous {
            // The stream restarts on the new device; drop the stale picture
            self.clear_preview();
            self.log_resolved_device();
        }
        Task::none()
    }

    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        if !self.permission_granted() || !frame.is_complete() {
            return Task::none();
        }

        let mirror = self.config.mirrors(self.controller.facing());
        self.preview_handle = Some(frame_to_handle(&frame, mirror));
        self.current_frame = Some(frame);
        Task::none()
    }

    pub(crate) fn handle_reverse_camera(&mut self) -> Task<cosmic::Action<Message>> {
        let previous = self.controller.session_key();
        let facing = self.controller.reverse();
        info!(%facing, "Reversed camera");

        if self.controller.session_key() != previous {
            self.clear_preview();
        }
        self.log_resolved_device();
        Task::none()
    }

    pub(crate) fn clear_preview(&mut self) {
        self.current_frame = None;
        self.preview_handle = None;
    }

    fn log_resolved_device(&self) {
        match self.controller.resolve_device() {
            Some(device) => debug!(
                facing = %self.controller.facing(),
                name = %device.name,
                path = %device.path,
                "Resolved camera for lens"
            ),
            None => debug!(facing = %self.controller.facing(), "No camera for lens"),
        }
    }
}
