// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission handlers
//!
//! Launch flow: [`permission::resolve_camera_access`] checks quietly, then
//! asks through the portal. A grant binds the capture controller and
//! enumerates cameras; a denial leaves the placeholder text up and shows a
//! notification. The answer is kept for the session only.

use crate::app::state::{AppModel, Message};
use crate::constants::notifications;
use crate::fl;
use crate::permission::{self, PermissionStatus};
use cosmic::Task;
use tracing::info;

impl AppModel {
    /// Task running the launch flow
    pub(crate) fn resolve_permission_task() -> Task<cosmic::Action<Message>> {
        Task::perform(permission::resolve_camera_access(), |status| {
            cosmic::Action::App(Message::PermissionResolved(status))
        })
    }

    pub(crate) fn handle_permission_resolved(
        &mut self,
        status: PermissionStatus,
    ) -> Task<cosmic::Action<Message>> {
        if status.is_granted() {
            info!("Camera permission granted");
            self.permission = Some(PermissionStatus::Granted);
            self.controller.bind();
            return Self::enumerate_cameras_task();
        }

        info!("Camera permission denied");
        self.permission = Some(PermissionStatus::Denied);
        self.controller.unbind();
        self.clear_preview();
        self.notify(fl!("permission-denied"), notifications::LONG)
    }
}
