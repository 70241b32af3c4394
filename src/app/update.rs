// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function is a dispatcher; the handling code lives in
//! the `handlers` submodules, grouped by concern.
//!
//! # Handler Modules
//!
//! - `handlers::ui`: navigation, notifications, settings
//! - `handlers::permission`: launch check and portal request
//! - `handlers::camera`: enumeration, hotplug, frames, lens reversal
//! - `handlers::capture`: photo capture and its result

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::CloseToast(id) => self.handle_close_toast(id),

            // ===== Permission =====
            Message::PermissionResolved(status) => self.handle_permission_resolved(status),

            // ===== Camera Control =====
            Message::CamerasEnumerated(cameras) => self.handle_cameras_enumerated(cameras),
            Message::CameraListChanged(cameras) => self.handle_camera_list_changed(cameras),
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),
            Message::ReverseCamera => self.handle_reverse_camera(),

            // ===== Capture =====
            Message::Capture => self.handle_capture(),
            Message::PhotoSaved(result) => self.handle_photo_saved(result),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::SetDefaultFacing(index) => self.handle_set_default_facing(index),
            Message::ToggleMirrorFrontCamera(enabled) => {
                self.handle_toggle_mirror_front_camera(enabled)
            }
            Message::SetJpegQuality(index) => self.handle_set_jpeg_quality(index),
            Message::OpenPhotoFolder => self.handle_open_photo_folder(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::ContextPage;
    use crate::backends::camera::CaptureController;
    use crate::backends::camera::types::{CameraDevice, CameraFrame, CameraLocation, LensFacing};
    use crate::config::Config;
    use crate::errors::PhotoError;
    use crate::permission::PermissionStatus;
    use crate::pipelines::photo::{self, EncodingQuality};
    use cosmic::widget::about::About;
    use cosmic::widget::toaster::Toasts;
    use std::sync::Arc;

    fn model() -> AppModel {
        AppModel {
            core: cosmic::Core::default(),
            context_page: ContextPage::default(),
            about: About::default(),
            config: Config::default(),
            config_handler: None,
            permission: None,
            controller: CaptureController::new(LensFacing::Back),
            cameras_enumerated: false,
            current_frame: None,
            preview_handle: None,
            is_capturing: false,
            toasts: Toasts::new(Message::CloseToast),
            theme_options: Vec::new(),
            lens_options: Vec::new(),
            quality_options: Vec::new(),
        }
    }

    fn camera(path: &str, location: CameraLocation) -> CameraDevice {
        CameraDevice {
            name: path.to_string(),
            path: path.to_string(),
            node_id: None,
            location: Some(location),
        }
    }

    fn frame() -> Arc<CameraFrame> {
        Arc::new(CameraFrame::from_rgba(2, 2, vec![255; 16]))
    }

    /// Granted, bound, with a back and a front camera and a frame on screen
    fn streaming_model() -> AppModel {
        let mut app = model();
        let _ = app.update(Message::PermissionResolved(PermissionStatus::Granted));
        let _ = app.update(Message::CamerasEnumerated(vec![
            camera("pipewire-1", CameraLocation::Back),
            camera("pipewire-2", CameraLocation::Front),
        ]));
        let _ = app.update(Message::CameraFrame(frame()));
        assert!(app.current_frame.is_some());
        app
    }

    #[tokio::test]
    async fn test_only_one_capture_in_flight() {
        let mut app = streaming_model();

        let _ = app.update(Message::Capture);
        assert!(app.is_capturing);
        assert!(!app.can_capture());

        // A second press while saving leaves the state alone
        let _ = app.update(Message::Capture);
        assert!(app.is_capturing);

        let _ = app.update(Message::PhotoSaved(Err("disk full".to_string())));
        assert!(!app.is_capturing);
        assert!(app.can_capture());
    }

    #[tokio::test]
    async fn test_capture_needs_permission() {
        let mut app = model();
        let _ = app.update(Message::Capture);
        assert!(!app.is_capturing);
    }

    #[tokio::test]
    async fn test_denial_leaves_controller_unbound() {
        let mut app = model();
        let _ = app.update(Message::PermissionResolved(PermissionStatus::Denied));

        assert_eq!(app.permission, Some(PermissionStatus::Denied));
        assert!(!app.permission_granted());
        assert!(!app.controller.is_bound());
        assert!(app.current_frame.is_none());
    }

    #[tokio::test]
    async fn test_grant_binds_controller() {
        let mut app = model();
        let _ = app.update(Message::PermissionResolved(PermissionStatus::Granted));

        assert!(app.permission_granted());
        assert!(app.controller.is_bound());
    }

    #[tokio::test]
    async fn test_reverse_drops_frame_of_previous_lens() {
        let mut app = streaming_model();

        let _ = app.update(Message::ReverseCamera);
        assert_eq!(app.controller.facing(), LensFacing::Front);
        assert!(app.current_frame.is_none());
        assert!(app.preview_handle.is_none());

        // Capturing before the new lens delivers a frame fails instead of
        // saving the old lens's picture
        let dir = std::env::temp_dir().join(format!("lensflip-app-{}", std::process::id()));
        let result = photo::take_picture(
            app.current_frame.clone(),
            dir,
            false,
            EncodingQuality::Low,
        )
        .await;
        assert!(matches!(result, Err(PhotoError::NoFrameAvailable)));
    }

    #[tokio::test]
    async fn test_reverse_works_without_permission() {
        let mut app = model();
        let _ = app.update(Message::ReverseCamera);
        assert_eq!(app.controller.facing(), LensFacing::Front);
        let _ = app.update(Message::ReverseCamera);
        assert_eq!(app.controller.facing(), LensFacing::Back);
    }

    #[tokio::test]
    async fn test_hotplug_replacing_camera_clears_preview() {
        let mut app = streaming_model();

        let _ = app.update(Message::CameraListChanged(vec![
            camera("pipewire-9", CameraLocation::Back),
            camera("pipewire-2", CameraLocation::Front),
        ]));

        assert!(app.current_frame.is_none());
        assert!(app.preview_handle.is_none());
    }

    #[tokio::test]
    async fn test_hotplug_of_other_camera_keeps_preview() {
        let mut app = streaming_model();

        let _ = app.update(Message::CameraListChanged(vec![
            camera("pipewire-1", CameraLocation::Back),
            camera("pipewire-2", CameraLocation::Front),
            camera("pipewire-3", CameraLocation::External),
        ]));

        assert!(app.current_frame.is_some());
    }

    #[tokio::test]
    async fn test_frames_ignored_after_denial() {
        let mut app = model();
        let _ = app.update(Message::PermissionResolved(PermissionStatus::Denied));
        let _ = app.update(Message::CameraFrame(frame()));
        assert!(app.current_frame.is_none());
    }
}
