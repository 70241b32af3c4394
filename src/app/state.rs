// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::camera::CaptureController;
use crate::backends::camera::types::{CameraDevice, CameraFrame};
use crate::config::Config;
use crate::permission::PermissionStatus;
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use cosmic::widget::image::Handle;
use cosmic::widget::toaster::{ToastId, Toasts};
use std::path::PathBuf;
use std::sync::Arc;

/// The main application state
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Page shown in the context drawer
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Camera access; `None` until the launch check has answered
    pub permission: Option<PermissionStatus>,
    /// Lens selection and lifecycle binding
    pub controller: CaptureController,
    /// Whether the first enumeration has finished
    pub cameras_enumerated: bool,
    /// Latest preview frame, kept for capture
    pub current_frame: Option<Arc<CameraFrame>>,
    /// Latest preview frame prepared for display
    pub preview_handle: Option<Handle>,
    /// Whether a photo capture is in progress
    pub is_capturing: bool,
    /// Transient notifications
    pub toasts: Toasts<Message>,
    /// Dropdown labels, in `AppTheme::ALL` order
    pub theme_options: Vec<String>,
    /// Dropdown labels, in `LensFacing::ALL` order
    pub lens_options: Vec<String>,
    /// Dropdown labels, in `EncodingQuality::ALL` order
    pub quality_options: Vec<String>,
}

impl AppModel {
    pub fn permission_granted(&self) -> bool {
        self.permission.is_some_and(PermissionStatus::is_granted)
    }

    /// Directory photos are currently saved to
    pub fn photo_directory(&self) -> PathBuf {
        crate::storage::photo_directory(&self.config.save_folder)
    }
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    Settings,
    About,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),
    /// A notification timed out or was dismissed
    CloseToast(ToastId),

    // ===== Permission =====
    /// Outcome of the launch check and portal request
    PermissionResolved(PermissionStatus),

    // ===== Camera Control =====
    /// First enumeration after permission was granted
    CamerasEnumerated(Vec<CameraDevice>),
    /// Hotplug: the set of cameras changed
    CameraListChanged(Vec<CameraDevice>),
    /// New camera frame received from pipeline
    CameraFrame(Arc<CameraFrame>),
    /// Switch between the front and back lens
    ReverseCamera,

    // ===== Capture =====
    /// Take a picture of the current frame
    Capture,
    /// Photo written (path) or failed (reason)
    PhotoSaved(Result<PathBuf, String>),

    // ===== Settings =====
    /// Configuration changed on disk
    UpdateConfig(Config),
    SetAppTheme(usize),
    SetDefaultFacing(usize),
    ToggleMirrorFrontCamera(bool),
    SetJpegQuality(usize),
    /// Show the photo folder in the file manager
    OpenPhotoFolder,
}
