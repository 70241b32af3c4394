// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Layout constants for the main screen
pub mod ui {
    /// Share of the window width given to the preview (preview : controls = 4 : 1)
    pub const PREVIEW_PORTION: u16 = 4;

    /// Share of the window width given to the button column
    pub const CONTROLS_PORTION: u16 = 1;

    /// Minimum window width
    pub const MIN_WINDOW_WIDTH: f32 = 360.0;

    /// Minimum window height
    pub const MIN_WINDOW_HEIGHT: f32 = 180.0;

    /// Padding around the button column
    pub const CONTROLS_PADDING: u16 = 8;

    /// Spacing between the buttons
    pub const CONTROLS_SPACING: u16 = 8;

    /// Text size of the fallback message shown in place of the preview
    pub const PLACEHOLDER_TEXT_SIZE: u16 = 16;

    /// Text size of the lens label under the buttons
    pub const LENS_LABEL_TEXT_SIZE: u16 = 12;
}

/// Transient notification durations
pub mod notifications {
    use super::Duration;

    /// Duration of short notifications ("Image captured")
    pub const SHORT: Duration = Duration::from_secs(2);

    /// Duration of long notifications ("Permission request denied")
    pub const LONG: Duration = Duration::from_millis(3500);
}

/// Camera format selection
pub mod formats {
    /// Lowest frame rate still acceptable for a live preview
    pub const MIN_PREVIEW_FPS: u32 = 15;

    /// Width used when the device does not report any format
    pub const FALLBACK_WIDTH: u32 = 640;

    /// Height used when the device does not report any format
    pub const FALLBACK_HEIGHT: u32 = 480;

    /// Frame rate used when the device does not report any format
    pub const FALLBACK_FPS: u32 = 30;

    /// Pixel format used when the device does not report any format
    pub const FALLBACK_PIXEL_FORMAT: &str = "MJPG";
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Maximum buffer queue size (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Capacity of the frame channel between appsink and the UI
    pub const FRAME_CHANNEL_CAPACITY: usize = 8;

    /// Output pixel format for appsink
    pub const OUTPUT_FORMAT: &str = "RGBA";
}

/// Timing constants
pub mod timing {
    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Pipeline playing state timeout on start
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Interval between camera hotplug scans
    pub const HOTPLUG_POLL_SECS: u64 = 2;

    /// Wait before retrying a failed pipeline
    pub const PIPELINE_RETRY_SECS: u64 = 5;

    /// Frame poll timeout inside the preview subscription
    pub const FRAME_POLL_MS: u64 = 16;

    /// Camera warm-up before the headless capture takes a frame
    pub const CLI_WARMUP_MS: u64 = 500;

    /// Give up waiting for a frame in headless capture after this long
    pub const CLI_FRAME_TIMEOUT_SECS: u64 = 5;
}

/// Photo storage
pub mod storage {
    /// Folder below the XDG pictures directory that receives photos
    pub const DEFAULT_SAVE_FOLDER: &str = "Camera";

    /// File name prefix for photos
    pub const PHOTO_PREFIX: &str = "IMG";

    /// `chrono` format for the timestamp part of a photo file name
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// MIME type of captured photos
    pub const PHOTO_MIME_TYPE: &str = "image/jpeg";
}

/// XDG desktop portal
pub mod portal {
    /// Well-known bus name of the desktop portal
    pub const DESTINATION: &str = "org.freedesktop.portal.Desktop";

    /// Object path of the desktop portal
    pub const PATH: &str = "/org/freedesktop/portal/desktop";

    /// Camera portal interface
    pub const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";

    /// Request interface carrying the `Response` signal
    pub const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

    /// Upper bound for the user to answer the permission dialog
    pub const RESPONSE_TIMEOUT_SECS: u64 = 120;
}

pub mod app_info {
    use std::path::Path;

    /// Application ID, also the cosmic-config namespace
    pub const APP_ID: &str = "io.github.lensflip.LensFlip";

    /// Project home page
    pub const REPOSITORY: &str = "https://github.com/lensflip/lensflip";

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Check if the application is running inside a Flatpak sandbox
    pub fn is_flatpak() -> bool {
        Path::new("/.flatpak-info").exists()
    }
}
