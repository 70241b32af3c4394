// SPDX-License-Identifier: GPL-3.0-only

//! Capture controller: lens selection and lifecycle binding
//!
//! The controller owns the list of known cameras and the selected
//! [`LensFacing`]. The preview stream runs only while the controller is bound;
//! unbinding raises the shared cancel flag so a running stream shuts down.

use super::types::{CameraDevice, CameraFormat, Framerate, LensFacing};
use crate::constants::formats;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Identity of a running camera session
///
/// A change of key means the preview stream has to be restarted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub device_path: String,
    pub facing: LensFacing,
}

#[derive(Debug)]
pub struct CaptureController {
    facing: LensFacing,
    devices: Vec<CameraDevice>,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl CaptureController {
    pub fn new(facing: LensFacing) -> Self {
        Self {
            facing,
            devices: Vec::new(),
            cancel_flag: None,
        }
    }

    pub fn facing(&self) -> LensFacing {
        self.facing
    }

    pub fn set_facing(&mut self, facing: LensFacing) {
        if self.facing != facing {
            info!(from = %self.facing, to = %facing, "Lens selection changed");
            self.facing = facing;
        }
    }

    /// Switch to the opposite lens and return it
    pub fn reverse(&mut self) -> LensFacing {
        self.set_facing(self.facing.toggled());
        self.facing
    }

    pub fn devices(&self) -> &[CameraDevice] {
        &self.devices
    }

    /// Replace the known cameras; returns whether the list changed
    pub fn set_devices(&mut self, devices: Vec<CameraDevice>) -> bool {
        if self.devices == devices {
            return false;
        }
        debug!(count = devices.len(), "Camera list updated");
        self.devices = devices;
        true
    }

    /// Camera serving the selected lens
    ///
    /// A camera mounted on the requested side wins. Otherwise cameras without a
    /// fixed side are taken in order: the back lens maps to the first, the
    /// front lens to the second (or the first when there is only one).
    pub fn resolve_device(&self) -> Option<&CameraDevice> {
        if let Some(exact) = self
            .devices
            .iter()
            .find(|d| d.location.and_then(|l| l.facing()) == Some(self.facing))
        {
            return Some(exact);
        }

        let unfixed: Vec<&CameraDevice> = self
            .devices
            .iter()
            .filter(|d| d.location.and_then(|l| l.facing()).is_none())
            .collect();

        let positional = match self.facing {
            LensFacing::Back => unfixed.first(),
            LensFacing::Front => unfixed.get(1).or(unfixed.first()),
        };

        positional.copied().or_else(|| self.devices.first())
    }

    /// Attach the camera to the app's lifecycle
    pub fn bind(&mut self) {
        if self.cancel_flag.is_none() {
            debug!("Capture controller bound");
            self.cancel_flag = Some(Arc::new(AtomicBool::new(false)));
        }
    }

    /// Detach; any stream holding the cancel flag stops
    pub fn unbind(&mut self) {
        if let Some(flag) = self.cancel_flag.take() {
            debug!("Capture controller unbound");
            flag.store(true, Ordering::Release);
        }
    }

    pub fn is_bound(&self) -> bool {
        self.cancel_flag.is_some()
    }

    /// Flag a stream polls to know when to stop
    pub fn cancel_flag(&self) -> Option<Arc<AtomicBool>> {
        self.cancel_flag.clone()
    }

    /// Session for the current lens, `None` without a camera
    pub fn session_key(&self) -> Option<SessionKey> {
        self.resolve_device().map(|device| SessionKey {
            device_path: device.path.clone(),
            facing: self.facing,
        })
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.unbind();
    }
}

/// Preview format for a device
///
/// Highest resolution with a usable frame rate. Formats without a listed rate
/// (libcamera negotiates it) count as usable. Falls back to VGA MJPEG.
pub fn choose_format(available: &[CameraFormat]) -> CameraFormat {
    available
        .iter()
        .filter(|f| {
            f.framerate
                .is_none_or(|fps| fps.as_int() >= formats::MIN_PREVIEW_FPS)
        })
        .max_by_key(|f| {
            (
                u64::from(f.width) * u64::from(f.height),
                f.framerate.map(|fps| fps.as_int()).unwrap_or(0),
            )
        })
        .cloned()
        .unwrap_or_else(|| CameraFormat {
            width: formats::FALLBACK_WIDTH,
            height: formats::FALLBACK_HEIGHT,
            framerate: Some(Framerate::from_int(formats::FALLBACK_FPS)),
            pixel_format: formats::FALLBACK_PIXEL_FORMAT.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::CameraLocation;

    fn camera(path: &str, location: Option<CameraLocation>) -> CameraDevice {
        CameraDevice {
            name: path.to_string(),
            path: path.to_string(),
            node_id: None,
            location,
        }
    }

    #[test]
    fn test_unbind_raises_cancel_flag() {
        let mut controller = CaptureController::new(LensFacing::Back);
        controller.bind();
        let flag = controller.cancel_flag().unwrap();
        assert!(!flag.load(Ordering::Acquire));

        controller.unbind();
        assert!(flag.load(Ordering::Acquire));
        assert!(!controller.is_bound());
        assert!(controller.cancel_flag().is_none());
    }

    #[test]
    fn test_rebind_gets_fresh_flag() {
        let mut controller = CaptureController::new(LensFacing::Back);
        controller.bind();
        let first = controller.cancel_flag().unwrap();
        controller.unbind();
        controller.bind();
        let second = controller.cancel_flag().unwrap();
        assert!(first.load(Ordering::Acquire));
        assert!(!second.load(Ordering::Acquire));
    }

    #[test]
    fn test_drop_cancels_stream() {
        let mut controller = CaptureController::new(LensFacing::Front);
        controller.bind();
        let flag = controller.cancel_flag().unwrap();
        drop(controller);
        assert!(flag.load(Ordering::Acquire));
    }

    #[test]
    fn test_set_devices_reports_change() {
        let mut controller = CaptureController::new(LensFacing::Back);
        assert!(controller.set_devices(vec![camera("a", None)]));
        assert!(!controller.set_devices(vec![camera("a", None)]));
    }

    #[test]
    fn test_front_falls_back_to_back_located_camera() {
        let mut controller = CaptureController::new(LensFacing::Front);
        controller.set_devices(vec![camera("rear", Some(CameraLocation::Back))]);
        assert_eq!(controller.resolve_device().unwrap().path, "rear");
    }

    #[test]
    fn test_choose_format_prefers_resolution_over_fps() {
        let formats = vec![
            CameraFormat {
                width: 1920,
                height: 1080,
                framerate: Some(Framerate::from_int(5)),
                pixel_format: "YUY2".to_string(),
            },
            CameraFormat {
                width: 1280,
                height: 720,
                framerate: Some(Framerate::from_int(30)),
                pixel_format: "MJPG".to_string(),
            },
            CameraFormat {
                width: 1280,
                height: 720,
                framerate: Some(Framerate::from_int(60)),
                pixel_format: "MJPG".to_string(),
            },
        ];
        let chosen = choose_format(&formats);
        assert_eq!((chosen.width, chosen.height), (1280, 720));
        assert_eq!(chosen.framerate, Some(Framerate::from_int(60)));
    }

    #[test]
    fn test_choose_format_fallback() {
        let chosen = choose_format(&[]);
        assert_eq!((chosen.width, chosen.height), (640, 480));
        assert_eq!(chosen.pixel_format, "MJPG");
    }
}
