// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for lens selection and session lifecycle

use lensflip::backends::camera::types::{
    CameraDevice, CameraFormat, CameraLocation, Framerate, LensFacing,
};
use lensflip::backends::camera::{CaptureController, choose_format};
use std::sync::atomic::Ordering;

fn device(name: &str, path: &str, location: Option<CameraLocation>) -> CameraDevice {
    CameraDevice {
        name: name.to_string(),
        path: path.to_string(),
        node_id: None,
        location,
    }
}

fn format(width: u32, height: u32, fps: u32) -> CameraFormat {
    CameraFormat {
        width,
        height,
        framerate: Some(Framerate::from_int(fps)),
        pixel_format: "MJPG".to_string(),
    }
}

#[test]
fn test_located_cameras_match_their_lens() {
    let mut controller = CaptureController::new(LensFacing::Back);
    controller.set_devices(vec![
        device("Selfie", "pipewire-10", Some(CameraLocation::Front)),
        device("Main", "pipewire-11", Some(CameraLocation::Back)),
    ]);

    assert_eq!(controller.resolve_device().map(|d| d.name.as_str()), Some("Main"));
    controller.reverse();
    assert_eq!(controller.resolve_device().map(|d| d.name.as_str()), Some("Selfie"));
}

#[test]
fn test_unlocated_cameras_are_taken_in_order() {
    let mut controller = CaptureController::new(LensFacing::Back);
    controller.set_devices(vec![
        device("First", "pipewire-20", None),
        device("Second", "pipewire-21", None),
    ]);

    assert_eq!(controller.resolve_device().map(|d| d.name.as_str()), Some("First"));
    controller.set_facing(LensFacing::Front);
    assert_eq!(controller.resolve_device().map(|d| d.name.as_str()), Some("Second"));
}

#[test]
fn test_single_camera_serves_both_lenses() {
    let mut controller = CaptureController::new(LensFacing::Front);
    controller.set_devices(vec![device("Webcam", "pipewire-30", Some(CameraLocation::External))]);

    assert_eq!(controller.resolve_device().map(|d| d.name.as_str()), Some("Webcam"));
    controller.reverse();
    assert_eq!(controller.resolve_device().map(|d| d.name.as_str()), Some("Webcam"));
}

#[test]
fn test_no_cameras_means_no_session() {
    let mut controller = CaptureController::new(LensFacing::Back);
    controller.bind();
    assert!(controller.resolve_device().is_none());
    assert!(controller.session_key().is_none());
}

#[test]
fn test_reverse_changes_session_key() {
    let mut controller = CaptureController::new(LensFacing::Back);
    controller.set_devices(vec![
        device("Main", "pipewire-40", Some(CameraLocation::Back)),
        device("Selfie", "pipewire-41", Some(CameraLocation::Front)),
    ]);

    let before = controller.session_key();
    controller.reverse();
    let after = controller.session_key();
    assert_ne!(before, after);
    assert_eq!(after.map(|k| k.device_path), Some("pipewire-41".to_string()));
}

#[test]
fn test_unbind_raises_cancel_flag() {
    let mut controller = CaptureController::new(LensFacing::Back);
    controller.bind();
    let flag = controller.cancel_flag().expect("bound controller has a flag");
    assert!(!flag.load(Ordering::Acquire));

    controller.unbind();
    assert!(flag.load(Ordering::Acquire));
    assert!(!controller.is_bound());
}

#[test]
fn test_same_device_list_is_not_a_change() {
    let mut controller = CaptureController::new(LensFacing::Back);
    let devices = vec![device("Main", "pipewire-50", None)];
    assert!(controller.set_devices(devices.clone()));
    assert!(!controller.set_devices(devices));
}

#[test]
fn test_choose_format_prefers_largest_smooth_mode() {
    let chosen = choose_format(&[format(640, 480, 30), format(3840, 2160, 5), format(1920, 1080, 30)]);
    assert_eq!((chosen.width, chosen.height), (1920, 1080));
}

#[test]
fn test_choose_format_falls_back_when_empty() {
    let chosen = choose_format(&[]);
    assert_eq!((chosen.width, chosen.height), (640, 480));
    assert_eq!(chosen.pixel_format, "MJPG");
}
