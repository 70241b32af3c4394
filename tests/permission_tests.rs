// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for camera permission helpers

use lensflip::PermissionStatus;
use lensflip::permission::{request_object_path, video_device_nodes};

#[test]
fn test_portal_response_codes() {
    assert_eq!(PermissionStatus::from_portal_response(0), PermissionStatus::Granted);
    assert_eq!(PermissionStatus::from_portal_response(1), PermissionStatus::Denied);
    assert_eq!(PermissionStatus::from_portal_response(2), PermissionStatus::Denied);
}

#[test]
fn test_only_granted_is_granted() {
    assert!(PermissionStatus::Granted.is_granted());
    assert!(!PermissionStatus::Denied.is_granted());
}

#[test]
fn test_request_path_uses_escaped_sender() {
    assert_eq!(
        request_object_path(":1.42", "lensflip_1"),
        "/org/freedesktop/portal/desktop/request/1_42/lensflip_1"
    );
}

#[test]
fn test_video_nodes_in_missing_directory() {
    let missing = std::env::temp_dir().join(format!("lensflip-no-dev-{}", std::process::id()));
    assert!(video_device_nodes(&missing).is_empty());
}
