// SPDX-License-Identifier: GPL-3.0-only

//! Camera access gate
//!
//! Inside a sandbox the camera is only reachable after the desktop portal
//! grants it. On a plain host the device nodes (or the PipeWire socket) decide.
//! The outcome is a single granted/denied flag that lives for the session.

use crate::constants::portal;
use crate::errors::PermissionError;
use futures::StreamExt;
use std::collections::HashMap;
use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

/// Whether the app may use the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }

    /// Map a portal `Response` code (0 success, 1 cancelled, 2 other)
    pub fn from_portal_response(code: u32) -> Self {
        if code == 0 {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

/// Non-interactive check, no dialogs
pub fn check_camera_access() -> PermissionStatus {
    if crate::constants::app_info::is_flatpak() {
        // Device nodes are hidden in the sandbox; only the portal can say yes
        return PermissionStatus::Denied;
    }

    let nodes = video_device_nodes(Path::new("/dev"));
    if nodes.iter().any(|node| is_read_write(node)) {
        debug!(count = nodes.len(), "Video device node accessible");
        return PermissionStatus::Granted;
    }

    if pipewire_socket().is_some_and(|socket| socket.exists()) {
        debug!("PipeWire socket reachable");
        return PermissionStatus::Granted;
    }

    PermissionStatus::Denied
}

/// Ask the desktop portal for camera access
///
/// Shows the system dialog when the user has not decided yet. Blocks until the
/// user answers or [`portal::RESPONSE_TIMEOUT_SECS`] passes.
pub async fn request_camera_access() -> Result<PermissionStatus, PermissionError> {
    let connection = zbus::Connection::session()
        .await
        .map_err(|e| PermissionError::PortalUnavailable(e.to_string()))?;

    let camera_proxy = zbus::Proxy::new(
        &connection,
        portal::DESTINATION,
        portal::PATH,
        portal::CAMERA_INTERFACE,
    )
    .await
    .map_err(|e| PermissionError::PortalUnavailable(e.to_string()))?;

    match camera_proxy.get_property::<bool>("IsCameraPresent").await {
        Ok(present) => debug!(present, "Portal camera presence"),
        Err(e) => return Err(PermissionError::PortalUnavailable(e.to_string())),
    }

    let token = handle_token();
    let sender = connection
        .unique_name()
        .map(|name| name.as_str().to_string())
        .ok_or_else(|| PermissionError::RequestFailed("No unique bus name".to_string()))?;
    let request_path = request_object_path(&sender, &token);

    // Subscribe before calling so a fast answer is not missed
    let request_proxy = zbus::Proxy::new(
        &connection,
        portal::DESTINATION,
        request_path.as_str(),
        portal::REQUEST_INTERFACE,
    )
    .await?;
    let mut responses = request_proxy.receive_signal("Response").await?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(token.as_str()));

    let handle: OwnedObjectPath = camera_proxy.call("AccessCamera", &(options,)).await?;
    if handle.as_str() != request_path {
        debug!(expected = %request_path, actual = %handle.as_str(), "Portal used a different request path");
    }

    info!("Waiting for camera permission response");
    let message = tokio::time::timeout(
        Duration::from_secs(portal::RESPONSE_TIMEOUT_SECS),
        responses.next(),
    )
    .await
    .map_err(|_| PermissionError::Timeout)?
    .ok_or_else(|| PermissionError::RequestFailed("Response stream closed".to_string()))?;

    let (code, _results): (u32, HashMap<String, OwnedValue>) = message.body().deserialize()?;
    let status = PermissionStatus::from_portal_response(code);
    info!(code, ?status, "Camera permission response");
    Ok(status)
}

/// Launch flow: check quietly, then ask
///
/// When the portal cannot be reached the quiet check stands.
pub async fn resolve_camera_access() -> PermissionStatus {
    let checked = check_camera_access();
    if checked.is_granted() {
        return checked;
    }

    match request_camera_access().await {
        Ok(status) => status,
        Err(PermissionError::PortalUnavailable(reason)) => {
            warn!(%reason, "Camera portal unavailable, using device check");
            checked
        }
        Err(e) => {
            warn!(error = %e, "Camera permission request failed");
            PermissionStatus::Denied
        }
    }
}

/// `/dev/videoN` nodes below `dev_dir`, sorted
pub fn video_device_nodes(dev_dir: &Path) -> Vec<PathBuf> {
    let mut nodes: Vec<PathBuf> = std::fs::read_dir(dev_dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .and_then(|name| name.strip_prefix("video"))
                        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
                })
                .collect()
        })
        .unwrap_or_default();
    nodes.sort();
    nodes
}

/// Object path the portal uses for a request created by `sender` with `token`
///
/// `:1.42` + `lensflip_7` → `/org/freedesktop/portal/desktop/request/1_42/lensflip_7`
pub fn request_object_path(sender: &str, token: &str) -> String {
    let sender = sender.trim_start_matches(':').replace('.', "_");
    format!("{}/request/{}/{}", portal::PATH, sender, token)
}

fn handle_token() -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    format!(
        "lensflip_{}_{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

fn is_read_write(path: &Path) -> bool {
    let Some(path) = path.to_str().and_then(|p| CString::new(p).ok()) else {
        return false;
    };
    // SAFETY: `path` is a valid NUL-terminated string for the duration of the call
    unsafe { libc::access(path.as_ptr(), libc::R_OK | libc::W_OK) == 0 }
}

fn pipewire_socket() -> Option<PathBuf> {
    let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR")?;
    let remote = std::env::var("PIPEWIRE_REMOTE").unwrap_or_else(|_| "pipewire-0".to_string());
    Some(PathBuf::from(runtime_dir).join(remote))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_tokens_are_unique() {
        let a = handle_token();
        let b = handle_token();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_video_nodes_filtered() {
        let dir = std::env::temp_dir().join(format!("lensflip-dev-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["video0", "video12", "video", "videoX", "media0"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }

        let nodes = video_device_nodes(&dir);
        let names: Vec<_> = nodes
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["video0", "video12"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_dev_dir_is_empty() {
        assert!(video_device_nodes(Path::new("/nonexistent/lensflip")).is_empty());
    }
}
