// SPDX-License-Identifier: GPL-3.0-only

//! Camera discovery and format listing through `pw-cli`
//!
//! The text output of `pw-cli ls Node` and `pw-cli enum-params <id> EnumFormat`
//! is parsed by plain functions so the parsing can be exercised without a
//! running PipeWire daemon.

use super::super::types::{CameraDevice, CameraFormat, CameraLocation, Framerate};
use tracing::{debug, info, warn};

/// Name used when PipeWire is up but no camera node could be listed
pub const DEFAULT_CAMERA_NAME: &str = "Default Camera";

/// Enumerate cameras known to PipeWire
///
/// Returns `None` when GStreamer has no `pipewiresrc`. When PipeWire is usable
/// but `pw-cli` lists nothing, a single default entry with an empty path is
/// returned so that `pipewiresrc` picks the camera itself.
pub fn enumerate_pipewire_cameras() -> Option<Vec<CameraDevice>> {
    if !is_pipewire_available() {
        debug!("pipewiresrc not available");
        return None;
    }

    let cameras = run_pw_cli(&["ls", "Node"])
        .map(|stdout| parse_node_list(&stdout))
        .unwrap_or_default();

    if !cameras.is_empty() {
        debug!(count = cameras.len(), "Enumerated cameras via pw-cli");
        return Some(cameras);
    }

    info!("Using PipeWire auto-selection (default camera)");
    Some(vec![CameraDevice {
        name: DEFAULT_CAMERA_NAME.to_string(),
        path: String::new(),
        node_id: None,
        location: None,
    }])
}

/// Formats a PipeWire node offers, or an empty list if it cannot be queried
pub fn get_pipewire_formats(device: &CameraDevice) -> Vec<CameraFormat> {
    let Some(node_id) = device.node_id.as_deref() else {
        debug!(path = %device.path, "No node ID for format enumeration");
        return Vec::new();
    };

    match run_pw_cli(&["enum-params", node_id, "EnumFormat"]) {
        Some(stdout) => {
            let formats = parse_enum_formats(&stdout);
            debug!(node_id, count = formats.len(), "Enumerated formats via pw-cli");
            formats
        }
        None => {
            warn!(node_id, "Failed to enumerate formats from node");
            Vec::new()
        }
    }
}

/// Whether GStreamer can build a `pipewiresrc`
pub fn is_pipewire_available() -> bool {
    if gstreamer::init().is_err() {
        warn!("GStreamer init failed");
        return false;
    }

    gstreamer::ElementFactory::make("pipewiresrc")
        .build()
        .is_ok()
}

fn run_pw_cli(args: &[&str]) -> Option<String> {
    let output = std::process::Command::new("pw-cli")
        .args(args)
        .output()
        .ok()?;

    if !output.status.success() {
        debug!(?args, "pw-cli command failed");
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Properties collected for one node while scanning `pw-cli ls Node`
#[derive(Default)]
struct NodeEntry {
    id: String,
    serial: Option<String>,
    description: Option<String>,
    nick: Option<String>,
    libcamera_location: Option<String>,
    form_factor: Option<String>,
    video_source: bool,
}

impl NodeEntry {
    fn into_device(self) -> Option<CameraDevice> {
        if !self.video_source {
            return None;
        }
        let name = self.description.or(self.nick)?;

        let location = self
            .libcamera_location
            .as_deref()
            .and_then(CameraLocation::from_property)
            .or_else(|| {
                self.form_factor
                    .as_deref()
                    .and_then(CameraLocation::from_property)
            })
            .or_else(|| location_from_name(&name));

        // object.serial is what `target-object` matches on; fall back to the node ID
        let path = match &self.serial {
            Some(serial) => format!("pipewire-serial-{}", serial),
            None => format!("pipewire-{}", self.id),
        };

        debug!(id = %self.id, name = %name, path = %path, ?location, "Found video camera");
        Some(CameraDevice {
            name,
            path,
            node_id: Some(self.id),
            location,
        })
    }
}

/// Parse the output of `pw-cli ls Node` into video source devices
pub fn parse_node_list(output: &str) -> Vec<CameraDevice> {
    let mut cameras = Vec::new();
    let mut current: Option<NodeEntry> = None;

    for line in output.lines() {
        let trimmed = line.trim();

        // "id 76, type PipeWire:Interface:Node/3"
        if let Some(rest) = trimmed.strip_prefix("id ")
            && trimmed.contains("type PipeWire:Interface:Node")
        {
            if let Some(device) = current.take().and_then(NodeEntry::into_device) {
                cameras.push(device);
            }
            let id = rest.split(',').next().unwrap_or_default().trim();
            current = Some(NodeEntry {
                id: id.to_string(),
                ..NodeEntry::default()
            });
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = split_property(trimmed) else {
            continue;
        };

        match key {
            "media.class" => entry.video_source = value == "Video/Source",
            "object.serial" => entry.serial = Some(value.to_string()),
            "node.description" => entry.description = Some(value.to_string()),
            "node.nick" => entry.nick = Some(value.to_string()),
            "api.libcamera.location" => entry.libcamera_location = Some(value.to_string()),
            "device.form-factor" => entry.form_factor = Some(value.to_string()),
            _ => {}
        }
    }

    if let Some(device) = current.and_then(NodeEntry::into_device) {
        cameras.push(device);
    }

    cameras
}

/// Split `key = "value"` (optionally prefixed with `*`) into its parts
fn split_property(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim().trim_start_matches('*').trim();
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some((key, value))
}

/// Guess the mounting from words in the camera name
fn location_from_name(name: &str) -> Option<CameraLocation> {
    let lower = name.to_ascii_lowercase();
    if lower.contains("front") || lower.contains("user-facing") {
        Some(CameraLocation::Front)
    } else if lower.contains("back") || lower.contains("rear") || lower.contains("world-facing") {
        Some(CameraLocation::Back)
    } else {
        None
    }
}

/// Parse `pw-cli enum-params <id> EnumFormat` output
///
/// Raw formats are named by their video format (`YUY2`, `NV12`), compressed
/// ones by their media subtype (`MJPG`). Nodes that list no framerates
/// (libcamera) produce formats with `framerate: None`.
pub fn parse_enum_formats(output: &str) -> Vec<CameraFormat> {
    #[derive(Default)]
    struct Group {
        width: Option<u32>,
        height: Option<u32>,
        subtype: Option<String>,
        video_format: Option<String>,
        framerates: Vec<Framerate>,
    }

    impl Group {
        fn flush(&mut self, formats: &mut Vec<CameraFormat>) {
            let group = std::mem::take(self);
            let (Some(width), Some(height), Some(subtype)) =
                (group.width, group.height, group.subtype)
            else {
                return;
            };

            let pixel_format = if subtype == "raw" {
                group.video_format.unwrap_or_else(|| "YUY2".to_string())
            } else {
                subtype.to_uppercase()
            };

            if group.framerates.is_empty() {
                formats.push(CameraFormat {
                    width,
                    height,
                    framerate: None,
                    pixel_format,
                });
            } else {
                formats.extend(group.framerates.into_iter().map(|fps| CameraFormat {
                    width,
                    height,
                    framerate: Some(fps),
                    pixel_format: pixel_format.clone(),
                }));
            }
        }
    }

    let mut formats = Vec::new();
    let mut group = Group::default();

    for line in output.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("Object:") {
            group.flush(&mut formats);
            continue;
        }

        // "Id 131074   (Spa:Enum:MediaSubtype:mjpg)"
        if let Some(subtype) = enum_suffix(trimmed, "Spa:Enum:MediaSubtype:") {
            group.subtype = Some(subtype.to_lowercase());
        } else if let Some(video_format) = enum_suffix(trimmed, "Spa:Enum:VideoFormat:") {
            group.video_format = Some(video_format.to_uppercase());
        } else if let Some((w, h)) = trimmed
            .strip_prefix("Rectangle ")
            .and_then(|r| r.split_once('x'))
        {
            group.width = w.trim().parse().ok();
            group.height = h.trim().parse().ok();
        } else if let Some((num, denom)) = trimmed
            .strip_prefix("Fraction ")
            .and_then(|f| f.split_once('/'))
            && let (Ok(num), Ok(denom)) = (num.trim().parse::<u32>(), denom.trim().parse::<u32>())
            && denom > 0
        {
            let fps = Framerate::new(num, denom);
            // 60000/1001 and 60/1 count as the same rate
            if !group.framerates.iter().any(|f| f.as_int() == fps.as_int()) {
                group.framerates.push(fps);
            }
        }
    }
    group.flush(&mut formats);

    formats
}

fn enum_suffix<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let start = line.find(marker)? + marker.len();
    Some(line[start..].trim_end_matches(')').trim())
}
