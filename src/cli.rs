// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! - Listing available cameras
//! - Taking a photo with the back or front lens

use futures::channel::mpsc;
use lensflip::backends::camera::types::{
    CameraDevice, CameraFormat, CameraFrame, CameraLocation, LensFacing,
};
use lensflip::backends::camera::{CaptureController, choose_format, get_backend};
use lensflip::config;
use lensflip::constants::{pipeline, timing};
use lensflip::errors::{CameraError, PermissionError};
use lensflip::permission::resolve_camera_access;
use lensflip::pipelines::photo::take_picture;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One entry of `lensflip list --json`
#[derive(Serialize)]
struct ListedCamera<'a> {
    index: usize,
    name: &'a str,
    path: &'a str,
    location: Option<CameraLocation>,
    facing: Option<LensFacing>,
    formats: Vec<String>,
}

/// List all available cameras
pub fn list_cameras(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let backend = get_backend();
    if !backend.is_available() {
        tracing::warn!("PipeWire is not available, camera list may be incomplete");
    }
    let cameras = backend.enumerate_cameras();

    let listed: Vec<ListedCamera<'_>> = cameras
        .iter()
        .enumerate()
        .map(|(index, camera)| ListedCamera {
            index,
            name: &camera.name,
            path: &camera.path,
            location: camera.location,
            facing: camera.location.and_then(|l| l.facing()),
            formats: top_resolutions(&backend.get_formats(camera), 3),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    if listed.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for camera in &listed {
        let lens = camera
            .facing
            .map(|f| format!(" ({f})"))
            .unwrap_or_default();
        println!("  [{}] {}{}", camera.index, camera.name, lens);
        if !camera.formats.is_empty() {
            println!("      Formats: {}", camera.formats.join(", "));
        }
        println!();
    }

    Ok(())
}

/// Distinct resolutions, largest first, each with its best framerate
fn top_resolutions(formats: &[CameraFormat], count: usize) -> Vec<String> {
    let mut resolutions: Vec<(u32, u32, u32)> = Vec::new();
    for format in formats {
        let fps = format.framerate.map(|f| f.as_int()).unwrap_or(30);
        match resolutions
            .iter_mut()
            .find(|(w, h, _)| *w == format.width && *h == format.height)
        {
            Some(existing) => existing.2 = existing.2.max(fps),
            None => resolutions.push((format.width, format.height, fps)),
        }
    }

    resolutions.sort_by(|a, b| (b.0 * b.1).cmp(&(a.0 * a.1)));
    resolutions
        .iter()
        .take(count)
        .map(|(w, h, fps)| format!("{w}x{h}@{fps}fps"))
        .collect()
}

/// Take a photo with the requested lens or camera index
pub fn take_photo(
    facing: LensFacing,
    camera_index: Option<usize>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;
    let rt = tokio::runtime::Runtime::new()?;

    if !rt.block_on(resolve_camera_access()).is_granted() {
        return Err(PermissionError::Denied.into());
    }

    let backend = get_backend();
    let cameras = backend.enumerate_cameras();
    let camera = select_camera(&cameras, facing, camera_index)?;
    println!("Using camera: {}", camera.name);

    let format = choose_format(&backend.get_formats(&camera));
    println!("Capture format: {format}");

    let (_, config) = config::load();
    let output_dir = match output.as_ref() {
        Some(path) if path.is_dir() => path.clone(),
        Some(path) => path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
        None => lensflip::storage::photo_directory(&config.save_folder),
    };

    println!("Capturing...");
    let (sender, mut receiver) = mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);
    let preview = backend
        .start_preview(&camera, Some(&format), sender)
        .map_err(CameraError::from)?;

    // Let exposure settle before keeping a frame
    let start = Instant::now();
    let timeout = Duration::from_secs(timing::CLI_FRAME_TIMEOUT_SECS);
    let warmup = Duration::from_millis(timing::CLI_WARMUP_MS);
    let mut frame: Option<CameraFrame> = None;

    while start.elapsed() < timeout {
        match receiver.try_next() {
            Ok(Some(f)) => {
                frame = Some(f);
                if start.elapsed() > warmup {
                    break;
                }
            }
            Ok(None) => break,
            Err(_) => std::thread::sleep(Duration::from_millis(timing::FRAME_POLL_MS)),
        }
    }
    drop(preview);

    let frame = frame.ok_or(CameraError::NoFrames)?;
    let lens = camera
        .location
        .and_then(|l| l.facing())
        .unwrap_or(facing);
    let mirror = config.mirrors(lens);

    let saved = rt.block_on(take_picture(
        Some(Arc::new(frame)),
        output_dir,
        mirror,
        config.jpeg_quality,
    ))?;

    // A file path was requested, so move the generated name onto it
    if let Some(user_path) = output
        && !user_path.is_dir()
    {
        if let Err(e) = lensflip::storage::move_without_overwrite(&saved, &user_path) {
            return Err(format!(
                "Could not write {} ({}), photo kept at {}",
                user_path.display(),
                e,
                saved.display()
            )
            .into());
        }
        println!("Photo saved: {}", user_path.display());
        return Ok(());
    }

    println!("Photo saved: {}", saved.display());
    Ok(())
}

/// Pick by index when given, otherwise resolve the lens like the app does
fn select_camera(
    cameras: &[CameraDevice],
    facing: LensFacing,
    camera_index: Option<usize>,
) -> Result<CameraDevice, CameraError> {
    if cameras.is_empty() {
        return Err(CameraError::NoCameraFound);
    }

    if let Some(index) = camera_index {
        return cameras
            .get(index)
            .cloned()
            .ok_or(CameraError::IndexOutOfRange {
                index,
                count: cameras.len(),
            });
    }

    let mut controller = CaptureController::new(facing);
    controller.set_devices(cameras.to_vec());
    controller
        .resolve_device()
        .cloned()
        .ok_or(CameraError::NoCameraFound)
}
