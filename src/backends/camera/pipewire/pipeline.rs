// SPDX-License-Identifier: MPL-2.0

//! GStreamer preview pipeline on top of `pipewiresrc`
//!
//! Every frame is converted to RGBA before it reaches the appsink, so the UI
//! and the photo pipeline never deal with YUV layouts.

use super::super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A running preview; the camera is released when this is dropped
pub struct PreviewPipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    description: String,
}

impl PreviewPipeline {
    /// Start streaming `device` into `frame_sender`
    ///
    /// With a `format` the caps are pinned to it; if that pipeline refuses to
    /// start, an auto-negotiated one is tried before giving up.
    pub fn new(
        device: &CameraDevice,
        format: Option<&CameraFormat>,
        frame_sender: FrameSender,
    ) -> BackendResult<Self> {
        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        if gstreamer::ElementFactory::find("pipewiresrc").is_none() {
            return Err(BackendError::NotAvailable(
                "pipewiresrc factory not found".to_string(),
            ));
        }

        let target = target_object_property(&device.path);
        let mut candidates = Vec::with_capacity(2);
        if let Some(format) = format {
            candidates.push(build_pipeline_string(&target, Some(format)));
        }
        candidates.push(build_pipeline_string(&target, None));

        let mut last_error = None;
        for description in candidates {
            info!(device = %device.name, pipeline = %description, "Launching preview pipeline");
            match launch(&description, frame_sender.clone()) {
                Ok((pipeline, appsink)) => {
                    return Ok(Self {
                        pipeline,
                        appsink,
                        description,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Preview pipeline failed to start");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            BackendError::InitializationFailed("No pipeline candidates".to_string())
        }))
    }

    /// The gst-launch description of the running pipeline
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Pending error or end-of-stream posted on the bus since the last call
    ///
    /// Frames stop arriving after either, but the frame channel stays open.
    pub fn poll_failure(&self) -> Option<String> {
        let bus = self.pipeline.bus()?;
        while let Some(msg) =
            bus.pop_filtered(&[gstreamer::MessageType::Error, gstreamer::MessageType::Eos])
        {
            if let Some(reason) = stream_failure(&msg) {
                return Some(reason);
            }
        }
        None
    }
}

/// Why a bus message ends the stream, if it does
pub fn stream_failure(msg: &gstreamer::MessageRef) -> Option<String> {
    match msg.view() {
        gstreamer::MessageView::Error(err) => Some(match err.debug() {
            Some(debug) => format!("{} ({})", err.error(), debug),
            None => err.error().to_string(),
        }),
        gstreamer::MessageView::Eos(_) => Some("end of stream".to_string()),
        _ => None,
    }
}

impl Drop for PreviewPipeline {
    fn drop(&mut self) {
        debug!("Stopping preview pipeline");
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        let _ = self.pipeline.set_state(gstreamer::State::Null);
        let (result, state, _) = self
            .pipeline
            .state(gstreamer::ClockTime::from_seconds(timing::STOP_TIMEOUT_SECS));
        debug!(?result, ?state, "Preview pipeline stopped");
    }
}

fn launch(
    description: &str,
    frame_sender: FrameSender,
) -> BackendResult<(gstreamer::Pipeline, AppSink)> {
    let pipeline = gstreamer::parse::launch(description)
        .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
        .dynamic_cast::<gstreamer::Pipeline>()
        .map_err(|_| BackendError::InitializationFailed("Not a pipeline".to_string()))?;

    let appsink = pipeline
        .by_name("sink")
        .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
        .dynamic_cast::<AppSink>()
        .map_err(|_| BackendError::InitializationFailed("Failed to cast appsink".to_string()))?;

    appsink.set_property("sync", false);
    appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
    appsink.set_property("drop", true);
    appsink.set_property("enable-last-sample", false);
    appsink.set_callbacks(
        gstreamer_app::AppSinkCallbacks::builder()
            .new_sample(move |appsink| forward_sample(appsink, &frame_sender))
            .build(),
    );

    if let Err(e) = pipeline.set_state(gstreamer::State::Playing) {
        log_bus_error(&pipeline);
        let _ = pipeline.set_state(gstreamer::State::Null);
        return Err(BackendError::InitializationFailed(format!(
            "Failed to start pipeline: {}",
            e
        )));
    }

    let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
        timing::START_TIMEOUT_SECS,
    ));
    let started = state == gstreamer::State::Playing
        || (matches!(result, Ok(gstreamer::StateChangeSuccess::Async))
            && pending == gstreamer::State::Playing);

    if !started {
        error!(?result, ?state, ?pending, "Pipeline failed to reach PLAYING");
        log_bus_error(&pipeline);
        let _ = pipeline.set_state(gstreamer::State::Null);
        return Err(BackendError::InitializationFailed(format!(
            "Pipeline stuck in {:?}",
            state
        )));
    }

    Ok((pipeline, appsink))
}

fn forward_sample(
    appsink: &AppSink,
    frame_sender: &FrameSender,
) -> Result<gstreamer::FlowSuccess, gstreamer::FlowError> {
    let captured_at = Instant::now();
    let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    let sampled = frame_num % timing::FRAME_LOG_INTERVAL == 0;

    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;
    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;

    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
        if sampled {
            warn!(frame = frame_num, "Corrupted buffer, skipping frame");
        }
        return Ok(gstreamer::FlowSuccess::Ok);
    }

    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
    let info = VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;
    let map = buffer
        .map_readable()
        .map_err(|_| gstreamer::FlowError::Error)?;

    let frame = CameraFrame {
        width: info.width(),
        height: info.height(),
        data: Arc::from(map.as_slice()),
        stride: info.stride()[0] as u32,
        captured_at,
    };

    match frame_sender.clone().try_send(frame) {
        Ok(()) => {
            if sampled {
                debug!(
                    frame = frame_num,
                    width = info.width(),
                    height = info.height(),
                    elapsed_us = captured_at.elapsed().as_micros(),
                    "Frame delivered"
                );
            }
        }
        Err(e) if e.is_disconnected() => return Err(gstreamer::FlowError::Flushing),
        Err(_) => {
            if sampled {
                debug!(frame = frame_num, "Frame dropped (channel full)");
            }
        }
    }

    Ok(gstreamer::FlowSuccess::Ok)
}

fn log_bus_error(pipeline: &gstreamer::Pipeline) {
    let Some(bus) = pipeline.bus() else {
        return;
    };
    if let Some(msg) = bus.timed_pop_filtered(
        gstreamer::ClockTime::from_mseconds(100),
        &[gstreamer::MessageType::Error],
    ) && let gstreamer::MessageView::Error(err) = msg.view()
    {
        error!(
            error = %err.error(),
            debug = ?err.debug(),
            source = ?err.src().map(|s| s.name()),
            "GStreamer error during pipeline start"
        );
    }
}

/// `pipewiresrc` property selecting the camera, with a trailing space
///
/// Empty for the default camera.
pub fn target_object_property(device_path: &str) -> String {
    if device_path.is_empty() {
        String::new()
    } else if let Some(serial) = device_path.strip_prefix("pipewire-serial-") {
        format!("target-object={} ", serial)
    } else if let Some(node_id) = device_path.strip_prefix("pipewire-") {
        format!("target-object={} ", node_id)
    } else if device_path.starts_with("/dev/video") {
        format!("path=v4l2:{} ", device_path)
    } else {
        format!("path={} ", device_path)
    }
}

/// gst-launch description for a preview of `format`, or auto-negotiated when `None`
pub fn build_pipeline_string(target: &str, format: Option<&CameraFormat>) -> String {
    let tail = format!(
        "videoconvert ! video/x-raw,format={} ! queue max-size-buffers={} leaky=downstream ! appsink name=sink",
        pipeline::OUTPUT_FORMAT,
        pipeline::MAX_BUFFERS
    );

    let Some(format) = format else {
        return format!("pipewiresrc {}do-timestamp=true ! decodebin ! {}", target, tail);
    };

    let mut caps = format!("width=(int){},height=(int){}", format.width, format.height);
    if let Some(fps) = format.framerate {
        caps.push_str(&format!(",framerate=(fraction){}", fps.as_gst_fraction()));
    }

    match format.pixel_format.to_uppercase().as_str() {
        "MJPG" | "MJPEG" => format!(
            "pipewiresrc {}do-timestamp=true ! image/jpeg,{} ! jpegparse ! jpegdec ! {}",
            target, caps, tail
        ),
        "H264" | "H265" | "HEVC" => format!(
            "pipewiresrc {}do-timestamp=true ! decodebin ! {}",
            target, tail
        ),
        raw => {
            // V4L2 says YUYV, GStreamer says YUY2
            let raw = if raw == "YUYV" { "YUY2" } else { raw };
            format!(
                "pipewiresrc {}do-timestamp=true ! video/x-raw,format={},{} ! {}",
                target, raw, caps, tail
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_object_property() {
        assert_eq!(target_object_property(""), "");
        assert_eq!(
            target_object_property("pipewire-serial-2146"),
            "target-object=2146 "
        );
        assert_eq!(target_object_property("pipewire-58"), "target-object=58 ");
        assert_eq!(
            target_object_property("/dev/video0"),
            "path=v4l2:/dev/video0 "
        );
    }

    #[test]
    fn test_mjpeg_pipeline_string() {
        let format = CameraFormat {
            width: 1280,
            height: 720,
            framerate: Some(Framerate::from_int(30)),
            pixel_format: "MJPG".to_string(),
        };
        let s = build_pipeline_string("target-object=7 ", Some(&format));
        assert!(s.starts_with("pipewiresrc target-object=7 do-timestamp=true"));
        assert!(s.contains("image/jpeg,width=(int)1280,height=(int)720,framerate=(fraction)30/1"));
        assert!(s.contains("jpegdec"));
        assert!(s.ends_with("appsink name=sink"));
        assert!(s.contains("video/x-raw,format=RGBA"));
    }

    #[test]
    fn test_raw_pipeline_renames_yuyv() {
        let format = CameraFormat {
            width: 640,
            height: 480,
            framerate: None,
            pixel_format: "YUYV".to_string(),
        };
        let s = build_pipeline_string("", Some(&format));
        assert!(s.contains("video/x-raw,format=YUY2,width=(int)640,height=(int)480 !"));
        assert!(!s.contains("framerate"));
    }

    #[test]
    fn test_error_and_eos_end_the_stream() {
        gstreamer::init().unwrap();

        let eos = gstreamer::message::Eos::new();
        assert_eq!(stream_failure(&eos).as_deref(), Some("end of stream"));

        let err = gstreamer::message::Error::new(gstreamer::ResourceError::Read, "device lost");
        assert!(stream_failure(&err).unwrap().contains("device lost"));

        let latency = gstreamer::message::Latency::new();
        assert_eq!(stream_failure(&latency), None);
    }

    #[test]
    fn test_auto_pipeline_uses_decodebin() {
        let s = build_pipeline_string("", None);
        assert!(s.starts_with("pipewiresrc do-timestamp=true ! decodebin !"));
    }
}
