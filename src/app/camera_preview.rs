// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview surface

use crate::app::state::{AppModel, Message};
use crate::backends::camera::types::CameraFrame;
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{ContentFit, Length};
use cosmic::widget::{self, image::Handle};

impl AppModel {
    /// The live preview, or a status line while there is nothing to show
    pub fn build_camera_preview(&self) -> Element<'_, Message> {
        if let Some(handle) = &self.preview_handle {
            return widget::image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        }

        let status = if self.cameras_enumerated && self.controller.resolve_device().is_none() {
            fl!("no-camera")
        } else {
            fl!("starting-camera")
        };
        placeholder(status)
    }
}

/// Centered message filling the preview area
pub fn placeholder<'a>(text: String) -> Element<'a, Message> {
    widget::container(widget::text(text).size(ui::PLACEHOLDER_TEXT_SIZE))
        .center(Length::Fill)
        .into()
}

/// Image handle for a frame, flipped horizontally when `mirror` is set
pub fn frame_to_handle(frame: &CameraFrame, mirror: bool) -> Handle {
    let pixels = if mirror {
        mirrored_rgba(frame)
    } else {
        frame.packed_rgba()
    };
    Handle::from_rgba(frame.width, frame.height, pixels)
}

/// Tightly packed RGBA with every row reversed
pub fn mirrored_rgba(frame: &CameraFrame) -> Vec<u8> {
    let row_bytes = frame.width as usize * 4;
    let mut out = Vec::with_capacity(row_bytes * frame.height as usize);
    for row in frame
        .data
        .chunks(frame.stride as usize)
        .take(frame.height as usize)
    {
        for px in row[..row_bytes].chunks_exact(4).rev() {
            out.extend_from_slice(px);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrored_rgba_reverses_pixels_per_row() {
        let frame = CameraFrame::from_rgba(
            2,
            2,
            vec![
                1, 1, 1, 1, 2, 2, 2, 2, //
                3, 3, 3, 3, 4, 4, 4, 4,
            ],
        );
        assert_eq!(
            mirrored_rgba(&frame),
            vec![2, 2, 2, 2, 1, 1, 1, 1, 4, 4, 4, 4, 3, 3, 3, 3]
        );
    }
}
