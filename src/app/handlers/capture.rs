// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture handlers

use crate::app::state::{AppModel, Message};
use crate::constants::notifications;
use crate::errors::AppError;
use crate::fl;
use crate::pipelines::photo;
use cosmic::Task;
use std::path::PathBuf;
use tracing::{error, info};

impl AppModel {
    /// Whether the capture button should react
    ///
    /// A missing frame is reported through the failure notification.
    pub fn can_capture(&self) -> bool {
        self.permission_granted() && !self.is_capturing
    }

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.can_capture() {
            return Task::none();
        }

        self.is_capturing = true;
        let frame = self.current_frame.clone();
        let output_dir = self.photo_directory();
        let mirror = self.config.mirrors(self.controller.facing());
        let quality = self.config.jpeg_quality;

        info!(dir = %output_dir.display(), mirror, ?quality, "Capturing photo");

        Task::perform(
            async move {
                photo::take_picture(frame, output_dir, mirror, quality)
                    .await
                    .map_err(|e| AppError::from(e).to_string())
            },
            |result| cosmic::Action::App(Message::PhotoSaved(result)),
        )
    }

    pub(crate) fn handle_photo_saved(
        &mut self,
        result: Result<PathBuf, String>,
    ) -> Task<cosmic::Action<Message>> {
        self.is_capturing = false;

        match result {
            Ok(path) => {
                info!(path = %path.display(), "Photo saved");
                self.notify(fl!("image-captured"), notifications::SHORT)
            }
            Err(err) => {
                error!(error = %err, "Photo capture failed");
                self.notify(fl!("image-capture-failed"), notifications::SHORT)
            }
        }
    }
}
