// SPDX-License-Identifier: GPL-3.0-only

//! UI navigation, notification and settings handlers

use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::camera::types::LensFacing;
use crate::config::{AppTheme, Config};
use crate::pipelines::photo::EncodingQuality;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::widget::toaster::{Toast, ToastId};
use std::time::Duration;
use tracing::{error, info};

impl AppModel {
    /// Show a transient notification
    pub(crate) fn notify(
        &mut self,
        text: String,
        duration: Duration,
    ) -> Task<cosmic::Action<Message>> {
        self.toasts
            .push(Toast::new(text).duration(duration))
            .map(cosmic::Action::App)
    }

    pub(crate) fn handle_close_toast(&mut self, id: ToastId) -> Task<cosmic::Action<Message>> {
        self.toasts.remove(id);
        Task::none()
    }

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        let theme_changed = self.config.app_theme != config.app_theme;
        self.config = config;

        if theme_changed {
            cosmic::command::set_theme(self.config.app_theme.theme())
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(&app_theme) = AppTheme::ALL.get(index) else {
            return Task::none();
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config("app theme");
        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_set_default_facing(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        let Some(&facing) = LensFacing::ALL.get(index) else {
            return Task::none();
        };

        info!(%facing, "Setting startup lens");
        self.config.default_facing = facing;
        self.save_config("startup lens");
        Task::none()
    }

    pub(crate) fn handle_toggle_mirror_front_camera(
        &mut self,
        enabled: bool,
    ) -> Task<cosmic::Action<Message>> {
        info!(enabled, "Setting front camera mirroring");
        self.config.mirror_front_camera = enabled;
        self.save_config("front camera mirroring");

        // Redraw the held frame with the new orientation
        if let Some(frame) = self.current_frame.take() {
            return self.handle_camera_frame(frame);
        }
        Task::none()
    }

    pub(crate) fn handle_set_jpeg_quality(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(&quality) = EncodingQuality::ALL.get(index) else {
            return Task::none();
        };

        info!(?quality, "Setting JPEG quality");
        self.config.jpeg_quality = quality;
        self.save_config("JPEG quality");
        Task::none()
    }

    pub(crate) fn handle_open_photo_folder(&self) -> Task<cosmic::Action<Message>> {
        let dir = self.photo_directory();
        if let Err(err) = crate::storage::ensure_directory(&dir) {
            error!(path = %dir.display(), error = %err, "Failed to create photo directory");
            return Task::none();
        }
        if let Err(err) = open::that_detached(&dir) {
            error!(path = %dir.display(), error = %err, "Failed to open photo directory");
        }
        Task::none()
    }

    fn save_config(&self, what: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, setting = what, "Failed to save setting");
        }
    }
}
