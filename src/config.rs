// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::types::LensFacing;
use crate::constants::storage::DEFAULT_SAVE_FOLDER;
use crate::pipelines::photo::EncodingQuality;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow the system dark/light setting
    #[default]
    System,
    Dark,
    Light,
}

impl AppTheme {
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Dark, AppTheme::Light];

    /// COSMIC theme for this preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Lens selected when the app starts
    pub default_facing: LensFacing,
    /// Flip the front camera preview and photos horizontally
    pub mirror_front_camera: bool,
    /// JPEG quality preset for captured photos
    pub jpeg_quality: EncodingQuality,
    /// Folder below the user's pictures directory receiving photos
    pub save_folder: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            default_facing: LensFacing::Back,
            mirror_front_camera: true,
            jpeg_quality: EncodingQuality::default(),
            save_folder: DEFAULT_SAVE_FOLDER.to_string(),
        }
    }
}

impl Config {
    /// Whether frames from the given lens should be mirrored
    pub fn mirrors(&self, facing: LensFacing) -> bool {
        self.mirror_front_camera && facing == LensFacing::Front
    }
}

/// Load the persisted configuration, falling back to defaults field by field
pub fn load() -> (Option<cosmic_config::Config>, Config) {
    match cosmic_config::Config::new(crate::constants::app_info::APP_ID, Config::VERSION) {
        Ok(handler) => {
            let config = match Config::get_entry(&handler) {
                Ok(config) => config,
                Err((errors, config)) => {
                    tracing::error!(?errors, "Errors loading config");
                    config
                }
            };
            (Some(handler), config)
        }
        Err(err) => {
            tracing::error!(%err, "Failed to create config handler");
            (None, Config::default())
        }
    }
}
