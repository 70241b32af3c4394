// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use lensflip::config::AppTheme;
use lensflip::pipelines::photo::EncodingQuality;
use lensflip::{Config, LensFacing};

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.app_theme, AppTheme::System);
    assert_eq!(config.default_facing, LensFacing::Back);
    assert!(
        config.mirror_front_camera,
        "Front camera should be mirrored by default"
    );
    assert_eq!(config.jpeg_quality, EncodingQuality::High);
    assert_eq!(config.save_folder, "Camera");
}

#[test]
fn test_only_front_lens_is_mirrored() {
    let mut config = Config::default();
    assert!(config.mirrors(LensFacing::Front));
    assert!(!config.mirrors(LensFacing::Back));

    config.mirror_front_camera = false;
    assert!(!config.mirrors(LensFacing::Front));
}

#[test]
fn test_settings_lists_are_complete() {
    assert_eq!(AppTheme::ALL.len(), 3);
    assert_eq!(LensFacing::ALL, [LensFacing::Back, LensFacing::Front]);
    assert_eq!(EncodingQuality::ALL.len(), 4);
}
