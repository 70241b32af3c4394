// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use lensflip::constants::{app_info, formats, notifications, timing, ui};

#[test]
fn test_preview_takes_most_of_the_width() {
    assert!(ui::PREVIEW_PORTION > ui::CONTROLS_PORTION);
    assert_eq!(ui::PREVIEW_PORTION / ui::CONTROLS_PORTION, 4);
}

#[test]
fn test_notification_durations() {
    assert!(notifications::SHORT < notifications::LONG);
    assert!(notifications::SHORT.as_millis() >= 1000);
}

#[test]
fn test_fallback_format_meets_minimum_rate() {
    assert!(formats::FALLBACK_FPS >= formats::MIN_PREVIEW_FPS);
    assert!(formats::FALLBACK_WIDTH > formats::FALLBACK_HEIGHT);
}

#[test]
fn test_cli_warmup_fits_in_timeout() {
    assert!(timing::CLI_WARMUP_MS < timing::CLI_FRAME_TIMEOUT_SECS * 1000);
}

#[test]
fn test_app_id_is_reverse_dns() {
    assert_eq!(app_info::APP_ID.split('.').count(), 4);
    assert!(!app_info::version().is_empty());
}
