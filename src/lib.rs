// SPDX-License-Identifier: MPL-2.0

//! LensFlip - a minimal front/back camera for the COSMIC desktop
//!
//! Shows a live preview of one camera, lets the user flip between the
//! back and front lens and saves JPEG stills.
//!
//! # Architecture
//!
//! - [`app`]: COSMIC application, views and message handlers
//! - [`backends`]: camera discovery and preview streaming
//! - [`permission`]: camera access check and portal request
//! - [`pipelines`]: photo processing, encoding and saving
//! - [`config`]: persisted user settings
//! - [`storage`]: photo directory and file naming

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod permission;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use backends::camera::types::LensFacing;
pub use config::Config;
pub use permission::PermissionStatus;
