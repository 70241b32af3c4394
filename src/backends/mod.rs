// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera capture
//!
//! - [`camera`]: device enumeration, lens selection and preview streaming

pub mod camera;
