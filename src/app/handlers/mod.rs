// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules, grouped by concern

pub mod camera;
pub mod capture;
pub mod permission;
pub mod ui;
