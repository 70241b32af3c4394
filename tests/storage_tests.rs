// SPDX-License-Identifier: MPL-2.0

//! Integration tests for photo storage

use chrono::{Local, TimeZone};
use lensflip::storage::{create_photo_file, ensure_directory, photo_directory};
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lensflip-it-{}-{}", name, std::process::id()))
}

#[test]
fn test_photo_directory_ends_with_save_folder() {
    assert!(photo_directory("Camera").ends_with("Camera"));
    assert!(!photo_directory("").ends_with("Camera"));
}

#[test]
fn test_allocated_paths_never_collide() {
    let dir = scratch_dir("collide");
    ensure_directory(&dir).expect("create scratch dir");
    let ts = Local
        .with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
        .single()
        .expect("valid timestamp");

    let mut seen = Vec::new();
    for _ in 0..3 {
        let (path, _file) = create_photo_file(&dir, &ts, "jpg").expect("claim photo file");
        seen.push(path);
    }

    let names: Vec<_> = seen
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            "IMG_20250102_030405.jpg",
            "IMG_20250102_030405_1.jpg",
            "IMG_20250102_030405_2.jpg"
        ]
    );

    let _ = std::fs::remove_dir_all(&dir);
}
