// SPDX-License-Identifier: MPL-2.0

//! Where photos go on disk
//!
//! Photos are named `IMG_<timestamp>.jpg`. When two captures land in the same
//! second the later one gets a numeric suffix (`IMG_<timestamp>_1.jpg`), so an
//! existing file is never overwritten.

use crate::constants::storage::{PHOTO_PREFIX, TIMESTAMP_FORMAT};
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory photos are written to: `<Pictures>/<save_folder>`
///
/// Falls back to the home directory, then the working directory, when the
/// XDG pictures directory is unknown.
pub fn photo_directory(save_folder: &str) -> PathBuf {
    let base = dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    if save_folder.trim().is_empty() {
        base
    } else {
        base.join(save_folder)
    }
}

/// Create the directory (and parents) if it does not exist yet
pub fn ensure_directory(dir: &Path) -> std::io::Result<()> {
    if !dir.is_dir() {
        debug!(path = %dir.display(), "Creating photo directory");
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Create a new, empty photo file in `dir` and return it with its path
///
/// The name is claimed with `create_new`, so concurrent writers (the app and
/// the CLI, or two captures in the same second) each get their own file.
pub fn create_photo_file(
    dir: &Path,
    timestamp: &DateTime<Local>,
    extension: &str,
) -> std::io::Result<(PathBuf, File)> {
    let stem = format!("{}_{}", PHOTO_PREFIX, timestamp.format(TIMESTAMP_FORMAT));

    for n in 0u32.. {
        let path = if n == 0 {
            dir.join(format!("{}.{}", stem, extension))
        } else {
            dir.join(format!("{}_{}.{}", stem, n, extension))
        };

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        "no free photo file name",
    ))
}

/// Move `from` to `to` without replacing an existing file at `to`
pub fn move_without_overwrite(from: &Path, to: &Path) -> std::io::Result<()> {
    std::fs::hard_link(from, to)?;
    std::fs::remove_file(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lensflip-storage-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_name_uses_timestamp() {
        let dir = scratch_dir("name");
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let (path, _file) = create_photo_file(&dir, &ts, "jpg").unwrap();
        assert_eq!(path.file_name().unwrap(), "IMG_20240309_140507.jpg");
        assert!(path.is_file());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_collision_gets_suffix() {
        let dir = scratch_dir("collision");
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        std::fs::write(dir.join("IMG_20240309_140507.jpg"), b"x").unwrap();
        std::fs::write(dir.join("IMG_20240309_140507_1.jpg"), b"x").unwrap();

        let (path, _file) = create_photo_file(&dir, &ts, "jpg").unwrap();
        assert_eq!(path.file_name().unwrap(), "IMG_20240309_140507_2.jpg");
        assert_eq!(std::fs::read(dir.join("IMG_20240309_140507.jpg")).unwrap(), b"x");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_move_keeps_existing_target() {
        let dir = scratch_dir("move");
        let from = dir.join("new.jpg");
        let to = dir.join("existing.jpg");
        std::fs::write(&from, b"new").unwrap();
        std::fs::write(&to, b"old").unwrap();

        let err = move_without_overwrite(&from, &to).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read(&to).unwrap(), b"old");
        assert!(from.exists());

        std::fs::remove_file(&to).unwrap();
        move_without_overwrite(&from, &to).unwrap();
        assert_eq!(std::fs::read(&to).unwrap(), b"new");
        assert!(!from.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_ensure_directory_creates_nested() {
        let dir = scratch_dir("nested").join("a").join("b");
        ensure_directory(&dir).unwrap();
        assert!(dir.is_dir());
        // Idempotent
        ensure_directory(&dir).unwrap();
    }
}
