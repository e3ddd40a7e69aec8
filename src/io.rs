// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Saving annotated frames to disk.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{OverlayError, Result};
use crate::source::FrameMeta;

/// Find the next free run directory: `base/prefix`, then `base/prefix2`, `base/prefix3`, ...
#[must_use]
pub fn find_next_run_dir(base: &str, prefix: &str) -> PathBuf {
    let base_path = Path::new(base);

    let first = base_path.join(prefix);
    if !first.exists() {
        return first;
    }

    (2..)
        .map(|i| base_path.join(format!("{prefix}{i}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

/// Writes annotated frames into a run directory as PNG files.
///
/// Single-frame sources keep their file stem (`photo.png`); frames from a sequence or an
/// endless source are suffixed with their index (`frames_12.png`).
#[derive(Debug)]
pub struct SaveResults {
    save_dir: PathBuf,
    saved: usize,
}

impl SaveResults {
    /// Create a saver writing into `save_dir`. The directory is created on first save.
    #[must_use]
    pub const fn new(save_dir: PathBuf) -> Self {
        Self { save_dir, saved: 0 }
    }

    /// Output directory.
    #[must_use]
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Number of frames written so far.
    #[must_use]
    pub const fn saved(&self) -> usize {
        self.saved
    }

    /// Output path for a frame.
    #[must_use]
    pub fn frame_path(&self, meta: &FrameMeta) -> PathBuf {
        let stem = Path::new(&meta.path)
            .file_stem()
            .map_or_else(|| "frame".to_string(), |s| s.to_string_lossy().to_string());

        let filename = if meta.total_frames == Some(1) {
            format!("{stem}.png")
        } else {
            format!("{stem}_{}.png", meta.frame_idx)
        };
        self.save_dir.join(filename)
    }

    /// Save an annotated frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the image cannot be written.
    pub fn save(&mut self, meta: &FrameMeta, annotated: &RgbaImage) -> Result<PathBuf> {
        if !self.save_dir.exists() {
            std::fs::create_dir_all(&self.save_dir).map_err(|e| {
                OverlayError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to create {}: {e}", self.save_dir.display()),
                ))
            })?;
        }

        let path = self.frame_path(meta);
        annotated.save(&path)?;
        self.saved += 1;
        Ok(path)
    }
}
