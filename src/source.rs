// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Frame sources for the overlay loop.
//!
//! Camera capture belongs to the host; these sources stand in for it with still images,
//! image sequences, or a blank canvas for replaying pose recordings without video.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::{OverlayError, Result};

/// Default blank canvas size (the capture size the live feed asks the camera for).
pub const DEFAULT_CANVAS: (u32, u32) = (1280, 720);

/// Represents different frame sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Path to an image file.
    Image(PathBuf),
    /// List of image paths, played in order.
    ImageList(Vec<PathBuf>),
    /// Directory containing images, played in file name order.
    Directory(PathBuf),
    /// Glob pattern for images (`dir/*.png`).
    Glob(String),
    /// Endless black frames of the given size.
    Blank { width: u32, height: u32 },
    /// Camera device index. Capture is owned by the host, so opening it always fails.
    Webcam(u32),
}

impl Source {
    /// Check if this source yields a fixed sequence of image files.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(
            self,
            Self::Image(_) | Self::Directory(_) | Self::Glob(_) | Self::ImageList(_)
        )
    }

    /// Check if this source never ends on its own.
    #[must_use]
    pub const fn is_endless(&self) -> bool {
        matches!(self, Self::Blank { .. } | Self::Webcam(_))
    }

    /// Parse `blank`, `blank:WxH`.
    fn parse_blank(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("blank")?;
        if rest.is_empty() {
            let (width, height) = DEFAULT_CANVAS;
            return Some(Self::Blank { width, height });
        }
        let (w, h) = rest.strip_prefix(':')?.split_once('x')?;
        Some(Self::Blank {
            width: w.parse().ok()?,
            height: h.parse().ok()?,
        })
    }
}

/// Convert from a string to a Source.
impl From<&str> for Source {
    fn from(s: &str) -> Self {
        if let Some(blank) = Self::parse_blank(s) {
            return blank;
        }

        // Check for webcam index
        if let Ok(idx) = s.parse::<u32>() {
            return Self::Webcam(idx);
        }

        // Check for glob pattern
        if s.contains('*') {
            return Self::Glob(s.to_string());
        }

        let path = PathBuf::from(s);
        if path.is_dir() {
            return Self::Directory(path);
        }

        Self::Image(path)
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::from(path.to_string_lossy().as_ref())
    }
}

/// Metadata about a source frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMeta {
    /// Frame index, starting at 0.
    pub frame_idx: usize,
    /// Total frames, unknown for endless sources.
    pub total_frames: Option<usize>,
    /// Source path or identifier.
    pub path: String,
}

impl Default for FrameMeta {
    fn default() -> Self {
        Self {
            frame_idx: 0,
            total_frames: Some(1),
            path: String::new(),
        }
    }
}

/// Iterator over frames from a source.
pub struct SourceIterator {
    source: Source,
    current_frame: usize,
    image_paths: Vec<PathBuf>,
}

impl SourceIterator {
    /// Open a source.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::AcquisitionFailure`] if the source cannot be opened or holds no
    /// images.
    pub fn new(source: Source) -> Result<Self> {
        let image_paths = match &source {
            Source::Image(path) => {
                if !path.is_file() {
                    return Err(OverlayError::AcquisitionFailure(format!(
                        "image not found: {}",
                        path.display()
                    )));
                }
                vec![path.clone()]
            }
            Source::ImageList(paths) => paths.clone(),
            Source::Directory(path) => Self::collect_images_from_dir(path)?,
            Source::Glob(pattern) => Self::collect_images_from_glob(pattern)?,
            Source::Blank { width, height } => {
                if *width == 0 || *height == 0 {
                    return Err(OverlayError::AcquisitionFailure(format!(
                        "blank canvas must be non-empty, got {width}x{height}"
                    )));
                }
                vec![]
            }
            Source::Webcam(idx) => {
                return Err(OverlayError::AcquisitionFailure(format!(
                    "camera {idx} is not available: capture is provided by the host application"
                )));
            }
        };

        if source.is_sequence() && image_paths.is_empty() {
            return Err(OverlayError::AcquisitionFailure(
                "source contains no images".to_string(),
            ));
        }

        Ok(Self {
            source,
            current_frame: 0,
            image_paths,
        })
    }

    /// The source being iterated.
    #[must_use]
    pub const fn source(&self) -> &Source {
        &self.source
    }

    /// Collect image paths from a directory.
    fn collect_images_from_dir(dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            OverlayError::AcquisitionFailure(format!("cannot read {}: {e}", dir.display()))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| Self::is_image_file(path))
            .collect();

        paths.sort();
        Ok(paths)
    }

    /// Collect image paths from a glob pattern.
    ///
    /// Only `dir/*` and `dir/*.ext` patterns are supported.
    fn collect_images_from_glob(pattern: &str) -> Result<Vec<PathBuf>> {
        let Some(star_pos) = pattern.find('*') else {
            return Ok(vec![PathBuf::from(pattern)]);
        };

        let dir_part = &pattern[..star_pos];
        let dir = if dir_part.is_empty() {
            Path::new(".")
        } else {
            Path::new(dir_part.trim_end_matches('/').trim_end_matches('\\'))
        };

        let ext_filter: Option<String> = pattern[star_pos..]
            .strip_prefix("*.")
            .map(str::to_lowercase);

        let paths = Self::collect_images_from_dir(dir)?;
        Ok(match ext_filter {
            Some(ext) => paths
                .into_iter()
                .filter(|p| {
                    p.extension()
                        .is_some_and(|e| e.to_string_lossy().to_lowercase() == ext)
                })
                .collect(),
            None => paths,
        })
    }

    /// Check if a path is an image file based on extension.
    fn is_image_file(path: &Path) -> bool {
        path.extension().is_some_and(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            matches!(
                ext.as_str(),
                "jpg" | "jpeg" | "png" | "bmp" | "webp"
            )
        })
    }

    /// Get the next image file.
    fn next_image(&mut self) -> Option<Result<(DynamicImage, FrameMeta)>> {
        let path = self.image_paths.get(self.current_frame)?;
        let meta = FrameMeta {
            frame_idx: self.current_frame,
            total_frames: Some(self.image_paths.len()),
            path: path.to_string_lossy().to_string(),
        };

        self.current_frame += 1;

        match image::open(path) {
            Ok(img) => Some(Ok((img, meta))),
            Err(e) => Some(Err(OverlayError::ImageError(format!(
                "Failed to load {}: {e}",
                path.display()
            )))),
        }
    }
}

impl Iterator for SourceIterator {
    type Item = Result<(DynamicImage, FrameMeta)>;

    fn next(&mut self) -> Option<Self::Item> {
        match &self.source {
            Source::Blank { width, height } => {
                let img = DynamicImage::new_rgb8(*width, *height);
                let meta = FrameMeta {
                    frame_idx: self.current_frame,
                    total_frames: None,
                    path: format!("blank_{width}x{height}"),
                };
                self.current_frame += 1;
                Some(Ok((img, meta)))
            }
            Source::Webcam(_) => None,
            _ => self.next_image(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_string() {
        assert!(matches!(Source::from("image.jpg"), Source::Image(_)));
        assert!(matches!(Source::from("0"), Source::Webcam(0)));
        assert!(matches!(Source::from("frames/*.png"), Source::Glob(_)));
        assert_eq!(
            Source::from("blank"),
            Source::Blank {
                width: 1280,
                height: 720
            }
        );
        assert_eq!(
            Source::from("blank:64x48"),
            Source::Blank {
                width: 64,
                height: 48
            }
        );
    }

    #[test]
    fn test_source_checks() {
        assert!(Source::Image(PathBuf::from("a.png")).is_sequence());
        assert!(Source::Blank { width: 1, height: 1 }.is_endless());
        assert!(!Source::Directory(PathBuf::from(".")).is_endless());
    }

    #[test]
    fn test_webcam_is_acquisition_failure() {
        assert!(matches!(
            SourceIterator::new(Source::Webcam(0)),
            Err(OverlayError::AcquisitionFailure(_))
        ));
    }

    #[test]
    fn test_missing_image_is_acquisition_failure() {
        assert!(matches!(
            SourceIterator::new(Source::from("definitely/not/here.png")),
            Err(OverlayError::AcquisitionFailure(_))
        ));
    }

    #[test]
    fn test_blank_source_is_endless() {
        let mut iter = SourceIterator::new(Source::Blank {
            width: 8,
            height: 4,
        })
        .unwrap();
        for expected in 0..3 {
            let (img, meta) = iter.next().unwrap().unwrap();
            assert_eq!((img.width(), img.height()), (8, 4));
            assert_eq!(meta.frame_idx, expected);
            assert_eq!(meta.total_frames, None);
        }
    }

    #[test]
    fn test_directory_source_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.png"] {
            DynamicImage::new_rgb8(2, 2)
                .save(dir.path().join(name))
                .unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let iter = SourceIterator::new(Source::Directory(dir.path().to_path_buf())).unwrap();
        let paths: Vec<String> = iter.map(|item| item.unwrap().1.path).collect();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("a.png"));
        assert!(paths[1].ends_with("b.png"));
    }

    #[test]
    fn test_empty_directory_is_acquisition_failure() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SourceIterator::new(Source::Directory(dir.path().to_path_buf())),
            Err(OverlayError::AcquisitionFailure(_))
        ));
    }
}
