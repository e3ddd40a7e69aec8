// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose estimator seam.
//!
//! Model loading and inference are owned by the host. The overlay loop only needs something
//! implementing [`PoseEstimator`]; [`ReplayEstimator`] plays back a recorded JSON session so
//! the pipeline can run end to end without a model.

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, Result};
use crate::keypoint::Pose;

/// Options passed with every estimation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimateOptions {
    /// Upper bound on poses returned for one frame.
    pub max_detections: usize,
    /// Mirror poses horizontally (for selfie-style feeds).
    pub flip_horizontal: bool,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        Self {
            max_detections: 5,
            flip_horizontal: false,
        }
    }
}

/// Something that turns a frame into detected poses.
///
/// The frame loop issues one call per frame and waits for it to return before asking again,
/// so implementations never see overlapping requests.
pub trait PoseEstimator {
    /// Estimate the poses in a frame.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ModelUnavailable`] when no result can be produced for this
    /// frame. The loop skips the frame and carries on.
    fn estimate_poses(&mut self, frame: &DynamicImage, options: &EstimateOptions) -> Result<Vec<Pose>>;

    /// Whether the estimator will never produce another result.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Recorded estimator output: for each frame, the poses detected in it.
///
/// Serialized as a JSON array of frames, each an array of PoseNet-style poses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseRecording {
    frames: Vec<Vec<Pose>>,
}

impl PoseRecording {
    /// Create a recording from per-frame poses.
    #[must_use]
    pub const fn new(frames: Vec<Vec<Pose>>) -> Self {
        Self { frames }
    }

    /// Load a recording from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid recording.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OverlayError::RecordingError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// Parse a recording from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::RecordingError`] on malformed input, including poses with
    /// duplicate body parts.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the recording as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::RecordingError`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Per-frame poses.
    #[must_use]
    pub fn frames(&self) -> &[Vec<Pose>] {
        &self.frames
    }

    /// Number of recorded frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the recording has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Estimator that replays a [`PoseRecording`] one frame per call.
#[derive(Debug, Clone)]
pub struct ReplayEstimator {
    recording: PoseRecording,
    cursor: usize,
}

impl ReplayEstimator {
    /// Create a replay estimator starting at the first recorded frame.
    #[must_use]
    pub const fn new(recording: PoseRecording) -> Self {
        Self {
            recording,
            cursor: 0,
        }
    }

    /// Index of the next frame to be replayed.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }
}

impl PoseEstimator for ReplayEstimator {
    #[allow(clippy::cast_precision_loss)]
    fn estimate_poses(&mut self, frame: &DynamicImage, options: &EstimateOptions) -> Result<Vec<Pose>> {
        let Some(poses) = self.recording.frames.get(self.cursor) else {
            return Err(OverlayError::ModelUnavailable(format!(
                "recording exhausted after {} frames",
                self.recording.len()
            )));
        };
        self.cursor += 1;

        let width = frame.width() as f32;
        Ok(poses
            .iter()
            .take(options.max_detections)
            .map(|pose| {
                if options.flip_horizontal {
                    pose.mirrored(width)
                } else {
                    pose.clone()
                }
            })
            .collect())
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.recording.len()
    }
}
