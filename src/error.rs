// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the overlay library.

use std::fmt;

/// Result type alias for overlay operations.
pub type Result<T> = std::result::Result<T, OverlayError>;

/// Main error type for the overlay library.
#[derive(Debug)]
pub enum OverlayError {
    /// A derivation's required keypoints are absent or below the confidence threshold.
    InsufficientKeypoints(String),
    /// The pose estimator failed or has nothing to report for this frame.
    ModelUnavailable(String),
    /// The frame source (camera stand-in) could not be opened.
    AcquisitionFailure(String),
    /// A pose violates the one-keypoint-per-part invariant.
    InvalidPose(String),
    /// Error decoding a pose recording.
    RecordingError(String),
    /// Error processing images.
    ImageError(String),
    /// Invalid configuration provided.
    ConfigError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
    /// Visualizer error.
    VisualizerError(String),
    /// Feature not enabled.
    FeatureNotEnabled(String),
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientKeypoints(msg) => write!(f, "Insufficient keypoints: {msg}"),
            Self::ModelUnavailable(msg) => write!(f, "Model unavailable: {msg}"),
            Self::AcquisitionFailure(msg) => write!(f, "Acquisition failure: {msg}"),
            Self::InvalidPose(msg) => write!(f, "Invalid pose: {msg}"),
            Self::RecordingError(msg) => write!(f, "Recording error: {msg}"),
            Self::ImageError(msg) => write!(f, "Image error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::VisualizerError(msg) => write!(f, "Visualizer error: {msg}"),
            Self::FeatureNotEnabled(msg) => write!(f, "Feature not enabled: {msg}"),
        }
    }
}

impl std::error::Error for OverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OverlayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for OverlayError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageError(err.to_string())
    }
}

impl From<serde_json::Error> for OverlayError {
    fn from(err: serde_json::Error) -> Self {
        Self::RecordingError(err.to_string())
    }
}
