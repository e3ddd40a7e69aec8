// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Overlay styling and on-screen display.

/// Color definitions.
pub mod color;

/// Skeleton topology.
pub mod skeleton;

#[cfg(feature = "visualize")]
pub mod viewer;

pub use color::Color;
pub use skeleton::SKELETON;

#[cfg(feature = "visualize")]
pub use viewer::Viewer;
