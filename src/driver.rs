// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! The frame loop.
//!
//! [`FrameDriver`] pulls one frame at a time, asks the estimator for poses, redraws the frame
//! on the surface and layers each pose's overlay on top. The next frame is only pulled after
//! the current one has been presented, so at most one estimate is ever in flight and frames
//! that arrive while estimating are simply never requested.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::DynamicImage;

use crate::config::OverlayConfig;
use crate::error::{OverlayError, Result};
use crate::estimator::{EstimateOptions, PoseEstimator};
use crate::overlay::{PoseOverlay, overlay_frame};
use crate::source::FrameMeta;
use crate::surface::{DrawSurface, Rect, render};
use crate::{verbose, warn};

/// Shared flag that stops the loop before the next frame is scheduled.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Create a signal in the running state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Totals for one run of the loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames drawn and presented.
    pub frames: usize,
    /// Frames dropped because no poses could be estimated or the frame failed to load.
    pub skipped_frames: usize,
    /// Poses overlaid across all frames.
    pub poses: usize,
    /// Rounded stature of every pose that had one, in order.
    pub statures: Vec<u32>,
}

/// Drives frames through estimation, overlay and presentation.
pub struct FrameDriver<E: PoseEstimator> {
    estimator: E,
    config: OverlayConfig,
    stop: StopSignal,
}

impl<E: PoseEstimator> FrameDriver<E> {
    /// Create a driver.
    #[must_use]
    pub fn new(estimator: E, config: OverlayConfig) -> Self {
        Self {
            estimator,
            config,
            stop: StopSignal::new(),
        }
    }

    /// Handle for stopping the loop from elsewhere.
    #[must_use]
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// The overlay configuration.
    #[must_use]
    pub const fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The pose estimator.
    #[must_use]
    pub const fn estimator(&self) -> &E {
        &self.estimator
    }

    fn estimate_options(&self) -> EstimateOptions {
        EstimateOptions {
            max_detections: self.config.max_detections,
            flip_horizontal: self.config.flip_horizontal,
        }
    }

    /// Estimate, redraw and overlay a single frame.
    ///
    /// Nothing is drawn when estimation fails, so the previous frame stays on the surface.
    ///
    /// # Errors
    ///
    /// Returns the estimator's error, typically [`OverlayError::ModelUnavailable`].
    pub fn process_frame<S: DrawSurface + ?Sized>(
        &mut self,
        frame: &DynamicImage,
        surface: &mut S,
    ) -> Result<Vec<PoseOverlay>> {
        let options = self.estimate_options();
        let poses = self.estimator.estimate_poses(frame, &options)?;

        let full = Rect::frame(frame.width(), frame.height());
        surface.begin_frame(frame.width(), frame.height());
        surface.clear_region(full);
        surface.draw_image(frame, full);

        let overlays = overlay_frame(&poses, &self.config);
        for (idx, overlay) in overlays.iter().enumerate() {
            render(surface, &overlay.commands);
            for skip in &overlay.skipped {
                verbose!("pose {idx}: no {} ({})", skip.derivation, skip.reason);
            }
            if let Some(stature) = overlay.rounded_stature() {
                verbose!("pose {idx}: estimated height {stature} px");
            }
        }
        Ok(overlays)
    }

    /// Run until the frames run out, the estimator is exhausted or the stop signal is raised.
    ///
    /// `present` is called after each drawn frame with the surface and that frame's overlays;
    /// returning `false` stops the loop.
    ///
    /// # Errors
    ///
    /// Frame-level failures (`ModelUnavailable`, undecodable images) are logged and skipped.
    /// Any other error from the source, the estimator or `present` ends the run.
    pub fn run<I, S, F>(&mut self, frames: I, surface: &mut S, mut present: F) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<(DynamicImage, FrameMeta)>>,
        S: DrawSurface + ?Sized,
        F: FnMut(&S, &FrameMeta, &[PoseOverlay]) -> Result<bool>,
    {
        let mut summary = RunSummary::default();
        let mut frames = frames.into_iter();

        while !self.stop.is_stopped() && !self.estimator.is_exhausted() {
            let Some(item) = frames.next() else {
                break;
            };

            let (frame, meta) = match item {
                Ok(frame) => frame,
                Err(OverlayError::ImageError(msg)) => {
                    warn!("Skipping frame: {msg}");
                    summary.skipped_frames += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let overlays = match self.process_frame(&frame, surface) {
                Ok(overlays) => overlays,
                Err(OverlayError::ModelUnavailable(msg)) => {
                    warn!("Skipping frame {}: {msg}", meta.frame_idx);
                    summary.skipped_frames += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            summary.frames += 1;
            summary.poses += overlays.len();
            summary
                .statures
                .extend(overlays.iter().filter_map(PoseOverlay::rounded_stature));

            if !present(&*surface, &meta, &overlays)? {
                self.stop.stop();
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{PoseRecording, ReplayEstimator};
    use crate::keypoint::{BodyPart, Keypoint, Pose};
    use crate::surface::{CommandRecorder, DrawCommand};

    fn pose() -> Pose {
        Pose::new(vec![
            Keypoint::new(BodyPart::Nose, 0.0, 0.0, 0.9),
            Keypoint::new(BodyPart::LeftAnkle, 0.0, 100.0, 0.9),
        ])
        .unwrap()
    }

    fn blank_frames(n: usize) -> impl Iterator<Item = Result<(DynamicImage, FrameMeta)>> {
        (0..n).map(|frame_idx| {
            Ok((
                DynamicImage::new_rgb8(16, 8),
                FrameMeta {
                    frame_idx,
                    total_frames: None,
                    path: "test".to_string(),
                },
            ))
        })
    }

    /// Estimator that fails every other frame.
    struct Flaky {
        calls: usize,
    }

    impl PoseEstimator for Flaky {
        fn estimate_poses(&mut self, _: &DynamicImage, _: &EstimateOptions) -> Result<Vec<Pose>> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                Err(OverlayError::ModelUnavailable("busy".to_string()))
            } else {
                Ok(vec![pose()])
            }
        }
    }

    #[test]
    fn test_process_frame_command_sequence() {
        let recording = PoseRecording::new(vec![vec![pose()]]);
        let mut driver = FrameDriver::new(ReplayEstimator::new(recording), OverlayConfig::default());
        let mut surface = CommandRecorder::new();

        let overlays = driver
            .process_frame(&DynamicImage::new_rgb8(16, 8), &mut surface)
            .unwrap();
        assert_eq!(overlays.len(), 1);

        let commands = surface.commands();
        assert_eq!(commands[0], DrawCommand::ClearRegion(Rect::frame(16, 8)));
        assert_eq!(commands[1], DrawCommand::DrawImage(Rect::frame(16, 8)));
        assert_eq!(&commands[2..], overlays[0].commands.as_slice());
    }

    #[test]
    fn test_run_stops_when_recording_exhausted() {
        let recording = PoseRecording::new(vec![vec![pose()], vec![], vec![pose(), pose()]]);
        let mut driver = FrameDriver::new(ReplayEstimator::new(recording), OverlayConfig::default());
        let mut surface = CommandRecorder::new();

        let summary = driver
            .run(blank_frames(10), &mut surface, |_, _, _| Ok(true))
            .unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.poses, 3);
        assert_eq!(summary.statures, vec![100, 100, 100]);
        assert_eq!(summary.skipped_frames, 0);
    }

    #[test]
    fn test_run_skips_unavailable_frames() {
        let mut driver = FrameDriver::new(Flaky { calls: 0 }, OverlayConfig::default());
        let mut surface = CommandRecorder::new();
        let mut presented = Vec::new();

        let summary = driver
            .run(blank_frames(4), &mut surface, |_, meta, _| {
                presented.push(meta.frame_idx);
                Ok(true)
            })
            .unwrap();
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.skipped_frames, 2);
        assert_eq!(presented, vec![0, 2]);
    }

    #[test]
    fn test_present_false_stops_loop() {
        let mut driver = FrameDriver::new(Flaky { calls: 0 }, OverlayConfig::default());
        let mut surface = CommandRecorder::new();
        let stop = driver.stop_signal();

        let summary = driver
            .run(blank_frames(10), &mut surface, |_, _, _| Ok(false))
            .unwrap();
        assert_eq!(summary.frames, 1);
        assert!(stop.is_stopped());
    }

    #[test]
    fn test_stop_signal_prevents_next_frame() {
        let mut driver = FrameDriver::new(Flaky { calls: 0 }, OverlayConfig::default());
        driver.stop_signal().stop();
        let summary = driver
            .run(blank_frames(3), &mut CommandRecorder::new(), |_, _, _| Ok(true))
            .unwrap();
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn test_acquisition_failure_ends_run() {
        let mut driver = FrameDriver::new(Flaky { calls: 0 }, OverlayConfig::default());
        let frames = vec![Err(OverlayError::AcquisitionFailure("gone".to_string()))];
        assert!(matches!(
            driver.run(frames, &mut CommandRecorder::new(), |_, _, _| Ok(true)),
            Err(OverlayError::AcquisitionFailure(_))
        ));
    }
}
