// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#[cfg(feature = "visualize")]
use std::time::Duration;

use crate::annotate::{RasterSurface, load_font};
use crate::cli::args::{InspectArgs, RunArgs};
use crate::cli::logging::set_verbose;
use crate::driver::{FrameDriver, RunSummary};
use crate::estimator::{PoseRecording, ReplayEstimator};
use crate::io::{SaveResults, find_next_run_dir};
use crate::report::describe_pose;
use crate::source::{DEFAULT_CANVAS, Source, SourceIterator};
#[cfg(feature = "visualize")]
use crate::visualizer::Viewer;
use crate::{NAME, OverlayConfig, Result, VERSION};
use crate::{error, info, section, success, verbose, warn};

/// "1 pose", "3 poses".
fn count_label(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Pick the frame source: explicit `--source`, else a blank canvas.
fn resolve_source(args: &RunArgs) -> Source {
    match &args.source {
        Some(s) => {
            if args.width.is_some() || args.height.is_some() {
                warn!("--width/--height only apply to the blank canvas and are ignored for '{s}'");
            }
            Source::from(s.as_str())
        }
        None => Source::Blank {
            width: args.width.unwrap_or(DEFAULT_CANVAS.0),
            height: args.height.unwrap_or(DEFAULT_CANVAS.1),
        },
    }
}

/// Build the overlay configuration from `run` arguments.
///
/// # Errors
///
/// Returns an error if a value is out of range.
pub fn run_config(args: &RunArgs) -> Result<OverlayConfig> {
    let config = OverlayConfig::new()
        .with_confidence(args.conf)
        .with_max_detections(args.max_det)
        .with_flip_horizontal(args.flip)
        .with_stature_gating(args.gate_stature);
    config.validate()?;
    Ok(config)
}

/// Replay a pose recording over a frame source, drawing the overlays.
///
/// # Errors
///
/// Returns an error if the recording or source cannot be opened, or the configuration is
/// invalid.
#[allow(clippy::too_many_lines)]
pub fn run_overlay(args: &RunArgs) -> Result<RunSummary> {
    set_verbose(args.verbose);
    let config = run_config(args)?;
    let recording = PoseRecording::load(&args.poses)?;
    let source = resolve_source(args);
    let frames = SourceIterator::new(source.clone())?;
    #[cfg(feature = "visualize")]
    let is_sequence = source.is_sequence();

    println!("{NAME} {VERSION} 🚀 {}", args.poses.display());
    verbose!(
        "recording: {}, conf={}, max_det={}, flip={}, gate_stature={}",
        count_label(recording.len(), "frame"),
        config.confidence_threshold,
        config.max_detections,
        config.flip_horizontal,
        config.gate_stature
    );

    let font = load_font(args.font.as_deref());

    let save_dir = args
        .save
        .then(|| find_next_run_dir("runs/overlay", "run"));
    let mut saver = save_dir.clone().map(SaveResults::new);

    #[cfg(feature = "visualize")]
    let mut viewer: Option<Viewer> = None;
    #[cfg(not(feature = "visualize"))]
    if args.show {
        return Err(crate::OverlayError::FeatureNotEnabled(
            "--show requires the 'visualize' feature".to_string(),
        ));
    }

    let (width, height) = match &source {
        Source::Blank { width, height } => (*width, *height),
        _ => DEFAULT_CANVAS,
    };
    let mut surface = RasterSurface::new(width, height, font);
    let mut driver = FrameDriver::new(ReplayEstimator::new(recording), config);

    section!("Frames");
    let summary = driver.run(frames, &mut surface, |surface, meta, overlays| {
        let total = meta
            .total_frames
            .map_or_else(|| "?".to_string(), |n| n.to_string());
        let statures: Vec<String> = overlays
            .iter()
            .filter_map(|o| o.rounded_stature())
            .map(|px| format!("{px}px"))
            .collect();
        verbose!(
            "frame {}/{} {}: {}x{} {}{}",
            meta.frame_idx + 1,
            total,
            meta.path,
            surface.width(),
            surface.height(),
            count_label(overlays.len(), "pose"),
            if statures.is_empty() {
                String::new()
            } else {
                format!(", height {}", statures.join(" "))
            }
        );

        if let Some(saver) = &mut saver
            && let Err(e) = saver.save(meta, surface.image())
        {
            error!("Failed to save frame: {e}");
        }

        #[cfg(feature = "visualize")]
        if args.show {
            let (w, h) = (surface.width() as usize, surface.height() as usize);
            if viewer.as_ref().is_some_and(|v| v.width != w || v.height != h) {
                viewer = None;
            }
            if viewer.is_none() {
                viewer = Some(Viewer::new("Pose Overlay", w, h)?);
            }
            if let Some(v) = &mut viewer {
                if !v.update(surface.image())? {
                    return Ok(false);
                }
                if is_sequence {
                    return Ok(v.wait(Duration::from_millis(200)));
                }
            }
        }

        Ok(true)
    })?;

    info!(
        "{} drawn, {} skipped, {} overlaid",
        count_label(summary.frames, "frame"),
        summary.skipped_frames,
        count_label(summary.poses, "pose")
    );
    if let Some(dir) = save_dir {
        success!("Results saved to {}", dir.display());
    }

    Ok(summary)
}

/// Print the derived geometry of every pose in a recording.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or the configuration is invalid.
pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let config = OverlayConfig::new()
        .with_confidence(args.conf)
        .with_max_detections(args.max_det)
        .with_stature_gating(args.gate_stature);
    config.validate()?;
    let recording = PoseRecording::load(&args.poses)?;

    println!("{NAME} {VERSION} 🚀 {}", args.poses.display());
    for (frame_idx, poses) in recording.frames().iter().enumerate() {
        section!("frame {}/{}: {}", frame_idx + 1, recording.len(), count_label(poses.len(), "pose"));
        for (idx, pose) in poses.iter().take(config.max_detections).enumerate() {
            print!("{}", describe_pose(idx, pose, &config));
        }
    }
    Ok(())
}
