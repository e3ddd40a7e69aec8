// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Run Options:
    --poses, -p <POSES>    Pose recording (JSON, one array of poses per frame)
    --source, -s <SOURCE>  Frames to draw on (image, directory, glob, or blank[:WxH]) [default: blank]
    --conf <CONF>          Keypoint confidence threshold [default: 0.5]
    --max-det <MAX_DET>    Maximum poses per frame [default: 5]
    --flip                 Mirror poses horizontally
    --gate-stature         Require confident nose and ankle for the height estimate
    --font <FONT>          TTF font for the height label [default: Arial.ttf, downloaded]
    --save                 Save annotated frames to runs/overlay/run
    --show                 Display frames in a window
    --verbose              Show verbose output

Examples:
    pose-overlay run --poses session.json
    pose-overlay run --poses session.json --source frames/ --save
    pose-overlay run -p session.json -s blank:640x480 --conf 0.3 --show
    pose-overlay inspect --poses session.json"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw overlays for a pose recording onto frames
    Run(RunArgs),
    /// Print the derived geometry of a pose recording
    Inspect(InspectArgs),
}

/// Arguments for the run command.
#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Pose recording (JSON)
    #[arg(short, long)]
    pub poses: PathBuf,

    /// Frames to draw on (image, directory, glob, or blank[:WxH])
    #[arg(short, long)]
    pub source: Option<String>,

    /// Blank canvas width, used when no source is given
    #[arg(long)]
    pub width: Option<u32>,

    /// Blank canvas height, used when no source is given
    #[arg(long)]
    pub height: Option<u32>,

    /// Keypoint confidence threshold
    #[arg(long, default_value_t = 0.5)]
    pub conf: f32,

    /// Maximum poses per frame
    #[arg(long, default_value_t = 5)]
    pub max_det: usize,

    /// Mirror poses horizontally
    #[arg(long, default_value_t = false)]
    pub flip: bool,

    /// Require confident nose and left ankle for the height estimate
    #[arg(long, default_value_t = false)]
    pub gate_stature: bool,

    /// TTF font for the height label
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Save annotated frames to runs/overlay/run
    #[arg(long, default_value_t = false)]
    pub save: bool,

    /// Display frames in a window
    #[arg(long, default_value_t = false)]
    pub show: bool,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

/// Arguments for the inspect command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Pose recording (JSON)
    #[arg(short, long)]
    pub poses: PathBuf,

    /// Keypoint confidence threshold
    #[arg(long, default_value_t = 0.5)]
    pub conf: f32,

    /// Maximum poses per frame
    #[arg(long, default_value_t = 5)]
    pub max_det: usize,

    /// Require confident nose and left ankle for the height estimate
    #[arg(long, default_value_t = false)]
    pub gate_stature: bool,
}
