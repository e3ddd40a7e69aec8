// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use clap::Parser;

use pose_overlay::cli::args::{Cli, Commands};
use pose_overlay::cli::run::{run_inspect, run_overlay};
use pose_overlay::error;

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run_overlay(args).map(|_| ()),
        Commands::Inspect(args) => run_inspect(args),
    };

    if let Err(e) = result {
        error!("{e}");
        process::exit(1);
    }
}
