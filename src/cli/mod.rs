// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for replaying pose recordings.
//!
//! This module contains the command-line interface logic, including argument parsing,
//! console logging, and the `run` and `inspect` commands.

/// CLI arguments.
pub mod args;

/// Console logging macros.
pub mod logging;

/// Command implementations.
pub mod run;
