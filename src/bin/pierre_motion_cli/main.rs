// ABOUTME: Pierre Motion CLI - replay recordings, generate synthetic recordings, inspect configuration
// ABOUTME: Entry point parsing arguments, installing logging, and dispatching subcommands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Replay recordings and print a summary per file
//! pierre-motion replay session1.json session2.json
//!
//! # Full JSON reports
//! pierre-motion replay session1.json --json
//!
//! # Write a synthetic 5-rep lat pulldown recording
//! pierre-motion synth --exercise lat_pulldown --output lat.json
//!
//! # Squat recording with caving knees, printed to stdout
//! pierre-motion synth --exercise squat --knees-cave-in
//!
//! # Effective configuration
//! pierre-motion config --config motion.json
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pierre_motion::config::RuntimeConfig;
use pierre_motion::logging::LoggingConfig;
use pierre_motion_core::models::{CameraMode, ExerciseType};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "pierre-motion",
    version,
    about = "Pierre Motion exercise form analysis",
    long_about = "Replay recorded landmark streams through the motion analysis engine, generate synthetic recordings, and inspect the effective configuration."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Replay one or more recordings
    Replay {
        /// Recording files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print full JSON reports instead of summaries
        #[arg(long)]
        json: bool,

        /// Configuration file (defaults to `MOTION_CONFIG_FILE`)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a synthetic recording
    Synth(commands::synth::SynthArgs),

    /// Print the effective configuration as JSON
    Config {
        /// Configuration file (defaults to `MOTION_CONFIG_FILE`)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose {
        logging.verbose()
    } else {
        logging
    };
    logging.init()?;

    match cli.command {
        Command::Replay {
            files,
            json,
            config,
        } => {
            let config = RuntimeConfig::load(config.as_deref())?;
            commands::replay::run(&files, json, &config)?;
        }
        Command::Synth(args) => {
            let config = RuntimeConfig::load(None)?;
            let exercise: ExerciseType = args
                .exercise
                .as_deref()
                .map_or(Ok(config.default_exercise), str::parse::<ExerciseType>)?;
            let camera = match args.camera.as_deref() {
                Some(name) => name.parse::<CameraMode>()?,
                None => config.camera_for(exercise),
            };
            debug!(exercise = %exercise, camera = %camera, "Generating synthetic recording");
            commands::synth::run(exercise, camera, &args)?;
        }
        Command::Config { config } => {
            let config = RuntimeConfig::load(config.as_deref())?;
            commands::config::run(&config)?;
        }
    }

    Ok(())
}
