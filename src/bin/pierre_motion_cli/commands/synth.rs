// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Synth command writing deterministic synthetic recordings
// ABOUTME: Sweep shape and injected form faults come from command-line flags

use std::path::PathBuf;

use clap::Args;
use pierre_motion::replay::Recording;
use pierre_motion_core::errors::{AppError, AppResult};
use pierre_motion_core::models::{CameraMode, ExerciseType};
use pierre_motion_intelligence::synthetic::{PoseFaults, Sweep};
use tracing::info;

/// Arguments of the synth command
#[derive(Args)]
pub struct SynthArgs {
    /// Exercise (squat, seated_row, lat_pulldown, straight_arm, rear_delt)
    #[arg(long)]
    pub exercise: Option<String>,

    /// Camera orientation (front, side); defaults to the exercise's recommendation
    #[arg(long)]
    pub camera: Option<String>,

    /// Number of repetitions
    #[arg(long, default_value = "5")]
    pub reps: u32,

    /// Frames per second
    #[arg(long, default_value = "20")]
    pub fps: f64,

    /// Seconds per repetition
    #[arg(long, default_value = "2")]
    pub rep_seconds: f64,

    /// Deepest squat knee angle in degrees
    #[arg(long, default_value = "90")]
    pub depth: f64,

    /// Squat knees travel inward
    #[arg(long)]
    pub knees_cave_in: bool,

    /// Extra squat torso lean in degrees
    #[arg(long, default_value = "0")]
    pub torso_lean: f64,

    /// Torso swing in degrees at the contracted end of a pull
    #[arg(long, default_value = "0")]
    pub torso_swing: f64,

    /// Elbow flexion in degrees for straight-arm pulldowns
    #[arg(long, default_value = "0")]
    pub elbow_flexion: f64,

    /// Shoulders shrug toward the ears while pulling
    #[arg(long)]
    pub shrug: bool,

    /// Vertical offset of the right arm for rear delt flyes
    #[arg(long, default_value = "0")]
    pub arm_height_offset: f64,

    /// Output file (stdout when omitted)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl SynthArgs {
    fn sweep(&self) -> AppResult<Sweep> {
        let frames_per_rep = (self.rep_seconds * self.fps).round();
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(AppError::invalid_input("--fps must be > 0"));
        }
        if !(2.0..=f64::from(u32::MAX)).contains(&frames_per_rep) {
            return Err(AppError::invalid_input(
                "--rep-seconds times --fps must give at least 2 frames per rep",
            ));
        }
        if self.reps == 0 {
            return Err(AppError::invalid_input("--reps must be > 0"));
        }
        let frames_per_rep = frames_per_rep as u32;

        Ok(Sweep {
            reps: self.reps,
            frames_per_rep,
            fps: self.fps,
            squat_depth_deg: self.depth,
        })
    }

    const fn faults(&self) -> PoseFaults {
        PoseFaults {
            knees_cave_in: self.knees_cave_in,
            torso_lean_deg: self.torso_lean,
            elbow_flexion_deg: self.elbow_flexion,
            shoulder_shrug: self.shrug,
            torso_swing_deg: self.torso_swing,
            arm_height_offset: self.arm_height_offset,
        }
    }
}

/// Generate a recording and write it to the requested destination
pub fn run(exercise: ExerciseType, camera: CameraMode, args: &SynthArgs) -> AppResult<()> {
    let recording = Recording::from_sweep(exercise, camera, &args.sweep()?, &args.faults());

    match &args.output {
        Some(path) => {
            recording.save(path)?;
            info!(
                path = %path.display(),
                exercise = %exercise,
                camera = %camera,
                frames = recording.frames.len(),
                "Synthetic recording written"
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&recording)?),
    }
    Ok(())
}
