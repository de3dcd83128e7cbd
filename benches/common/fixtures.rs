// ABOUTME: Benchmark fixtures generating deterministic landmark recordings
// ABOUTME: Clean and occluded sequences for reproducible per-frame and replay measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Benchmark fixtures generating deterministic landmark recordings.

use pierre_motion::replay::Recording;
use pierre_motion_core::models::{CameraMode, ExerciseType};
use pierre_motion_intelligence::synthetic::{PoseFaults, Sweep};

/// Predefined recording lengths for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum RecordingLength {
    /// Five reps, about ten seconds at 20 Hz
    Short,
    /// Thirty reps, about a minute at 30 Hz
    Long,
}

impl RecordingLength {
    #[must_use]
    pub const fn sweep(self) -> Sweep {
        match self {
            Self::Short => Sweep {
                reps: 5,
                frames_per_rep: 40,
                fps: 20.0,
                squat_depth_deg: 90.0,
            },
            Self::Long => Sweep {
                reps: 30,
                frames_per_rep: 60,
                fps: 30.0,
                squat_depth_deg: 90.0,
            },
        }
    }
}

/// Recording on the exercise's recommended camera
#[must_use]
pub fn recording(exercise: ExerciseType, length: RecordingLength) -> Recording {
    Recording::from_sweep(
        exercise,
        exercise.recommended_camera(),
        &length.sweep(),
        &PoseFaults::default(),
    )
}

/// Front-view squat recording with caving knees
#[must_use]
pub fn faulty_squat(length: RecordingLength) -> Recording {
    let faults = PoseFaults {
        knees_cave_in: true,
        ..PoseFaults::default()
    };
    Recording::from_sweep(ExerciseType::Squat, CameraMode::Front, &length.sweep(), &faults)
}
