// ABOUTME: Core data models for motion analysis
// ABOUTME: Re-exports landmark, frame, body-part, exercise and camera types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Landmarks, body parts and frames
pub mod landmark;

/// Exercise catalogue and camera modes
pub mod exercise;

pub use exercise::{CameraMode, ExerciseFamily, ExerciseType};
pub use landmark::{BodyLandmark, BodySide, Frame, Landmark};
