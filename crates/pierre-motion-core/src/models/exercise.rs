// ABOUTME: Exercise catalogue and camera orientation for motion analysis sessions
// ABOUTME: Maps each exercise to its family, display name, and recommended camera mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Movement family sharing one phase machine and calibration protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseFamily {
    /// Knee-angle driven lower-body movement
    Squat,
    /// Back exercises driven by a normalized pull range of motion
    Pulling,
}

/// Exercise analysed by a session
///
/// - `Squat`: knee angle (hip-knee-ankle), front or side camera
/// - `SeatedRow`: horizontal elbow travel, side camera
/// - `RearDelt`: horizontal wrist spread, front camera
/// - `LatPulldown`: vertical wrist travel, side camera
/// - `StraightArm`: vertical wrist travel with locked elbows, side camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    /// Bodyweight or barbell squat
    Squat,
    /// Seated cable or machine row
    SeatedRow,
    /// Rear delt fly (cable or machine)
    RearDelt,
    /// Lat pulldown
    LatPulldown,
    /// Straight-arm pulldown
    StraightArm,
}

impl ExerciseType {
    /// Every supported exercise
    pub const ALL: [Self; 5] = [
        Self::Squat,
        Self::SeatedRow,
        Self::RearDelt,
        Self::LatPulldown,
        Self::StraightArm,
    ];

    /// Family that determines the phase machine and calibration protocol
    #[must_use]
    pub const fn family(self) -> ExerciseFamily {
        match self {
            Self::Squat => ExerciseFamily::Squat,
            Self::SeatedRow | Self::RearDelt | Self::LatPulldown | Self::StraightArm => {
                ExerciseFamily::Pulling
            }
        }
    }

    /// Camera orientation that exposes the exercise's driving signal
    #[must_use]
    pub const fn recommended_camera(self) -> CameraMode {
        match self {
            Self::Squat | Self::RearDelt => CameraMode::Front,
            Self::SeatedRow | Self::LatPulldown | Self::StraightArm => CameraMode::Side,
        }
    }

    /// Machine-readable name used in recordings and on the command line
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::SeatedRow => "seated_row",
            Self::RearDelt => "rear_delt",
            Self::LatPulldown => "lat_pulldown",
            Self::StraightArm => "straight_arm",
        }
    }

    /// Human-readable name for summaries
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Squat => "Squat",
            Self::SeatedRow => "Seated Row",
            Self::RearDelt => "Rear Delt Fly",
            Self::LatPulldown => "Lat Pulldown",
            Self::StraightArm => "Straight-Arm Pulldown",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExerciseType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "squat" => Ok(Self::Squat),
            "seated_row" | "row" => Ok(Self::SeatedRow),
            "rear_delt" => Ok(Self::RearDelt),
            "lat_pulldown" => Ok(Self::LatPulldown),
            "straight_arm" => Ok(Self::StraightArm),
            other => Err(AppError::invalid_input(format!(
                "Unknown exercise '{other}'. Valid options: squat, seated_row, rear_delt, lat_pulldown, straight_arm"
            ))),
        }
    }
}

/// Orientation of the camera relative to the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Subject faces the camera
    Front,
    /// Subject is filmed in profile
    Side,
}

impl CameraMode {
    /// Machine-readable name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Side => "side",
        }
    }
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CameraMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "side" => Ok(Self::Side),
            other => Err(AppError::invalid_input(format!(
                "Unknown camera mode '{other}'. Valid options: front, side"
            ))),
        }
    }
}
