// ABOUTME: Position signal selection per exercise: knee angle, elbow travel, wrist spread or height
// ABOUTME: Also provides torso and elbow angles plus the pre-calibration pulling heuristics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_motion_core::models::{BodyLandmark, BodySide, CameraMode, ExerciseType, Frame};
use serde::{Deserialize, Serialize};

use crate::analysis_config::PullingConfig;
use crate::geometry::{angle, horizontal_spread, pick_visible_side, vertical_angle, visible_side};

/// Back exercise variant, each with its own position signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullingKind {
    /// Horizontal elbow travel relative to the shoulder
    SeatedRow,
    /// Horizontal wrist spread
    RearDelt,
    /// Vertical wrist travel
    LatPulldown,
    /// Vertical wrist travel with locked elbows
    StraightArm,
}

/// Movement pattern resolved once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    /// Squat family
    Squat,
    /// Pulling family with its variant
    Pulling(PullingKind),
}

impl From<ExerciseType> for Movement {
    fn from(exercise: ExerciseType) -> Self {
        match exercise {
            ExerciseType::Squat => Self::Squat,
            ExerciseType::SeatedRow => Self::Pulling(PullingKind::SeatedRow),
            ExerciseType::RearDelt => Self::Pulling(PullingKind::RearDelt),
            ExerciseType::LatPulldown => Self::Pulling(PullingKind::LatPulldown),
            ExerciseType::StraightArm => Self::Pulling(PullingKind::StraightArm),
        }
    }
}

const SQUAT_KEYS: [BodyLandmark; 6] = [
    BodyLandmark::LeftHip,
    BodyLandmark::RightHip,
    BodyLandmark::LeftKnee,
    BodyLandmark::RightKnee,
    BodyLandmark::LeftAnkle,
    BodyLandmark::RightAnkle,
];

const FRONT_PULL_KEYS: [BodyLandmark; 6] = [
    BodyLandmark::LeftShoulder,
    BodyLandmark::RightShoulder,
    BodyLandmark::LeftElbow,
    BodyLandmark::RightElbow,
    BodyLandmark::LeftWrist,
    BodyLandmark::RightWrist,
];

const LEFT_SIDE_PULL_KEYS: [BodyLandmark; 4] = [
    BodyLandmark::LeftShoulder,
    BodyLandmark::LeftElbow,
    BodyLandmark::LeftWrist,
    BodyLandmark::LeftHip,
];

const RIGHT_SIDE_PULL_KEYS: [BodyLandmark; 4] = [
    BodyLandmark::RightShoulder,
    BodyLandmark::RightElbow,
    BodyLandmark::RightWrist,
    BodyLandmark::RightHip,
];

impl Movement {
    /// Landmarks that must be present for a frame to be analysed
    ///
    /// Side-view pulling uses the arm and hip of the more visible shoulder.
    #[must_use]
    pub fn key_landmarks(self, camera: CameraMode, frame: &Frame) -> &'static [BodyLandmark] {
        match (self, camera) {
            (Self::Squat, _) => &SQUAT_KEYS,
            (Self::Pulling(_), CameraMode::Front) => &FRONT_PULL_KEYS,
            (Self::Pulling(_), CameraMode::Side) => match visible_side(frame, BodySide::shoulder) {
                BodySide::Left => &LEFT_SIDE_PULL_KEYS,
                BodySide::Right => &RIGHT_SIDE_PULL_KEYS,
            },
        }
    }
}

/// Knee angle of one leg (hip-knee-ankle)
#[must_use]
pub fn leg_knee_angle(frame: &Frame, side: BodySide) -> f64 {
    angle(
        &frame[side.hip()],
        &frame[side.knee()],
        &frame[side.ankle()],
    )
}

/// Squat position signal
///
/// Averages both legs when both knees are clearly visible, otherwise uses
/// the more visible knee.
#[must_use]
pub fn squat_knee_angle(frame: &Frame, bilateral_visibility: f64) -> f64 {
    let left = leg_knee_angle(frame, BodySide::Left);
    let right = leg_knee_angle(frame, BodySide::Right);

    if frame[BodyLandmark::LeftKnee].visibility > bilateral_visibility
        && frame[BodyLandmark::RightKnee].visibility > bilateral_visibility
    {
        return (left + right) / 2.0;
    }

    match visible_side(frame, BodySide::knee) {
        BodySide::Left => left,
        BodySide::Right => right,
    }
}

/// Raw position signal of a pulling variant
#[must_use]
pub fn pulling_position(kind: PullingKind, frame: &Frame) -> f64 {
    match kind {
        PullingKind::SeatedRow => {
            frame[pick_visible_side(frame, BodyLandmark::LeftElbow, BodyLandmark::RightElbow)].x
        }
        PullingKind::RearDelt => horizontal_spread(
            &frame[BodyLandmark::LeftWrist],
            &frame[BodyLandmark::RightWrist],
        ),
        PullingKind::LatPulldown | PullingKind::StraightArm => {
            frame[pick_visible_side(frame, BodyLandmark::LeftWrist, BodyLandmark::RightWrist)].y
        }
    }
}

/// Torso deviation from vertical on the more visible side
#[must_use]
pub fn torso_angle(frame: &Frame) -> f64 {
    let side = visible_side(frame, BodySide::shoulder);
    vertical_angle(&frame[side.shoulder()], &frame[side.hip()])
}

/// Elbow angle (shoulder-elbow-wrist) on the more visible side
#[must_use]
pub fn elbow_angle(frame: &Frame) -> f64 {
    let side = visible_side(frame, BodySide::elbow);
    angle(
        &frame[side.shoulder()],
        &frame[side.elbow()],
        &frame[side.wrist()],
    )
}

/// Horizontal direction the subject faces, `1.0` or `-1.0`
///
/// Judged from the nose relative to the shoulder on `side`; defaults to
/// facing the positive x direction when the two coincide.
#[must_use]
pub fn facing_from_nose(frame: &Frame, side: BodySide) -> f64 {
    direction(frame[BodyLandmark::Nose].x - frame[side.shoulder()].x)
}

/// Horizontal direction the foot on `side` points, `1.0` or `-1.0`
#[must_use]
pub fn facing_from_foot(frame: &Frame, side: BodySide) -> f64 {
    direction(frame[side.foot_index()].x - frame[side.heel()].x)
}

fn direction(delta: f64) -> f64 {
    if delta < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Coarse progress percentage used before the pulling calibration freezes
///
/// Returns the contracted or extended heuristic percentage depending on
/// whether the pose looks contracted. `position` is the smoothed signal.
#[must_use]
pub fn heuristic_progress(
    kind: PullingKind,
    frame: &Frame,
    position: f64,
    config: &PullingConfig,
) -> f64 {
    let contracted = match kind {
        PullingKind::SeatedRow => {
            let side = visible_side(frame, BodySide::elbow);
            let facing = facing_from_nose(frame, side);
            (position - frame[side.shoulder()].x) * facing < 0.0
        }
        PullingKind::RearDelt => position > config.rear_delt_spread,
        PullingKind::LatPulldown => {
            let side = visible_side(frame, BodySide::wrist);
            position > frame[side.shoulder()].y
        }
        PullingKind::StraightArm => {
            let side = visible_side(frame, BodySide::wrist);
            position > frame[side.hip()].y - config.straight_arm_hip_margin
        }
    };

    if contracted {
        config.heuristic_contracted_pct
    } else {
        config.heuristic_extended_pct
    }
}
