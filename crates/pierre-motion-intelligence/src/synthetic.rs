// ABOUTME: Deterministic synthetic pose generator producing anatomically plausible landmark frames
// ABOUTME: Drives tests, benchmarks, and recordings with clean or deliberately faulty movement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Synthetic landmark generation.
//!
//! Squats are drawn from a target knee angle, pulling exercises from a
//! progress value in `[0, 1]` (0 = extended, 1 = contracted). Side views
//! face the positive x direction with the subject's left side nearest to
//! the camera. Front views place the subject's left side on the image's
//! right. All generated landmarks are fully present.

use std::f64::consts::TAU;

use pierre_motion_core::constants::landmarks::LANDMARK_COUNT;
use pierre_motion_core::models::{BodyLandmark, CameraMode, ExerciseType, Frame, Landmark};
use serde::{Deserialize, Serialize};

use crate::signals::{Movement, PullingKind};

const NEAR_VISIBILITY: f64 = 0.95;
const FAR_VISIBILITY: f64 = 0.8;
const PRESENCE: f64 = 0.99;
const SEGMENT: f64 = 0.2;
const TORSO: f64 = 0.3;
const EAR_GAP: f64 = 0.08;
const SHRUG_EAR_GAP: f64 = 0.01;

type Point = (f64, f64);

/// Form faults injected into generated poses
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseFaults {
    /// Squat knees travel inward instead of outward (front view)
    pub knees_cave_in: bool,
    /// Extra forward torso lean in degrees (side-view squat)
    pub torso_lean_deg: f64,
    /// Elbow flexion in degrees (straight-arm pulldown)
    pub elbow_flexion_deg: f64,
    /// Ears pulled down to the shoulders
    pub shoulder_shrug: bool,
    /// Backward torso swing at full contraction in degrees (side-view pulling)
    pub torso_swing_deg: f64,
    /// Right wrist lowered by this much (rear delt)
    pub arm_height_offset: f64,
}

/// Shape of a multi-rep synthetic sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    /// Repetitions to generate
    pub reps: u32,
    /// Frames per repetition
    pub frames_per_rep: u32,
    /// Frame rate used to derive timestamps
    pub fps: f64,
    /// Deepest knee angle of a squat rep
    pub squat_depth_deg: f64,
}

impl Default for Sweep {
    fn default() -> Self {
        Self {
            reps: 5,
            frames_per_rep: 40,
            fps: 20.0,
            squat_depth_deg: 90.0,
        }
    }
}

impl Sweep {
    /// Total number of frames including the closing frame
    #[must_use]
    pub const fn frame_count(&self) -> u32 {
        self.reps * self.frames_per_rep + 1
    }

    /// Movement progress of frame `index`, 0 at rep boundaries and 1 mid-rep
    #[must_use]
    pub fn progress(&self, index: u32) -> f64 {
        let phase = f64::from(index % self.frames_per_rep.max(1)) / f64::from(self.frames_per_rep.max(1));
        (1.0 - (TAU * phase).cos()) / 2.0
    }

    /// Capture time of frame `index`
    #[must_use]
    pub fn timestamp_ms(&self, index: u32) -> f64 {
        f64::from(index) * 1000.0 / self.fps
    }
}

/// Generated frame with its capture time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedFrame {
    /// Capture time
    pub timestamp_ms: f64,
    /// Landmarks
    pub frame: Frame,
}

/// Generate a full sequence for any exercise
#[must_use]
pub fn sweep(
    exercise: ExerciseType,
    camera: CameraMode,
    sweep: &Sweep,
    faults: &PoseFaults,
) -> Vec<TimedFrame> {
    (0..sweep.frame_count())
        .map(|index| {
            let progress = sweep.progress(index);
            let frame = match Movement::from(exercise) {
                Movement::Squat => {
                    let knee_angle = (180.0 - sweep.squat_depth_deg).mul_add(-progress, 180.0);
                    squat_frame(knee_angle, camera, faults)
                }
                Movement::Pulling(kind) => pulling_frame(kind, progress, faults),
            };
            TimedFrame {
                timestamp_ms: sweep.timestamp_ms(index),
                frame,
            }
        })
        .collect()
}

/// Squat pose with both knees at `knee_angle` degrees
#[must_use]
pub fn squat_frame(knee_angle: f64, camera: CameraMode, faults: &PoseFaults) -> Frame {
    match camera {
        CameraMode::Front => front_squat(knee_angle, faults),
        CameraMode::Side => side_squat(knee_angle, faults),
    }
}

/// Pulling pose at `progress` (0 = extended, 1 = contracted)
///
/// The rear delt fly is drawn from the front, every other variant in profile.
#[must_use]
pub fn pulling_frame(kind: PullingKind, progress: f64, faults: &PoseFaults) -> Frame {
    let progress = progress.clamp(0.0, 1.0);
    match kind {
        PullingKind::RearDelt => front_rear_delt(progress, faults),
        PullingKind::SeatedRow | PullingKind::LatPulldown | PullingKind::StraightArm => {
            side_pull(kind, progress, faults)
        }
    }
}

struct PoseBuilder {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl PoseBuilder {
    fn new() -> Self {
        Self {
            landmarks: [Landmark::new(0.5, 0.5, 0.0, FAR_VISIBILITY, PRESENCE); LANDMARK_COUNT],
        }
    }

    fn set(&mut self, part: BodyLandmark, (x, y): Point, visibility: f64) -> &mut Self {
        let z = if visibility < NEAR_VISIBILITY { 0.1 } else { 0.0 };
        self.landmarks[part.index()] = Landmark::new(x, y, z, visibility, PRESENCE);
        self
    }

    /// Same point for the left and right landmark of a side view
    fn pair(&mut self, left: BodyLandmark, right: BodyLandmark, point: Point) -> &mut Self {
        self.set(left, point, NEAR_VISIBILITY)
            .set(right, point, FAR_VISIBILITY)
    }

    fn hand(&mut self, side: Side, wrist: Point, visibility: f64) -> &mut Self {
        let (pinky, index, thumb) = side.hand();
        self.set(pinky, (wrist.0, wrist.1 + 0.02), visibility)
            .set(index, (wrist.0 + 0.01, wrist.1 + 0.025), visibility)
            .set(thumb, (wrist.0 - 0.01, wrist.1 + 0.015), visibility)
    }

    fn profile_head(&mut self, shoulder: Point, ear_gap: f64, facing: f64) -> &mut Self {
        let ear = (shoulder.0, shoulder.1 - ear_gap);
        self.pair(BodyLandmark::LeftEar, BodyLandmark::RightEar, ear)
            .set(BodyLandmark::Nose, (facing.mul_add(0.05, ear.0), ear.1 + 0.01), NEAR_VISIBILITY)
            .pair(
                BodyLandmark::LeftEye,
                BodyLandmark::RightEye,
                (facing.mul_add(0.04, ear.0), ear.1 - 0.01),
            )
            .pair(
                BodyLandmark::LeftEyeInner,
                BodyLandmark::RightEyeInner,
                (facing.mul_add(0.045, ear.0), ear.1 - 0.01),
            )
            .pair(
                BodyLandmark::LeftEyeOuter,
                BodyLandmark::RightEyeOuter,
                (facing.mul_add(0.035, ear.0), ear.1 - 0.01),
            )
            .pair(
                BodyLandmark::MouthLeft,
                BodyLandmark::MouthRight,
                (facing.mul_add(0.045, ear.0), ear.1 + 0.03),
            )
    }

    fn front_head(&mut self, left_shoulder: Point, right_shoulder: Point, ear_gap: f64) -> &mut Self {
        let center = (left_shoulder.0 + right_shoulder.0) / 2.0;
        let ear_y = left_shoulder.1 - ear_gap;
        self.set(BodyLandmark::LeftEar, (center + 0.06, ear_y), NEAR_VISIBILITY)
            .set(BodyLandmark::RightEar, (center - 0.06, ear_y), NEAR_VISIBILITY)
            .set(BodyLandmark::Nose, (center, ear_y + 0.01), NEAR_VISIBILITY)
            .set(BodyLandmark::LeftEye, (center + 0.025, ear_y - 0.01), NEAR_VISIBILITY)
            .set(BodyLandmark::RightEye, (center - 0.025, ear_y - 0.01), NEAR_VISIBILITY)
            .set(BodyLandmark::LeftEyeInner, (center + 0.015, ear_y - 0.01), NEAR_VISIBILITY)
            .set(BodyLandmark::RightEyeInner, (center - 0.015, ear_y - 0.01), NEAR_VISIBILITY)
            .set(BodyLandmark::LeftEyeOuter, (center + 0.035, ear_y - 0.01), NEAR_VISIBILITY)
            .set(BodyLandmark::RightEyeOuter, (center - 0.035, ear_y - 0.01), NEAR_VISIBILITY)
            .set(BodyLandmark::MouthLeft, (center + 0.015, ear_y + 0.03), NEAR_VISIBILITY)
            .set(BodyLandmark::MouthRight, (center - 0.015, ear_y + 0.03), NEAR_VISIBILITY)
    }

    fn build(&self) -> Frame {
        Frame::new(self.landmarks)
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl Side {
    const fn hand(self) -> (BodyLandmark, BodyLandmark, BodyLandmark) {
        match self {
            Self::Left => (
                BodyLandmark::LeftPinky,
                BodyLandmark::LeftIndex,
                BodyLandmark::LeftThumb,
            ),
            Self::Right => (
                BodyLandmark::RightPinky,
                BodyLandmark::RightIndex,
                BodyLandmark::RightThumb,
            ),
        }
    }
}

fn ear_gap(faults: &PoseFaults) -> f64 {
    if faults.shoulder_shrug {
        SHRUG_EAR_GAP
    } else {
        EAR_GAP
    }
}

/// Rotate `point` about `pivot` so a point above the pivot leans toward `-facing`
fn lean_back(point: Point, pivot: Point, facing: f64, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.0 - pivot.0;
    let dy = point.1 - pivot.1;
    (
        pivot.0 + dx.mul_add(cos, facing * dy * sin),
        pivot.1 + dy.mul_add(cos, -facing * dx * sin),
    )
}

fn front_squat(knee_angle: f64, faults: &PoseFaults) -> Frame {
    let half = (knee_angle / 2.0).to_radians();
    let ankle_y = 0.9_f64;
    let knee_y = SEGMENT.mul_add(-half.sin(), ankle_y);
    let hip_y = (2.0 * SEGMENT).mul_add(-half.sin(), ankle_y);
    let shoulder_y = hip_y - TORSO;
    let lateral = SEGMENT * half.cos();
    let outward: f64 = if faults.knees_cave_in { -1.0 } else { 1.0 };

    let mut pose = PoseBuilder::new();
    for (side, x, direction) in [(Side::Left, 0.6, 1.0_f64), (Side::Right, 0.4, -1.0_f64)] {
        let (hip, knee, ankle, heel, foot, shoulder, elbow, wrist) = match side {
            Side::Left => (
                BodyLandmark::LeftHip,
                BodyLandmark::LeftKnee,
                BodyLandmark::LeftAnkle,
                BodyLandmark::LeftHeel,
                BodyLandmark::LeftFootIndex,
                BodyLandmark::LeftShoulder,
                BodyLandmark::LeftElbow,
                BodyLandmark::LeftWrist,
            ),
            Side::Right => (
                BodyLandmark::RightHip,
                BodyLandmark::RightKnee,
                BodyLandmark::RightAnkle,
                BodyLandmark::RightHeel,
                BodyLandmark::RightFootIndex,
                BodyLandmark::RightShoulder,
                BodyLandmark::RightElbow,
                BodyLandmark::RightWrist,
            ),
        };
        let shoulder_x = direction.mul_add(0.02, x);
        let wrist_point = (shoulder_x, shoulder_y + 0.3);
        pose.set(hip, (x, hip_y), NEAR_VISIBILITY)
            .set(knee, ((direction * outward).mul_add(lateral, x), knee_y), NEAR_VISIBILITY)
            .set(ankle, (x, ankle_y), NEAR_VISIBILITY)
            .set(heel, (x, ankle_y + 0.02), NEAR_VISIBILITY)
            .set(foot, (direction.mul_add(0.02, x), ankle_y + 0.04), NEAR_VISIBILITY)
            .set(shoulder, (shoulder_x, shoulder_y), NEAR_VISIBILITY)
            .set(elbow, (shoulder_x, shoulder_y + 0.15), NEAR_VISIBILITY)
            .set(wrist, wrist_point, NEAR_VISIBILITY)
            .hand(side, wrist_point, NEAR_VISIBILITY);
    }

    pose.front_head(
        (0.62, shoulder_y),
        (0.38, shoulder_y),
        ear_gap(faults),
    )
    .build()
}

fn side_squat(knee_angle: f64, faults: &PoseFaults) -> Frame {
    let facing = 1.0_f64;
    let flexion = 180.0 - knee_angle;
    let shin_tilt = (flexion * 0.2).to_radians();
    let thigh_tilt = (flexion * 0.8).to_radians();
    let lean = flexion.mul_add(0.25, faults.torso_lean_deg).to_radians();

    let ankle = (0.45, 0.9);
    let knee = (
        (facing * SEGMENT).mul_add(shin_tilt.sin(), ankle.0),
        SEGMENT.mul_add(-shin_tilt.cos(), ankle.1),
    );
    let hip = (
        (-facing * SEGMENT).mul_add(thigh_tilt.sin(), knee.0),
        SEGMENT.mul_add(-thigh_tilt.cos(), knee.1),
    );
    let shoulder = (
        (facing * TORSO).mul_add(lean.sin(), hip.0),
        TORSO.mul_add(-lean.cos(), hip.1),
    );
    let elbow = (facing.mul_add(0.12, shoulder.0), shoulder.1 + 0.05);
    let wrist = (facing.mul_add(0.25, shoulder.0), shoulder.1 + 0.05);

    let mut pose = PoseBuilder::new();
    pose.pair(BodyLandmark::LeftAnkle, BodyLandmark::RightAnkle, ankle)
        .pair(BodyLandmark::LeftKnee, BodyLandmark::RightKnee, knee)
        .pair(BodyLandmark::LeftHip, BodyLandmark::RightHip, hip)
        .pair(
            BodyLandmark::LeftHeel,
            BodyLandmark::RightHeel,
            (facing.mul_add(-0.02, ankle.0), ankle.1 + 0.02),
        )
        .pair(
            BodyLandmark::LeftFootIndex,
            BodyLandmark::RightFootIndex,
            (facing.mul_add(0.06, ankle.0), ankle.1 + 0.03),
        )
        .pair(BodyLandmark::LeftShoulder, BodyLandmark::RightShoulder, shoulder)
        .pair(BodyLandmark::LeftElbow, BodyLandmark::RightElbow, elbow)
        .pair(BodyLandmark::LeftWrist, BodyLandmark::RightWrist, wrist)
        .hand(Side::Left, wrist, NEAR_VISIBILITY)
        .hand(Side::Right, wrist, FAR_VISIBILITY)
        .profile_head(shoulder, ear_gap(faults), facing)
        .build()
}

fn front_rear_delt(progress: f64, faults: &PoseFaults) -> Frame {
    let spread = 0.6f64.mul_add(progress, 0.1);
    let shoulder_y = 0.4_f64;
    let wrist_y = shoulder_y + 0.05;
    let left_shoulder = (0.6, shoulder_y);
    let right_shoulder = (0.4, shoulder_y);
    let left_wrist = (0.5 + spread / 2.0, wrist_y);
    let right_wrist = (0.5 - spread / 2.0, wrist_y + faults.arm_height_offset);
    let midpoint = |a: Point, b: Point| ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0 - 0.01);

    let mut pose = PoseBuilder::new();
    pose.set(BodyLandmark::LeftShoulder, left_shoulder, NEAR_VISIBILITY)
        .set(BodyLandmark::RightShoulder, right_shoulder, NEAR_VISIBILITY)
        .set(BodyLandmark::LeftElbow, midpoint(left_shoulder, left_wrist), NEAR_VISIBILITY)
        .set(BodyLandmark::RightElbow, midpoint(right_shoulder, right_wrist), NEAR_VISIBILITY)
        .set(BodyLandmark::LeftWrist, left_wrist, NEAR_VISIBILITY)
        .set(BodyLandmark::RightWrist, right_wrist, NEAR_VISIBILITY)
        .hand(Side::Left, left_wrist, NEAR_VISIBILITY)
        .hand(Side::Right, right_wrist, NEAR_VISIBILITY)
        .set(BodyLandmark::LeftHip, (0.55, 0.65), NEAR_VISIBILITY)
        .set(BodyLandmark::RightHip, (0.45, 0.65), NEAR_VISIBILITY)
        .set(BodyLandmark::LeftKnee, (0.55, 0.8), NEAR_VISIBILITY)
        .set(BodyLandmark::RightKnee, (0.45, 0.8), NEAR_VISIBILITY)
        .set(BodyLandmark::LeftAnkle, (0.55, 0.95), NEAR_VISIBILITY)
        .set(BodyLandmark::RightAnkle, (0.45, 0.95), NEAR_VISIBILITY)
        .set(BodyLandmark::LeftHeel, (0.55, 0.97), NEAR_VISIBILITY)
        .set(BodyLandmark::RightHeel, (0.45, 0.97), NEAR_VISIBILITY)
        .set(BodyLandmark::LeftFootIndex, (0.57, 0.99), NEAR_VISIBILITY)
        .set(BodyLandmark::RightFootIndex, (0.43, 0.99), NEAR_VISIBILITY)
        .front_head(left_shoulder, right_shoulder, ear_gap(faults))
        .build()
}

/// Elbow placed off the shoulder-wrist line so the elbow angle is `180 - flexion`
fn bent_elbow(shoulder: Point, wrist: Point, flexion_deg: f64, facing: f64) -> Point {
    let mid = ((shoulder.0 + wrist.0) / 2.0, (shoulder.1 + wrist.1) / 2.0);
    let dx = wrist.0 - shoulder.0;
    let dy = wrist.1 - shoulder.1;
    let length = dx.hypot(dy);
    if length < f64::EPSILON || flexion_deg <= 0.0 {
        return mid;
    }
    let offset = (length / 2.0) * (flexion_deg / 2.0).to_radians().tan();
    // Unit normal pointing away from the facing direction
    let (nx, ny) = (-dy / length, dx / length);
    let sign: f64 = if nx * facing > 0.0 { -1.0 } else { 1.0 };
    (
        (sign * offset).mul_add(nx, mid.0),
        (sign * offset).mul_add(ny, mid.1),
    )
}

fn side_pull(kind: PullingKind, progress: f64, faults: &PoseFaults) -> Frame {
    let facing = 1.0_f64;
    let hip = (0.5, 0.65);
    let shoulder = (0.5, 0.4);

    let (elbow, wrist) = match kind {
        PullingKind::SeatedRow => {
            let elbow = (
                facing.mul_add(0.23f64.mul_add(-progress, 0.15), shoulder.0),
                shoulder.1 + 0.12,
            );
            (elbow, (facing.mul_add(0.12, elbow.0), elbow.1))
        }
        PullingKind::LatPulldown => {
            let wrist = (facing.mul_add(0.05, shoulder.0), 0.42f64.mul_add(progress, 0.1));
            let elbow = (facing.mul_add(0.1, shoulder.0), (shoulder.1 + wrist.1) / 2.0);
            (elbow, wrist)
        }
        PullingKind::StraightArm | PullingKind::RearDelt => {
            let arm = 110.0f64.mul_add(-progress, 120.0).to_radians();
            let wrist = (
                (facing * 0.3).mul_add(arm.sin(), shoulder.0),
                0.3f64.mul_add(arm.cos(), shoulder.1),
            );
            (bent_elbow(shoulder, wrist, faults.elbow_flexion_deg, facing), wrist)
        }
    };

    let swing = faults.torso_swing_deg * progress;
    let lean = |point: Point| lean_back(point, hip, facing, swing);
    let shoulder = lean(shoulder);
    let elbow = lean(elbow);
    let wrist = lean(wrist);

    let (knee, ankle) = if kind == PullingKind::StraightArm {
        ((0.5, 0.8), (0.5, 0.95))
    } else {
        ((facing.mul_add(0.22, 0.5), 0.63), (facing.mul_add(0.25, 0.5), 0.85))
    };

    let mut pose = PoseBuilder::new();
    pose.pair(BodyLandmark::LeftHip, BodyLandmark::RightHip, hip)
        .pair(BodyLandmark::LeftKnee, BodyLandmark::RightKnee, knee)
        .pair(BodyLandmark::LeftAnkle, BodyLandmark::RightAnkle, ankle)
        .pair(
            BodyLandmark::LeftHeel,
            BodyLandmark::RightHeel,
            (facing.mul_add(-0.02, ankle.0), ankle.1 + 0.02),
        )
        .pair(
            BodyLandmark::LeftFootIndex,
            BodyLandmark::RightFootIndex,
            (facing.mul_add(0.06, ankle.0), ankle.1 + 0.01),
        )
        .pair(BodyLandmark::LeftShoulder, BodyLandmark::RightShoulder, shoulder)
        .pair(BodyLandmark::LeftElbow, BodyLandmark::RightElbow, elbow)
        .pair(BodyLandmark::LeftWrist, BodyLandmark::RightWrist, wrist)
        .hand(Side::Left, wrist, NEAR_VISIBILITY)
        .hand(Side::Right, wrist, FAR_VISIBILITY)
        .profile_head(shoulder, ear_gap(faults), facing)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::angle;
    use crate::signals::{elbow_angle, squat_knee_angle, torso_angle};

    #[test]
    fn test_squat_frames_hit_requested_knee_angle() {
        for camera in [CameraMode::Front, CameraMode::Side] {
            for target in [180.0, 150.0, 120.0, 90.0, 75.0] {
                let frame = squat_frame(target, camera, &PoseFaults::default());
                let measured = squat_knee_angle(&frame, 0.7);
                assert!(
                    (measured - target).abs() < 1e-6,
                    "{camera}: wanted {target}, measured {measured}"
                );
            }
        }
    }

    #[test]
    fn test_elbow_flexion_sets_elbow_angle() {
        let faults = PoseFaults {
            elbow_flexion_deg: 30.0,
            ..PoseFaults::default()
        };
        let frame = pulling_frame(PullingKind::StraightArm, 0.5, &faults);
        assert!((elbow_angle(&frame) - 150.0).abs() < 1e-6);

        let straight = pulling_frame(PullingKind::StraightArm, 0.5, &PoseFaults::default());
        assert!(elbow_angle(&straight) > 179.0);
    }

    #[test]
    fn test_torso_swing_rotates_upper_body() {
        let faults = PoseFaults {
            torso_swing_deg: 30.0,
            ..PoseFaults::default()
        };
        let extended = pulling_frame(PullingKind::LatPulldown, 0.0, &faults);
        let contracted = pulling_frame(PullingKind::LatPulldown, 1.0, &faults);
        assert!(torso_angle(&extended).abs() < 1e-6);
        assert!((torso_angle(&contracted).abs() - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_sweep_starts_and_ends_standing() {
        let sweep_shape = Sweep::default();
        let frames = sweep(
            ExerciseType::Squat,
            CameraMode::Front,
            &sweep_shape,
            &PoseFaults::default(),
        );
        assert_eq!(frames.len(), 201);
        let first = &frames[0].frame;
        let last = &frames[200].frame;
        let knee = |frame: &Frame| {
            angle(
                &frame[BodyLandmark::LeftHip],
                &frame[BodyLandmark::LeftKnee],
                &frame[BodyLandmark::LeftAnkle],
            )
        };
        assert!((knee(first) - 180.0).abs() < 1e-6);
        assert!((knee(last) - 180.0).abs() < 1e-6);
        assert!((knee(&frames[20].frame) - 90.0).abs() < 1e-6);
        assert!((frames[200].timestamp_ms - 10_000.0).abs() < 1e-9);
    }
}
