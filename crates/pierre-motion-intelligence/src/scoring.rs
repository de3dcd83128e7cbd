// ABOUTME: Rule-based form scoring with confidence-weighted deductions and corrective feedback
// ABOUTME: Rule profiles are resolved once per exercise and camera mode, then evaluated per rep
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Form scoring and feedback engine.
//!
//! A score starts at 100. Every rule in the active profile checks its fault
//! condition independently; a firing rule subtracts its base points scaled
//! by the frame's confidence multiplier and contributes a message. The squat
//! depth bonus is added afterwards, unscaled, and the result is clamped to
//! `[0, 100]`.

use pierre_motion_core::models::{BodyLandmark, BodySide, CameraMode, ExerciseType, Frame};
use serde::{Deserialize, Serialize};

use crate::analysis_config::{DeductionPoints, MotionAnalysisConfig, ScoringConfig};
use crate::geometry::{asymmetry_pct, clamp, vertical_angle, visible_side};
use crate::signals::{facing_from_foot, Movement, PullingKind};
use crate::validity::{ConfidenceTier, OCCLUSION_MESSAGE, REPOSITION_MESSAGE};

/// Identifier of every message the engine can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    /// Range of motion too small
    RomInsufficient,
    /// Left/right imbalance
    Asymmetry,
    /// Knees caving in
    KneeValgus,
    /// Knees travelling past the toes
    KneeOverToe,
    /// Torso leaning too far forward
    TorsoLean,
    /// Torso swinging to generate momentum
    ExcessiveMomentum,
    /// Rep performed too quickly
    TooFast,
    /// Shoulders shrugged toward the ears
    ShoulderShrug,
    /// Elbows bent during a straight-arm movement
    ElbowBend,
    /// Squat below parallel
    DepthBonus,
    /// No fault detected
    GoodForm,
    /// Key landmarks missing from the frame
    Reposition,
    /// Key landmarks hidden from the camera
    Occlusion,
}

/// Importance of a feedback message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational or positive
    Info,
    /// Form fault worth correcting
    Warning,
    /// Fault with injury potential
    Error,
}

/// One corrective or affirmative message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    /// Rule that produced the message
    pub rule_id: RuleId,
    /// Plain-text message for the user
    pub message: String,
    /// Importance of the message
    pub severity: Severity,
}

impl FeedbackMessage {
    /// Create a message
    pub fn new(rule_id: RuleId, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            rule_id,
            message: message.into(),
            severity,
        }
    }

    /// Corrective instruction for a frame missing key joints
    #[must_use]
    pub fn reposition() -> Self {
        Self::new(RuleId::Reposition, REPOSITION_MESSAGE, Severity::Warning)
    }

    /// Warning for a frame whose key joints are mostly occluded
    #[must_use]
    pub fn occlusion() -> Self {
        Self::new(RuleId::Occlusion, OCCLUSION_MESSAGE, Severity::Info)
    }
}

/// One rule's contribution to a score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    /// Rule applied
    pub rule: RuleId,
    /// Signed points before confidence weighting
    pub base_points: f64,
    /// Signed points actually applied
    pub applied_points: f64,
}

/// Outcome of evaluating a rule profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormScore {
    /// Final score, clamped and rounded
    pub score: u8,
    /// Score before clamping
    pub raw_score: f64,
    /// Messages in rule order
    pub feedback: Vec<FeedbackMessage>,
    /// Every applied deduction and bonus
    pub adjustments: Vec<ScoreAdjustment>,
}

/// Measurements a rule profile is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// Frame the frame-based rules inspect
    pub frame: &'a Frame,
    /// Confidence tier of that frame
    pub confidence: ConfidenceTier,
    /// Squat knee angle: deepest of the rep, or current while live
    pub knee_angle: f64,
    /// Pulling range of motion, `None` when unknown or not evaluated
    pub rom_pct: Option<f64>,
    /// Torso swing from the calibrated baseline
    pub torso_swing: f64,
    /// Rep duration, `None` while live
    pub tempo_ms: Option<f64>,
    /// Straight-arm elbow angle: smallest of the rep, or current while live
    pub elbow_angle: f64,
}

/// Deductive form rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormRule {
    /// Squat too shallow or pull too short
    RomInsufficient,
    /// Knee heights (squat) or wrist heights (frontal pulling) differ
    Asymmetry,
    /// Knee inside the ankle on either leg (front camera)
    KneeValgus,
    /// Knee ahead of the ankle along the facing direction (side camera)
    KneeOverToe,
    /// Torso far from vertical (side camera)
    TorsoLean,
    /// Torso swing beyond the allowed angle (side camera)
    ExcessiveMomentum,
    /// Rep faster than the minimum tempo
    TooFast,
    /// Ear-to-shoulder gap too small
    ShoulderShrug,
    /// Elbow angle below the straight-arm bound
    ElbowBend,
}

const SQUAT_FRONT_RULES: &[FormRule] = &[
    FormRule::RomInsufficient,
    FormRule::Asymmetry,
    FormRule::KneeValgus,
];

const SQUAT_SIDE_RULES: &[FormRule] = &[
    FormRule::RomInsufficient,
    FormRule::Asymmetry,
    FormRule::KneeOverToe,
    FormRule::TorsoLean,
];

impl FormRule {
    /// Identifier used in feedback and adjustments
    #[must_use]
    pub const fn id(self) -> RuleId {
        match self {
            Self::RomInsufficient => RuleId::RomInsufficient,
            Self::Asymmetry => RuleId::Asymmetry,
            Self::KneeValgus => RuleId::KneeValgus,
            Self::KneeOverToe => RuleId::KneeOverToe,
            Self::TorsoLean => RuleId::TorsoLean,
            Self::ExcessiveMomentum => RuleId::ExcessiveMomentum,
            Self::TooFast => RuleId::TooFast,
            Self::ShoulderShrug => RuleId::ShoulderShrug,
            Self::ElbowBend => RuleId::ElbowBend,
        }
    }

    /// Points deducted at full confidence
    #[must_use]
    pub const fn base_points(self, points: &DeductionPoints) -> f64 {
        match self {
            Self::RomInsufficient => points.rom_insufficient,
            Self::Asymmetry => points.asymmetry,
            Self::KneeValgus => points.knee_valgus,
            Self::KneeOverToe => points.knee_over_toe,
            Self::TorsoLean => points.torso_lean,
            Self::ExcessiveMomentum => points.excessive_momentum,
            Self::TooFast => points.too_fast,
            Self::ShoulderShrug => points.shoulder_shrug,
            Self::ElbowBend => points.elbow_bend,
        }
    }

    /// Severity of the rule's message for a movement
    #[must_use]
    pub const fn severity(self, movement: Movement) -> Severity {
        match (self, movement) {
            (Self::KneeValgus, _) => Severity::Error,
            (Self::TooFast, _) | (Self::Asymmetry, Movement::Pulling(_)) => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Corrective message for a movement
    #[must_use]
    pub const fn message(self, movement: Movement) -> &'static str {
        match (self, movement) {
            (Self::RomInsufficient, Movement::Squat) => "Squat deeper",
            (Self::RomInsufficient, Movement::Pulling(_)) => {
                "Use a fuller range of motion on every rep"
            }
            (Self::Asymmetry, Movement::Squat) => "Keep both knees at the same height",
            (Self::Asymmetry, Movement::Pulling(_)) => "Keep both arms moving evenly",
            (Self::KneeValgus, _) => "Knees are caving inward, push them out",
            (Self::KneeOverToe, _) => "Knees are travelling past your toes",
            (Self::TorsoLean, _) => "Keep your chest up",
            (Self::ExcessiveMomentum, _) => "Too much body swing, keep your torso still",
            (Self::TooFast, _) => "Slow down and control the movement",
            (Self::ShoulderShrug, _) => "Keep your shoulders down, away from your ears",
            (Self::ElbowBend, _) => "Keep your arms straight",
        }
    }

    /// Whether the rule's fault condition holds
    #[must_use]
    pub fn is_violated(
        self,
        movement: Movement,
        input: &RuleInput<'_>,
        config: &ScoringConfig,
    ) -> bool {
        let frame = input.frame;
        match self {
            Self::RomInsufficient => match movement {
                Movement::Squat => input.knee_angle > config.max_squat_knee_angle,
                Movement::Pulling(_) => input
                    .rom_pct
                    .is_some_and(|rom| rom < config.min_rom_pct),
            },
            Self::Asymmetry => match movement {
                Movement::Squat => {
                    (frame[BodyLandmark::LeftKnee].y - frame[BodyLandmark::RightKnee].y).abs()
                        > config.max_knee_height_diff
                }
                Movement::Pulling(_) => wrist_asymmetry_pct(frame) > config.max_asymmetry_pct,
            },
            Self::KneeValgus => knees_caving_in(frame, config.valgus_margin),
            Self::KneeOverToe => knee_over_toe(frame, config.knee_over_toe_margin),
            Self::TorsoLean => {
                let side = visible_side(frame, BodySide::shoulder);
                vertical_angle(&frame[side.shoulder()], &frame[side.hip()]).abs()
                    > config.max_torso_lean_deg
            }
            Self::ExcessiveMomentum => input.torso_swing > config.max_torso_swing_deg,
            Self::TooFast => input.tempo_ms.is_some_and(|tempo| tempo < config.min_tempo_ms),
            Self::ShoulderShrug => {
                let side = visible_side(frame, BodySide::shoulder);
                frame[side.shoulder()].y - frame[side.ear()].y < config.min_shrug_gap
            }
            Self::ElbowBend => input.elbow_angle < config.min_straight_elbow_deg,
        }
    }
}

fn wrist_asymmetry_pct(frame: &Frame) -> f64 {
    let body_height =
        (frame[BodyLandmark::LeftHip].y - frame[BodyLandmark::LeftShoulder].y).abs();
    asymmetry_pct(
        &frame[BodyLandmark::LeftWrist],
        &frame[BodyLandmark::RightWrist],
        body_height,
    )
}

fn knees_caving_in(frame: &Frame, margin: f64) -> bool {
    let mid_hip_x = (frame[BodyLandmark::LeftHip].x + frame[BodyLandmark::RightHip].x) / 2.0;
    [BodySide::Left, BodySide::Right].into_iter().any(|side| {
        let knee = frame[side.knee()];
        let ankle = frame[side.ankle()];
        let inward = if mid_hip_x < ankle.x { -1.0 } else { 1.0 };
        (knee.x - ankle.x) * inward > margin
    })
}

fn knee_over_toe(frame: &Frame, margin: f64) -> bool {
    let side = visible_side(frame, BodySide::knee);
    let facing = facing_from_foot(frame, side);
    (frame[side.knee()].x - frame[side.ankle()].x) * facing > margin
}

/// Ordered rule set for an exercise filmed from a camera orientation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleProfile {
    movement: Movement,
    rules: Vec<FormRule>,
}

impl RuleProfile {
    /// Resolve the rule set for an exercise and camera mode
    #[must_use]
    pub fn resolve(exercise: ExerciseType, camera: CameraMode) -> Self {
        let movement = Movement::from(exercise);
        let rules = match (movement, camera) {
            (Movement::Squat, CameraMode::Front) => SQUAT_FRONT_RULES.to_vec(),
            (Movement::Squat, CameraMode::Side) => SQUAT_SIDE_RULES.to_vec(),
            (Movement::Pulling(kind), camera) => pulling_rules(kind, camera),
        };
        Self { movement, rules }
    }

    /// Movement the profile scores
    #[must_use]
    pub const fn movement(&self) -> Movement {
        self.movement
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[FormRule] {
        &self.rules
    }

    /// Evaluate every rule and aggregate the score and feedback
    #[must_use]
    pub fn evaluate(&self, input: &RuleInput<'_>, config: &MotionAnalysisConfig) -> FormScore {
        let scoring = &config.scoring;
        let multiplier = input.confidence.multiplier(&config.validity);

        let mut raw_score = 100.0;
        let mut feedback = Vec::new();
        let mut adjustments = Vec::new();

        for rule in &self.rules {
            if !rule.is_violated(self.movement, input, scoring) {
                continue;
            }
            let base_points = rule.base_points(&scoring.deductions);
            let applied_points = base_points * multiplier;
            raw_score -= applied_points;
            adjustments.push(ScoreAdjustment {
                rule: rule.id(),
                base_points: -base_points,
                applied_points: -applied_points,
            });
            feedback.push(FeedbackMessage::new(
                rule.id(),
                rule.message(self.movement),
                rule.severity(self.movement),
            ));
        }

        let depth_bonus =
            self.movement == Movement::Squat && input.knee_angle < scoring.depth_bonus_angle;
        if depth_bonus {
            let bonus = scoring.deductions.depth_bonus;
            raw_score += bonus;
            adjustments.push(ScoreAdjustment {
                rule: RuleId::DepthBonus,
                base_points: bonus,
                applied_points: bonus,
            });
        }

        if feedback.is_empty() {
            feedback.push(if depth_bonus {
                FeedbackMessage::new(RuleId::DepthBonus, "Great depth!", Severity::Info)
            } else {
                FeedbackMessage::new(RuleId::GoodForm, "Good form!", Severity::Info)
            });
        }

        FormScore {
            score: clamp(raw_score, 0.0, 100.0).round() as u8,
            raw_score,
            feedback,
            adjustments,
        }
    }
}

fn pulling_rules(kind: PullingKind, camera: CameraMode) -> Vec<FormRule> {
    let mut rules = Vec::with_capacity(5);
    if camera == CameraMode::Side {
        rules.push(FormRule::ExcessiveMomentum);
    }
    rules.push(FormRule::TooFast);
    rules.push(FormRule::RomInsufficient);
    if matches!(kind, PullingKind::SeatedRow | PullingKind::LatPulldown) {
        rules.push(FormRule::ShoulderShrug);
    }
    if camera == CameraMode::Front {
        rules.push(FormRule::Asymmetry);
    }
    if kind == PullingKind::StraightArm {
        rules.push(FormRule::ElbowBend);
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use pierre_motion_core::models::Landmark;

    fn neutral_input(frame: &Frame) -> RuleInput<'_> {
        RuleInput {
            frame,
            confidence: ConfidenceTier::High,
            knee_angle: 100.0,
            rom_pct: Some(100.0),
            torso_swing: 0.0,
            tempo_ms: Some(1500.0),
            elbow_angle: 180.0,
        }
    }

    fn upright_frame() -> Frame {
        Frame::filled(Landmark::at(0.5, 0.5))
            .with_landmark(BodyLandmark::LeftEar, Landmark::at(0.5, 0.2))
            .with_landmark(BodyLandmark::RightEar, Landmark::at(0.5, 0.2))
            .with_landmark(BodyLandmark::LeftShoulder, Landmark::at(0.5, 0.3))
            .with_landmark(BodyLandmark::RightShoulder, Landmark::at(0.5, 0.3))
            .with_landmark(BodyLandmark::LeftHip, Landmark::at(0.45, 0.6))
            .with_landmark(BodyLandmark::RightHip, Landmark::at(0.55, 0.6))
            .with_landmark(BodyLandmark::LeftAnkle, Landmark::at(0.45, 0.9))
            .with_landmark(BodyLandmark::RightAnkle, Landmark::at(0.55, 0.9))
            .with_landmark(BodyLandmark::LeftKnee, Landmark::at(0.44, 0.75))
            .with_landmark(BodyLandmark::RightKnee, Landmark::at(0.56, 0.75))
    }

    #[test]
    fn test_profiles_depend_on_exercise_and_camera() {
        let squat_front = RuleProfile::resolve(ExerciseType::Squat, CameraMode::Front);
        assert!(squat_front.rules().contains(&FormRule::KneeValgus));
        assert!(!squat_front.rules().contains(&FormRule::TorsoLean));

        let row_side = RuleProfile::resolve(ExerciseType::SeatedRow, CameraMode::Side);
        assert_eq!(
            row_side.rules(),
            &[
                FormRule::ExcessiveMomentum,
                FormRule::TooFast,
                FormRule::RomInsufficient,
                FormRule::ShoulderShrug
            ]
        );

        let rear_front = RuleProfile::resolve(ExerciseType::RearDelt, CameraMode::Front);
        assert!(rear_front.rules().contains(&FormRule::Asymmetry));
        assert!(!rear_front.rules().contains(&FormRule::ExcessiveMomentum));

        let straight = RuleProfile::resolve(ExerciseType::StraightArm, CameraMode::Side);
        assert!(straight.rules().contains(&FormRule::ElbowBend));
        assert!(!straight.rules().contains(&FormRule::ShoulderShrug));
    }

    #[test]
    fn test_clean_squat_scores_full_marks() {
        let config = MotionAnalysisConfig::default();
        let frame = upright_frame();
        let profile = RuleProfile::resolve(ExerciseType::Squat, CameraMode::Front);
        let score = profile.evaluate(&neutral_input(&frame), &config);
        assert_eq!(score.score, 100);
        assert_eq!(score.feedback.len(), 1);
        assert_eq!(score.feedback[0].rule_id, RuleId::GoodForm);
        assert!(score.adjustments.is_empty());
    }

    #[test]
    fn test_depth_bonus_offsets_deductions_only() {
        let config = MotionAnalysisConfig::default();
        let frame =
            upright_frame().with_landmark(BodyLandmark::RightKnee, Landmark::at(0.56, 0.85));
        let profile = RuleProfile::resolve(ExerciseType::Squat, CameraMode::Front);
        let mut input = neutral_input(&frame);
        input.knee_angle = 80.0;

        let score = profile.evaluate(&input, &config);
        assert!((score.raw_score - 95.0).abs() < 1e-9);
        assert_eq!(score.score, 95);
        assert_eq!(score.feedback.len(), 1);
        assert_eq!(score.feedback[0].rule_id, RuleId::Asymmetry);

        let clean = upright_frame();
        let mut input = neutral_input(&clean);
        input.knee_angle = 80.0;
        let score = profile.evaluate(&input, &config);
        assert_eq!(score.score, 100);
        assert!((score.raw_score - 105.0).abs() < 1e-9);
        assert_eq!(score.feedback[0].rule_id, RuleId::DepthBonus);
    }

    #[test]
    fn test_low_confidence_halves_deductions() {
        let config = MotionAnalysisConfig::default();
        let frame = upright_frame();
        let profile = RuleProfile::resolve(ExerciseType::SeatedRow, CameraMode::Side);
        let mut input = neutral_input(&frame);
        input.confidence = ConfidenceTier::Low;
        input.torso_swing = 40.0;
        input.tempo_ms = Some(300.0);

        let score = profile.evaluate(&input, &config);
        for adjustment in &score.adjustments {
            assert!((adjustment.applied_points - adjustment.base_points / 2.0).abs() < 1e-9);
        }
        assert_eq!(score.score, 85);
        assert_eq!(score.feedback[0].rule_id, RuleId::ExcessiveMomentum);
        assert_eq!(score.feedback[1].severity, Severity::Info);
    }

    #[test]
    fn test_unknown_rom_is_not_penalised() {
        let config = MotionAnalysisConfig::default();
        let frame = upright_frame();
        let profile = RuleProfile::resolve(ExerciseType::LatPulldown, CameraMode::Side);
        let mut input = neutral_input(&frame);
        input.rom_pct = None;
        assert_eq!(profile.evaluate(&input, &config).score, 100);

        input.rom_pct = Some(50.0);
        let score = profile.evaluate(&input, &config);
        assert_eq!(score.score, 85);
        assert_eq!(score.feedback[0].rule_id, RuleId::RomInsufficient);
    }

    #[test]
    fn test_every_side_row_fault_stacks() {
        let config = MotionAnalysisConfig::default();
        let frame = upright_frame()
            .with_landmark(BodyLandmark::LeftEar, Landmark::at(0.5, 0.29))
            .with_landmark(BodyLandmark::RightEar, Landmark::at(0.5, 0.29));
        let profile = RuleProfile::resolve(ExerciseType::SeatedRow, CameraMode::Side);
        let mut input = neutral_input(&frame);
        input.torso_swing = 90.0;
        input.tempo_ms = Some(10.0);
        input.rom_pct = Some(0.0);
        let score = profile.evaluate(&input, &config);
        assert_eq!(score.feedback.len(), 4);
        assert!(score.score <= 100);
        assert_eq!(score.score, 45);
    }

    #[test]
    fn test_valgus_detected_on_either_leg() {
        let config = MotionAnalysisConfig::default();
        let caves = |frame: &Frame| {
            FormRule::KneeValgus.is_violated(Movement::Squat, &neutral_input(frame), &config.scoring)
        };

        assert!(caves(
            &upright_frame().with_landmark(BodyLandmark::LeftKnee, Landmark::at(0.50, 0.75))
        ));
        assert!(caves(
            &upright_frame().with_landmark(BodyLandmark::RightKnee, Landmark::at(0.50, 0.75))
        ));
        assert!(!caves(&upright_frame()));
        assert_eq!(FormRule::KneeValgus.severity(Movement::Squat), Severity::Error);
    }

    #[test]
    fn test_knee_over_toe_follows_facing_direction() {
        let config = MotionAnalysisConfig::default();
        let facing_right = upright_frame()
            .with_landmark(BodyLandmark::LeftHeel, Landmark::at(0.43, 0.92))
            .with_landmark(BodyLandmark::LeftFootIndex, Landmark::at(0.51, 0.93))
            .with_landmark(BodyLandmark::LeftKnee, Landmark::at(0.55, 0.75))
            .with_landmark(
                BodyLandmark::RightKnee,
                Landmark::at(0.55, 0.75).with_visibility(0.5),
            );
        assert!(FormRule::KneeOverToe.is_violated(
            Movement::Squat,
            &neutral_input(&facing_right),
            &config.scoring
        ));

        let facing_left = facing_right
            .clone()
            .with_landmark(BodyLandmark::LeftHeel, Landmark::at(0.47, 0.92))
            .with_landmark(BodyLandmark::LeftFootIndex, Landmark::at(0.39, 0.93));
        assert!(!FormRule::KneeOverToe.is_violated(
            Movement::Squat,
            &neutral_input(&facing_left),
            &config.scoring
        ));
    }
}
