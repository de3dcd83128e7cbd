// ABOUTME: Analysis session facade owning all per-subject state and exposing analyze and reset
// ABOUTME: Orchestrates validity, signals, calibration, phase machines, rep detection and scoring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analysis Session
//!
//! An [`AnalysisSession`] is the single owner of one subject's analysis
//! state. Frames must be fed in non-decreasing timestamp order with
//! duplicates removed (see [`crate::frame_gate::FrameGate`]). `analyze`
//! never fails: unusable frames produce [`AnalysisEvent::Invalid`] and leave
//! the state untouched.

use pierre_motion_core::models::{CameraMode, ExerciseType, Frame};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis_config::MotionAnalysisConfig;
use crate::calibration::{CalibrationSnapshot, PullingCalibrator, SquatCalibrator};
use crate::geometry::{rom_pct, SmoothingBuffer};
use crate::phase::{MotionPhase, PhaseCycle, PullingPhase, SquatPhase};
use crate::rep_detector::{RepDetector, RepEvent};
use crate::scoring::{FeedbackMessage, FormScore, RuleInput, RuleProfile, ScoreAdjustment};
use crate::signals::{
    elbow_angle, heuristic_progress, pulling_position, squat_knee_angle, torso_angle, Movement,
    PullingKind,
};
use crate::validity::{classify, ConfidenceTier};

/// Result of analysing one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    /// Frame unusable; nothing was updated
    Invalid {
        /// Corrective instruction
        message: String,
    },
    /// Frame analysed, no rep completed
    InProgress {
        /// Phase after this frame
        phase: MotionPhase,
        /// Smoothed knee angle (squat) or range-of-motion percentage (pulling)
        position_signal: f64,
        /// Confidence tier of the frame
        confidence: ConfidenceTier,
        /// Feedback on the current frame, if any
        live_feedback: Vec<FeedbackMessage>,
    },
    /// Frame closed a counted rep
    RepCompleted {
        /// Phase after this frame
        phase: MotionPhase,
        /// Score of the completed rep
        score: u8,
        /// Feedback for the completed rep
        feedback: Vec<FeedbackMessage>,
        /// Reps counted in the session including this one
        rep_count: u32,
    },
}

/// Scored repetition kept in the session history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepResult {
    /// 1-based rep number within the session
    pub rep_number: u32,
    /// Timestamp of the completing frame
    pub timestamp_ms: f64,
    /// Score in `[0, 100]`
    pub score: u8,
    /// Feedback for the rep
    pub feedback: Vec<FeedbackMessage>,
    /// Duration of the rep, when its start was observed
    pub tempo_ms: Option<f64>,
    /// Confidence tier the rep was scored at
    pub confidence: ConfidenceTier,
    /// Deductions and bonuses that produced the score
    pub adjustments: Vec<ScoreAdjustment>,
}

/// Snapshot of a session for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier
    pub session_id: Uuid,
    /// Exercise analysed
    pub exercise: ExerciseType,
    /// Camera orientation
    pub camera_mode: CameraMode,
    /// Reps counted
    pub rep_count: u32,
    /// Mean rep score rounded to the nearest integer, 0 without reps
    pub average_score: u8,
    /// Current phase
    pub phase: MotionPhase,
    /// Current calibration
    pub calibration: CalibrationSnapshot,
    /// Every scored rep
    pub reps: Vec<RepResult>,
}

/// Frame at the deepest point of the rep in progress
#[derive(Debug, Clone, PartialEq)]
struct PeakFrame {
    frame: Frame,
    confidence: ConfidenceTier,
    depth: f64,
}

/// What one analysed frame did to a tracker
#[derive(Debug)]
struct Step {
    previous: MotionPhase,
    phase: MotionPhase,
    position_signal: f64,
    rep: RepEvent,
    calibrated_now: bool,
    completed: Option<(FormScore, ConfidenceTier)>,
    live_feedback: Vec<FeedbackMessage>,
}

#[derive(Debug, Clone)]
struct SquatTracker {
    smoothing: SmoothingBuffer,
    previous_angle: f64,
    calibrator: SquatCalibrator,
    detector: RepDetector<SquatPhase>,
    peak: Option<PeakFrame>,
}

impl SquatTracker {
    fn new(config: &MotionAnalysisConfig) -> Self {
        Self {
            smoothing: SmoothingBuffer::new(config.smoothing.window),
            previous_angle: config.squat.initial_knee_angle,
            calibrator: SquatCalibrator::new(&config.squat),
            detector: RepDetector::new(config.rep.min_rep_duration_ms),
            peak: None,
        }
    }

    fn step(
        &mut self,
        frame: &Frame,
        timestamp_ms: f64,
        confidence: ConfidenceTier,
        profile: &RuleProfile,
        config: &MotionAnalysisConfig,
    ) -> Step {
        let raw = squat_knee_angle(frame, config.validity.bilateral_visibility);
        let angle = self.smoothing.push(raw);
        let thresholds = self.calibrator.thresholds(&config.squat);

        let previous = self.detector.phase();
        let next = previous.next(angle, self.previous_angle, &thresholds, &config.squat);
        let calibrated_now = self.calibrator.observe(next, angle, &config.calibration);
        let rep = self.detector.advance(next, timestamp_ms);
        self.previous_angle = angle;

        if rep == RepEvent::Started {
            self.peak = None;
        }
        if next.is_active() {
            self.detector.accumulators_mut().record_knee_angle(angle);
            // Lower knee angle is deeper
            track_peak(&mut self.peak, frame, confidence, -angle);
        }

        let mut step = Step {
            previous: previous.into(),
            phase: next.into(),
            position_signal: angle,
            rep,
            calibrated_now,
            completed: None,
            live_feedback: Vec::new(),
        };

        if let RepEvent::Completed { tempo_ms } = rep {
            let accumulators = self.detector.accumulators();
            let (scored_frame, scored_confidence) =
                peak_or_current(self.peak.as_ref(), frame, confidence);
            let input = RuleInput {
                frame: scored_frame,
                confidence: scored_confidence,
                knee_angle: accumulators.deepest_knee_angle,
                rom_pct: None,
                torso_swing: 0.0,
                tempo_ms,
                elbow_angle: 180.0,
            };
            step.completed = Some((profile.evaluate(&input, config), scored_confidence));
        } else if next == SquatPhase::Bottom {
            let input = RuleInput {
                frame,
                confidence,
                knee_angle: angle,
                rom_pct: None,
                torso_swing: 0.0,
                tempo_ms: None,
                elbow_angle: 180.0,
            };
            step.live_feedback = profile.evaluate(&input, config).feedback;
        }

        step
    }
}

#[derive(Debug, Clone)]
struct PullingTracker {
    kind: PullingKind,
    smoothing: SmoothingBuffer,
    torso: SmoothingBuffer,
    elbow: SmoothingBuffer,
    calibrator: PullingCalibrator,
    detector: RepDetector<PullingPhase>,
    peak: Option<PeakFrame>,
}

impl PullingTracker {
    fn new(kind: PullingKind, config: &MotionAnalysisConfig) -> Self {
        Self {
            kind,
            smoothing: SmoothingBuffer::new(config.smoothing.window),
            torso: SmoothingBuffer::new(config.smoothing.window),
            elbow: SmoothingBuffer::new(config.smoothing.window),
            calibrator: PullingCalibrator::new(),
            detector: RepDetector::new(config.rep.min_rep_duration_ms),
            peak: None,
        }
    }

    fn step(
        &mut self,
        frame: &Frame,
        timestamp_ms: f64,
        confidence: ConfidenceTier,
        profile: &RuleProfile,
        config: &MotionAnalysisConfig,
    ) -> Step {
        let position = self.smoothing.push(pulling_position(self.kind, frame));
        let torso = self.torso.push(torso_angle(frame));
        let calibration = *self.calibrator.calibration();

        let progress = if calibration.is_calibrated {
            rom_pct(
                position,
                calibration.extended_position,
                calibration.contracted_position,
            )
        } else {
            heuristic_progress(self.kind, frame, position, &config.pulling)
        };
        let swing = if calibration.is_calibrated {
            (torso - calibration.torso_base_angle).abs()
        } else {
            0.0
        };
        let elbow = self.elbow.push(elbow_angle(frame));

        let previous = self.detector.phase();
        let next = previous.next(progress, &config.pulling);
        let calibrated_now = self
            .calibrator
            .observe(next, position, torso, &config.calibration);
        let rep = self.detector.advance(next, timestamp_ms);

        if rep == RepEvent::Started {
            self.peak = None;
        }
        if next.is_active() {
            let accumulators = self.detector.accumulators_mut();
            accumulators.record_torso_swing(swing);
            accumulators.record_elbow_angle(elbow);
            if calibration.is_calibrated {
                accumulators.record_rom(progress);
            }
            track_peak(&mut self.peak, frame, confidence, progress);
        }

        let mut step = Step {
            previous: previous.into(),
            phase: next.into(),
            position_signal: progress,
            rep,
            calibrated_now,
            completed: None,
            live_feedback: Vec::new(),
        };

        if let RepEvent::Completed { tempo_ms } = rep {
            let accumulators = self.detector.accumulators();
            let (scored_frame, scored_confidence) =
                peak_or_current(self.peak.as_ref(), frame, confidence);
            let input = RuleInput {
                frame: scored_frame,
                confidence: scored_confidence,
                knee_angle: 180.0,
                rom_pct: accumulators.max_rom_pct,
                torso_swing: accumulators.max_torso_swing,
                tempo_ms,
                elbow_angle: accumulators.min_elbow_angle,
            };
            step.completed = Some((profile.evaluate(&input, config), scored_confidence));
        } else if next == PullingPhase::Contracted {
            let input = RuleInput {
                frame,
                confidence,
                knee_angle: 180.0,
                rom_pct: None,
                torso_swing: swing,
                tempo_ms: None,
                elbow_angle: elbow,
            };
            step.live_feedback = profile.evaluate(&input, config).feedback;
        }

        step
    }
}

fn track_peak(
    peak: &mut Option<PeakFrame>,
    frame: &Frame,
    confidence: ConfidenceTier,
    depth: f64,
) {
    if peak.as_ref().is_some_and(|current| current.depth >= depth) {
        return;
    }
    *peak = Some(PeakFrame {
        frame: frame.clone(),
        confidence,
        depth,
    });
}

fn peak_or_current<'a>(
    peak: Option<&'a PeakFrame>,
    frame: &'a Frame,
    confidence: ConfidenceTier,
) -> (&'a Frame, ConfidenceTier) {
    peak.map_or((frame, confidence), |peak| (&peak.frame, peak.confidence))
}

#[derive(Debug, Clone)]
enum Tracker {
    Squat(SquatTracker),
    Pulling(PullingTracker),
}

impl Tracker {
    fn new(movement: Movement, config: &MotionAnalysisConfig) -> Self {
        match movement {
            Movement::Squat => Self::Squat(SquatTracker::new(config)),
            Movement::Pulling(kind) => Self::Pulling(PullingTracker::new(kind, config)),
        }
    }

    fn phase(&self) -> MotionPhase {
        match self {
            Self::Squat(tracker) => tracker.detector.phase().into(),
            Self::Pulling(tracker) => tracker.detector.phase().into(),
        }
    }

    fn rep_count(&self) -> u32 {
        match self {
            Self::Squat(tracker) => tracker.detector.rep_count(),
            Self::Pulling(tracker) => tracker.detector.rep_count(),
        }
    }

    fn calibration(&self) -> CalibrationSnapshot {
        match self {
            Self::Squat(tracker) => CalibrationSnapshot::Squat(*tracker.calibrator.calibration()),
            Self::Pulling(tracker) => {
                CalibrationSnapshot::Pulling(*tracker.calibrator.calibration())
            }
        }
    }
}

/// Analysis state of one tracked subject performing one exercise
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    id: Uuid,
    exercise: ExerciseType,
    camera: CameraMode,
    config: MotionAnalysisConfig,
    profile: RuleProfile,
    tracker: Tracker,
    history: Vec<RepResult>,
}

impl AnalysisSession {
    /// Session using the process-wide analysis configuration
    #[must_use]
    pub fn new(exercise: ExerciseType, camera: CameraMode) -> Self {
        Self::with_config(exercise, camera, *MotionAnalysisConfig::global())
    }

    /// Session using an explicit configuration
    #[must_use]
    pub fn with_config(
        exercise: ExerciseType,
        camera: CameraMode,
        config: MotionAnalysisConfig,
    ) -> Self {
        let profile = RuleProfile::resolve(exercise, camera);
        let tracker = Tracker::new(profile.movement(), &config);
        Self {
            id: Uuid::new_v4(),
            exercise,
            camera,
            config,
            profile,
            tracker,
            history: Vec::new(),
        }
    }

    /// Session identifier
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Exercise analysed
    #[must_use]
    pub const fn exercise(&self) -> ExerciseType {
        self.exercise
    }

    /// Camera orientation
    #[must_use]
    pub const fn camera_mode(&self) -> CameraMode {
        self.camera
    }

    /// Configuration the session was built with
    #[must_use]
    pub const fn config(&self) -> &MotionAnalysisConfig {
        &self.config
    }

    /// Rule profile resolved for the exercise and camera
    #[must_use]
    pub const fn profile(&self) -> &RuleProfile {
        &self.profile
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> MotionPhase {
        self.tracker.phase()
    }

    /// Reps counted so far
    #[must_use]
    pub fn rep_count(&self) -> u32 {
        self.tracker.rep_count()
    }

    /// Scored reps in completion order
    #[must_use]
    pub fn history(&self) -> &[RepResult] {
        &self.history
    }

    /// Current calibration
    #[must_use]
    pub fn calibration(&self) -> CalibrationSnapshot {
        self.tracker.calibration()
    }

    /// Mean rep score rounded to the nearest integer, 0 without reps
    #[must_use]
    pub fn average_score(&self) -> u8 {
        if self.history.is_empty() {
            return 0;
        }
        let total: f64 = self.history.iter().map(|rep| f64::from(rep.score)).sum();
        (total / self.history.len() as f64).round() as u8
    }

    /// Reporting snapshot
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            exercise: self.exercise,
            camera_mode: self.camera,
            rep_count: self.rep_count(),
            average_score: self.average_score(),
            phase: self.phase(),
            calibration: self.calibration(),
            reps: self.history.clone(),
        }
    }

    /// Clear all analysis state and calibration, keeping the session identity
    pub fn reset(&mut self) {
        *self = Self {
            id: self.id,
            ..Self::with_config(self.exercise, self.camera, self.config)
        };
        info!(
            session.id = %self.id,
            exercise = %self.exercise,
            "Analysis session reset"
        );
    }

    /// Analyse one frame captured at `timestamp_ms`
    pub fn analyze(&mut self, frame: &Frame, timestamp_ms: f64) -> AnalysisEvent {
        let key_parts = self.profile.movement().key_landmarks(self.camera, frame);
        let validity = classify(frame, key_parts, &self.config.validity);
        if !validity.is_valid {
            debug!(session.id = %self.id, "Frame rejected: key landmarks missing");
            return AnalysisEvent::Invalid {
                message: FeedbackMessage::reposition().message,
            };
        }

        let confidence = validity.confidence;
        let step = match &mut self.tracker {
            Tracker::Squat(tracker) => {
                tracker.step(frame, timestamp_ms, confidence, &self.profile, &self.config)
            }
            Tracker::Pulling(tracker) => {
                tracker.step(frame, timestamp_ms, confidence, &self.profile, &self.config)
            }
        };

        self.log_step(&step);
        self.finish_step(step, timestamp_ms, confidence)
    }

    fn log_step(&self, step: &Step) {
        if step.previous != step.phase {
            debug!(
                session.id = %self.id,
                exercise = %self.exercise,
                from = %step.previous,
                to = %step.phase,
                signal = step.position_signal,
                "Phase transition"
            );
        }
        if step.calibrated_now {
            info!(
                session.id = %self.id,
                exercise = %self.exercise,
                calibration = ?self.calibration(),
                "Calibration frozen"
            );
        }
        if step.rep == RepEvent::Debounced {
            debug!(
                session.id = %self.id,
                exercise = %self.exercise,
                "Cycle closed inside the minimum rep duration, not counted"
            );
        }
    }

    fn finish_step(
        &mut self,
        step: Step,
        timestamp_ms: f64,
        confidence: ConfidenceTier,
    ) -> AnalysisEvent {
        if let (RepEvent::Completed { tempo_ms }, Some((score, scored_confidence))) =
            (step.rep, step.completed)
        {
            let rep_count = self.rep_count();
            let result = RepResult {
                rep_number: rep_count,
                timestamp_ms,
                score: score.score,
                feedback: score.feedback,
                tempo_ms,
                confidence: scored_confidence,
                adjustments: score.adjustments,
            };
            info!(
                session.id = %self.id,
                exercise = %self.exercise,
                rep = rep_count,
                score = result.score,
                confidence = ?result.confidence,
                tempo_ms = ?result.tempo_ms,
                "Rep completed"
            );
            let event = AnalysisEvent::RepCompleted {
                phase: step.phase,
                score: result.score,
                feedback: result.feedback.clone(),
                rep_count,
            };
            self.history.push(result);
            return event;
        }

        let mut live_feedback = step.live_feedback;
        if confidence == ConfidenceTier::Low {
            live_feedback.push(FeedbackMessage::occlusion());
        }
        AnalysisEvent::InProgress {
            phase: step.phase,
            position_signal: step.position_signal,
            confidence,
            live_feedback,
        }
    }
}
