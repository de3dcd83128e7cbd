// ABOUTME: Multi-exercise engine implementing analyze(frame, timestamp, exercise, camera)
// ABOUTME: Keeps one session and replaces it with fresh state whenever the exercise or camera changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_motion_core::models::{CameraMode, ExerciseType, Frame};
use tracing::info;

use crate::analysis_config::MotionAnalysisConfig;
use crate::session::{AnalysisEvent, AnalysisSession};

/// Front end for callers that pass the exercise with every frame
#[derive(Debug, Clone)]
pub struct MotionEngine {
    config: MotionAnalysisConfig,
    session: Option<AnalysisSession>,
}

impl Default for MotionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionEngine {
    /// Engine using the process-wide analysis configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(*MotionAnalysisConfig::global())
    }

    /// Engine using an explicit configuration
    #[must_use]
    pub const fn with_config(config: MotionAnalysisConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Session currently receiving frames
    #[must_use]
    pub const fn session(&self) -> Option<&AnalysisSession> {
        self.session.as_ref()
    }

    /// Analyse one frame for `exercise` filmed from `camera`
    ///
    /// A change of exercise or camera starts a fresh session: phase,
    /// calibration and rep history do not carry across exercises.
    pub fn analyze(
        &mut self,
        frame: &Frame,
        timestamp_ms: f64,
        exercise: ExerciseType,
        camera: CameraMode,
    ) -> AnalysisEvent {
        let config = self.config;
        let session = match self.session.take() {
            Some(session) if session.exercise() == exercise && session.camera_mode() == camera => {
                session
            }
            previous => {
                let session = AnalysisSession::with_config(exercise, camera, config);
                info!(
                    session.id = %session.id(),
                    exercise = %exercise,
                    camera = %camera,
                    replaced = previous.is_some(),
                    "Starting analysis session"
                );
                session
            }
        };
        self.session.insert(session).analyze(frame, timestamp_ms)
    }

    /// Clear the current session's state and calibration
    pub fn reset(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reset();
        }
    }
}
