// ABOUTME: Shared helpers for motion intelligence integration tests
// ABOUTME: Quiet test logging plus utilities for driving sessions over synthetic sequences
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Once;

use pierre_motion_core::models::{CameraMode, ExerciseType};
use pierre_motion_intelligence::scoring::RuleId;
use pierre_motion_intelligence::synthetic::{sweep, PoseFaults, Sweep, TimedFrame};
use pierre_motion_intelligence::{AnalysisEvent, AnalysisSession, MotionAnalysisConfig};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Session with default thresholds, independent of the process environment
pub fn session(exercise: ExerciseType, camera: CameraMode) -> AnalysisSession {
    init_test_logging();
    AnalysisSession::with_config(exercise, camera, MotionAnalysisConfig::default())
}

/// Generated sequence for the exercise on its recommended camera
pub fn frames(exercise: ExerciseType, shape: &Sweep, faults: &PoseFaults) -> Vec<TimedFrame> {
    sweep(exercise, exercise.recommended_camera(), shape, faults)
}

/// Feed every frame to the session and collect the events
pub fn run(session: &mut AnalysisSession, frames: &[TimedFrame]) -> Vec<AnalysisEvent> {
    frames
        .iter()
        .map(|timed| session.analyze(&timed.frame, timed.timestamp_ms))
        .collect()
}

/// Feedback rule ids of every completed rep in the session history
pub fn rep_rule_ids(session: &AnalysisSession) -> Vec<Vec<RuleId>> {
    session
        .history()
        .iter()
        .map(|rep| rep.feedback.iter().map(|message| message.rule_id).collect())
        .collect()
}

/// Number of `RepCompleted` events
pub fn completed_count(events: &[AnalysisEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, AnalysisEvent::RepCompleted { .. }))
        .count()
}
