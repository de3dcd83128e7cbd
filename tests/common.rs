// ABOUTME: Shared helpers for runtime integration tests
// ABOUTME: Quiet test logging plus synthetic recordings for worker and replay tests
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Once;

use pierre_motion::replay::Recording;
use pierre_motion_core::models::{CameraMode, ExerciseType};
use pierre_motion_intelligence::synthetic::{PoseFaults, Sweep};

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

/// Clean five-rep recording on the exercise's recommended camera
pub fn clean_recording(exercise: ExerciseType) -> Recording {
    init_test_logging();
    Recording::from_sweep(
        exercise,
        exercise.recommended_camera(),
        &Sweep::default(),
        &PoseFaults::default(),
    )
}

/// Clean five-rep squat recording filmed from the front
pub fn squat_recording() -> Recording {
    init_test_logging();
    Recording::from_sweep(
        ExerciseType::Squat,
        CameraMode::Front,
        &Sweep::default(),
        &PoseFaults::default(),
    )
}
