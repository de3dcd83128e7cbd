// ABOUTME: Tests for the threaded analysis worker
// ABOUTME: Verifies message-passing analysis, frame gating, reset, summaries, and shutdown
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use pierre_motion::worker::{AnalysisWorker, WorkerOutput};
use pierre_motion_core::errors::ErrorCode;
use pierre_motion_core::models::{CameraMode, ExerciseType};
use pierre_motion_intelligence::{AnalysisEvent, GateDecision, MotionAnalysisConfig};

fn squat_worker(queue_depth: usize) -> AnalysisWorker {
    AnalysisWorker::spawn(
        ExerciseType::Squat,
        CameraMode::Front,
        MotionAnalysisConfig::default(),
        queue_depth,
    )
    .unwrap()
}

#[test]
fn test_worker_counts_reps_over_channels() {
    let recording = common::squat_recording();
    let worker = squat_worker(8);

    for recorded in &recording.frames {
        worker
            .submit(recorded.landmarks.clone().unwrap(), recorded.timestamp_ms)
            .unwrap();
    }

    let outputs: Vec<WorkerOutput> = (0..recording.frames.len())
        .map(|_| worker.recv().unwrap())
        .collect();
    let completed = outputs
        .iter()
        .filter(|output| matches!(output.event(), Some(AnalysisEvent::RepCompleted { .. })))
        .count();
    assert_eq!(completed, 5);

    // Outputs arrive in submission order
    let timestamps: Vec<f64> = outputs.iter().map(WorkerOutput::timestamp_ms).collect();
    assert!(timestamps.windows(2).all(|pair| pair[0] < pair[1]));

    let summary = worker.shutdown().unwrap();
    assert_eq!(summary.rep_count, 5);
    assert_eq!(summary.average_score, 100);
}

#[test]
fn test_worker_skips_duplicate_and_out_of_order_frames() {
    let recording = common::squat_recording();
    let worker = squat_worker(4);
    let frame = recording.frames[0].landmarks.clone().unwrap();

    worker.submit(frame.clone(), 100.0).unwrap();
    worker.submit(frame.clone(), 100.0).unwrap();
    worker.submit(frame.clone(), 50.0).unwrap();
    worker.submit(frame, 150.0).unwrap();

    assert!(worker.recv().unwrap().event().is_some());
    assert_eq!(
        worker.recv().unwrap(),
        WorkerOutput::Skipped {
            timestamp_ms: 100.0,
            decision: GateDecision::Duplicate,
        }
    );
    assert_eq!(
        worker.recv().unwrap(),
        WorkerOutput::Skipped {
            timestamp_ms: 50.0,
            decision: GateDecision::OutOfOrder,
        }
    );
    assert!(worker.recv().unwrap().event().is_some());
}

#[test]
fn test_worker_reset_clears_session_and_gate() {
    let recording = common::squat_recording();
    let worker = squat_worker(8);

    for recorded in &recording.frames {
        worker
            .submit(recorded.landmarks.clone().unwrap(), recorded.timestamp_ms)
            .unwrap();
    }
    let before = worker.summary().unwrap();
    assert_eq!(before.rep_count, 5);

    worker.reset().unwrap();
    let after = worker.summary().unwrap();
    assert_eq!(after.rep_count, 0);
    assert!(after.reps.is_empty());
    assert!(!after.calibration.is_calibrated());
    assert_eq!(after.session_id, before.session_id);

    // Timestamps restart after a reset
    let first = &recording.frames[0];
    worker
        .submit(first.landmarks.clone().unwrap(), first.timestamp_ms)
        .unwrap();
    let _ = worker.summary().unwrap();

    let mut last = None;
    while let Some(output) = worker.try_recv().unwrap() {
        last = Some(output);
    }
    assert!(last.unwrap().event().is_some());
}

#[test]
fn test_worker_try_submit_reports_every_accepted_frame() {
    let recording = common::squat_recording();
    let worker = squat_worker(1);

    let accepted = recording
        .frames
        .iter()
        .map(|recorded| {
            worker
                .try_submit(recorded.landmarks.clone().unwrap(), recorded.timestamp_ms)
                .unwrap()
        })
        .filter(|accepted| *accepted)
        .count();
    assert!(accepted >= 1);

    // The summary request queues behind every accepted frame
    let _ = worker.summary().unwrap();
    let mut received = 0;
    while worker.try_recv().unwrap().is_some() {
        received += 1;
    }
    assert_eq!(received, accepted);
}

#[test]
fn test_worker_recv_timeout_without_frames() {
    common::init_test_logging();
    let worker = squat_worker(2);
    let output = worker.recv_timeout(Duration::from_millis(20)).unwrap();
    assert!(output.is_none());
}

#[test]
fn test_worker_rejects_zero_queue_depth() {
    common::init_test_logging();
    let err = AnalysisWorker::spawn(
        ExerciseType::SeatedRow,
        CameraMode::Side,
        MotionAnalysisConfig::default(),
        0,
    )
    .err()
    .unwrap();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[test]
fn test_worker_pulling_exercise() {
    let recording = common::clean_recording(ExerciseType::LatPulldown);
    let worker = AnalysisWorker::spawn(
        recording.exercise,
        recording.camera_mode,
        MotionAnalysisConfig::default(),
        16,
    )
    .unwrap();

    for recorded in &recording.frames {
        worker
            .submit(recorded.landmarks.clone().unwrap(), recorded.timestamp_ms)
            .unwrap();
    }
    let summary = worker.shutdown().unwrap();
    assert_eq!(summary.exercise, ExerciseType::LatPulldown);
    assert_eq!(summary.rep_count, 5);
}
