// ABOUTME: Tests for layered runtime configuration loading
// ABOUTME: Covers file merging, MOTION_* environment overrides, and validation failures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::env;
use std::fs;

use pierre_motion::config::{RuntimeConfig, DEFAULT_WORKER_QUEUE_DEPTH};
use pierre_motion_core::errors::ErrorCode;
use pierre_motion_core::models::{CameraMode, ExerciseType};
use serial_test::serial;
use tempfile::TempDir;

const VARIABLES: [&str; 5] = [
    "MOTION_CONFIG_FILE",
    "MOTION_DEFAULT_EXERCISE",
    "MOTION_DEFAULT_CAMERA",
    "MOTION_WORKER_QUEUE_DEPTH",
    "MOTION_SMOOTHING_WINDOW",
];

fn clear_environment() {
    common::init_test_logging();
    for name in VARIABLES {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_load_without_file_uses_defaults() {
    clear_environment();
    let config = RuntimeConfig::load(None).unwrap();
    assert_eq!(config, RuntimeConfig::default());
    assert_eq!(config.worker_queue_depth, DEFAULT_WORKER_QUEUE_DEPTH);
    assert!(config.default_camera.is_none());
}

#[test]
#[serial]
fn test_file_then_environment_layering() {
    clear_environment();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("motion.json");
    fs::write(
        &path,
        r#"{
            "default_exercise": "straight_arm",
            "worker_queue_depth": 32,
            "analysis": { "smoothing": { "window": 5 }, "rep": { "min_rep_duration_ms": 600.0 } }
        }"#,
    )
    .unwrap();

    let from_file = RuntimeConfig::load(Some(&path)).unwrap();
    assert_eq!(from_file.default_exercise, ExerciseType::StraightArm);
    assert_eq!(from_file.worker_queue_depth, 32);
    assert_eq!(from_file.analysis.smoothing.window, 5);
    assert!((from_file.analysis.rep.min_rep_duration_ms - 600.0).abs() < f64::EPSILON);

    // Environment beats the file
    env::set_var("MOTION_DEFAULT_CAMERA", "front");
    env::set_var("MOTION_WORKER_QUEUE_DEPTH", "4");
    env::set_var("MOTION_SMOOTHING_WINDOW", "7");
    let layered = RuntimeConfig::load(Some(&path)).unwrap();
    clear_environment();

    assert_eq!(layered.default_exercise, ExerciseType::StraightArm);
    assert_eq!(layered.default_camera, Some(CameraMode::Front));
    assert_eq!(layered.worker_queue_depth, 4);
    assert_eq!(layered.analysis.smoothing.window, 7);
}

#[test]
#[serial]
fn test_config_file_from_environment_variable() {
    clear_environment();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("motion.json");
    fs::write(&path, r#"{"default_exercise": "rear_delt"}"#).unwrap();

    env::set_var("MOTION_CONFIG_FILE", &path);
    let config = RuntimeConfig::load(None).unwrap();
    clear_environment();

    assert_eq!(config.default_exercise, ExerciseType::RearDelt);
    assert_eq!(config.camera_for(config.default_exercise), CameraMode::Front);
}

#[test]
#[serial]
fn test_invalid_environment_values_rejected() {
    clear_environment();
    env::set_var("MOTION_DEFAULT_EXERCISE", "deadlift");
    let exercise_err = RuntimeConfig::load(None).unwrap_err();
    clear_environment();
    assert_eq!(exercise_err.code, ErrorCode::ConfigInvalid);

    env::set_var("MOTION_WORKER_QUEUE_DEPTH", "0");
    let depth_err = RuntimeConfig::load(None).unwrap_err();
    clear_environment();
    assert_eq!(depth_err.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_inconsistent_analysis_file_rejected() {
    clear_environment();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("motion.json");
    fs::write(&path, r#"{"analysis": {"smoothing": {"window": 0}}}"#).unwrap();

    let err = RuntimeConfig::load(Some(&path)).unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_missing_config_file_is_not_found() {
    clear_environment();
    let dir = TempDir::new().unwrap();
    let err = RuntimeConfig::load(Some(&dir.path().join("absent.json"))).unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[test]
fn test_summary_mentions_defaults() {
    let summary = RuntimeConfig::default().summary();
    assert!(summary.contains("Squat"));
    assert!(summary.contains("recommended per exercise"));
}
