// ABOUTME: Runtime configuration for the motion CLI and worker: file, environment and defaults
// ABOUTME: Layers defaults, an optional JSON file and MOTION_* environment variables, then validates
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Runtime configuration loading

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pierre_motion_core::constants::env_config;
use pierre_motion_core::errors::{AppError, AppResult};
use pierre_motion_core::models::{CameraMode, ExerciseType};
use pierre_motion_intelligence::MotionAnalysisConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Default bound on frames queued ahead of the analysis worker
pub const DEFAULT_WORKER_QUEUE_DEPTH: usize = 8;

/// Settings of the runtime crate plus the analysis thresholds it hands to sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Exercise used when the caller does not name one
    pub default_exercise: ExerciseType,
    /// Camera used when the caller does not name one; `None` picks the
    /// exercise's recommended camera
    pub default_camera: Option<CameraMode>,
    /// Frames that may wait for the worker before submitters block
    pub worker_queue_depth: usize,
    /// Thresholds for every analysis session
    pub analysis: MotionAnalysisConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_exercise: ExerciseType::Squat,
            default_camera: None,
            worker_queue_depth: DEFAULT_WORKER_QUEUE_DEPTH,
            analysis: MotionAnalysisConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration: defaults, then the JSON file (`path`, or
    /// `MOTION_CONFIG_FILE` when `path` is `None`), then environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an environment
    /// variable holds an invalid value, or validation fails
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var(env_config::CONFIG_FILE).ok().map(PathBuf::from));

        let mut config = match &path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.analysis = config.analysis.apply_env_overrides()?;
        config.apply_env_overrides()?;
        config.validate()?;

        info!(
            config.file = ?path,
            default_exercise = %config.default_exercise,
            worker_queue_depth = config.worker_queue_depth,
            "Runtime configuration loaded"
        );
        Ok(config)
    }

    /// Read a JSON configuration file; omitted keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration JSON
    pub fn from_file(path: &Path) -> AppResult<Self> {
        debug!(path = %path.display(), "Reading configuration file");
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::from(e).with_resource_id(path.display().to_string()))?;
        Self::from_json_str(&text)
            .map_err(|e| e.with_resource_id(path.display().to_string()))
    }

    /// Parse configuration JSON layered over the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object matching the configuration shape
    pub fn from_json_str(text: &str) -> AppResult<Self> {
        let overlay: Value = serde_json::from_str(text).map_err(invalid_json)?;
        if !overlay.is_object() {
            return Err(AppError::config_invalid(
                "configuration file must contain a JSON object",
            ));
        }
        let mut merged = serde_json::to_value(Self::default())?;
        merge_json(&mut merged, overlay);
        serde_json::from_value(merged).map_err(invalid_json)
    }

    fn apply_env_overrides(&mut self) -> AppResult<()> {
        if let Some(exercise) = env_value::<ExerciseType>(env_config::DEFAULT_EXERCISE)? {
            self.default_exercise = exercise;
        }
        if let Some(camera) = env_value::<CameraMode>(env_config::DEFAULT_CAMERA)? {
            self.default_camera = Some(camera);
        }
        if let Some(depth) = env_value::<usize>(env_config::WORKER_QUEUE_DEPTH)? {
            self.worker_queue_depth = depth;
        }
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the queue depth is zero or the analysis thresholds are inconsistent
    pub fn validate(&self) -> AppResult<()> {
        if self.worker_queue_depth == 0 {
            return Err(AppError::config_invalid("worker_queue_depth must be > 0"));
        }
        self.analysis.validate()?;
        Ok(())
    }

    /// Camera to use for `exercise` when the caller does not specify one
    #[must_use]
    pub fn camera_for(&self, exercise: ExerciseType) -> CameraMode {
        self.default_camera
            .unwrap_or_else(|| exercise.recommended_camera())
    }

    /// Human-readable one-screen summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Pierre Motion Configuration:\n\
             - Default Exercise: {}\n\
             - Default Camera: {}\n\
             - Worker Queue Depth: {}\n\
             - Smoothing Window: {}\n\
             - Minimum Rep Duration: {} ms\n\
             - Calibration Samples: {}",
            self.default_exercise.display_name(),
            self.default_camera
                .map_or("recommended per exercise", CameraMode::name),
            self.worker_queue_depth,
            self.analysis.smoothing.window,
            self.analysis.rep.min_rep_duration_ms,
            self.analysis.calibration.samples_required,
        )
    }
}

fn invalid_json(error: serde_json::Error) -> AppError {
    AppError::config_invalid(format!("Invalid configuration: {error}")).with_source(error)
}

/// Parse an environment variable when it is set
fn env_value<T>(name: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: ToString,
{
    env::var(name).ok().map_or(Ok(None), |raw| {
        raw.trim().parse().map(Some).map_err(|e: T::Err| {
            AppError::config_invalid(format!("Invalid {name}: {}", e.to_string()))
        })
    })
}

/// Recursively overlay `overlay` onto `base`; objects merge key by key,
/// everything else replaces
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
