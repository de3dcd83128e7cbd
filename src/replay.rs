// ABOUTME: Recording format and offline replay of recorded landmark streams through a session
// ABOUTME: Produces per-recording reports and replays many recordings in parallel with rayon
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Recording replay
//!
//! A recording is the landmark stream a capture loop produced, stored as
//! JSON:
//!
//! ```json
//! {
//!   "exercise": "squat",
//!   "camera_mode": "front",
//!   "frames": [
//!     { "timestamp_ms": 0.0, "landmarks": [ { "x": 0.5, "y": 0.2 }, "..." ] },
//!     { "timestamp_ms": 50.0, "landmarks": null }
//!   ]
//! }
//! ```
//!
//! `null` landmarks mark frames where the detector found nobody; they are
//! counted but never analysed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pierre_motion_core::errors::{AppError, AppResult};
use pierre_motion_core::models::{CameraMode, ExerciseType, Frame};
use pierre_motion_intelligence::calibration::CalibrationSnapshot;
use pierre_motion_intelligence::synthetic::{self, PoseFaults, Sweep};
use pierre_motion_intelligence::{
    AnalysisEvent, AnalysisSession, FrameGate, GateDecision, MotionAnalysisConfig, RepResult,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// One captured frame of a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Capture time
    pub timestamp_ms: f64,
    /// Detected landmarks, `None` when detection failed
    #[serde(default)]
    pub landmarks: Option<Frame>,
}

/// A recorded landmark stream for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Exercise performed
    pub exercise: ExerciseType,
    /// Camera orientation during capture
    pub camera_mode: CameraMode,
    /// Frames in capture order
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Synthetic recording of `sweep` with the given faults
    #[must_use]
    pub fn from_sweep(
        exercise: ExerciseType,
        camera: CameraMode,
        sweep: &Sweep,
        faults: &PoseFaults,
    ) -> Self {
        let frames = synthetic::sweep(exercise, camera, sweep, faults)
            .into_iter()
            .map(|timed| RecordedFrame {
                timestamp_ms: timed.timestamp_ms,
                landmarks: Some(timed.frame),
            })
            .collect();
        Self {
            exercise,
            camera_mode: camera,
            frames,
        }
    }

    /// Parse a recording from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a frame does not hold
    /// exactly 33 landmarks, or a timestamp is not finite
    pub fn from_json_str(text: &str) -> AppResult<Self> {
        let recording: Self = serde_json::from_str(text).map_err(|e| {
            AppError::invalid_format(format!("Invalid recording: {e}")).with_source(e)
        })?;

        if let Some(index) = recording
            .frames
            .iter()
            .position(|frame| !frame.timestamp_ms.is_finite())
        {
            return Err(AppError::invalid_format(format!(
                "Recording frame {index} has a non-finite timestamp"
            )));
        }
        Ok(recording)
    }

    /// Read a recording file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid recording
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::from(e).with_resource_id(path.display().to_string()))?;
        Self::from_json_str(&text).map_err(|e| e.with_resource_id(path.display().to_string()))
    }

    /// Write the recording as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)
            .map_err(|e| AppError::from(e).with_resource_id(path.display().to_string()))?;
        debug!(path = %path.display(), frames = self.frames.len(), "Recording saved");
        Ok(())
    }
}

/// How each frame of a recording was handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCounts {
    /// Frames in the recording
    pub total: usize,
    /// Frames the session analysed and found usable
    pub analyzed: usize,
    /// Frames the session rejected as unusable
    pub invalid: usize,
    /// Frames without a detection
    pub no_detection: usize,
    /// Frames repeating the previous timestamp
    pub duplicate: usize,
    /// Frames older than an already analysed frame
    pub out_of_order: usize,
}

/// Outcome of replaying one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// File the recording came from, when replayed from disk
    pub source: Option<PathBuf>,
    /// Session that analysed the recording
    pub session_id: Uuid,
    /// Exercise analysed
    pub exercise: ExerciseType,
    /// Camera orientation
    pub camera_mode: CameraMode,
    /// Frame outcomes
    pub frames: FrameCounts,
    /// Reps counted
    pub rep_count: u32,
    /// Mean rep score, 0 without reps
    pub average_score: u8,
    /// Every scored rep
    pub reps: Vec<RepResult>,
    /// Calibration at the end of the recording
    pub calibration: CalibrationSnapshot,
    /// When the replay ran
    pub analyzed_at: DateTime<Utc>,
}

/// Drive a fresh session over `recording`
#[must_use]
pub fn replay(recording: &Recording, config: MotionAnalysisConfig) -> ReplayReport {
    let mut session =
        AnalysisSession::with_config(recording.exercise, recording.camera_mode, config);
    let mut gate = FrameGate::new();
    let mut counts = FrameCounts {
        total: recording.frames.len(),
        ..FrameCounts::default()
    };

    for recorded in &recording.frames {
        let Some(frame) = recorded.landmarks.as_ref() else {
            counts.no_detection += 1;
            continue;
        };
        match gate.admit(recorded.timestamp_ms) {
            GateDecision::Admit => {}
            GateDecision::Duplicate => {
                counts.duplicate += 1;
                continue;
            }
            GateDecision::OutOfOrder => {
                counts.out_of_order += 1;
                continue;
            }
        }
        match session.analyze(frame, recorded.timestamp_ms) {
            AnalysisEvent::Invalid { .. } => counts.invalid += 1,
            AnalysisEvent::InProgress { .. } | AnalysisEvent::RepCompleted { .. } => {
                counts.analyzed += 1;
            }
        }
    }

    let summary = session.summary();
    info!(
        session.id = %summary.session_id,
        exercise = %summary.exercise,
        frames = counts.total,
        analyzed = counts.analyzed,
        reps = summary.rep_count,
        average_score = summary.average_score,
        "Replay complete"
    );

    ReplayReport {
        source: None,
        session_id: summary.session_id,
        exercise: summary.exercise,
        camera_mode: summary.camera_mode,
        frames: counts,
        rep_count: summary.rep_count,
        average_score: summary.average_score,
        reps: summary.reps,
        calibration: summary.calibration,
        analyzed_at: Utc::now(),
    }
}

/// Load and replay one recording file
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded
pub fn replay_file(path: &Path, config: MotionAnalysisConfig) -> AppResult<ReplayReport> {
    let recording = Recording::load(path)?;
    let mut report = replay(&recording, config);
    report.source = Some(path.to_path_buf());
    Ok(report)
}

/// Replay many recording files in parallel, one session each
///
/// Results keep the order of `paths`; a failing file does not stop the others.
#[must_use]
pub fn replay_files(
    paths: &[PathBuf],
    config: MotionAnalysisConfig,
) -> Vec<AppResult<ReplayReport>> {
    paths
        .par_iter()
        .map(|path| replay_file(path, config))
        .collect()
}
