// ABOUTME: Motion intelligence engine turning landmark frames into reps, phases, and form scores
// ABOUTME: Geometry kernel, validity classifier, calibration, phase machines, and scoring rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Motion Intelligence
//!
//! Per-frame exercise analysis. An [`session::AnalysisSession`] owns all
//! mutable state for one tracked subject and turns each landmark
//! [`Frame`](pierre_motion_core::models::Frame) into an
//! [`session::AnalysisEvent`].
//!
//! ## Pipeline
//!
//! 1. [`validity`] decides whether the frame is usable and how confident it is
//! 2. [`signals`] extracts the exercise's position signal and auxiliary angles
//! 3. [`calibration`] harvests extremal samples until personal references freeze
//! 4. [`phase`] advances the hysteretic phase machine
//! 5. [`rep_detector`] recognises completed cycles and debounces flicker
//! 6. [`scoring`] evaluates the rule profile into a clamped score with feedback
//!
//! [`engine::MotionEngine`] adds exercise switching on top of a session and
//! [`frame_gate::FrameGate`] enforces timestamp ordering for callers.

/// Environment-configurable analysis thresholds
pub mod analysis_config;

/// Online per-session calibration of extremal reference values
pub mod calibration;

/// Multi-exercise front end replacing its session when the exercise changes
pub mod engine;

/// Duplicate and out-of-order frame filtering
pub mod frame_gate;

/// Pure geometric functions over landmarks
pub mod geometry;

/// Squat and pulling phase machines
pub mod phase;

/// Full-cycle detection with temporal debouncing
pub mod rep_detector;

/// Rule-based form scoring and feedback
pub mod scoring;

/// Analysis session facade
pub mod session;

/// Position signal extraction per exercise
pub mod signals;

/// Deterministic synthetic pose generation
pub mod synthetic;

/// Landmark validity and confidence classification
pub mod validity;

pub use analysis_config::{AnalysisConfigError, MotionAnalysisConfig};
pub use engine::MotionEngine;
pub use frame_gate::{FrameGate, GateDecision};
pub use phase::{MotionPhase, PullingPhase, SquatPhase};
pub use scoring::{FeedbackMessage, FormScore, RuleId, Severity};
pub use session::{AnalysisEvent, AnalysisSession, RepResult, SessionSummary};
pub use validity::{ConfidenceTier, ValidityResult};
