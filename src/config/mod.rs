// ABOUTME: Configuration module for the motion runtime
// ABOUTME: Re-exports the layered runtime configuration used by the CLI, worker and replay
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the runtime crate
//!
//! Analysis thresholds live in
//! [`MotionAnalysisConfig`](pierre_motion_intelligence::MotionAnalysisConfig);
//! [`RuntimeConfig`] wraps them together with runtime-only settings and
//! loads both from a JSON file and the environment.

/// Environment and file based runtime configuration
pub mod environment;

pub use environment::{RuntimeConfig, DEFAULT_WORKER_QUEUE_DEPTH};
