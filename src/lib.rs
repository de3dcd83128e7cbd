// ABOUTME: Main library entry point for the Pierre Motion runtime
// ABOUTME: Logging, runtime configuration, the analysis worker thread, and recording replay
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Motion
//!
//! Runtime plumbing around the motion analysis engine in
//! [`pierre_motion_intelligence`].
//!
//! ## Features
//!
//! - **Worker offload**: run a session on its own thread and exchange frames
//!   and events over channels ([`worker::AnalysisWorker`])
//! - **Replay**: analyse recorded landmark streams, one file or many in parallel
//!   ([`replay`])
//! - **Configuration**: defaults, JSON file, and `MOTION_*` environment
//!   overrides ([`config::RuntimeConfig`])
//! - **Logging**: structured `tracing` output in JSON, pretty, or compact form
//!   ([`logging`])
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_motion::config::RuntimeConfig;
//! use pierre_motion::replay::{replay, Recording};
//! use pierre_motion_core::errors::AppResult;
//! use std::path::Path;
//!
//! fn main() -> AppResult<()> {
//!     let config = RuntimeConfig::load(None)?;
//!     let recording = Recording::load(Path::new("squat.json"))?;
//!     let report = replay(&recording, config.analysis);
//!     println!("{} reps, average score {}", report.rep_count, report.average_score);
//!     Ok(())
//! }
//! ```

/// Runtime configuration loading
pub mod config;

/// Structured logging setup
pub mod logging;

/// Recording format and offline replay
pub mod replay;

/// Analysis session running on a dedicated thread
pub mod worker;

pub use config::RuntimeConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use replay::{replay, replay_file, replay_files, FrameCounts, Recording, ReplayReport};
pub use worker::{AnalysisWorker, WorkerOutput};
