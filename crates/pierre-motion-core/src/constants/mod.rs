// ABOUTME: Application constants for the motion analysis engine
// ABOUTME: Service names, environment variable names, and landmark topology sizes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants shared by the analysis crate, the runtime crate and the CLI.

/// Service identifiers used in structured logs
pub mod service_names {
    /// Service name reported at startup and in JSON logs
    pub const PIERRE_MOTION: &str = "pierre-motion";
}

/// Landmark topology of the upstream pose detector
pub mod landmarks {
    /// Number of landmarks in every frame
    pub const LANDMARK_COUNT: usize = 33;
}

/// Environment variable names read by the runtime
pub mod env_config {
    /// Path to an optional JSON configuration file
    pub const CONFIG_FILE: &str = "MOTION_CONFIG_FILE";
    /// Default exercise used when none is given on the command line
    pub const DEFAULT_EXERCISE: &str = "MOTION_DEFAULT_EXERCISE";
    /// Default camera mode used when none is given on the command line
    pub const DEFAULT_CAMERA: &str = "MOTION_DEFAULT_CAMERA";
    /// Bounded queue depth between the capture loop and the analysis worker
    pub const WORKER_QUEUE_DEPTH: &str = "MOTION_WORKER_QUEUE_DEPTH";
}
