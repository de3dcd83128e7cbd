// ABOUTME: Core types and constants for Pierre motion analysis
// ABOUTME: Foundation crate with error handling, landmark frames, and exercise definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Motion Core
//!
//! Foundation crate providing shared types for the Pierre motion analysis
//! engine. It changes infrequently so the analysis crate and the runtime
//! crate can compile incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Service names, environment variable names, landmark counts
//! - **models**: Landmarks, frames, body parts, exercises and camera modes

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Landmark, Frame, `ExerciseType`, `CameraMode`)
pub mod models;
