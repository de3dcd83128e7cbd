// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports command modules for pierre-motion
// ABOUTME: Provides access to the replay, synth, and config commands

pub mod config;
pub mod replay;
pub mod synth;
