// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Config command printing the effective runtime configuration
// ABOUTME: Human summary on stderr, full configuration as JSON on stdout

use pierre_motion::config::RuntimeConfig;
use pierre_motion_core::errors::AppResult;

/// Print the effective configuration
pub fn run(config: &RuntimeConfig) -> AppResult<()> {
    eprintln!("{}", config.summary());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
