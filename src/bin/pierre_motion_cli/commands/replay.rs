// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Replay command analysing recording files in parallel
// ABOUTME: Prints a summary or a JSON report per file and fails if any file failed

use std::path::PathBuf;

use pierre_motion::config::RuntimeConfig;
use pierre_motion::replay::replay_files;
use pierre_motion_core::errors::{AppError, AppResult};
use tracing::error;

use crate::helpers::display::display_report;

/// Replay `files` and print one result per file
pub fn run(files: &[PathBuf], json: bool, config: &RuntimeConfig) -> AppResult<()> {
    let mut failures = 0_usize;

    for (path, result) in files.iter().zip(replay_files(files, config.analysis)) {
        match result {
            Ok(report) if json => println!("{}", serde_json::to_string_pretty(&report)?),
            Ok(report) => display_report(&report),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Replay failed");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(AppError::invalid_input(format!(
            "{failures} of {} recordings could not be replayed",
            files.len()
        )));
    }
    Ok(())
}
