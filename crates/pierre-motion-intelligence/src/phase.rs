// ABOUTME: Hysteretic four-state phase machines for squat and pulling exercise families
// ABOUTME: Squat runs on the smoothed knee angle, pulling on a range-of-motion percentage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Phase state machines.
//!
//! Both machines are cyclic: the first phase is the initial state and the
//! state every completed repetition returns to. Transitions only follow the
//! edges listed on each `next` function, so a single noisy frame can never
//! jump across the cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis_config::{PullingConfig, SquatConfig};

/// Shared shape of a cyclic phase machine, used by the rep detector
pub trait PhaseCycle: Copy + Eq + fmt::Debug {
    /// Phase a session starts in and every rep returns to
    const INITIAL: Self;
    /// Phase whose exit back to `INITIAL` completes a rep
    const PENULTIMATE: Self;

    /// Whether the subject is inside the working half of the cycle
    fn is_active(self) -> bool;

    /// Machine-readable phase name
    fn name(self) -> &'static str;
}

/// Squat phases driven by the knee angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquatPhase {
    /// Upright, knees near full extension
    Standing,
    /// Lowering toward the bottom
    Descending,
    /// Deepest part of the squat
    Bottom,
    /// Driving back up
    Ascending,
}

/// Pulling phases driven by the range-of-motion percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullingPhase {
    /// Arms extended, start of the pull
    Extended,
    /// Moving toward the contracted position
    Pulling,
    /// Peak contraction
    Contracted,
    /// Releasing back to extension
    Returning,
}

/// Phase of whichever machine a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MotionPhase {
    /// Squat family phase
    Squat(SquatPhase),
    /// Pulling family phase
    Pulling(PullingPhase),
}

impl MotionPhase {
    /// Machine-readable phase name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Squat(phase) => phase.name(),
            Self::Pulling(phase) => phase.name(),
        }
    }
}

impl fmt::Display for MotionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<SquatPhase> for MotionPhase {
    fn from(phase: SquatPhase) -> Self {
        Self::Squat(phase)
    }
}

impl From<PullingPhase> for MotionPhase {
    fn from(phase: PullingPhase) -> Self {
        Self::Pulling(phase)
    }
}

/// Knee-angle thresholds for the squat machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquatThresholds {
    /// Above this (minus hysteresis) the subject is standing
    pub standing: f64,
    /// Below this (minus hysteresis) the descent has begun
    pub descending: f64,
    /// Below this (plus hysteresis) the subject is at the bottom
    pub bottom: f64,
}

impl SquatThresholds {
    /// Static thresholds used before calibration completes
    #[must_use]
    pub const fn defaults(config: &SquatConfig) -> Self {
        Self {
            standing: config.standing_threshold,
            descending: config.descending_threshold,
            bottom: config.bottom_threshold,
        }
    }

    /// Thresholds personalised to a calibrated standing and bottom angle
    #[must_use]
    pub fn calibrated(standing_angle: f64, bottom_angle: f64, config: &SquatConfig) -> Self {
        let range = standing_angle - bottom_angle;
        Self {
            standing: range.mul_add(-config.standing_fraction, standing_angle),
            descending: range.mul_add(-config.descending_fraction, standing_angle),
            bottom: range.mul_add(config.bottom_fraction, bottom_angle),
        }
    }
}

impl SquatPhase {
    /// Advance the machine by one smoothed knee-angle sample
    ///
    /// `previous` is the smoothed angle of the previous valid frame and only
    /// feeds the ascending/descending trend.
    #[must_use]
    pub fn next(
        self,
        angle: f64,
        previous: f64,
        thresholds: &SquatThresholds,
        config: &SquatConfig,
    ) -> Self {
        let descending = angle < previous - config.trend_delta;
        let ascending = angle > previous + config.trend_delta;
        let h = config.hysteresis;

        match self {
            Self::Standing if angle < thresholds.descending - h => Self::Descending,
            Self::Descending if angle < thresholds.bottom + h => Self::Bottom,
            Self::Descending if ascending && angle > thresholds.standing - h => Self::Standing,
            Self::Bottom if ascending && angle > thresholds.bottom + h + config.ascend_margin => {
                Self::Ascending
            }
            Self::Ascending if angle > thresholds.standing - h => Self::Standing,
            Self::Ascending if descending && angle < thresholds.descending => Self::Descending,
            current => current,
        }
    }
}

impl PullingPhase {
    /// Advance the machine by one range-of-motion percentage
    #[must_use]
    pub fn next(self, rom_pct: f64, config: &PullingConfig) -> Self {
        match self {
            Self::Extended if rom_pct > config.enter_pulling_pct => Self::Pulling,
            Self::Pulling if rom_pct >= config.enter_contracted_pct => Self::Contracted,
            Self::Pulling if rom_pct < config.enter_extended_pct => Self::Extended,
            Self::Contracted if rom_pct < config.enter_returning_pct => Self::Returning,
            Self::Returning if rom_pct < config.enter_extended_pct => Self::Extended,
            Self::Returning if rom_pct > config.enter_returning_pct => Self::Contracted,
            current => current,
        }
    }
}

impl PhaseCycle for SquatPhase {
    const INITIAL: Self = Self::Standing;
    const PENULTIMATE: Self = Self::Ascending;

    fn is_active(self) -> bool {
        !matches!(self, Self::Standing)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Standing => "standing",
            Self::Descending => "descending",
            Self::Bottom => "bottom",
            Self::Ascending => "ascending",
        }
    }
}

impl PhaseCycle for PullingPhase {
    const INITIAL: Self = Self::Extended;
    const PENULTIMATE: Self = Self::Returning;

    fn is_active(self) -> bool {
        matches!(self, Self::Pulling | Self::Contracted)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Extended => "extended",
            Self::Pulling => "pulling",
            Self::Contracted => "contracted",
            Self::Returning => "returning",
        }
    }
}
