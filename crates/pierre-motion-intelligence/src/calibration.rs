// ABOUTME: Online calibration store harvesting extremal samples during a session's first reps
// ABOUTME: Freezes personal squat angles or pulling positions once both extremes are sampled
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Calibration store.
//!
//! While a session is uncalibrated every frame spent in one of the cycle's
//! extremal phases contributes a sample. As soon as both extremes hold
//! enough samples the means are frozen and the samples are dropped; the
//! store then stays inert until the session is reset.

use serde::{Deserialize, Serialize};

use crate::analysis_config::{CalibrationConfig, SquatConfig};
use crate::geometry::average;
use crate::phase::{PullingPhase, SquatPhase, SquatThresholds};

/// Personal squat reference angles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquatCalibration {
    /// Mean knee angle while standing
    pub standing_angle: f64,
    /// Mean knee angle at the bottom
    pub bottom_angle: f64,
    /// Whether the values above were measured rather than defaulted
    pub is_calibrated: bool,
}

/// Personal pulling reference positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PullingCalibration {
    /// Mean position signal with arms extended
    pub extended_position: f64,
    /// Mean position signal at peak contraction
    pub contracted_position: f64,
    /// Mean torso angle while extended, the reference for swing
    pub torso_base_angle: f64,
    /// Whether the values above were measured rather than defaulted
    pub is_calibrated: bool,
}

/// Calibration of whichever family a session runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum CalibrationSnapshot {
    /// Squat calibration
    Squat(SquatCalibration),
    /// Pulling calibration
    Pulling(PullingCalibration),
}

impl CalibrationSnapshot {
    /// Whether the snapshot holds measured values
    #[must_use]
    pub const fn is_calibrated(&self) -> bool {
        match self {
            Self::Squat(calibration) => calibration.is_calibrated,
            Self::Pulling(calibration) => calibration.is_calibrated,
        }
    }
}

/// Capped list of samples for one extreme of the cycle
#[derive(Debug, Clone, Default, PartialEq)]
struct SampleList {
    values: Vec<f64>,
}

impl SampleList {
    fn push(&mut self, value: f64, cap: usize) {
        if self.values.len() < cap {
            self.values.push(value);
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn mean(&self) -> f64 {
        average(&self.values)
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Calibration store for the squat family
#[derive(Debug, Clone, PartialEq)]
pub struct SquatCalibrator {
    calibration: SquatCalibration,
    standing: SampleList,
    bottom: SampleList,
}

impl SquatCalibrator {
    /// Store seeded with the default reference angles
    #[must_use]
    pub fn new(config: &SquatConfig) -> Self {
        Self {
            calibration: SquatCalibration {
                standing_angle: config.initial_standing_angle,
                bottom_angle: config.initial_bottom_angle,
                is_calibrated: false,
            },
            standing: SampleList::default(),
            bottom: SampleList::default(),
        }
    }

    /// Current calibration values
    #[must_use]
    pub const fn calibration(&self) -> &SquatCalibration {
        &self.calibration
    }

    /// Phase thresholds derived from the calibration, or defaults before it
    #[must_use]
    pub fn thresholds(&self, config: &SquatConfig) -> SquatThresholds {
        if self.calibration.is_calibrated {
            SquatThresholds::calibrated(
                self.calibration.standing_angle,
                self.calibration.bottom_angle,
                config,
            )
        } else {
            SquatThresholds::defaults(config)
        }
    }

    /// Samples collected so far as `(standing, bottom)`
    #[must_use]
    pub fn sample_counts(&self) -> (usize, usize) {
        (self.standing.len(), self.bottom.len())
    }

    /// Offer one knee-angle sample taken in `phase`
    ///
    /// Returns `true` when this sample froze the calibration.
    pub fn observe(
        &mut self,
        phase: SquatPhase,
        knee_angle: f64,
        config: &CalibrationConfig,
    ) -> bool {
        if self.calibration.is_calibrated {
            return false;
        }

        match phase {
            SquatPhase::Standing if knee_angle > config.squat_standing_min_angle => {
                self.standing.push(knee_angle, config.max_samples);
            }
            SquatPhase::Bottom if knee_angle < config.squat_bottom_max_angle => {
                self.bottom.push(knee_angle, config.max_samples);
            }
            _ => return false,
        }

        if self.standing.len() < config.samples_required
            || self.bottom.len() < config.samples_required
        {
            return false;
        }

        self.calibration = SquatCalibration {
            standing_angle: self.standing.mean(),
            bottom_angle: self.bottom.mean(),
            is_calibrated: true,
        };
        self.standing.clear();
        self.bottom.clear();
        true
    }
}

/// Calibration store for the pulling family
#[derive(Debug, Clone, PartialEq)]
pub struct PullingCalibrator {
    calibration: PullingCalibration,
    extended: SampleList,
    torso_base: SampleList,
    contracted: SampleList,
}

impl Default for PullingCalibrator {
    fn default() -> Self {
        Self::new()
    }
}

impl PullingCalibrator {
    /// Uncalibrated store
    #[must_use]
    pub fn new() -> Self {
        Self {
            calibration: PullingCalibration {
                extended_position: 0.0,
                contracted_position: 0.0,
                torso_base_angle: 0.0,
                is_calibrated: false,
            },
            extended: SampleList::default(),
            torso_base: SampleList::default(),
            contracted: SampleList::default(),
        }
    }

    /// Current calibration values
    #[must_use]
    pub const fn calibration(&self) -> &PullingCalibration {
        &self.calibration
    }

    /// Samples collected so far as `(extended, contracted)`
    #[must_use]
    pub fn sample_counts(&self) -> (usize, usize) {
        (self.extended.len(), self.contracted.len())
    }

    /// Offer one position sample (and the torso angle) taken in `phase`
    ///
    /// Returns `true` when this sample froze the calibration.
    pub fn observe(
        &mut self,
        phase: PullingPhase,
        position: f64,
        torso_angle: f64,
        config: &CalibrationConfig,
    ) -> bool {
        if self.calibration.is_calibrated {
            return false;
        }

        match phase {
            PullingPhase::Extended => {
                if self.extended.len() < config.max_samples {
                    self.extended.push(position, config.max_samples);
                    self.torso_base.push(torso_angle, config.max_samples);
                }
            }
            PullingPhase::Contracted => self.contracted.push(position, config.max_samples),
            PullingPhase::Pulling | PullingPhase::Returning => return false,
        }

        if self.extended.len() < config.samples_required
            || self.contracted.len() < config.samples_required
        {
            return false;
        }

        self.calibration = PullingCalibration {
            extended_position: self.extended.mean(),
            contracted_position: self.contracted.mean(),
            torso_base_angle: self.torso_base.mean(),
            is_calibrated: true,
        };
        self.extended.clear();
        self.torso_base.clear();
        self.contracted.clear();
        true
    }
}
