// ABOUTME: Configuration-driven constants for motion analysis replacing magic numbers
// ABOUTME: Provides type-safe, environment-configurable thresholds for every analysis stage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Motion analysis configuration.
//!
//! Every threshold used by validity classification, smoothing, the phase
//! machines, calibration, rep debouncing and form scoring lives here. Values
//! can be overridden with `MOTION_*` environment variables or loaded from
//! JSON by the runtime crate.

use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

use pierre_motion_core::errors::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Global configuration singleton
static MOTION_ANALYSIS_CONFIG: OnceLock<MotionAnalysisConfig> = OnceLock::new();

/// Analysis configuration errors
#[derive(Debug, Error)]
pub enum AnalysisConfigError {
    /// Threshold outside its meaningful range
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Window or sample count that cannot be used
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// Cross-field consistency check failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Environment variable could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<AnalysisConfigError> for AppError {
    fn from(error: AnalysisConfigError) -> Self {
        Self::config_invalid(error.to_string())
    }
}

/// Landmark validity and confidence thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidityConfig {
    /// Key landmarks below this presence make the frame invalid
    pub min_presence: f64,
    /// Average key visibility below this yields the low tier
    pub low_visibility: f64,
    /// Average key visibility at or above this yields the high tier
    pub high_visibility: f64,
    /// Both knees above this visibility are averaged for the squat signal
    pub bilateral_visibility: f64,
    /// Deduction multiplier for the high tier
    pub high_multiplier: f64,
    /// Deduction multiplier for the medium tier
    pub medium_multiplier: f64,
    /// Deduction multiplier for the low tier
    pub low_multiplier: f64,
}

/// Signal smoothing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Moving-average window in samples
    pub window: usize,
}

/// Squat phase machine parameters (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquatConfig {
    /// Default standing threshold before calibration
    pub standing_threshold: f64,
    /// Default descending threshold before calibration
    pub descending_threshold: f64,
    /// Default bottom threshold before calibration
    pub bottom_threshold: f64,
    /// Hysteresis margin applied around every threshold
    pub hysteresis: f64,
    /// Frame-to-frame change that counts as a trend
    pub trend_delta: f64,
    /// Extra rise above the bottom band required to start ascending
    pub ascend_margin: f64,
    /// Calibrated standing threshold = standing angle - range * fraction
    pub standing_fraction: f64,
    /// Calibrated descending threshold = standing angle - range * fraction
    pub descending_fraction: f64,
    /// Calibrated bottom threshold = bottom angle + range * fraction
    pub bottom_fraction: f64,
    /// Standing angle reported before calibration completes
    pub initial_standing_angle: f64,
    /// Bottom angle reported before calibration completes
    pub initial_bottom_angle: f64,
    /// Previous knee angle assumed for the first frame
    pub initial_knee_angle: f64,
}

/// Pulling phase machine parameters (percent of range of motion)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PullingConfig {
    /// Extended -> Pulling when progress exceeds this
    pub enter_pulling_pct: f64,
    /// Pulling -> Contracted when progress reaches this
    pub enter_contracted_pct: f64,
    /// Contracted -> Returning when progress drops below this
    pub enter_returning_pct: f64,
    /// Pulling/Returning -> Extended when progress drops below this
    pub enter_extended_pct: f64,
    /// Progress assigned to a contracted-looking pose before calibration
    pub heuristic_contracted_pct: f64,
    /// Progress assigned to an extended-looking pose before calibration
    pub heuristic_extended_pct: f64,
    /// Rear-delt wrist spread that looks contracted before calibration
    pub rear_delt_spread: f64,
    /// Straight-arm wrists within this distance above the hip look contracted
    pub straight_arm_hip_margin: f64,
}

/// Online calibration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Samples per extreme required before calibration freezes
    pub samples_required: usize,
    /// Maximum samples kept per extreme
    pub max_samples: usize,
    /// Squat standing samples are accepted only above this knee angle
    pub squat_standing_min_angle: f64,
    /// Squat bottom samples are accepted only below this knee angle
    pub squat_bottom_max_angle: f64,
}

/// Rep detection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepConfig {
    /// Minimum time between two counted reps
    pub min_rep_duration_ms: f64,
}

/// Base deduction per rule before confidence weighting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeductionPoints {
    /// Insufficient range of motion
    pub rom_insufficient: f64,
    /// Left/right imbalance
    pub asymmetry: f64,
    /// Knees caving in
    pub knee_valgus: f64,
    /// Knees travelling past the toes
    pub knee_over_toe: f64,
    /// Excessive forward torso lean
    pub torso_lean: f64,
    /// Torso swing during a pull
    pub excessive_momentum: f64,
    /// Rep tempo too fast
    pub too_fast: f64,
    /// Shoulders shrugged toward the ears
    pub shoulder_shrug: f64,
    /// Bent elbows on a straight-arm pulldown
    pub elbow_bend: f64,
    /// Bonus for a squat below parallel
    pub depth_bonus: f64,
}

/// Form scoring thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Pulling reps below this range of motion are penalized
    pub min_rom_pct: f64,
    /// Squat reps whose deepest knee angle stays above this are penalized
    pub max_squat_knee_angle: f64,
    /// Squat knee height difference in normalized image units
    pub max_knee_height_diff: f64,
    /// Rear-delt wrist height asymmetry in percent of torso height
    pub max_asymmetry_pct: f64,
    /// Knee inside ankle by more than this flags valgus
    pub valgus_margin: f64,
    /// Knee ahead of ankle by more than this flags knee-over-toe
    pub knee_over_toe_margin: f64,
    /// Torso deviation from vertical in degrees
    pub max_torso_lean_deg: f64,
    /// Torso swing from the calibrated baseline in degrees
    pub max_torso_swing_deg: f64,
    /// Reps faster than this are flagged
    pub min_tempo_ms: f64,
    /// Ear-to-shoulder vertical gap below this flags a shrug
    pub min_shrug_gap: f64,
    /// Straight-arm elbow angle below this flags a bend
    pub min_straight_elbow_deg: f64,
    /// Squat knee angle below this earns the depth bonus
    pub depth_bonus_angle: f64,
    /// Points per rule
    pub deductions: DeductionPoints,
}

/// Main motion analysis configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionAnalysisConfig {
    /// Landmark validity thresholds
    pub validity: ValidityConfig,
    /// Signal smoothing
    pub smoothing: SmoothingConfig,
    /// Squat phase machine
    pub squat: SquatConfig,
    /// Pulling phase machine
    pub pulling: PullingConfig,
    /// Online calibration
    pub calibration: CalibrationConfig,
    /// Rep detection
    pub rep: RepConfig,
    /// Form scoring
    pub scoring: ScoringConfig,
}

impl Default for MotionAnalysisConfig {
    fn default() -> Self {
        Self {
            validity: ValidityConfig {
                min_presence: 0.5,
                low_visibility: 0.5,
                high_visibility: 0.75,
                bilateral_visibility: 0.7,
                high_multiplier: 1.0,
                medium_multiplier: 0.7,
                low_multiplier: 0.5,
            },
            smoothing: SmoothingConfig { window: 3 },
            squat: SquatConfig {
                standing_threshold: 160.0,
                descending_threshold: 140.0,
                bottom_threshold: 120.0,
                hysteresis: 5.0,
                trend_delta: 2.0,
                ascend_margin: 10.0,
                standing_fraction: 0.15,
                descending_fraction: 0.30,
                bottom_fraction: 0.20,
                initial_standing_angle: 170.0,
                initial_bottom_angle: 90.0,
                initial_knee_angle: 180.0,
            },
            pulling: PullingConfig {
                enter_pulling_pct: 40.0,
                enter_contracted_pct: 80.0,
                enter_returning_pct: 70.0,
                enter_extended_pct: 30.0,
                heuristic_contracted_pct: 80.0,
                heuristic_extended_pct: 20.0,
                rear_delt_spread: 0.5,
                straight_arm_hip_margin: 0.1,
            },
            calibration: CalibrationConfig {
                samples_required: 3,
                max_samples: 5,
                squat_standing_min_angle: 150.0,
                squat_bottom_max_angle: 120.0,
            },
            rep: RepConfig {
                min_rep_duration_ms: 800.0,
            },
            scoring: ScoringConfig {
                min_rom_pct: 70.0,
                max_squat_knee_angle: 120.0,
                max_knee_height_diff: 0.05,
                max_asymmetry_pct: 5.0,
                valgus_margin: 0.03,
                knee_over_toe_margin: 0.08,
                max_torso_lean_deg: 30.0,
                max_torso_swing_deg: 25.0,
                min_tempo_ms: 500.0,
                min_shrug_gap: 0.03,
                min_straight_elbow_deg: 160.0,
                depth_bonus_angle: 90.0,
                deductions: DeductionPoints {
                    rom_insufficient: 15.0,
                    asymmetry: 10.0,
                    knee_valgus: 15.0,
                    knee_over_toe: 15.0,
                    torso_lean: 10.0,
                    excessive_momentum: 20.0,
                    too_fast: 10.0,
                    shoulder_shrug: 10.0,
                    elbow_bend: 20.0,
                    depth_bonus: 5.0,
                },
            },
        }
    }
}

impl MotionAnalysisConfig {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        MOTION_ANALYSIS_CONFIG.get_or_init(|| {
            Self::from_environment().unwrap_or_else(|e| {
                warn!("Failed to load motion analysis config: {e}, using defaults");
                Self::default()
            })
        })
    }

    /// Load configuration from environment variables with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn from_environment() -> Result<Self, AnalysisConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(
        env_var_name: &str,
        target: &mut T,
    ) -> Result<(), AnalysisConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|_| AnalysisConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply `MOTION_*` environment variable overrides
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable cannot be parsed
    pub fn apply_env_overrides(mut self) -> Result<Self, AnalysisConfigError> {
        // Validity
        Self::apply_env_var("MOTION_MIN_PRESENCE", &mut self.validity.min_presence)?;
        Self::apply_env_var("MOTION_LOW_VISIBILITY", &mut self.validity.low_visibility)?;
        Self::apply_env_var("MOTION_HIGH_VISIBILITY", &mut self.validity.high_visibility)?;

        // Smoothing
        Self::apply_env_var("MOTION_SMOOTHING_WINDOW", &mut self.smoothing.window)?;

        // Squat machine
        Self::apply_env_var(
            "MOTION_SQUAT_STANDING_THRESHOLD",
            &mut self.squat.standing_threshold,
        )?;
        Self::apply_env_var(
            "MOTION_SQUAT_DESCENDING_THRESHOLD",
            &mut self.squat.descending_threshold,
        )?;
        Self::apply_env_var(
            "MOTION_SQUAT_BOTTOM_THRESHOLD",
            &mut self.squat.bottom_threshold,
        )?;
        Self::apply_env_var("MOTION_SQUAT_HYSTERESIS", &mut self.squat.hysteresis)?;

        // Calibration
        Self::apply_env_var(
            "MOTION_CALIBRATION_SAMPLES",
            &mut self.calibration.samples_required,
        )?;
        Self::apply_env_var(
            "MOTION_CALIBRATION_MAX_SAMPLES",
            &mut self.calibration.max_samples,
        )?;

        // Rep detection
        Self::apply_env_var("MOTION_MIN_REP_DURATION_MS", &mut self.rep.min_rep_duration_ms)?;

        // Scoring
        Self::apply_env_var("MOTION_MIN_ROM_PCT", &mut self.scoring.min_rom_pct)?;
        Self::apply_env_var("MOTION_MIN_TEMPO_MS", &mut self.scoring.min_tempo_ms)?;
        Self::apply_env_var(
            "MOTION_MAX_TORSO_SWING_DEG",
            &mut self.scoring.max_torso_swing_deg,
        )?;
        Self::apply_env_var(
            "MOTION_MAX_TORSO_LEAN_DEG",
            &mut self.scoring.max_torso_lean_deg,
        )?;

        Ok(self)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), AnalysisConfigError> {
        self.validate_validity()?;
        self.validate_windows()?;
        self.validate_squat()?;
        self.validate_pulling()?;
        self.validate_scoring()
    }

    fn validate_validity(&self) -> Result<(), AnalysisConfigError> {
        let v = &self.validity;
        for (name, value) in [
            ("min_presence", v.min_presence),
            ("low_visibility", v.low_visibility),
            ("high_visibility", v.high_visibility),
            ("bilateral_visibility", v.bilateral_visibility),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalysisConfigError::InvalidThreshold(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }

        if v.low_visibility > v.high_visibility {
            return Err(AnalysisConfigError::ValidationFailed(
                "low_visibility must be <= high_visibility".into(),
            ));
        }

        for (name, value) in [
            ("high_multiplier", v.high_multiplier),
            ("medium_multiplier", v.medium_multiplier),
            ("low_multiplier", v.low_multiplier),
        ] {
            if value <= 0.0 || value > 1.0 {
                return Err(AnalysisConfigError::InvalidThreshold(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }

        if v.low_multiplier > v.medium_multiplier || v.medium_multiplier > v.high_multiplier {
            return Err(AnalysisConfigError::ValidationFailed(
                "confidence multipliers must not increase as confidence drops".into(),
            ));
        }

        Ok(())
    }

    fn validate_windows(&self) -> Result<(), AnalysisConfigError> {
        if self.smoothing.window == 0 {
            return Err(AnalysisConfigError::InvalidWindow(
                "smoothing window must be > 0".into(),
            ));
        }

        if self.calibration.samples_required == 0 {
            return Err(AnalysisConfigError::InvalidWindow(
                "calibration samples_required must be > 0".into(),
            ));
        }

        if self.calibration.max_samples < self.calibration.samples_required {
            return Err(AnalysisConfigError::InvalidWindow(format!(
                "calibration max_samples ({}) must be >= samples_required ({})",
                self.calibration.max_samples, self.calibration.samples_required
            )));
        }

        if self.rep.min_rep_duration_ms < 0.0 {
            return Err(AnalysisConfigError::InvalidThreshold(
                "min_rep_duration_ms must be >= 0".into(),
            ));
        }

        Ok(())
    }

    fn validate_squat(&self) -> Result<(), AnalysisConfigError> {
        let s = &self.squat;
        if !(s.bottom_threshold < s.descending_threshold
            && s.descending_threshold < s.standing_threshold)
        {
            return Err(AnalysisConfigError::ValidationFailed(
                "squat thresholds must satisfy bottom < descending < standing".into(),
            ));
        }

        if s.hysteresis < 0.0 || s.trend_delta < 0.0 || s.ascend_margin < 0.0 {
            return Err(AnalysisConfigError::InvalidThreshold(
                "squat hysteresis, trend_delta and ascend_margin must be >= 0".into(),
            ));
        }

        if s.initial_bottom_angle >= s.initial_standing_angle {
            return Err(AnalysisConfigError::ValidationFailed(
                "initial_bottom_angle must be < initial_standing_angle".into(),
            ));
        }

        let fractions = [s.standing_fraction, s.descending_fraction, s.bottom_fraction];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(AnalysisConfigError::InvalidThreshold(
                "squat calibration fractions must be between 0 and 1".into(),
            ));
        }

        if s.standing_fraction >= s.descending_fraction {
            return Err(AnalysisConfigError::ValidationFailed(
                "standing_fraction must be < descending_fraction".into(),
            ));
        }

        Ok(())
    }

    fn validate_pulling(&self) -> Result<(), AnalysisConfigError> {
        let p = &self.pulling;
        for (name, value) in [
            ("enter_pulling_pct", p.enter_pulling_pct),
            ("enter_contracted_pct", p.enter_contracted_pct),
            ("enter_returning_pct", p.enter_returning_pct),
            ("enter_extended_pct", p.enter_extended_pct),
            ("heuristic_contracted_pct", p.heuristic_contracted_pct),
            ("heuristic_extended_pct", p.heuristic_extended_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(AnalysisConfigError::InvalidThreshold(format!(
                    "{name} must be between 0 and 100, got {value}"
                )));
            }
        }

        if !(p.enter_extended_pct < p.enter_pulling_pct
            && p.enter_pulling_pct < p.enter_contracted_pct
            && p.enter_returning_pct < p.enter_contracted_pct
            && p.enter_extended_pct < p.enter_returning_pct)
        {
            return Err(AnalysisConfigError::ValidationFailed(
                "pulling thresholds must satisfy extended < pulling < contracted and extended < returning < contracted".into(),
            ));
        }

        if p.heuristic_contracted_pct < p.enter_contracted_pct
            || p.heuristic_extended_pct >= p.enter_extended_pct
        {
            return Err(AnalysisConfigError::ValidationFailed(
                "pre-calibration heuristic must be able to close a full pulling cycle".into(),
            ));
        }

        Ok(())
    }

    fn validate_scoring(&self) -> Result<(), AnalysisConfigError> {
        let d = &self.scoring.deductions;
        let points = [
            d.rom_insufficient,
            d.asymmetry,
            d.knee_valgus,
            d.knee_over_toe,
            d.torso_lean,
            d.excessive_momentum,
            d.too_fast,
            d.shoulder_shrug,
            d.elbow_bend,
            d.depth_bonus,
        ];
        if points.iter().any(|p| !(0.0..=100.0).contains(p)) {
            return Err(AnalysisConfigError::InvalidThreshold(
                "rule points must be between 0 and 100".into(),
            ));
        }

        if !(0.0..=100.0).contains(&self.scoring.min_rom_pct) {
            return Err(AnalysisConfigError::InvalidThreshold(
                "min_rom_pct must be between 0 and 100".into(),
            ));
        }

        Ok(())
    }
}
