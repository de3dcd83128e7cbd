// ABOUTME: Landmark validity classifier deciding frame usability and confidence tier
// ABOUTME: Missing or low-presence key joints invalidate a frame; visibility sets the tier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_motion_core::models::{BodyLandmark, Frame};
use serde::{Deserialize, Serialize};

use crate::analysis_config::ValidityConfig;
use crate::geometry::avg_visibility;

/// Instruction returned when a key joint is missing from the frame
pub const REPOSITION_MESSAGE: &str = "Reposition so your whole body is in frame";

/// Warning returned when key joints are present but mostly occluded
pub const OCCLUSION_MESSAGE: &str = "Some joints are hidden from the camera";

/// How trustworthy a frame's geometry is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// Average key visibility at or above the high bound
    High,
    /// Average key visibility between the bounds
    Medium,
    /// Occluded joints or an invalid frame
    Low,
}

impl ConfidenceTier {
    /// Factor applied to every scoring deduction at this tier
    #[must_use]
    pub const fn multiplier(self, config: &ValidityConfig) -> f64 {
        match self {
            Self::High => config.high_multiplier,
            Self::Medium => config.medium_multiplier,
            Self::Low => config.low_multiplier,
        }
    }
}

/// Outcome of classifying one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidityResult {
    /// Whether the frame may drive the analysis
    pub is_valid: bool,
    /// Confidence tier of the frame
    pub confidence: ConfidenceTier,
    /// Corrective instruction or occlusion warning
    pub message: Option<&'static str>,
}

/// Classify a frame against the exercise's key landmarks
///
/// Pure query: the frame and the caller's state are left untouched.
#[must_use]
pub fn classify(
    frame: &Frame,
    key_parts: &[BodyLandmark],
    config: &ValidityConfig,
) -> ValidityResult {
    let missing = key_parts.iter().any(|part| {
        let landmark = frame[*part];
        !landmark.is_detected()
            || !landmark.presence.is_finite()
            || landmark.presence < config.min_presence
    });
    if missing {
        return ValidityResult {
            is_valid: false,
            confidence: ConfidenceTier::Low,
            message: Some(REPOSITION_MESSAGE),
        };
    }

    let visibility = avg_visibility(frame, key_parts);
    if visibility < config.low_visibility {
        ValidityResult {
            is_valid: true,
            confidence: ConfidenceTier::Low,
            message: Some(OCCLUSION_MESSAGE),
        }
    } else if visibility < config.high_visibility {
        ValidityResult {
            is_valid: true,
            confidence: ConfidenceTier::Medium,
            message: None,
        }
    } else {
        ValidityResult {
            is_valid: true,
            confidence: ConfidenceTier::High,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis_config::MotionAnalysisConfig;
    use pierre_motion_core::models::Landmark;

    const KEYS: [BodyLandmark; 4] = [
        BodyLandmark::LeftHip,
        BodyLandmark::RightHip,
        BodyLandmark::LeftKnee,
        BodyLandmark::RightKnee,
    ];

    fn config() -> ValidityConfig {
        MotionAnalysisConfig::default().validity
    }

    #[test]
    fn test_fully_visible_frame_is_high_confidence() {
        let frame = Frame::filled(Landmark::at(0.5, 0.5));
        let result = classify(&frame, &KEYS, &config());
        assert!(result.is_valid);
        assert_eq!(result.confidence, ConfidenceTier::High);
        assert_eq!(result.message, None);
    }

    #[test]
    fn test_nan_visibility_on_key_joints_is_low_confidence() {
        let frame = Frame::filled(Landmark::at(0.5, 0.5))
            .map_parts(&KEYS, |landmark| landmark.with_visibility(f64::NAN));
        let result = classify(&frame, &KEYS, &config());
        assert!(result.is_valid);
        assert_eq!(result.confidence, ConfidenceTier::Low);
        assert_eq!(result.message, Some(OCCLUSION_MESSAGE));
    }

    #[test]
    fn test_nan_presence_on_key_joint_invalidates_frame() {
        let frame = Frame::filled(Landmark::at(0.5, 0.5)).with_landmark(
            BodyLandmark::LeftKnee,
            Landmark::at(0.5, 0.5).with_presence(f64::NAN),
        );
        let result = classify(&frame, &KEYS, &config());
        assert!(!result.is_valid);
        assert_eq!(result.message, Some(REPOSITION_MESSAGE));
    }
}
