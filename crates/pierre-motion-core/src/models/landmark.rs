// ABOUTME: Landmark, body-part enumeration, and fixed-size frame value types
// ABOUTME: Frames are immutable snapshots of one detector invocation indexed by body part
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::constants::landmarks::LANDMARK_COUNT;
use crate::errors::AppError;

const fn full_confidence() -> f64 {
    1.0
}

/// One detected body point in normalized image space
///
/// `x` and `y` are normalized to `[0, 1]` with `y` growing downward. `z` is a
/// depth estimate on an arbitrary scale. Detectors that do not report
/// `visibility` or `presence` are treated as fully confident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0 = left edge of the image
    pub x: f64,
    /// Vertical position, 0 = top edge of the image
    pub y: f64,
    /// Depth estimate relative to the hips
    #[serde(default)]
    pub z: f64,
    /// Likelihood that the point is not occluded
    #[serde(default = "full_confidence")]
    pub visibility: f64,
    /// Likelihood that the point exists in the frame at all
    #[serde(default = "full_confidence")]
    pub presence: f64,
}

impl Landmark {
    /// Create a landmark with explicit confidence values
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, visibility: f64, presence: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
            presence,
        }
    }

    /// Fully visible landmark at an image position
    #[must_use]
    pub const fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 1.0, 1.0)
    }

    /// Copy with a different visibility
    #[must_use]
    pub const fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = visibility;
        self
    }

    /// Copy with a different presence
    #[must_use]
    pub const fn with_presence(mut self, presence: f64) -> Self {
        self.presence = presence;
        self
    }

    /// Copy translated in image space
    #[must_use]
    pub fn offset(mut self, dx: f64, dy: f64) -> Self {
        self.x += dx;
        self.y += dy;
        self
    }

    /// Whether the detector produced usable coordinates for this point
    #[must_use]
    pub fn is_detected(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Body part index of the 33-point pose topology
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    /// Every body part in detector order
    pub const ALL: [Self; LANDMARK_COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    /// Position of this part in a frame
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Left or right half of the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySide {
    /// Subject's left
    Left,
    /// Subject's right
    Right,
}

impl BodySide {
    /// The opposite side
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Ear on this side
    #[must_use]
    pub const fn ear(self) -> BodyLandmark {
        match self {
            Self::Left => BodyLandmark::LeftEar,
            Self::Right => BodyLandmark::RightEar,
        }
    }

    /// Shoulder on this side
    #[must_use]
    pub const fn shoulder(self) -> BodyLandmark {
        match self {
            Self::Left => BodyLandmark::LeftShoulder,
            Self::Right => BodyLandmark::RightShoulder,
        }
    }

    /// Elbow on this side
    #[must_use]
    pub const fn elbow(self) -> BodyLandmark {
        match self {
            Self::Left => BodyLandmark::LeftElbow,
            Self::Right => BodyLandmark::RightElbow,
        }
    }

    /// Wrist on this side
    #[must_use]
    pub const fn wrist(self) -> BodyLandmark {
        match self {
            Self::Left => BodyLandmark::LeftWrist,
            Self::Right => BodyLandmark::RightWrist,
        }
    }

    /// Hip on this side
    #[must_use]
    pub const fn hip(self) -> BodyLandmark {
        match self {
            Self::Left => BodyLandmark::LeftHip,
            Self::Right => BodyLandmark::RightHip,
        }
    }

    /// Knee on this side
    #[must_use]
    pub const fn knee(self) -> BodyLandmark {
        match self {
            Self::Left => BodyLandmark::LeftKnee,
            Self::Right => BodyLandmark::RightKnee,
        }
    }

    /// Ankle on this side
    #[must_use]
    pub const fn ankle(self) -> BodyLandmark {
        match self {
            Self::Left => BodyLandmark::LeftAnkle,
            Self::Right => BodyLandmark::RightAnkle,
        }
    }

    /// Heel on this side
    #[must_use]
    pub const fn heel(self) -> BodyLandmark {
        match self {
            Self::Left => BodyLandmark::LeftHeel,
            Self::Right => BodyLandmark::RightHeel,
        }
    }

    /// Toe tip on this side
    #[must_use]
    pub const fn foot_index(self) -> BodyLandmark {
        match self {
            Self::Left => BodyLandmark::LeftFootIndex,
            Self::Right => BodyLandmark::RightFootIndex,
        }
    }
}

/// Complete landmark set produced by one detector invocation
///
/// Serialized as a JSON array of exactly 33 landmarks; any other length is
/// rejected during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct Frame {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl Frame {
    /// Wrap a complete landmark array
    #[must_use]
    pub const fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Frame with every body part set to the same landmark
    #[must_use]
    pub const fn filled(landmark: Landmark) -> Self {
        Self::new([landmark; LANDMARK_COUNT])
    }

    /// Landmark of one body part
    #[must_use]
    pub const fn get(&self, part: BodyLandmark) -> &Landmark {
        &self.landmarks[part.index()]
    }

    /// All landmarks in detector order
    #[must_use]
    pub const fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Body parts paired with their landmarks
    pub fn iter(&self) -> impl Iterator<Item = (BodyLandmark, &Landmark)> {
        BodyLandmark::ALL.into_iter().zip(self.landmarks.iter())
    }

    /// Copy with one body part replaced
    #[must_use]
    pub fn with_landmark(mut self, part: BodyLandmark, landmark: Landmark) -> Self {
        self.landmarks[part.index()] = landmark;
        self
    }

    /// Copy with a transformation applied to a subset of body parts
    #[must_use]
    pub fn map_parts<F>(mut self, parts: &[BodyLandmark], f: F) -> Self
    where
        F: Fn(Landmark) -> Landmark,
    {
        for part in parts {
            let slot = &mut self.landmarks[part.index()];
            *slot = f(*slot);
        }
        self
    }
}

impl Index<BodyLandmark> for Frame {
    type Output = Landmark;

    fn index(&self, part: BodyLandmark) -> &Self::Output {
        self.get(part)
    }
}

impl TryFrom<Vec<Landmark>> for Frame {
    type Error = AppError;

    fn try_from(landmarks: Vec<Landmark>) -> Result<Self, Self::Error> {
        let count = landmarks.len();
        let landmarks: [Landmark; LANDMARK_COUNT] = landmarks.try_into().map_err(|_| {
            AppError::invalid_format(format!(
                "frame has {count} landmarks, expected {LANDMARK_COUNT}"
            ))
        })?;
        Ok(Self::new(landmarks))
    }
}

impl From<Frame> for Vec<Landmark> {
    fn from(frame: Frame) -> Self {
        frame.landmarks.to_vec()
    }
}

impl fmt::Display for BodyLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
