// ABOUTME: Pure geometric helpers over normalized landmarks: joint angles, spreads, ROM, smoothing
// ABOUTME: Every function is total; degenerate geometry yields a neutral value instead of an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Geometry kernel.
//!
//! All coordinates are normalized image coordinates with `y` growing
//! downward. Angles are in degrees.

use std::collections::VecDeque;
use std::f64::consts::PI;

use pierre_motion_core::models::{BodyLandmark, BodySide, Frame, Landmark};

const DEGREES_PER_RADIAN: f64 = 180.0 / PI;

/// Angle at vertex `b` between rays `b->a` and `b->c`, folded into `[0, 180]`
///
/// Coincident points produce `0`.
#[must_use]
pub fn angle(a: &Landmark, b: &Landmark, c: &Landmark) -> f64 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let degrees = (radians * DEGREES_PER_RADIAN).abs();
    if degrees > 180.0 {
        360.0 - degrees
    } else {
        degrees
    }
}

/// Euclidean distance in normalized image space
#[must_use]
pub fn distance(a: &Landmark, b: &Landmark) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Slope of the line `a->b` against the horizontal, clockwise positive
#[must_use]
pub fn line_angle(a: &Landmark, b: &Landmark) -> f64 {
    (b.y - a.y).atan2(b.x - a.x) * DEGREES_PER_RADIAN
}

/// Signed deviation of the segment `top->bottom` from true vertical
///
/// `0` when `bottom` is straight below `top`; positive when `bottom` lies to
/// the right of `top`.
#[must_use]
pub fn vertical_angle(top: &Landmark, bottom: &Landmark) -> f64 {
    (bottom.x - top.x).atan2(bottom.y - top.y) * DEGREES_PER_RADIAN
}

/// Horizontal distance between two points
#[must_use]
pub fn horizontal_spread(a: &Landmark, b: &Landmark) -> f64 {
    (a.x - b.x).abs()
}

/// Height difference of two points as a percentage of `body_height`
///
/// Returns `0` for a zero body height.
#[must_use]
pub fn asymmetry_pct(left: &Landmark, right: &Landmark, body_height: f64) -> f64 {
    if body_height.abs() < f64::EPSILON {
        return 0.0;
    }
    (left.y - right.y).abs() / body_height * 100.0
}

/// Mean visibility over a subset of body parts, `0` for an empty subset
///
/// A non-finite visibility counts as fully occluded.
#[must_use]
pub fn avg_visibility(frame: &Frame, parts: &[BodyLandmark]) -> f64 {
    average_iter(
        parts.iter().map(|part| {
            let visibility = frame[*part].visibility;
            if visibility.is_finite() {
                visibility
            } else {
                0.0
            }
        }),
        parts.len(),
    )
}

/// Progress of `current` from `extended` toward `contracted`, in `[0, 100]`
///
/// Returns `0` when the two references coincide.
#[must_use]
pub fn rom_pct(current: f64, extended: f64, contracted: f64) -> f64 {
    let total_range = (contracted - extended).abs();
    if total_range < f64::EPSILON {
        return 0.0;
    }
    clamp((current - extended).abs() / total_range * 100.0, 0.0, 100.0)
}

/// Arithmetic mean, `0` for an empty slice
#[must_use]
pub fn average(values: &[f64]) -> f64 {
    average_iter(values.iter().copied(), values.len())
}

fn average_iter(values: impl Iterator<Item = f64>, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}

/// Clamp `value` into `[min, max]`
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Absolute change between two consecutive angle readings
#[must_use]
pub fn angle_change(current: f64, previous: f64) -> f64 {
    (current - previous).abs()
}

/// Push `value` into `history`, trim it to `window` entries and return the mean
pub fn smooth(history: &mut VecDeque<f64>, value: f64, window: usize) -> f64 {
    history.push_back(value);
    while history.len() > window.max(1) {
        history.pop_front();
    }
    average_iter(history.iter().copied(), history.len())
}

/// Whichever of two body parts is more visible; the left part wins ties
#[must_use]
pub fn pick_visible_side(frame: &Frame, left: BodyLandmark, right: BodyLandmark) -> BodyLandmark {
    if frame[left].visibility >= frame[right].visibility {
        left
    } else {
        right
    }
}

/// Side whose `joint` is more visible; the left side wins ties
#[must_use]
pub fn visible_side(frame: &Frame, joint: fn(BodySide) -> BodyLandmark) -> BodySide {
    if pick_visible_side(frame, joint(BodySide::Left), joint(BodySide::Right))
        == joint(BodySide::Left)
    {
        BodySide::Left
    } else {
        BodySide::Right
    }
}

/// Bounded moving-average window owned by one signal
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingBuffer {
    history: VecDeque<f64>,
    window: usize,
}

impl SmoothingBuffer {
    /// Empty buffer averaging over `window` samples
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            history: VecDeque::with_capacity(window + 1),
            window,
        }
    }

    /// Add a sample and return the smoothed value
    pub fn push(&mut self, value: f64) -> f64 {
        smooth(&mut self.history, value, self.window)
    }

    /// Number of samples currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no sample has been pushed yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Configured window size
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_angle_collinear_and_perpendicular() {
        let a = Landmark::at(0.0, 0.0);
        let b = Landmark::at(0.5, 0.5);
        let c = Landmark::at(1.0, 1.0);
        assert!(close(angle(&a, &b, &c), 180.0));

        let a = Landmark::at(0.5, 0.0);
        let c = Landmark::at(1.0, 0.5);
        assert!(close(angle(&a, &b, &c), 90.0));
    }

    #[test]
    fn test_angle_folds_reflex_angles() {
        let vertex = Landmark::at(0.5, 0.5);
        let a = Landmark::at(0.4, 0.9);
        let c = Landmark::at(0.6, 0.9);
        let forward = angle(&a, &vertex, &c);
        let backward = angle(&c, &vertex, &a);
        assert!(close(forward, backward));
        assert!(forward < 180.0);
    }

    #[test]
    fn test_angle_with_coincident_points_is_zero() {
        let p = Landmark::at(0.3, 0.3);
        assert!(close(angle(&p, &p, &p), 0.0));
    }

    #[test]
    fn test_vertical_angle_sign() {
        let shoulder = Landmark::at(0.5, 0.3);
        assert!(close(vertical_angle(&shoulder, &Landmark::at(0.5, 0.6)), 0.0));
        assert!(vertical_angle(&shoulder, &Landmark::at(0.6, 0.6)) > 0.0);
        assert!(vertical_angle(&shoulder, &Landmark::at(0.4, 0.6)) < 0.0);
        assert!(close(
            vertical_angle(&shoulder, &Landmark::at(0.8, 0.6)),
            45.0
        ));
    }

    #[test]
    fn test_distance_and_line_angle() {
        let a = Landmark::at(0.0, 0.0);
        let b = Landmark::at(0.3, 0.4);
        assert!(close(distance(&a, &b), 0.5));
        assert!(close(line_angle(&a, &Landmark::at(1.0, 0.0)), 0.0));
        assert!(close(line_angle(&a, &Landmark::at(0.0, 1.0)), 90.0));
    }

    #[test]
    fn test_asymmetry_guards_zero_height() {
        let left = Landmark::at(0.3, 0.50);
        let right = Landmark::at(0.7, 0.55);
        assert!(close(asymmetry_pct(&left, &right, 0.0), 0.0));
        assert!(close(asymmetry_pct(&left, &right, 0.25), 20.0));
        assert!(close(horizontal_spread(&left, &right), 0.4));
    }

    #[test]
    fn test_rom_pct_clamps_and_guards() {
        assert!(close(rom_pct(0.5, 0.2, 0.2), 0.0));
        assert!(close(rom_pct(0.35, 0.2, 0.5), 50.0));
        assert!(close(rom_pct(0.9, 0.2, 0.5), 100.0));
        assert!(close(rom_pct(0.2, 0.5, 0.2), 100.0));
    }

    #[test]
    fn test_smoothing_window_is_bounded() {
        let mut buffer = SmoothingBuffer::new(3);
        assert!(buffer.is_empty());
        assert!(close(buffer.push(3.0), 3.0));
        assert!(close(buffer.push(6.0), 4.5));
        assert!(close(buffer.push(9.0), 6.0));
        assert!(close(buffer.push(12.0), 9.0));
        for _ in 0..100 {
            buffer.push(1.0);
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.window(), 3);
    }

    #[test]
    fn test_average_and_angle_change() {
        assert!(close(average(&[]), 0.0));
        assert!(close(average(&[1.0, 2.0, 6.0]), 3.0));
        assert!(close(angle_change(95.0, 100.0), 5.0));
        assert!(close(clamp(120.0, 0.0, 100.0), 100.0));
    }

    #[test]
    fn test_pick_visible_side_prefers_left_on_ties() {
        let frame = Frame::filled(Landmark::at(0.5, 0.5));
        assert_eq!(
            pick_visible_side(&frame, BodyLandmark::LeftKnee, BodyLandmark::RightKnee),
            BodyLandmark::LeftKnee
        );

        let frame = frame.with_landmark(
            BodyLandmark::RightKnee,
            Landmark::at(0.5, 0.5).with_visibility(1.0),
        );
        let frame = frame.with_landmark(
            BodyLandmark::LeftKnee,
            Landmark::at(0.5, 0.5).with_visibility(0.4),
        );
        assert_eq!(visible_side(&frame, BodySide::knee), BodySide::Right);
    }

    #[test]
    fn test_avg_visibility_over_subset() {
        let frame = Frame::filled(Landmark::at(0.5, 0.5).with_visibility(0.9))
            .with_landmark(
                BodyLandmark::LeftHip,
                Landmark::at(0.5, 0.5).with_visibility(0.3),
            );
        let avg = avg_visibility(&frame, &[BodyLandmark::LeftHip, BodyLandmark::RightHip]);
        assert!(close(avg, 0.6));
        assert!(close(avg_visibility(&frame, &[]), 0.0));
    }

    #[test]
    fn test_avg_visibility_treats_nan_as_occluded() {
        let frame = Frame::filled(Landmark::at(0.5, 0.5))
            .with_landmark(
                BodyLandmark::LeftHip,
                Landmark::at(0.5, 0.5).with_visibility(f64::NAN),
            );
        let avg = avg_visibility(&frame, &[BodyLandmark::LeftHip, BodyLandmark::RightHip]);
        assert!(close(avg, 0.5));
    }
}
