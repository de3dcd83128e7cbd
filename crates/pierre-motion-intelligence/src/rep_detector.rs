// ABOUTME: Rep detector recognising full phase cycles with a minimum-duration debounce
// ABOUTME: Tracks rep timing and the per-rep extrema that feed completion scoring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::phase::PhaseCycle;

/// What a phase update meant for rep counting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepEvent {
    /// No cycle boundary crossed
    None,
    /// The subject left the initial phase; a new rep began
    Started,
    /// A full cycle closed and was counted
    Completed {
        /// Time since the rep started, when its start was observed
        tempo_ms: Option<f64>,
    },
    /// A full cycle closed too soon after the previous rep and was ignored
    Debounced,
}

/// Extrema accumulated while the subject is in the active half of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepAccumulators {
    /// Smallest smoothed knee angle reached
    pub deepest_knee_angle: f64,
    /// Largest torso deviation from the calibrated baseline
    pub max_torso_swing: f64,
    /// Largest range of motion reached, unknown before calibration
    pub max_rom_pct: Option<f64>,
    /// Smallest elbow angle reached
    pub min_elbow_angle: f64,
}

impl Default for RepAccumulators {
    fn default() -> Self {
        Self {
            deepest_knee_angle: 180.0,
            max_torso_swing: 0.0,
            max_rom_pct: None,
            min_elbow_angle: 180.0,
        }
    }
}

impl RepAccumulators {
    /// Record a knee-angle sample
    pub fn record_knee_angle(&mut self, angle: f64) {
        self.deepest_knee_angle = self.deepest_knee_angle.min(angle);
    }

    /// Record a torso swing sample
    pub fn record_torso_swing(&mut self, swing: f64) {
        self.max_torso_swing = self.max_torso_swing.max(swing);
    }

    /// Record a range-of-motion sample
    pub fn record_rom(&mut self, rom_pct: f64) {
        self.max_rom_pct = Some(self.max_rom_pct.map_or(rom_pct, |max| max.max(rom_pct)));
    }

    /// Record an elbow-angle sample
    pub fn record_elbow_angle(&mut self, angle: f64) {
        self.min_elbow_angle = self.min_elbow_angle.min(angle);
    }
}

/// Counts full cycles of a phase machine
#[derive(Debug, Clone, PartialEq)]
pub struct RepDetector<P: PhaseCycle> {
    phase: P,
    rep_count: u32,
    rep_start_ms: Option<f64>,
    last_rep_ms: Option<f64>,
    min_rep_duration_ms: f64,
    accumulators: RepAccumulators,
}

impl<P: PhaseCycle> RepDetector<P> {
    /// Detector sitting in the machine's initial phase
    #[must_use]
    pub fn new(min_rep_duration_ms: f64) -> Self {
        Self {
            phase: P::INITIAL,
            rep_count: 0,
            rep_start_ms: None,
            last_rep_ms: None,
            min_rep_duration_ms,
            accumulators: RepAccumulators::default(),
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> P {
        self.phase
    }

    /// Reps counted so far
    #[must_use]
    pub const fn rep_count(&self) -> u32 {
        self.rep_count
    }

    /// Extrema of the rep in progress (or the one just completed)
    #[must_use]
    pub const fn accumulators(&self) -> &RepAccumulators {
        &self.accumulators
    }

    /// Mutable extrema, updated by the session while the phase is active
    pub fn accumulators_mut(&mut self) -> &mut RepAccumulators {
        &mut self.accumulators
    }

    /// Move the machine to `next` at `timestamp_ms`
    pub fn advance(&mut self, next: P, timestamp_ms: f64) -> RepEvent {
        let previous = self.phase;
        self.phase = next;

        if previous == next {
            return RepEvent::None;
        }

        if previous == P::INITIAL {
            self.rep_start_ms = Some(timestamp_ms);
            self.accumulators = RepAccumulators::default();
            return RepEvent::Started;
        }

        if previous != P::PENULTIMATE || next != P::INITIAL {
            return RepEvent::None;
        }

        let debounced = self
            .last_rep_ms
            .is_some_and(|last| timestamp_ms - last < self.min_rep_duration_ms);
        if debounced {
            return RepEvent::Debounced;
        }

        self.rep_count += 1;
        self.last_rep_ms = Some(timestamp_ms);
        RepEvent::Completed {
            tempo_ms: self.rep_start_ms.map(|start| timestamp_ms - start),
        }
    }
}
