// ABOUTME: Caller-side frame gate dropping duplicate and out-of-order timestamps
// ABOUTME: Stale frames carry no new information and would double-count temporal accumulators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Verdict on one incoming frame timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// Newer than every admitted frame; analyse it
    Admit,
    /// Same timestamp as the last admitted frame
    Duplicate,
    /// Older than the last admitted frame
    OutOfOrder,
}

impl GateDecision {
    /// Whether the frame should reach the session
    #[must_use]
    pub const fn is_admitted(self) -> bool {
        matches!(self, Self::Admit)
    }
}

/// Enforces strictly increasing timestamps in front of a session
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameGate {
    last_timestamp_ms: Option<f64>,
}

impl FrameGate {
    /// Gate that admits any first frame
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_timestamp_ms: None,
        }
    }

    /// Timestamp of the last admitted frame
    #[must_use]
    pub const fn last_timestamp_ms(&self) -> Option<f64> {
        self.last_timestamp_ms
    }

    /// Decide whether a frame captured at `timestamp_ms` may be analysed
    pub fn admit(&mut self, timestamp_ms: f64) -> GateDecision {
        match self.last_timestamp_ms {
            Some(last) if timestamp_ms < last => {
                warn!(
                    timestamp_ms,
                    last_timestamp_ms = last,
                    "Dropping out-of-order frame"
                );
                GateDecision::OutOfOrder
            }
            Some(last) if (timestamp_ms - last).abs() < f64::EPSILON => {
                debug!(timestamp_ms, "Dropping duplicate frame");
                GateDecision::Duplicate
            }
            _ => {
                self.last_timestamp_ms = Some(timestamp_ms);
                GateDecision::Admit
            }
        }
    }

    /// Forget the last admitted timestamp
    pub fn reset(&mut self) {
        self.last_timestamp_ms = None;
    }
}
