//! Locator configuration and resolution outcomes

use std::time::Duration;

use screenflow_core_types::Point;
use serde::{Deserialize, Serialize};

/// Policy for one zone resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Corrective scrolls allowed after the initial miss
    pub scroll_attempts: u32,

    /// Signed scroll delta per nudge; positive scrolls up
    pub scroll_amount: i32,

    /// Where to aim when every attempt misses
    pub fallback_point: Point,

    /// Settle pause after each scroll before re-capturing
    pub settle: Duration,

    /// Minimum detection confidence retained at ingestion
    pub confidence_threshold: f32,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            scroll_attempts: 2,
            scroll_amount: 600,
            fallback_point: Point::new(1300, 1100),
            settle: Duration::from_millis(400),
            confidence_threshold: 0.6,
        }
    }
}

/// Where the next action will land, and how much to trust it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// A matching detection was found; `point` is its center
    Matched { point: Point, confidence: f32 },

    /// Nothing matched after all nudges; the configured fixed point
    Fallback { point: Point },
}

impl Resolution {
    pub fn point(&self) -> Point {
        match self {
            Resolution::Matched { point, .. } | Resolution::Fallback { point } => *point,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolution::Fallback { .. })
    }
}
