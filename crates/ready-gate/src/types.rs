//! Poll configuration and gate outcomes

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Immutable per-invocation polling policy. Built once by the caller,
/// never mutated mid-run; there is no ambient default state to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Pause between observations
    pub poll_interval: Duration,

    /// Elapsed time after which lack of detection is treated as assumed
    /// readiness. `None` disables the policy (never assume).
    pub soft_timeout: Option<Duration>,

    /// Elapsed time after which the wait fails regardless of policy.
    /// Mandatory; the gate must never block indefinitely.
    pub hard_timeout: Duration,

    /// Debounce pause after a successful wait, so a just-appeared state is
    /// not immediately re-detected by the next caller.
    pub cooldown: Duration,

    /// Minimum detection confidence retained at ingestion
    pub confidence_threshold: f32,

    /// Labels whose appearance means "ready"
    pub target_labels: BTreeSet<String>,
}

impl PollConfig {
    pub fn new(target_labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            target_labels: target_labels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_soft_timeout(mut self, soft_timeout: Option<Duration>) -> Self {
        self.soft_timeout = soft_timeout;
        self
    }

    pub fn with_hard_timeout(mut self, hard_timeout: Duration) -> Self {
        self.hard_timeout = hard_timeout;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_confidence_threshold(mut self, confidence_threshold: f32) -> Self {
        self.confidence_threshold = confidence_threshold;
        self
    }

    /// The soft timeout actually in force: disabled when it would not fire
    /// strictly before the hard timeout, so the hard bound always wins a
    /// tie and a misconfigured soft timeout cannot mask a failure.
    pub fn effective_soft_timeout(&self) -> Option<Duration> {
        self.soft_timeout.filter(|soft| *soft < self.hard_timeout)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            soft_timeout: Some(Duration::from_secs(600)),
            hard_timeout: Duration::from_secs(600),
            cooldown: Duration::from_secs(10),
            confidence_threshold: 0.6,
            target_labels: ["ready_button", "start_button"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// How a readiness wait ended. Assumed readiness is deliberately a
/// distinct variant: it trades false-positive risk for forward progress
/// and must stay distinguishable from a confirmed detection in logs and
/// outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateOutcome {
    /// A target label was observed at or above the confidence threshold
    Detected {
        label: String,
        confidence: f32,
        polls: u32,
    },

    /// Nothing was observed but the soft timeout elapsed
    Assumed { polls: u32 },

    /// The hard timeout elapsed without readiness
    TimedOut { polls: u32 },

    /// The run was aborted while waiting
    Cancelled,
}

impl GateOutcome {
    /// Collapse to the caller's go/no-go decision.
    pub fn is_ready(&self) -> bool {
        matches!(self, GateOutcome::Detected { .. } | GateOutcome::Assumed { .. })
    }

    pub fn polls(&self) -> u32 {
        match self {
            GateOutcome::Detected { polls, .. }
            | GateOutcome::Assumed { polls }
            | GateOutcome::TimedOut { polls } => *polls,
            GateOutcome::Cancelled => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_flow_constants() {
        let cfg = PollConfig::default();
        assert_eq!(cfg.poll_interval, Duration::from_secs(10));
        assert_eq!(cfg.soft_timeout, Some(Duration::from_secs(600)));
        assert_eq!(cfg.hard_timeout, Duration::from_secs(600));
        assert_eq!(cfg.cooldown, Duration::from_secs(10));
        assert!((cfg.confidence_threshold - 0.6).abs() < f32::EPSILON);
        assert!(cfg.target_labels.contains("ready_button"));
        assert!(cfg.target_labels.contains("start_button"));
    }

    #[test]
    fn test_effective_soft_timeout_requires_room_before_hard() {
        let cfg = PollConfig::new(["ready"])
            .with_soft_timeout(Some(Duration::from_secs(5)))
            .with_hard_timeout(Duration::from_secs(30));
        assert_eq!(cfg.effective_soft_timeout(), Some(Duration::from_secs(5)));

        // Equal or later than the hard bound: policy is off
        let tied = cfg.clone().with_hard_timeout(Duration::from_secs(5));
        assert_eq!(tied.effective_soft_timeout(), None);

        let disabled = cfg.with_soft_timeout(None);
        assert_eq!(disabled.effective_soft_timeout(), None);
    }

    #[test]
    fn test_outcome_readiness() {
        assert!(GateOutcome::Detected {
            label: "ready".into(),
            confidence: 0.9,
            polls: 1
        }
        .is_ready());
        assert!(GateOutcome::Assumed { polls: 4 }.is_ready());
        assert!(!GateOutcome::TimedOut { polls: 4 }.is_ready());
        assert!(!GateOutcome::Cancelled.is_ready());
    }
}
