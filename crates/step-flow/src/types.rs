//! Step, outcome and state types

use serde::{Deserialize, Serialize};

/// One unit of work: a payload to submit once the interface is ready.
/// Owned by the caller; the executor treats it as immutable input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub payload: String,
}

impl Step {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

/// Why a step ended the way it did. The two failure timeouts are kept
/// apart because recovery differs: a step that never became ready can be
/// retried from scratch, while a completion timeout means the action may
/// have partially landed and needs inspection before any retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeReason {
    /// Completion confirmed by a target-label detection
    Completed,

    /// Completion assumed via the soft-timeout policy, not observed
    AssumedComplete,

    /// The interface never reached a ready state before submission
    InitialTimeout,

    /// The action was submitted but completion was never observed
    CompletionTimeout,

    /// The run was aborted
    Cancelled,
}

impl OutcomeReason {
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeReason::Completed | OutcomeReason::AssumedComplete)
    }
}

/// The only thing the executor returns; no partial-progress state escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub succeeded: bool,
    pub reason: OutcomeReason,
}

impl From<OutcomeReason> for StepOutcome {
    fn from(reason: OutcomeReason) -> Self {
        Self {
            succeeded: reason.is_success(),
            reason,
        }
    }
}

/// Executor states, for logging and tests. `Done`/`Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepState {
    AwaitingReady,
    LocatingInput,
    Submitting,
    AwaitingCompletion,
    Done,
    Failed,
}
