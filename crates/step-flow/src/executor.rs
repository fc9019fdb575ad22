//! The step state machine

use std::sync::Arc;

use action_driver::{Actuator, Pacing, RunCtx};
use perceiver_frame::{FrameSource, RegionDetector};
use poll_trace::PollRecorder;
use ready_gate::{GateOutcome, PollConfig, ReadinessGate};
use tracing::{debug, info, warn};
use zone_locator::{LocatorConfig, Resolution, ZoneLocator};

use crate::types::{OutcomeReason, Step, StepOutcome, StepState};

/// Default label of the zone that receives the payload.
pub const INPUT_ZONE_LABEL: &str = "input_zone";

/// Runs one step to a terminal state. Steps execute strictly sequentially
/// against the single actuator/detector pair; nothing is shared between
/// two invocations beyond the collaborators themselves.
pub struct StepExecutor {
    gate: ReadinessGate,
    locator: ZoneLocator,
    actuator: Arc<dyn Actuator>,
    zone_label: String,
    locator_cfg: LocatorConfig,
    pacing: Pacing,
}

impl StepExecutor {
    pub fn new(
        frames: Arc<dyn FrameSource>,
        detector: Arc<dyn RegionDetector>,
        actuator: Arc<dyn Actuator>,
        recorder: Arc<dyn PollRecorder>,
    ) -> Self {
        let gate = ReadinessGate::new(frames.clone(), detector.clone(), recorder.clone());
        let locator = ZoneLocator::new(frames, detector, actuator.clone(), recorder);
        Self {
            gate,
            locator,
            actuator,
            zone_label: INPUT_ZONE_LABEL.to_string(),
            locator_cfg: LocatorConfig::default(),
            pacing: Pacing::default(),
        }
    }

    pub fn with_zone_label(mut self, zone_label: impl Into<String>) -> Self {
        self.zone_label = zone_label.into();
        self
    }

    pub fn with_locator_config(mut self, locator_cfg: LocatorConfig) -> Self {
        self.locator_cfg = locator_cfg;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Drive the step through the state machine and return its outcome.
    /// Never returns early with a collaborator fault; every exit is a
    /// typed outcome.
    pub async fn run(&self, ctx: &RunCtx, step: &Step, cfg: &PollConfig) -> StepOutcome {
        info!("step {} starting (run {})", step.name, ctx.run_id);

        let mut state = StepState::AwaitingReady;
        let mut target: Option<Resolution> = None;

        loop {
            match state {
                StepState::AwaitingReady => {
                    debug!("step {}: awaiting ready", step.name);
                    match self.gate.await_ready(ctx, &step.name, cfg).await {
                        outcome @ (GateOutcome::Detected { .. } | GateOutcome::Assumed { .. }) => {
                            debug!("step {}: ready ({:?})", step.name, outcome);
                            state = StepState::LocatingInput;
                        }
                        GateOutcome::TimedOut { polls } => {
                            warn!(
                                "step {}: never became ready ({} polls)",
                                step.name, polls
                            );
                            return self.finish(step, OutcomeReason::InitialTimeout);
                        }
                        GateOutcome::Cancelled => {
                            return self.finish(step, OutcomeReason::Cancelled);
                        }
                    }
                }

                StepState::LocatingInput => {
                    target = Some(
                        self.locator
                            .resolve(ctx, &step.name, &self.zone_label, &self.locator_cfg)
                            .await,
                    );
                    if ctx.is_cancelled() {
                        return self.finish(step, OutcomeReason::Cancelled);
                    }
                    state = StepState::Submitting;
                }

                StepState::Submitting => {
                    // Fire-and-forget by design: nothing is read back here.
                    // The sequence always runs to completion, abort or not,
                    // so the interface is never left focused but half-fed;
                    // abort is honored at the next poll boundary.
                    let target = target.take().unwrap_or(Resolution::Fallback {
                        point: self.locator_cfg.fallback_point,
                    });
                    let point = target.point();
                    if target.is_fallback() {
                        warn!("step {}: submitting at fallback point {}", step.name, point);
                    } else {
                        info!("step {}: submitting at {}", step.name, point);
                    }
                    self.actuator.move_to(point).await;
                    self.actuator.click().await;
                    tokio::time::sleep(self.pacing.after_click).await;
                    self.actuator.submit_text(&step.payload).await;
                    tokio::time::sleep(self.pacing.after_text).await;
                    self.actuator.commit().await;
                    state = StepState::AwaitingCompletion;
                }

                StepState::AwaitingCompletion => {
                    debug!("step {}: awaiting completion", step.name);
                    // Same target labels as the initial wait: the interface
                    // returning to ready is the only completion signal.
                    return match self.gate.await_ready(ctx, &step.name, cfg).await {
                        GateOutcome::Detected { .. } => {
                            self.finish(step, OutcomeReason::Completed)
                        }
                        GateOutcome::Assumed { polls } => {
                            warn!(
                                "step {}: completion assumed after {} polls, not observed",
                                step.name, polls
                            );
                            self.finish(step, OutcomeReason::AssumedComplete)
                        }
                        GateOutcome::TimedOut { polls } => {
                            warn!(
                                "step {}: submitted but completion never observed ({} polls)",
                                step.name, polls
                            );
                            self.finish(step, OutcomeReason::CompletionTimeout)
                        }
                        GateOutcome::Cancelled => self.finish(step, OutcomeReason::Cancelled),
                    };
                }

                // Terminal states are returned directly above.
                StepState::Done | StepState::Failed => unreachable!("terminal state re-entered"),
            }
        }
    }

    fn finish(&self, step: &Step, reason: OutcomeReason) -> StepOutcome {
        let outcome = StepOutcome::from(reason);
        if outcome.succeeded {
            info!("step {} done: {:?}", step.name, reason);
        } else {
            warn!("step {} failed: {:?}", step.name, reason);
        }
        outcome
    }
}
