//! The readiness poll loop

use std::sync::Arc;

use action_driver::RunCtx;
use perceiver_frame::{DetectionSet, FrameSource, RegionDetector};
use poll_trace::{PollRecord, PollRecorder};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::types::{GateOutcome, PollConfig};

/// Polls frame source + detector until a target label shows up, the soft
/// timeout converts silence into assumed readiness, or the hard timeout
/// ends the wait. Every poll cycle - hit, miss, or collaborator fault - is
/// handed to the recorder before the next transition is evaluated.
pub struct ReadinessGate {
    frames: Arc<dyn FrameSource>,
    detector: Arc<dyn RegionDetector>,
    recorder: Arc<dyn PollRecorder>,
}

impl ReadinessGate {
    pub fn new(
        frames: Arc<dyn FrameSource>,
        detector: Arc<dyn RegionDetector>,
        recorder: Arc<dyn PollRecorder>,
    ) -> Self {
        Self {
            frames,
            detector,
            recorder,
        }
    }

    /// Wait until the interface looks ready under `cfg`. `step` names the
    /// unit of work for artifact pathing.
    ///
    /// Abort is honored at the poll boundary: a cancellation observed
    /// mid-cooldown after a detection still reports the detection, since
    /// the observation already happened.
    pub async fn await_ready(&self, ctx: &RunCtx, step: &str, cfg: &PollConfig) -> GateOutcome {
        let assume_after = cfg.effective_soft_timeout();
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            if ctx.is_cancelled() {
                info!("wait for {} aborted after {} polls", step, polls);
                return GateOutcome::Cancelled;
            }

            polls += 1;
            let observation = self.observe(ctx, step, polls, cfg).await;

            if let Some(set) = &observation {
                if set.contains_any(&cfg.target_labels) {
                    // best_of is Some whenever contains_any holds
                    let (label, confidence) = set
                        .best_of(&cfg.target_labels)
                        .map(|d| (d.label.clone(), d.confidence))
                        .unwrap_or_default();
                    info!(
                        "{} ready: {} at {:.2} (poll {})",
                        step, label, confidence, polls
                    );
                    ctx.idle(cfg.cooldown).await;
                    return GateOutcome::Detected {
                        label,
                        confidence,
                        polls,
                    };
                }
            }

            let elapsed = started.elapsed();

            // Assumed readiness is derived only from a successful empty
            // observation; an errored poll keeps the clock running but
            // cannot count as evidence of silence.
            if observation.is_some() {
                if let Some(soft) = assume_after {
                    if elapsed >= soft {
                        warn!(
                            "{}: no target label after {:?}, assuming ready (poll {})",
                            step, soft, polls
                        );
                        ctx.idle(cfg.cooldown).await;
                        return GateOutcome::Assumed { polls };
                    }
                }
            }

            if elapsed >= cfg.hard_timeout {
                warn!(
                    "{}: hard timeout after {:?} and {} polls",
                    step, cfg.hard_timeout, polls
                );
                return GateOutcome::TimedOut { polls };
            }

            debug!("{} not ready yet, waiting {:?}", step, cfg.poll_interval);
            if !ctx.idle(cfg.poll_interval).await {
                info!("wait for {} aborted during poll sleep", step);
                return GateOutcome::Cancelled;
            }
        }
    }

    /// One capture + detect cycle. Collaborator faults are logged,
    /// recorded, and returned as `None` so the caller folds them into the
    /// timeout clock instead of escalating.
    async fn observe(
        &self,
        ctx: &RunCtx,
        step: &str,
        seq: u32,
        cfg: &PollConfig,
    ) -> Option<DetectionSet> {
        let frame = match self.frames.capture(ctx.region).await {
            Ok(frame) => frame,
            Err(err) => {
                warn!("{} poll {}: capture failed: {}", step, seq, err);
                self.recorder
                    .record(step, seq, PollRecord::CaptureFailed { error: &err });
                return None;
            }
        };

        match self.detector.detect(&frame).await {
            Ok(raw) => {
                let set = DetectionSet::ingest(raw, cfg.confidence_threshold);
                self.recorder.record(
                    step,
                    seq,
                    PollRecord::Observed {
                        frame: &frame,
                        detections: &set,
                    },
                );
                Some(set)
            }
            Err(err) => {
                warn!("{} poll {}: detection failed: {}", step, seq, err);
                self.recorder.record(
                    step,
                    seq,
                    PollRecord::DetectFailed {
                        frame: &frame,
                        error: &err,
                    },
                );
                None
            }
        }
    }
}
