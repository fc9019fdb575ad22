//! Convenience wiring for the common embedding

use std::path::PathBuf;
use std::sync::Arc;

use action_driver::{Actuator, Pacing, RunCtx};
use perceiver_frame::{FrameSource, RegionDetector};
use poll_trace::{NullRecorder, PollRecorder, TraceWriter};
use ready_gate::PollConfig;
use screenflow_core_types::CaptureRegion;
use step_flow::{Step, StepExecutor, StepOutcome};
use tokio_util::sync::CancellationToken;
use tracing::info;
use zone_locator::LocatorConfig;

/// Binds the three collaborator capabilities to a region and a trace sink
/// and runs steps against them, one at a time. Holds the run-level abort
/// token: [`Driver::cancel_token`] hands out a handle that terminates a
/// hung wait at the next poll boundary without killing the process.
pub struct Driver {
    frames: Arc<dyn FrameSource>,
    detector: Arc<dyn RegionDetector>,
    actuator: Arc<dyn Actuator>,
    recorder: Arc<dyn PollRecorder>,
    region: CaptureRegion,
    zone_label: String,
    locator_cfg: LocatorConfig,
    pacing: Pacing,
    cancel: CancellationToken,
}

impl Driver {
    pub fn new(
        frames: Arc<dyn FrameSource>,
        detector: Arc<dyn RegionDetector>,
        actuator: Arc<dyn Actuator>,
    ) -> Self {
        Self {
            frames,
            detector,
            actuator,
            recorder: Arc::new(NullRecorder),
            region: CaptureRegion::default(),
            zone_label: step_flow::INPUT_ZONE_LABEL.to_string(),
            locator_cfg: LocatorConfig::default(),
            pacing: Pacing::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_region(mut self, region: CaptureRegion) -> Self {
        self.region = region;
        self
    }

    /// Persist per-poll debug artifacts under `root`.
    pub fn with_trace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.recorder = Arc::new(TraceWriter::new(root));
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn PollRecorder>) -> Self {
        self.recorder = recorder;
        self
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

    /// Handle for run-level abort. Cancelling it stops every current and
    /// future wait at the next poll boundary.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run one step to a terminal outcome. Each invocation is independent:
    /// fresh run id, fresh executor state, nothing carried over.
    pub async fn run_step(&self, step: &Step, cfg: &PollConfig) -> StepOutcome {
        let ctx = RunCtx::new(self.region).with_cancel(self.cancel.child_token());
        info!("run {} for step {}", ctx.run_id, step.name);

        let executor = StepExecutor::new(
            self.frames.clone(),
            self.detector.clone(),
            self.actuator.clone(),
            self.recorder.clone(),
        )
        .with_zone_label(self.zone_label.clone())
        .with_locator_config(self.locator_cfg.clone())
        .with_pacing(self.pacing);

        executor.run(&ctx, step, cfg).await
    }
}
