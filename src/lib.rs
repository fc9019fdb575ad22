//! Screenflow: detection-gated automation against a visual interface.
//!
//! There is no API on the other side - only a screen to sample, a
//! labeled-region detector with imperfect recall, and a fire-and-forget
//! actuator. The crates in this workspace turn that into a bounded,
//! auditable state machine: poll until the interface looks ready, locate
//! the input zone, submit, and re-verify readiness as the only available
//! completion signal.
//!
//! The [`Driver`] wires caller-supplied collaborators into a ready-to-run
//! [`StepExecutor`]; everything it composes is also usable directly.

mod driver;

pub use driver::Driver;

pub use action_driver::{Actuator, Pacing, RunCtx};
pub use perceiver_frame::{
    CaptureError, DetectError, Detection, DetectionSet, Frame, FrameSource, RegionDetector,
};
pub use poll_trace::{NullRecorder, PollRecord, PollRecorder, TraceWriter};
pub use ready_gate::{GateOutcome, PollConfig, ReadinessGate};
pub use screenflow_core_types::{CaptureRegion, Extent, Point, RunId, StepId};
pub use step_flow::{
    OutcomeReason, Step, StepExecutor, StepOutcome, StepState, INPUT_ZONE_LABEL,
};
pub use zone_locator::{lowest_detection, LocatorConfig, Resolution, ZoneLocator};
