//! Recorder trait and the no-op implementation

use perceiver_frame::{CaptureError, DetectError, DetectionSet, Frame};

/// What one poll cycle produced. Errors are recorded too: a streak of
/// capture failures looks identical to a stalled interface from the
/// outside, and the trail is how the difference is diagnosed.
#[derive(Debug)]
pub enum PollRecord<'a> {
    /// Capture and detection both completed (the set may be empty)
    Observed {
        frame: &'a Frame,
        detections: &'a DetectionSet,
    },

    /// Frame capture failed; there is no image for this poll
    CaptureFailed { error: &'a CaptureError },

    /// Capture succeeded but the detector backend failed
    DetectFailed {
        frame: &'a Frame,
        error: &'a DetectError,
    },
}

/// Sink for per-poll debug artifacts.
///
/// `record` must never panic and never report failure: losing a debug
/// artifact must not abort the automation run.
pub trait PollRecorder: Send + Sync {
    fn record(&self, step: &str, seq: u32, record: PollRecord<'_>);
}

/// Discards everything. For tests and embedders that bring their own audit
/// trail.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl PollRecorder for NullRecorder {
    fn record(&self, _step: &str, _seq: u32, _record: PollRecord<'_>) {}
}
