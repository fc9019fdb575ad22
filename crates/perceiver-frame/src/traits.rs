//! Collaborator traits consumed by the polling layers

use async_trait::async_trait;
use screenflow_core_types::CaptureRegion;

use crate::errors::{CaptureError, DetectError};
use crate::models::{Detection, Frame};

/// Produces a timestamped image of a fixed region on demand.
///
/// Must be deterministic in `region`; non-blocking beyond normal I/O
/// latency.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn capture(&self, region: CaptureRegion) -> Result<Frame, CaptureError>;
}

/// Labeled-region detector of unknown latency and imperfect recall.
///
/// Returns raw detections unfiltered; callers decide the confidence
/// threshold via [`crate::DetectionSet::ingest`]. An empty list is a valid
/// outcome meaning "nothing recognized".
#[async_trait]
pub trait RegionDetector: Send + Sync {
    async fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, DetectError>;
}
