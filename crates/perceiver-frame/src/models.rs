//! Data models for frame perception

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use screenflow_core_types::{CaptureRegion, Extent, Point};
use serde::{Deserialize, Serialize};

/// One captured frame of the watched region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    /// Encoded image bytes (PNG)
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// Image dimensions
    pub width: u32,
    pub height: u32,

    /// Region this frame was grabbed from
    pub region: CaptureRegion,

    /// Capture timestamp
    pub captured_at: DateTime<Utc>,

    /// Pointer position at capture time (absolute screen coordinates),
    /// when the frame source knows it. Used only for debug overlays.
    pub pointer: Option<Point>,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, region: CaptureRegion) -> Self {
        Self {
            data,
            width,
            height,
            region,
            captured_at: Utc::now(),
            pointer: None,
        }
    }

    pub fn with_pointer(mut self, pointer: Point) -> Self {
        self.pointer = Some(pointer);
        self
    }
}

/// One labeled, confidence-scored region reported by the detector for a
/// single frame. Produced fresh each poll, never mutated, never persisted
/// as a first-class entity (only logged).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub center: Point,
    pub extent: Extent,
    pub confidence: f32,
}

impl Detection {
    pub fn new(label: impl Into<String>, center: Point, extent: Extent, confidence: f32) -> Self {
        Self {
            label: label.into(),
            center,
            extent,
            confidence,
        }
    }
}

/// Detections of one poll, grouped by label in detector emission order.
///
/// Invariant: every member's confidence is >= the threshold supplied to
/// [`DetectionSet::ingest`]. Filtering happens at ingestion, never later.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionSet {
    threshold: f32,
    by_label: BTreeMap<String, Vec<Detection>>,
}

impl DetectionSet {
    /// Build a set from raw detector output, keeping only detections at or
    /// above `threshold`. Emission order within each label is preserved.
    pub fn ingest<I>(raw: I, threshold: f32) -> Self
    where
        I: IntoIterator<Item = Detection>,
    {
        let mut by_label: BTreeMap<String, Vec<Detection>> = BTreeMap::new();
        for det in raw {
            if det.confidence < threshold {
                continue;
            }
            by_label.entry(det.label.clone()).or_default().push(det);
        }
        Self {
            threshold,
            by_label,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Detections carrying `label`, in emission order.
    pub fn get(&self, label: &str) -> &[Detection] {
        self.by_label.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total retained detections across all labels.
    pub fn len(&self) -> usize {
        self.by_label.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }

    /// True if any retained detection carries one of `labels`.
    pub fn contains_any(&self, labels: &BTreeSet<String>) -> bool {
        labels.iter().any(|l| self.by_label.contains_key(l))
    }

    /// Highest-confidence detection among `labels`, for reporting which
    /// signal actually fired.
    pub fn best_of(&self, labels: &BTreeSet<String>) -> Option<&Detection> {
        labels
            .iter()
            .flat_map(|l| self.get(l))
            .max_by(|a, b| {
                a.confidence
                    .partial_cmp(&b.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// All retained detections in label order, emission order within a label.
    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.by_label.values().flatten()
    }
}
