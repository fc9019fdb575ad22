//! Zone resolution with corrective nudges

use std::sync::Arc;

use action_driver::{Actuator, RunCtx};
use perceiver_frame::{Detection, DetectionSet, FrameSource, RegionDetector};
use poll_trace::{PollRecord, PollRecorder};
use tracing::{debug, info, warn};

use crate::types::{LocatorConfig, Resolution};

/// Pick the target zone among `label` detections: the one with the
/// greatest vertical coordinate, i.e. closest to the bottom of the frame.
/// The active input control is the lowest-positioned matching region on
/// screen. Returns `None` iff no detection carries the label; for equal
/// heights the later emission wins.
pub fn lowest_detection<'a>(set: &'a DetectionSet, label: &str) -> Option<&'a Detection> {
    set.get(label).iter().max_by_key(|det| det.center.y)
}

/// Locates a named zone from fresh observations, nudging the interface
/// with bounded corrective scrolls when the zone is not visible, then
/// falling back to a fixed coordinate.
pub struct ZoneLocator {
    frames: Arc<dyn FrameSource>,
    detector: Arc<dyn RegionDetector>,
    actuator: Arc<dyn Actuator>,
    recorder: Arc<dyn PollRecorder>,
}

impl ZoneLocator {
    pub fn new(
        frames: Arc<dyn FrameSource>,
        detector: Arc<dyn RegionDetector>,
        actuator: Arc<dyn Actuator>,
        recorder: Arc<dyn PollRecorder>,
    ) -> Self {
        Self {
            frames,
            detector,
            actuator,
            recorder,
        }
    }

    /// Resolve `zone_label` to a point. Never fails; the outcome only
    /// affects where the next action lands.
    pub async fn resolve(
        &self,
        ctx: &RunCtx,
        step: &str,
        zone_label: &str,
        cfg: &LocatorConfig,
    ) -> Resolution {
        for attempt in 0..=cfg.scroll_attempts {
            if let Some(set) = self.observe(ctx, step, attempt + 1, cfg).await {
                if let Some(det) = lowest_detection(&set, zone_label) {
                    info!(
                        "{}: {} at {} ({:.2}, attempt {})",
                        step,
                        zone_label,
                        det.center,
                        det.confidence,
                        attempt + 1
                    );
                    return Resolution::Matched {
                        point: det.center,
                        confidence: det.confidence,
                    };
                }
            }

            if attempt < cfg.scroll_attempts {
                warn!(
                    "{}: {} not detected, scrolling and retrying ({}/{})",
                    step,
                    zone_label,
                    attempt + 1,
                    cfg.scroll_attempts
                );
                self.actuator.scroll(cfg.scroll_amount).await;
                if !ctx.idle(cfg.settle).await {
                    debug!("{}: aborted mid-nudge, falling back", step);
                    break;
                }
            }
        }

        warn!(
            "{}: {} still not detected after {} scroll retries, using fallback {}",
            step, zone_label, cfg.scroll_attempts, cfg.fallback_point
        );
        Resolution::Fallback {
            point: cfg.fallback_point,
        }
    }

    async fn observe(
        &self,
        ctx: &RunCtx,
        step: &str,
        seq: u32,
        cfg: &LocatorConfig,
    ) -> Option<DetectionSet> {
        let frame = match self.frames.capture(ctx.region).await {
            Ok(frame) => frame,
            Err(err) => {
                warn!("{} locate attempt {}: capture failed: {}", step, seq, err);
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
                warn!("{} locate attempt {}: detection failed: {}", step, seq, err);
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

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use perceiver_frame::{CaptureError, DetectError, Frame};
    use poll_trace::NullRecorder;
    use screenflow_core_types::{CaptureRegion, Extent, Point};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn zone(y: i32, conf: f32) -> Detection {
        Detection::new("input_zone", Point::new(640, y), Extent::new(300, 60), conf)
    }

    #[test]
    fn test_lowest_detection_picks_bottom_most() {
        let set = DetectionSet::ingest(vec![zone(400, 0.9), zone(900, 0.7)], 0.5);
        let picked = lowest_detection(&set, "input_zone").unwrap();
        assert_eq!(picked.center, Point::new(640, 900));
    }

    #[test]
    fn test_lowest_detection_absent_label() {
        let set = DetectionSet::ingest(vec![zone(400, 0.9)], 0.5);
        assert!(lowest_detection(&set, "send_button").is_none());
        assert!(lowest_detection(&DetectionSet::default(), "input_zone").is_none());
    }

    #[test]
    fn test_lowest_detection_is_deterministic() {
        let set = DetectionSet::ingest(vec![zone(100, 0.6), zone(500, 0.8), zone(250, 0.99)], 0.5);
        for _ in 0..10 {
            assert_eq!(
                lowest_detection(&set, "input_zone").unwrap().center.y,
                500
            );
        }
    }

    struct StubFrames {
        fail_first: Mutex<bool>,
    }

    #[async_trait]
    impl FrameSource for StubFrames {
        async fn capture(&self, region: CaptureRegion) -> Result<Frame, CaptureError> {
            let mut fail = self.fail_first.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(CaptureError::Io("grab failed".into()));
            }
            Ok(Frame::new(Vec::new(), region.width, region.height, region))
        }
    }

    struct ScriptedDetector {
        script: Mutex<VecDeque<Result<Vec<Detection>, DetectError>>>,
    }

    #[async_trait]
    impl RegionDetector for ScriptedDetector {
        async fn detect(&self, _frame: &Frame) -> Result<Vec<Detection>, DetectError> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    #[derive(Default)]
    struct RecordingActuator {
        scrolls: Mutex<Vec<i32>>,
    }

    #[async_trait]
    impl Actuator for RecordingActuator {
        async fn move_to(&self, _point: Point) {}
        async fn click(&self) {}
        async fn scroll(&self, delta: i32) {
            self.scrolls.lock().unwrap().push(delta);
        }
        async fn submit_text(&self, _text: &str) {}
        async fn commit(&self) {}
    }

    fn locator(
        frames: StubFrames,
        script: Vec<Result<Vec<Detection>, DetectError>>,
        actuator: Arc<RecordingActuator>,
    ) -> ZoneLocator {
        ZoneLocator::new(
            Arc::new(frames),
            Arc::new(ScriptedDetector {
                script: Mutex::new(script.into()),
            }),
            actuator,
            Arc::new(NullRecorder),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_on_first_attempt_never_scrolls() {
        let actuator = Arc::new(RecordingActuator::default());
        let locator = locator(
            StubFrames {
                fail_first: Mutex::new(false),
            },
            vec![Ok(vec![zone(400, 0.9), zone(900, 0.8)])],
            actuator.clone(),
        );
        let ctx = RunCtx::new(CaptureRegion::default());

        let resolution = locator
            .resolve(&ctx, "step", "input_zone", &LocatorConfig::default())
            .await;

        assert_eq!(
            resolution,
            Resolution::Matched {
                point: Point::new(640, 900),
                confidence: 0.8
            }
        );
        assert!(actuator.scrolls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_after_exhausted_nudges() {
        let actuator = Arc::new(RecordingActuator::default());
        let locator = locator(
            StubFrames {
                fail_first: Mutex::new(false),
            },
            Vec::new(),
            actuator.clone(),
        );
        let ctx = RunCtx::new(CaptureRegion::default());
        let cfg = LocatorConfig::default();

        let resolution = locator.resolve(&ctx, "step", "input_zone", &cfg).await;

        assert!(resolution.is_fallback());
        assert_eq!(resolution.point(), cfg.fallback_point);
        assert_eq!(*actuator.scrolls.lock().unwrap(), vec![600, 600]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_after_one_nudge() {
        let actuator = Arc::new(RecordingActuator::default());
        let locator = locator(
            StubFrames {
                fail_first: Mutex::new(false),
            },
            vec![Ok(Vec::new()), Ok(vec![zone(880, 0.75)])],
            actuator.clone(),
        );
        let ctx = RunCtx::new(CaptureRegion::default());

        let resolution = locator
            .resolve(&ctx, "step", "input_zone", &LocatorConfig::default())
            .await;

        assert!(!resolution.is_fallback());
        assert_eq!(resolution.point(), Point::new(640, 880));
        assert_eq!(actuator.scrolls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_error_counts_as_missed_attempt() {
        let actuator = Arc::new(RecordingActuator::default());
        let locator = locator(
            StubFrames {
                fail_first: Mutex::new(true),
            },
            vec![Ok(vec![zone(700, 0.9)])],
            actuator.clone(),
        );
        let ctx = RunCtx::new(CaptureRegion::default());

        // Attempt 1 loses its frame, attempt 2 (after one nudge) matches
        let resolution = locator
            .resolve(&ctx, "step", "input_zone", &LocatorConfig::default())
            .await;

        assert_eq!(resolution.point(), Point::new(640, 700));
        assert_eq!(actuator.scrolls.lock().unwrap().len(), 1);
    }
}
