//! Driver-level runs: full step execution, audit trail on disk, and
//! run-level abort.

use std::collections::VecDeque;
use std::fs;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use screenflow::{
    Actuator, CaptureError, CaptureRegion, DetectError, Detection, Driver, Extent, Frame,
    FrameSource, OutcomeReason, Point, PollConfig, RegionDetector, Step,
};

fn png_frame_data(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([24, 24, 24, 255]));
    let mut data = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut data), image::ImageOutputFormat::Png)
        .unwrap();
    data
}

struct PngFrames {
    data: Vec<u8>,
}

#[async_trait]
impl FrameSource for PngFrames {
    async fn capture(&self, region: CaptureRegion) -> Result<Frame, CaptureError> {
        Ok(
            Frame::new(self.data.clone(), region.width, region.height, region)
                .with_pointer(Point::new(64, 64)),
        )
    }
}

struct ScriptedDetector {
    script: Mutex<VecDeque<Result<Vec<Detection>, DetectError>>>,
    exhausted: Vec<Detection>,
}

#[async_trait]
impl RegionDetector for ScriptedDetector {
    async fn detect(&self, _frame: &Frame) -> Result<Vec<Detection>, DetectError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.exhausted.clone()))
    }
}

#[derive(Default)]
struct SilentActuator;

#[async_trait]
impl Actuator for SilentActuator {
    async fn move_to(&self, _point: Point) {}
    async fn click(&self) {}
    async fn scroll(&self, _delta: i32) {}
    async fn submit_text(&self, _text: &str) {}
    async fn commit(&self) {}
}

fn ready() -> Detection {
    Detection::new("ready", Point::new(100, 60), Extent::new(50, 24), 0.92)
}

fn input_zone() -> Detection {
    Detection::new("input_zone", Point::new(64, 110), Extent::new(80, 20), 0.81)
}

fn fast_cfg() -> PollConfig {
    PollConfig::new(["ready"])
        .with_poll_interval(Duration::from_secs(1))
        .with_soft_timeout(None)
        .with_hard_timeout(Duration::from_secs(10))
        .with_cooldown(Duration::from_millis(100))
}

#[tokio::test(start_paused = true)]
async fn step_run_leaves_an_audit_trail() {
    let trace_root = tempfile::tempdir().unwrap();
    let region = CaptureRegion::new(0, 0, 128, 128);

    let detector = ScriptedDetector {
        script: Mutex::new(VecDeque::from([
            Ok(vec![ready()]),
            Ok(vec![input_zone()]),
        ])),
        exhausted: vec![ready()],
    };
    let driver = Driver::new(
        Arc::new(PngFrames {
            data: png_frame_data(128, 128),
        }),
        Arc::new(detector),
        Arc::new(SilentActuator),
    )
    .with_region(region)
    .with_trace_root(trace_root.path());

    let step = Step::new("outline_writer", "draft the outline");
    let outcome = driver.run_step(&step, &fast_cfg()).await;

    assert!(outcome.succeeded);
    assert_eq!(outcome.reason, OutcomeReason::Completed);

    // One folder per step; every poll left a raw frame, an annotated frame
    // and a structured dump.
    let step_dir = trace_root.path().join("outline_writer");
    let names: Vec<String> = fs::read_dir(&step_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();

    let raw = names
        .iter()
        .filter(|n| n.ends_with(".png") && !n.ends_with("_ann.png"))
        .count();
    let annotated = names.iter().filter(|n| n.ends_with("_ann.png")).count();
    let dumps: Vec<&String> = names
        .iter()
        .filter(|n| n.ends_with("_dets.json"))
        .collect();

    // Three observations: initial gate, zone locate, completion gate
    assert_eq!(raw, 3, "raw frames: {names:?}");
    assert_eq!(annotated, 3, "annotated frames: {names:?}");
    assert_eq!(dumps.len(), 3, "dumps: {names:?}");

    for dump in dumps {
        let parsed: serde_json::Value =
            serde_json::from_slice(&fs::read(step_dir.join(dump)).unwrap()).unwrap();
        assert_eq!(parsed["kind"], "observed");
        assert!(parsed["detections"]["threshold"].as_f64().unwrap() > 0.0);
    }
}

#[tokio::test(start_paused = true)]
async fn cancel_token_aborts_a_hung_wait() {
    let detector = ScriptedDetector {
        script: Mutex::new(VecDeque::new()),
        exhausted: Vec::new(),
    };
    let driver = Driver::new(
        Arc::new(PngFrames {
            data: png_frame_data(32, 32),
        }),
        Arc::new(detector),
        Arc::new(SilentActuator),
    );

    let token = driver.cancel_token();
    let step = Step::new("stuck_step", "payload");
    let cfg = fast_cfg().with_hard_timeout(Duration::from_secs(3600));

    let (outcome, _) = tokio::join!(driver.run_step(&step, &cfg), async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        token.cancel();
    });

    assert!(!outcome.succeeded);
    assert_eq!(outcome.reason, OutcomeReason::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn repeated_runs_are_independent() {
    let detector = ScriptedDetector {
        script: Mutex::new(VecDeque::new()),
        exhausted: vec![ready(), input_zone()],
    };
    let driver = Driver::new(
        Arc::new(PngFrames {
            data: png_frame_data(32, 32),
        }),
        Arc::new(detector),
        Arc::new(SilentActuator),
    );

    let step = Step::new("repeat_step", "payload");
    let cfg = fast_cfg();

    let first = driver.run_step(&step, &cfg).await;
    let second = driver.run_step(&step, &cfg).await;

    assert!(first.succeeded && second.succeeded);
    assert_eq!(first, second);
}
